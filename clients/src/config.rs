//! Command-line contract and batch mapping files.

use std::path::{Path, PathBuf};

use rdfbind_engine::{Expectation, MappingRequest};
use rdfbind_model::{LinkHop, Literal, NamedGraph, NamespaceTable, DEFAULT_LITERAL_DATATYPE};
use serde::Deserialize;

/// Errors in the command line or a batch mapping file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither `uri <URI>` nor the five-argument form.
    #[error("expected `uri <URI>` or `<schema> <outputDir> <standardConcept> <referenceConcept> <referenceType>`, got {count} argument(s)")]
    Usage {
        /// Number of positional arguments given.
        count: usize,
    },

    /// The reference type argument is empty.
    #[error("reference type must not be empty; use `C` (class) or `P` (property)")]
    EmptyKind,

    /// The batch file cannot be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path of the batch file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The batch file is not valid TOML for a mapping file.
    #[error("invalid mapping file {}: {source}", path.display())]
    Parse {
        /// Path of the batch file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A mapping entry is inconsistent.
    #[error("mapping for `{concept}`: {message}")]
    InvalidMapping {
        /// Concept of the offending entry.
        concept: String,
        /// What is wrong with it.
        message: String,
    },
}

/// The five positional arguments of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Schema file to compile.
    pub schema: PathBuf,
    /// Directory generated code is written to.
    pub out_dir: PathBuf,
    /// Schema name of the node to map.
    pub standard_concept: String,
    /// Ontology reference attached to it.
    pub reference_concept: String,
    /// Declared kind: first character of the reference type argument.
    pub kind_code: char,
}

/// What the positional arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print the package identifier of a namespace URI.
    Uri(String),
    /// Compile, annotate and emit.
    Generate(GenerateArgs),
}

impl Invocation {
    /// Interprets the positional arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Usage`] for any other argument count and
    /// [`ConfigError::EmptyKind`] if the reference type is empty.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        match args {
            [mode, uri] if mode.as_ref().eq_ignore_ascii_case("uri") => {
                Ok(Invocation::Uri(uri.as_ref().to_string()))
            }
            [schema, out_dir, standard, reference, kind] => {
                let kind_code = kind.as_ref().chars().next().ok_or(ConfigError::EmptyKind)?;
                Ok(Invocation::Generate(GenerateArgs {
                    schema: PathBuf::from(schema.as_ref()),
                    out_dir: PathBuf::from(out_dir.as_ref()),
                    standard_concept: standard.as_ref().to_string(),
                    reference_concept: reference.as_ref().to_string(),
                    kind_code,
                }))
            }
            _ => Err(ConfigError::Usage { count: args.len() }),
        }
    }
}

/// Node identity of a hop in a batch file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkNode {
    /// Fresh blank node.
    #[default]
    Anonymous,
    /// Node shared through `shared_id`.
    Shared,
}

/// One `[[mapping.links]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkEntry {
    /// Property leading to the intermediate node.
    pub property: String,
    /// Identity of the intermediate node.
    #[serde(default)]
    pub node: LinkNode,
    /// Identifier of a shared node.
    pub shared_id: Option<String>,
}

/// One `[[mapping]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingEntry {
    /// Schema name to resolve.
    pub concept: String,
    /// Ontology reference to attach.
    pub reference: String,
    /// Declared kind (`"C"` or `"P"`); inferred when absent.
    pub kind: Option<String>,
    /// Property chain hops.
    #[serde(default)]
    pub links: Vec<LinkEntry>,
    /// Literal override.
    pub value: Option<String>,
    /// Datatype of the literal override.
    pub datatype: Option<String>,
    /// `"instance"` or a static graph URI.
    pub graph: Option<String>,
}

impl MappingEntry {
    fn invalid(&self, message: &str) -> ConfigError {
        ConfigError::InvalidMapping {
            concept: self.concept.clone(),
            message: message.to_string(),
        }
    }

    /// Builds the engine request for this entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMapping`] for an empty kind, a shared
    /// hop without `shared_id`, or a datatype without a value.
    pub fn to_request(&self) -> Result<MappingRequest, ConfigError> {
        let expect = match self.kind.as_deref() {
            None => Expectation::Infer,
            Some(kind) => {
                let code = kind
                    .chars()
                    .next()
                    .ok_or_else(|| self.invalid("`kind` must not be empty"))?;
                Expectation::from_code(code)
            }
        };

        let links = self
            .links
            .iter()
            .map(|link| match (link.node, link.shared_id.as_deref()) {
                (LinkNode::Anonymous, None) => Ok(LinkHop::anonymous(&link.property)),
                (LinkNode::Anonymous, Some(_)) => {
                    Err(self.invalid("`shared_id` is only valid on a shared link"))
                }
                (LinkNode::Shared, Some(id)) => Ok(LinkHop::shared(&link.property, id)),
                (LinkNode::Shared, None) => Err(self.invalid("shared link needs a `shared_id`")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let literal = match (&self.value, &self.datatype) {
            (Some(value), datatype) => Some(Literal {
                value: value.clone(),
                datatype: datatype
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LITERAL_DATATYPE.to_string()),
            }),
            (None, Some(_)) => return Err(self.invalid("`datatype` given without `value`")),
            (None, None) => None,
        };

        let mut request = MappingRequest::new(&self.reference).with_links(links);
        request.expect = expect;
        if let Some(literal) = literal {
            request = request.with_literal(literal);
        }
        if let Some(graph) = self.graph.as_deref() {
            request = request.with_graph(if graph.eq_ignore_ascii_case("instance") {
                NamedGraph::Instance
            } else {
                NamedGraph::Static(graph.to_string())
            });
        }
        Ok(request)
    }
}

/// One `[[namespace]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceEntry {
    /// Prefix.
    pub prefix: String,
    /// Namespace URI.
    pub uri: String,
}

/// A batch mapping file.
///
/// ```toml
/// [[mapping]]
/// concept = "fareTravelUrl"
/// reference = "st4rt:hasUrl"
/// kind = "P"
/// links = [{ property = "st4rt:hasFare", node = "shared", shared_id = "fare" }]
///
/// [[namespace]]
/// prefix = "st4rt"
/// uri = "http://st4rt.eu/ontologies/st4rt#"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingFile {
    /// Mapping requests, applied in order.
    #[serde(default, rename = "mapping")]
    pub mappings: Vec<MappingEntry>,
    /// Namespace table replacing the default one.
    #[serde(default, rename = "namespace")]
    pub namespaces: Vec<NamespaceEntry>,
}

impl MappingFile {
    /// Reads and parses a batch file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid mapping file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The namespace table declared by the file, if it declares any.
    #[must_use]
    pub fn namespace_table(&self) -> Option<NamespaceTable> {
        if self.namespaces.is_empty() {
            None
        } else {
            Some(NamespaceTable::new(
                self.namespaces
                    .iter()
                    .map(|n| (n.prefix.as_str(), n.uri.as_str())),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use rdfbind_engine::MappingKind;

    #[test]
    fn uri_mode_is_case_insensitive() {
        assert_eq!(
            Invocation::parse(&["URI", "http://example.org/a"]).expect("uri"),
            Invocation::Uri("http://example.org/a".to_string())
        );
    }

    #[test]
    fn five_arguments_take_the_first_kind_character() {
        let Invocation::Generate(args) =
            Invocation::parse(&["t.xsd", "out", "Travel", "st4rt:Travel", "Class"]).expect("parse")
        else {
            panic!("expected generate");
        };
        assert_eq!(args.kind_code, 'C');
        assert_eq!(args.schema, PathBuf::from("t.xsd"));
        assert_eq!(args.reference_concept, "st4rt:Travel");
    }

    #[test]
    fn other_argument_counts_are_rejected() {
        assert!(matches!(
            Invocation::parse(&["a", "b", "c"]),
            Err(ConfigError::Usage { count: 3 })
        ));
        assert!(matches!(
            Invocation::parse(&["file", "x"]),
            Err(ConfigError::Usage { count: 2 })
        ));
        assert!(matches!(
            Invocation::parse(&["a", "b", "c", "d", ""]),
            Err(ConfigError::EmptyKind)
        ));
    }

    #[test]
    fn batch_entries_become_requests() {
        let file: MappingFile = toml::from_str(
            r#"
            [[mapping]]
            concept = "fareTravelUrl"
            reference = "st4rt:hasUrl"
            kind = "P"
            value = "fixed"
            links = [
              { property = "st4rt:hasFare" },
              { property = "st4rt:hasOffer", node = "shared", shared_id = "offer" },
            ]

            [[mapping]]
            concept = "Travel"
            reference = "st4rt:Travel"
            graph = "instance"

            [[namespace]]
            prefix = "st4rt"
            uri = "http://st4rt.eu/ontologies/st4rt#"
            "#,
        )
        .expect("parses");

        let fare = file.mappings[0].to_request().expect("valid");
        assert_eq!(fare.expect, Expectation::Kind(MappingKind::Property));
        assert_eq!(
            fare.links,
            [
                LinkHop::anonymous("st4rt:hasFare"),
                LinkHop::shared("st4rt:hasOffer", "offer")
            ]
        );
        assert_eq!(fare.literal, Some(Literal::string("fixed")));

        let travel = file.mappings[1].to_request().expect("valid");
        assert_eq!(travel.expect, Expectation::Infer);
        assert_eq!(travel.graph, Some(NamedGraph::Instance));

        let table = file.namespace_table().expect("table");
        assert_eq!(table.pairs.len(), 1);
    }

    #[test]
    fn inconsistent_entries_are_rejected() {
        let entry = MappingEntry {
            concept: "x".to_string(),
            reference: "ex:x".to_string(),
            kind: None,
            links: vec![LinkEntry {
                property: "ex:p".to_string(),
                node: LinkNode::Shared,
                shared_id: None,
            }],
            value: None,
            datatype: None,
            graph: None,
        };
        assert!(matches!(
            entry.to_request(),
            Err(ConfigError::InvalidMapping { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<MappingFile>("[[mapping]]\nconcept = \"a\"\nreference = \"b\"\ncolour = \"red\"\n").is_err());
    }
}
