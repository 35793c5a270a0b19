//! Attaching mapping records to resolved nodes.
//!
//! One [`apply`] handles both the checked and the unchecked path: the
//! request's [`Expectation`] either names the kind the caller wants or asks
//! for the kind to be inferred from the node category.

use std::fmt;

use rdfbind_model::{
    ClassMapping, LinkHop, Literal, Metadata, NamedGraph, Package, PropertyMapping,
};
use tracing::warn;

use crate::error::{EngineError, NodeCategory};
use crate::index::NodeRef;

/// Kind of mapping record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingKind {
    /// Type ↔ ontology class.
    Class,
    /// Field ↔ ontology property.
    Property,
}

impl MappingKind {
    /// Parses a kind code: `'C'` is a class, `'P'` a property.
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'C' => Some(MappingKind::Class),
            'P' => Some(MappingKind::Property),
            _ => None,
        }
    }

    /// The node category this kind applies to.
    #[must_use]
    pub fn category(self) -> NodeCategory {
        match self {
            MappingKind::Class => NodeCategory::Type,
            MappingKind::Property => NodeCategory::Field,
        }
    }

    /// The kind a node of `category` takes.
    #[must_use]
    pub fn for_category(category: NodeCategory) -> Self {
        match category {
            NodeCategory::Type => MappingKind::Class,
            NodeCategory::Field => MappingKind::Property,
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingKind::Class => f.write_str("class"),
            MappingKind::Property => f.write_str("property"),
        }
    }
}

/// What the caller expects the resolved node to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expectation {
    /// Infer the kind from the node category.
    #[default]
    Infer,
    /// Require this kind.
    Kind(MappingKind),
    /// An unrecognized kind code; never matches.
    Unknown(char),
}

impl Expectation {
    /// Parses a kind code for the checked path.
    #[must_use]
    pub fn from_code(code: char) -> Self {
        MappingKind::from_code(code).map_or(Expectation::Unknown(code), Expectation::Kind)
    }
}

impl From<MappingKind> for Expectation {
    fn from(kind: MappingKind) -> Self {
        Expectation::Kind(kind)
    }
}

/// A mapping to attach to a resolved node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingRequest {
    /// Ontology class or property reference (opaque).
    pub reference: String,
    /// Expected kind.
    pub expect: Expectation,
    /// Intermediate hops (property mappings only).
    pub links: Vec<LinkHop>,
    /// Literal override (property mappings only).
    pub literal: Option<Literal>,
    /// Named graph policy (class mappings only).
    pub graph: Option<NamedGraph>,
}

impl MappingRequest {
    /// An unchecked request for `reference`.
    #[must_use]
    pub fn new(reference: &str) -> Self {
        Self {
            reference: reference.to_string(),
            ..Self::default()
        }
    }

    /// A checked request for `reference`.
    #[must_use]
    pub fn checked(reference: &str, expect: impl Into<Expectation>) -> Self {
        Self {
            expect: expect.into(),
            ..Self::new(reference)
        }
    }

    /// Sets the hop chain.
    #[must_use]
    pub fn with_links(mut self, links: Vec<LinkHop>) -> Self {
        self.links = links;
        self
    }

    /// Sets the literal override.
    #[must_use]
    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    /// Sets the named graph policy.
    #[must_use]
    pub fn with_graph(mut self, graph: NamedGraph) -> Self {
        self.graph = Some(graph);
        self
    }
}

/// Replaces the record of the same variant in `metadata`, or appends it.
pub(crate) fn upsert(metadata: &mut Vec<Metadata>, record: Metadata) {
    let tag = std::mem::discriminant(&record);
    match metadata
        .iter_mut()
        .find(|m| std::mem::discriminant(&**m) == tag)
    {
        Some(slot) => *slot = record,
        None => metadata.push(record),
    }
}

/// Attaches the mapping described by `request` to `node` in `package`.
///
/// `concept` is the original name `node` was resolved from; it only appears
/// in errors. Returns the kind that was attached.
///
/// # Errors
///
/// Returns [`EngineError::KindMismatch`] if the request expects a kind the
/// node category cannot take, and [`EngineError::ConceptNotFound`] if `node`
/// no longer exists in `package`.
pub fn apply(
    package: &mut Package,
    node: &NodeRef,
    concept: &str,
    request: &MappingRequest,
) -> Result<MappingKind, EngineError> {
    let category = node.category();
    let kind = match request.expect {
        Expectation::Infer => MappingKind::for_category(category),
        Expectation::Kind(kind) if kind.category() == category => kind,
        Expectation::Kind(kind) => {
            return Err(EngineError::KindMismatch {
                concept: concept.to_string(),
                found: category,
                requested: kind.to_string(),
            });
        }
        Expectation::Unknown(code) => {
            return Err(EngineError::KindMismatch {
                concept: concept.to_string(),
                found: category,
                requested: format!("`{code}`"),
            });
        }
    };
    let missing = || EngineError::ConceptNotFound(concept.to_string());

    match node {
        NodeRef::Type(path) => {
            let ty = package.type_at_mut(path.as_slice()).ok_or_else(missing)?;
            if !request.links.is_empty() || request.literal.is_some() {
                warn!(concept, "links and literal overrides do not apply to a class mapping; ignored");
            }
            upsert(
                &mut ty.metadata,
                Metadata::Class(ClassMapping {
                    class: request.reference.clone(),
                }),
            );
            if let Some(graph) = &request.graph {
                upsert(&mut ty.metadata, Metadata::NamedGraph(graph.clone()));
            }
        }
        NodeRef::Field { owner, field } => {
            let field = package
                .type_at_mut(owner.as_slice())
                .and_then(|ty| ty.fields.get_mut(*field))
                .ok_or_else(missing)?;
            if request.graph.is_some() {
                warn!(concept, "a named graph does not apply to a property mapping; ignored");
            }
            let is_list = field.value_type.is_parameterized();
            upsert(
                &mut field.metadata,
                Metadata::Property(PropertyMapping {
                    property_name: request.reference.clone(),
                    links: request.links.clone(),
                    is_list,
                    literal: request.literal.clone(),
                }),
            );
        }
    }
    Ok(kind)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::index::TypePath;
    use rdfbind_model::{Builtin, FieldNode, TypeNode, ValueType};

    fn package() -> Package {
        let mut travel = TypeNode::declared("Travel", Some("Travel"));
        travel.fields.push(FieldNode::element(
            "fare_url",
            "fareTravelUrl",
            Builtin::String.into(),
        ));
        travel.fields.push(FieldNode::element(
            "stops",
            "stop",
            ValueType::list_of(ValueType::reference("Stop")),
        ));
        Package {
            name: "org.example".to_string(),
            namespace: None,
            types: vec![travel],
        }
    }

    fn travel() -> NodeRef {
        NodeRef::Type(TypePath(vec![0]))
    }

    fn field(i: usize) -> NodeRef {
        NodeRef::Field {
            owner: TypePath(vec![0]),
            field: i,
        }
    }

    #[test]
    fn kind_codes() {
        assert_eq!(MappingKind::from_code('C'), Some(MappingKind::Class));
        assert_eq!(MappingKind::from_code('P'), Some(MappingKind::Property));
        assert_eq!(MappingKind::from_code('c'), None);
        assert_eq!(Expectation::from_code('X'), Expectation::Unknown('X'));
    }

    #[test]
    fn unchecked_infers_kind_from_category() {
        let mut package = package();
        let request = MappingRequest::new("st4rt:Travel");
        assert_eq!(apply(&mut package, &travel(), "Travel", &request), Ok(MappingKind::Class));
        let request = MappingRequest::new("st4rt:hasStop");
        assert_eq!(apply(&mut package, &field(1), "stop", &request), Ok(MappingKind::Property));
        let stops = &package.types[0].fields[1];
        assert!(stops.property_mapping().is_some_and(|m| m.is_list));
    }

    #[test]
    fn unknown_code_is_a_mismatch() {
        let mut package = package();
        let request = MappingRequest::checked("st4rt:Travel", Expectation::from_code('X'));
        let err = apply(&mut package, &travel(), "Travel", &request).expect_err("must fail");
        assert!(matches!(err, EngineError::KindMismatch { found: NodeCategory::Type, .. }));
        assert!(package.types[0].metadata.is_empty());
    }

    #[test]
    fn reapplying_replaces_the_record() {
        let mut package = package();
        for reference in ["st4rt:A", "st4rt:B"] {
            let request = MappingRequest::checked(reference, MappingKind::Class)
                .with_graph(NamedGraph::Instance);
            apply(&mut package, &travel(), "Travel", &request).expect("applies");
        }
        let ty = &package.types[0];
        assert_eq!(ty.metadata.len(), 2);
        assert_eq!(ty.class_mapping().map(|c| c.class.as_str()), Some("st4rt:B"));
        assert_eq!(ty.named_graph(), Some(&NamedGraph::Instance));
    }

    #[test]
    fn chain_and_literal_are_recorded() {
        let mut package = package();
        let request = MappingRequest::checked("st4rt:url", MappingKind::Property)
            .with_links(vec![
                LinkHop::anonymous("st4rt:hasFare"),
                LinkHop::shared("st4rt:hasOffer", "offer-1"),
            ])
            .with_literal(Literal::string("n/a"));
        apply(&mut package, &field(0), "fareTravelUrl", &request).expect("applies");
        let mapping = package.types[0].fields[0]
            .property_mapping()
            .cloned()
            .expect("mapped");
        assert_eq!(mapping.links.len(), 2);
        assert_eq!(mapping.links[1].shared_id.as_deref(), Some("offer-1"));
        assert_eq!(mapping.literal.map(|l| l.datatype), Some("String".to_string()));
        assert!(!mapping.is_list);
    }

    #[test]
    fn stale_node_is_not_found() {
        let mut package = package();
        let request = MappingRequest::new("st4rt:x");
        assert_eq!(
            apply(&mut package, &field(9), "ghost", &request),
            Err(EngineError::ConceptNotFound("ghost".to_string()))
        );
    }
}
