//! Core type tree model.
//!
//! A [`TypeTree`] is what the schema compiler produces: packages of generated
//! types, each with its fields and nested types. Every node keeps the name it
//! was declared with in the schema next to the sanitized identifier chosen for
//! the generated code, and carries a list of [`Metadata`] records that the
//! annotation engine attaches.

use serde::{Deserialize, Serialize};

/// Name of the synthesized factory type added to every package.
pub const FACTORY_TYPE_NAME: &str = "ObjectFactory";

/// Default datatype tag of a literal override.
pub const DEFAULT_LITERAL_DATATYPE: &str = "String";

/// Scalar value types a schema builtin can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    /// Any textual type (`xs:string`, dates, URIs, binary encodings).
    String,
    /// `xs:boolean`.
    Bool,
    /// `xs:byte`.
    I8,
    /// `xs:short`.
    I16,
    /// `xs:int`.
    I32,
    /// `xs:long` and the unbounded integer types.
    I64,
    /// `xs:unsignedByte`.
    U8,
    /// `xs:unsignedShort`.
    U16,
    /// `xs:unsignedInt`.
    U32,
    /// `xs:unsignedLong`.
    U64,
    /// `xs:float`.
    F32,
    /// `xs:double` and `xs:decimal`.
    F64,
}

impl Builtin {
    /// Returns the Rust spelling of this scalar.
    #[must_use]
    pub fn rust_name(self) -> &'static str {
        match self {
            Builtin::String => "String",
            Builtin::Bool => "bool",
            Builtin::I8 => "i8",
            Builtin::I16 => "i16",
            Builtin::I32 => "i32",
            Builtin::I64 => "i64",
            Builtin::U8 => "u8",
            Builtin::U16 => "u16",
            Builtin::U32 => "u32",
            Builtin::U64 => "u64",
            Builtin::F32 => "f32",
            Builtin::F64 => "f64",
        }
    }
}

/// Declared value type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// A scalar builtin.
    Builtin(Builtin),
    /// A generated type, addressed by its identifier path from the package
    /// root (e.g. `["Travel", "Stop"]` for a type nested in `Travel`).
    Ref(Vec<String>),
    /// A parameterized container such as `Vec<T>`.
    Generic {
        /// Container name (`Vec` for repeated particles).
        container: String,
        /// Type arguments.
        args: Vec<ValueType>,
    },
}

impl ValueType {
    /// Returns a `Vec` container of `item`.
    #[must_use]
    pub fn list_of(item: ValueType) -> Self {
        ValueType::Generic {
            container: "Vec".to_string(),
            args: vec![item],
        }
    }

    /// Returns a reference to a top-level generated type.
    #[must_use]
    pub fn reference(name: &str) -> Self {
        ValueType::Ref(vec![name.to_string()])
    }

    /// Returns true if this is a parameterized container with at least one
    /// type argument.
    #[must_use]
    pub fn is_parameterized(&self) -> bool {
        matches!(self, ValueType::Generic { args, .. } if !args.is_empty())
    }
}

impl From<Builtin> for ValueType {
    fn from(b: Builtin) -> Self {
        ValueType::Builtin(b)
    }
}

/// How a field is bound to the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldBinding {
    /// Bound to an element declaration.
    Element {
        /// Declared element name, when recorded.
        name: Option<String>,
    },
    /// Bound to an attribute declaration.
    Attribute {
        /// Declared attribute name, when recorded.
        name: Option<String>,
    },
    /// Text content of a simple-content type.
    Value,
    /// Element wildcard (`xs:any`).
    Any,
}

/// Type declaration recorded for a generated type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Declared type name; `None` for anonymous types.
    pub name: Option<String>,
}

/// Structural shape of a generated type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeShape {
    /// A record with fields.
    #[default]
    Complex,
    /// A closed set of string values (`xs:enumeration` facets).
    Enumeration(Vec<String>),
}

/// Whether an intermediate node of a link chain has a stable identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    /// A blank node without stable identity.
    #[default]
    Anonymous,
    /// A node with a reusable identifier shared across mappings.
    Shared,
}

impl NodeType {
    /// Returns the variant name as written in generated code and manifests.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Anonymous => "Anonymous",
            NodeType::Shared => "Shared",
        }
    }
}

/// One intermediate relation of a property chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkHop {
    /// Property linking to the intermediate node.
    pub property_name: String,
    /// Identity of the intermediate node.
    pub node_type: NodeType,
    /// Shared identifier, used when `node_type` is [`NodeType::Shared`].
    pub shared_id: Option<String>,
}

impl LinkHop {
    /// Returns a hop through an anonymous intermediate node.
    #[must_use]
    pub fn anonymous(property_name: &str) -> Self {
        Self {
            property_name: property_name.to_string(),
            node_type: NodeType::Anonymous,
            shared_id: None,
        }
    }

    /// Returns a hop through a shared intermediate node.
    #[must_use]
    pub fn shared(property_name: &str, shared_id: &str) -> Self {
        Self {
            property_name: property_name.to_string(),
            node_type: NodeType::Shared,
            shared_id: Some(shared_id.to_string()),
        }
    }
}

/// Hard-coded object of the last triple in a property chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    /// Literal value.
    pub value: String,
    /// Datatype tag of the value.
    pub datatype: String,
}

impl Literal {
    /// Returns a literal with the default `String` datatype.
    #[must_use]
    pub fn string(value: &str) -> Self {
        Self {
            value: value.to_string(),
            datatype: DEFAULT_LITERAL_DATATYPE.to_string(),
        }
    }
}

/// Correspondence between a generated type and an ontology class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMapping {
    /// Ontology class reference (opaque, e.g. `"st4rt:Travel"`).
    pub class: String,
}

/// Correspondence between a field and an ontology property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMapping {
    /// Terminal property of the chain.
    pub property_name: String,
    /// Intermediate hops applied before the terminal property.
    pub links: Vec<LinkHop>,
    /// Whether the field holds more than one value.
    pub is_list: bool,
    /// Literal object overriding the field value.
    pub literal: Option<Literal>,
}

/// Named graph an individual's triples are persisted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedGraph {
    /// The graph URI is the individual's own URI.
    Instance,
    /// A fixed graph URI.
    Static(String),
}

impl Default for NamedGraph {
    fn default() -> Self {
        NamedGraph::Static(iris::MESSAGE_GRAPH.to_string())
    }
}

/// Ordered prefix → namespace URI table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceTable {
    /// `(prefix, uri)` pairs in declaration order.
    pub pairs: Vec<(String, String)>,
}

impl NamespaceTable {
    /// Builds a table from `(prefix, uri)` pairs.
    #[must_use]
    pub fn new<P: Into<String>, U: Into<String>>(pairs: impl IntoIterator<Item = (P, U)>) -> Self {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(p, u)| (p.into(), u.into()))
                .collect(),
        }
    }

    /// Builds a table from the flat alternating form
    /// `prefix_1, uri_1, prefix_2, uri_2, ...`.
    ///
    /// Returns `None` when the list has odd length.
    #[must_use]
    pub fn from_flat<S: AsRef<str>>(items: &[S]) -> Option<Self> {
        if items.len() % 2 != 0 {
            return None;
        }
        Some(Self {
            pairs: items
                .chunks(2)
                .map(|pair| (pair[0].as_ref().to_string(), pair[1].as_ref().to_string()))
                .collect(),
        })
    }

    /// The table attached when no other is configured: `xml` and `rdf`.
    #[must_use]
    pub fn standard() -> Self {
        Self::new([("xml", iris::XML), ("rdf", iris::RDF)])
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A metadata record attached to a type or field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metadata {
    /// Class correspondence (types only).
    Class(ClassMapping),
    /// Property correspondence (fields only).
    Property(PropertyMapping),
    /// Namespace prefix table (top-level types only).
    Namespaces(NamespaceTable),
    /// Named graph policy (types only).
    NamedGraph(NamedGraph),
}

/// A generated field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    /// Generated identifier; the field's key inside its owning type.
    pub name: String,
    /// Declared value type.
    pub value_type: ValueType,
    /// Schema declaration this field is bound to.
    pub binding: FieldBinding,
    /// Whether the field may be absent.
    pub optional: bool,
    /// Documentation copied from the schema.
    pub documentation: Option<String>,
    /// Attached metadata records.
    pub metadata: Vec<Metadata>,
}

impl FieldNode {
    /// Returns a required element-bound field.
    #[must_use]
    pub fn element(name: &str, original: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            binding: FieldBinding::Element {
                name: Some(original.to_string()),
            },
            optional: false,
            documentation: None,
            metadata: Vec::new(),
        }
    }

    /// Returns an optional attribute-bound field.
    #[must_use]
    pub fn attribute(name: &str, original: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            binding: FieldBinding::Attribute {
                name: Some(original.to_string()),
            },
            optional: true,
            documentation: None,
            metadata: Vec::new(),
        }
    }

    /// Name this field was declared with in the schema.
    ///
    /// Element and attribute bindings yield their recorded name, falling back
    /// to the field key. Value and wildcard bindings have no schema name.
    #[must_use]
    pub fn original_name(&self) -> Option<&str> {
        match &self.binding {
            FieldBinding::Element { name } | FieldBinding::Attribute { name } => {
                Some(name.as_deref().unwrap_or(&self.name))
            }
            FieldBinding::Value | FieldBinding::Any => None,
        }
    }

    /// Returns the attached property mapping, if any.
    #[must_use]
    pub fn property_mapping(&self) -> Option<&PropertyMapping> {
        self.metadata.iter().find_map(|m| match m {
            Metadata::Property(p) => Some(p),
            _ => None,
        })
    }
}

/// A generated type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    /// Generated identifier, unique within the enclosing package or type.
    pub name: String,
    /// Type declaration, when the compiler recorded one.
    pub decl: Option<TypeDecl>,
    /// Record or enumeration.
    pub shape: TypeShape,
    /// Identifier path of the extended base type.
    pub base: Option<Vec<String>>,
    /// Documentation copied from the schema.
    pub documentation: Option<String>,
    /// Whether this is the synthesized factory type.
    pub is_factory: bool,
    /// Fields in declaration order.
    pub fields: Vec<FieldNode>,
    /// Nested types in declaration order.
    pub nested: Vec<TypeNode>,
    /// Attached metadata records.
    pub metadata: Vec<Metadata>,
}

impl TypeNode {
    /// Returns an empty complex type declared under `original`.
    #[must_use]
    pub fn declared(name: &str, original: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            decl: Some(TypeDecl {
                name: original.map(str::to_string),
            }),
            shape: TypeShape::Complex,
            base: None,
            documentation: None,
            is_factory: false,
            fields: Vec::new(),
            nested: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Returns the synthesized factory type.
    #[must_use]
    pub fn factory() -> Self {
        Self {
            is_factory: true,
            decl: None,
            ..Self::declared(FACTORY_TYPE_NAME, None)
        }
    }

    /// Name this type was declared with in the schema: the declaration's
    /// name when present, else the generated identifier.
    #[must_use]
    pub fn original_name(&self) -> &str {
        self.decl
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .unwrap_or(&self.name)
    }

    /// Looks up a field by its generated identifier.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldNode> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a nested type by its generated identifier.
    #[must_use]
    pub fn nested_type(&self, name: &str) -> Option<&TypeNode> {
        self.nested.iter().find(|t| t.name == name)
    }

    /// Returns the attached class mapping, if any.
    #[must_use]
    pub fn class_mapping(&self) -> Option<&ClassMapping> {
        self.metadata.iter().find_map(|m| match m {
            Metadata::Class(c) => Some(c),
            _ => None,
        })
    }

    /// Returns the attached namespace table, if any.
    #[must_use]
    pub fn namespaces(&self) -> Option<&NamespaceTable> {
        self.metadata.iter().find_map(|m| match m {
            Metadata::Namespaces(t) => Some(t),
            _ => None,
        })
    }

    /// Returns the attached named graph policy, if any.
    #[must_use]
    pub fn named_graph(&self) -> Option<&NamedGraph> {
        self.metadata.iter().find_map(|m| match m {
            Metadata::NamedGraph(g) => Some(g),
            _ => None,
        })
    }

    /// Returns true if any metadata record is attached to this type or one
    /// of its fields.
    #[must_use]
    pub fn has_mappings(&self) -> bool {
        self.class_mapping().is_some()
            || self.fields.iter().any(|f| f.property_mapping().is_some())
    }
}

/// All types generated for one target namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Dotted package identifier (e.g. `"org.example.travel"`).
    pub name: String,
    /// Target namespace URI the package was derived from.
    pub namespace: Option<String>,
    /// Top-level types, the factory type included.
    pub types: Vec<TypeNode>,
}

impl Package {
    /// Returns the type at `path`: the first index selects a top-level type,
    /// each following index a nested type.
    #[must_use]
    pub fn type_at(&self, path: &[usize]) -> Option<&TypeNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.types.get(*first)?;
        for idx in rest {
            node = node.nested.get(*idx)?;
        }
        Some(node)
    }

    /// Mutable variant of [`Package::type_at`].
    pub fn type_at_mut(&mut self, path: &[usize]) -> Option<&mut TypeNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.types.get_mut(*first)?;
        for idx in rest {
            node = node.nested.get_mut(*idx)?;
        }
        Some(node)
    }

    /// Looks up a top-level type by its generated identifier.
    #[must_use]
    pub fn find_type(&self, name: &str) -> Option<&TypeNode> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Resolves an identifier path (as used by [`ValueType::Ref`]).
    #[must_use]
    pub fn resolve_path(&self, path: &[String]) -> Option<&TypeNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.find_type(first)?;
        for name in rest {
            node = node.nested_type(name)?;
        }
        Some(node)
    }

    /// Returns the synthesized factory type, if present.
    #[must_use]
    pub fn factory(&self) -> Option<&TypeNode> {
        self.types.iter().find(|t| t.is_factory)
    }
}

/// The complete tree produced by the schema compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeTree {
    /// Packages in creation order.
    pub packages: Vec<Package>,
}

impl TypeTree {
    /// Returns the position of the package named `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.packages.iter().position(|p| p.name == name)
    }

    /// Looks up a package by name.
    #[must_use]
    pub fn find_package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Returns the total number of types, nested ones included.
    #[must_use]
    pub fn type_count(&self) -> usize {
        fn count(node: &TypeNode) -> usize {
            1 + node.nested.iter().map(count).sum::<usize>()
        }
        self.packages
            .iter()
            .flat_map(|p| p.types.iter())
            .map(count)
            .sum()
    }
}

/// Standard IRI constants.
pub mod iris {
    /// XML namespace.
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD datatype namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// XML Schema namespace (the `xs:` element namespace).
    pub const XML_SCHEMA: &str = "http://www.w3.org/2001/XMLSchema";

    /// Mapping-manifest vocabulary.
    pub const RDFBIND: &str = "https://w3id.org/rdfbind#";

    /// Graph a message is persisted into unless configured otherwise.
    pub const MESSAGE_GRAPH: &str = "http://st4rt.eu/ontologies/st4rt/message";
}
