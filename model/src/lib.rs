//! Typed model shared by the rdfbind crates.
//!
//! The `rdfbind-model` crate holds the [`TypeTree`] the schema compiler
//! produces and the annotation engine decorates, the naming rules that turn
//! namespace URIs and schema names into Rust identifiers, and serializers for
//! the mapping manifest written next to generated code.
//!
//! # Entry Point
//!
//! ```
//! use rdfbind_model::{names, Package, TypeNode, TypeTree};
//!
//! let name = names::package_for_namespace("http://example.org/travel");
//! assert_eq!(name, "org.example.travel");
//!
//! let tree = TypeTree {
//!     packages: vec![Package {
//!         name,
//!         namespace: Some("http://example.org/travel".to_string()),
//!         types: vec![TypeNode::declared("Travel", None), TypeNode::factory()],
//!     }],
//! };
//! assert_eq!(tree.type_count(), 2);
//! ```
//!
//! # Serialization
//!
//! ```
//! # use rdfbind_model::Package;
//! # let package = Package { name: "org.example".to_string(), namespace: None, types: vec![] };
//! let turtle = rdfbind_model::serializer::turtle::to_turtle(&package);
//! let json_ld = rdfbind_model::serializer::jsonld::to_json_ld(&package);
//! # assert!(turtle.contains("rdfbind:Package"));
//! # assert!(json_ld["@graph"].is_array());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod model;
pub mod names;
pub mod serializer;

pub use model::{
    iris, Builtin, ClassMapping, FieldBinding, FieldNode, LinkHop, Literal, Metadata, NamedGraph,
    NamespaceTable, NodeType, Package, PropertyMapping, TypeDecl, TypeNode, TypeShape, TypeTree,
    ValueType, DEFAULT_LITERAL_DATATYPE, FACTORY_TYPE_NAME,
};
