//! rdfbind annotation mapping engine.
//!
//! Given a compiled [`TypeTree`](rdfbind_model::TypeTree), the engine selects
//! the package derived from the schema's target namespace, indexes it by the
//! names the schema declared, resolves those names to types and fields, and
//! attaches class and property mappings plus a namespace table.
//!
//! # Example
//!
//! ```
//! use rdfbind_engine::{Engine, MappingKind};
//! use rdfbind_model::NamespaceTable;
//!
//! let schema = rdfbind_xsd::compile_str(
//!     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
//!                   targetNamespace="http://example.org/travel">
//!          <xs:element name="Travel">
//!            <xs:complexType>
//!              <xs:sequence>
//!                <xs:element name="fareTravelUrl" type="xs:anyURI"/>
//!              </xs:sequence>
//!            </xs:complexType>
//!          </xs:element>
//!        </xs:schema>"#,
//!     "travel.xsd",
//! )?;
//!
//! let mut engine = Engine::with_tree(schema.tree);
//! engine.select_scope(&schema.target_namespace)?;
//! let kind = engine.annotate_with_check("fareTravelUrl", "st4rt:hasFareTravel", 'P')?;
//! assert_eq!(kind, MappingKind::Property);
//! engine.insert_namespaces(&NamespaceTable::standard())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod apply;
pub mod engine;
pub mod error;
pub mod index;
pub mod namespaces;
mod resolve;

pub use apply::{apply, Expectation, MappingKind, MappingRequest};
pub use engine::{Engine, NodeView, Stage};
pub use error::{EngineError, NodeCategory};
pub use index::{IndexEntry, NodeRef, TypePath, TypeTreeIndex};
