//! rdfbind schema compiler.
//!
//! Reads an XML Schema document and produces the [`TypeTree`] the annotation
//! engine works on: one package per schema, named after its target
//! namespace, holding a type for every named complex type, every global
//! element with an anonymous complex type and every enumerated simple type,
//! plus the synthesized `ObjectFactory`.
//!
//! # Example
//!
//! ```
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
//! assert_eq!(schema.target_namespace, "http://example.org/travel");
//! assert_eq!(schema.tree.packages[0].name, "org.example.travel");
//! # Ok::<(), rdfbind_xsd::SchemaError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

mod builtins;
mod compiler;
pub mod error;

use std::path::Path;

use rdfbind_model::TypeTree;
use roxmltree::{Document, ParsingOptions};

pub use error::SchemaError;

/// A compiled schema.
#[derive(Debug, Clone)]
pub struct Schema {
    /// The schema's `targetNamespace` (empty when absent).
    pub target_namespace: String,
    /// The generated type tree.
    pub tree: TypeTree,
}

/// Reads and compiles the schema at `path`.
///
/// # Errors
///
/// Returns [`SchemaError`] if the file cannot be read, is not a well-formed
/// `xs:schema` document, or contains references that do not resolve.
pub fn compile(path: &Path) -> Result<Schema, SchemaError> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile_str(&text, &path.display().to_string())
}

/// Compiles schema text. `system_id` names the input in error messages.
///
/// # Errors
///
/// Returns [`SchemaError`] if the text is not a well-formed `xs:schema`
/// document or contains references that do not resolve.
pub fn compile_str(text: &str, system_id: &str) -> Result<Schema, SchemaError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(text, options).map_err(|source| SchemaError::Xml {
        system_id: system_id.to_string(),
        source,
    })?;
    let (target_namespace, package) = compiler::compile_document(&doc, system_id)?;
    Ok(Schema {
        target_namespace,
        tree: TypeTree {
            packages: vec![package],
        },
    })
}
