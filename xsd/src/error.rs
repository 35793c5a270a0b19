//! Schema compilation errors.

use std::path::PathBuf;

/// Errors raised while reading or compiling an XML Schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema file could not be read.
    #[error("cannot read schema {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input is not well-formed XML.
    #[error("{system_id}: malformed XML: {source}")]
    Xml {
        /// Name of the input (file path or caller-supplied id).
        system_id: String,
        /// Parser error.
        #[source]
        source: roxmltree::Error,
    },

    /// The root element is not `xs:schema`.
    #[error("{system_id}: root element is not xs:schema")]
    NotASchema {
        /// Name of the input.
        system_id: String,
    },

    /// A type reference names an XML Schema builtin that does not exist.
    #[error("{system_id}:{line}: unknown XML Schema type `xs:{name}`")]
    UnknownType {
        /// Name of the input.
        system_id: String,
        /// 1-based line of the referencing declaration.
        line: u32,
        /// Local name of the type.
        name: String,
    },

    /// A reference to a type, element, group or attribute declared in the
    /// target namespace could not be resolved.
    #[error("{system_id}:{line}: unresolved {kind} reference `{name}`")]
    UnresolvedReference {
        /// Name of the input.
        system_id: String,
        /// 1-based line of the referencing declaration.
        line: u32,
        /// What kind of declaration was referenced.
        kind: &'static str,
        /// Referenced name.
        name: String,
    },

    /// A declaration is structurally invalid.
    #[error("{system_id}:{line}: {message}")]
    Invalid {
        /// Name of the input.
        system_id: String,
        /// 1-based line of the declaration.
        line: u32,
        /// Description of the problem.
        message: String,
    },
}
