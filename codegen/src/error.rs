//! Emission errors.

use std::path::PathBuf;

/// Errors raised while writing generated code.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A directory or file could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A package identifier segment is not a usable Rust module name.
    #[error("package `{package}` has segment `{segment}`, which is not a valid module name")]
    InvalidPackage {
        /// Full package identifier.
        package: String,
        /// Offending segment.
        segment: String,
    },
}
