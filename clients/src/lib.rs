//! rdfbind command-line front end.
//!
//! [`config`] interprets the positional contract and batch mapping files,
//! [`pipeline`] runs compile → scope → annotate → namespaces → emit, and
//! [`logging`] sets up log output for the `rdfbind` binary.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod logging;
pub mod pipeline;

pub use config::{ConfigError, GenerateArgs, Invocation, MappingFile};
pub use pipeline::{run, ManifestFormat, Options, PipelineReport};
