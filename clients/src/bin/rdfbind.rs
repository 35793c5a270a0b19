//! `rdfbind` — Generates RDF-mapped Rust types from an XML Schema.
//!
//! **Usage:**
//! ```text
//! rdfbind uri <URI>
//! rdfbind <schema> <outputDir> <standardConcept> <referenceConcept> <referenceType>
//!         [--mappings <file.toml>] [--manifest turtle|jsonld] [--unchecked]
//!         [--dump-tree <file.json>] [-v...]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rdfbind_clients::{logging, pipeline, Invocation, ManifestFormat, Options};
use rdfbind_model::names::uri_to_identifier;

/// Generate RDF-mapped Rust types from an XML Schema.
#[derive(Parser)]
#[command(
    name = "rdfbind",
    about = "Generate RDF-mapped Rust types from an XML Schema",
    version
)]
struct Args {
    /// `uri <URI>`, or `<schema> <outputDir> <standardConcept>
    /// <referenceConcept> <referenceType>` (type `C` class, `P` property).
    #[arg(required = true, num_args = 1..=5)]
    positional: Vec<String>,

    /// TOML file with additional mappings and a namespace table.
    #[arg(long)]
    mappings: Option<PathBuf>,

    /// Also write a mapping manifest into the output directory.
    #[arg(long, value_enum)]
    manifest: Option<ManifestFormat>,

    /// Infer each mapping's kind from the node it resolves to.
    #[arg(long)]
    unchecked: bool,

    /// Write the annotated type tree as JSON to this file.
    #[arg(long)]
    dump_tree: Option<PathBuf>,

    /// More log output (repeatable); `RDFBIND_LOG` applies otherwise.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let generate = match Invocation::parse(&args.positional)? {
        Invocation::Uri(uri) => {
            println!("{}", uri_to_identifier(&uri));
            return Ok(());
        }
        Invocation::Generate(generate) => generate,
    };

    println!(
        "Generating from {} into {}",
        generate.schema.display(),
        generate.out_dir.display()
    );

    let options = Options {
        mappings: args.mappings,
        manifest: args.manifest,
        unchecked: args.unchecked,
        dump_tree: args.dump_tree,
        ..Options::new(generate)
    };
    let report = pipeline::run(&options)?;

    println!(
        "Package {} (namespace {})",
        report.package, report.target_namespace
    );
    println!(
        "Mapped `{}` as {}; {} batch mapping(s); namespace table on {} type(s)",
        options.args.standard_concept,
        report.primary,
        report.batch_applied,
        report.namespaced_types
    );
    let generation = &report.generation;
    println!(
        "Generated {} structs, {} enums, {} fields ({} mapped types, {} mapped fields)",
        generation.struct_count,
        generation.enum_count,
        generation.field_count,
        generation.mapped_type_count,
        generation.mapped_field_count
    );
    println!("Files written ({}):", generation.files.len());
    for file in &generation.files {
        println!("  {}", file);
    }
    if let Some(manifest) = &report.manifest {
        println!("  Written: {}", manifest.display());
    }

    println!("Generation complete.");
    Ok(())
}
