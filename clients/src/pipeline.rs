//! The generation pipeline: compile, scope, annotate, broadcast namespaces,
//! emit.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rdfbind_codegen::GenerationReport;
use rdfbind_engine::{Engine, Expectation, MappingKind};
use rdfbind_model::serializer::{jsonld, turtle};
use rdfbind_model::NamespaceTable;
use tracing::info;

use crate::config::{GenerateArgs, MappingFile};

/// File name of the Turtle mapping manifest.
pub const TURTLE_MANIFEST: &str = "rdfbind.mapping.ttl";

/// File name of the JSON-LD mapping manifest.
pub const JSONLD_MANIFEST: &str = "rdfbind.mapping.jsonld";

/// Serialization of the mapping manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ManifestFormat {
    /// Turtle 1.1.
    Turtle,
    /// JSON-LD 1.1.
    Jsonld,
}

impl ManifestFormat {
    /// File name the manifest is written to inside the output directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            ManifestFormat::Turtle => TURTLE_MANIFEST,
            ManifestFormat::Jsonld => JSONLD_MANIFEST,
        }
    }
}

/// Everything a generation run needs.
#[derive(Debug, Clone)]
pub struct Options {
    /// Positional arguments.
    pub args: GenerateArgs,
    /// Batch mapping file applied after the positional mapping.
    pub mappings: Option<PathBuf>,
    /// Manifest to write next to the generated code.
    pub manifest: Option<ManifestFormat>,
    /// Infer mapping kinds instead of checking the declared ones.
    pub unchecked: bool,
    /// File the annotated type tree is dumped to as JSON.
    pub dump_tree: Option<PathBuf>,
}

impl Options {
    /// Options running only the positional contract.
    #[must_use]
    pub fn new(args: GenerateArgs) -> Self {
        Self {
            args,
            mappings: None,
            manifest: None,
            unchecked: false,
            dump_tree: None,
        }
    }
}

/// Summary of a generation run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Target namespace of the schema.
    pub target_namespace: String,
    /// Identifier of the selected package.
    pub package: String,
    /// Kind attached by the positional mapping.
    pub primary: MappingKind,
    /// Number of batch mappings applied.
    pub batch_applied: usize,
    /// Number of types that received the namespace table.
    pub namespaced_types: usize,
    /// What the code generator wrote.
    pub generation: GenerationReport,
    /// Path of the written manifest.
    pub manifest: Option<PathBuf>,
}

fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Runs the full pipeline.
///
/// Fails fast: the first error aborts the run. Mappings attached before the
/// failure are not rolled back, but nothing is emitted.
///
/// # Errors
///
/// Returns an error if the schema does not compile, its package is missing,
/// a mapping cannot be resolved or applied, the batch file is invalid, or
/// any output cannot be written.
pub fn run(options: &Options) -> Result<PipelineReport> {
    let args = &options.args;
    let schema = rdfbind_xsd::compile(&args.schema)
        .with_context(|| format!("Failed to compile schema {}", args.schema.display()))?;

    let mut engine = Engine::with_tree(schema.tree);
    let package = engine
        .select_scope(&schema.target_namespace)
        .context("Failed to select the schema's package")?;
    info!(%package, namespace = %schema.target_namespace, "selected scope");

    let primary = if options.unchecked {
        engine.annotate(&args.standard_concept, &args.reference_concept)
    } else {
        engine.annotate_with_check(&args.standard_concept, &args.reference_concept, args.kind_code)
    }
    .with_context(|| format!("Failed to map `{}`", args.standard_concept))?;

    let batch = options
        .mappings
        .as_deref()
        .map(MappingFile::load)
        .transpose()?;

    let mut batch_applied = 0;
    if let Some(file) = &batch {
        for entry in &file.mappings {
            let mut request = entry.to_request()?;
            if options.unchecked {
                request.expect = Expectation::Infer;
            }
            engine
                .annotate_request(&entry.concept, &request)
                .with_context(|| format!("Failed to map `{}`", entry.concept))?;
            batch_applied += 1;
        }
    }

    let table = batch
        .as_ref()
        .and_then(MappingFile::namespace_table)
        .unwrap_or_else(NamespaceTable::standard);
    let namespaced_types = engine.insert_namespaces(&table)?;

    let tree = engine.scoped_tree()?;
    let generation = rdfbind_codegen::generate(&tree, &args.out_dir)
        .with_context(|| format!("Failed to generate code into {}", args.out_dir.display()))?;

    let manifest = match options.manifest {
        Some(format) => {
            let scope = engine.scope()?;
            let content = match format {
                ManifestFormat::Turtle => turtle::to_turtle(scope),
                ManifestFormat::Jsonld => serde_json::to_string_pretty(&jsonld::to_json_ld(scope))
                    .context("Failed to serialize the JSON-LD manifest")?,
            };
            let path = args.out_dir.join(format.file_name());
            write(&path, &content)?;
            Some(path)
        }
        None => None,
    };

    if let Some(path) = &options.dump_tree {
        let json = serde_json::to_string_pretty(&tree).context("Failed to serialize the type tree")?;
        write(path, &json)?;
    }

    engine.mark_emitted();
    Ok(PipelineReport {
        target_namespace: schema.target_namespace,
        package,
        primary,
        batch_applied,
        namespaced_types,
        generation,
        manifest,
    })
}
