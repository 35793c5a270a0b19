//! rdfbind code generator.
//!
//! Turns an annotated [`TypeTree`] into Rust source: one module per package,
//! one file per top-level type, an `ObjectFactory` per package and a shared
//! `rdfbind_rt` support module. Every generated type implements
//! `rdfbind_rt::RdfMapped`, whose associated constants carry the ontology
//! class, named graph, namespace table and property chains attached by the
//! annotation engine.
//!
//! The output directory is meant to be mounted as a module of the consuming
//! crate:
//!
//! ```rust,ignore
//! #[path = "generated/mod.rs"]
//! mod generated;
//!
//! use generated::rdfbind_rt::RdfMapped;
//! use generated::org::example::travel::Travel;
//!
//! assert_eq!(Travel::RDFS_CLASS, Some("st4rt:Travel"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod emit;
pub mod enums;
pub mod error;
pub mod factory;
pub mod mapping;
pub mod runtime;
pub mod structs;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rdfbind_model::{Package, TypeTree};
use tracing::{debug, info};

use emit::RustFile;
pub use error::EmitError;
use mapping::{package_segments, ModuleNames, FACTORY_MODULE, RUNTIME_MODULE};

/// Report of what was generated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Number of structs generated.
    pub struct_count: usize,
    /// Number of enums generated.
    pub enum_count: usize,
    /// Number of struct fields generated.
    pub field_count: usize,
    /// Number of types carrying a class mapping.
    pub mapped_type_count: usize,
    /// Number of fields carrying a property mapping.
    pub mapped_field_count: usize,
    /// Files written, relative to the output directory.
    pub files: Vec<String>,
}

/// Generates Rust source for every package of `tree` into `out_dir`.
///
/// # Errors
///
/// Returns [`EmitError::InvalidPackage`] if a package identifier cannot be a
/// module path, and [`EmitError::Io`] if any file cannot be written.
pub fn generate(tree: &TypeTree, out_dir: &Path) -> Result<GenerationReport, EmitError> {
    let mut report = GenerationReport::default();

    // Module tree: directory (as segments) -> child modules.
    let mut children: BTreeMap<Vec<String>, BTreeSet<String>> = BTreeMap::new();
    let mut packages: Vec<(Vec<String>, &Package)> = Vec::new();
    for package in &tree.packages {
        let segments = package_segments(package)?;
        for i in 0..segments.len() {
            children
                .entry(segments[..i].to_vec())
                .or_default()
                .insert(segments[i].clone());
        }
        packages.push((segments, package));
    }
    children
        .entry(Vec::new())
        .or_default()
        .insert(RUNTIME_MODULE.to_string());

    write(
        out_dir,
        &format!("{RUNTIME_MODULE}.rs"),
        &runtime::generate_runtime_file(),
        &mut report,
    )?;

    for (segments, package) in &packages {
        let nested_packages = children.remove(segments).unwrap_or_default();
        generate_package(out_dir, segments, package, &nested_packages, &mut report)?;
    }

    for (dir, modules) in &children {
        generate_mod_file(out_dir, dir, modules, &mut report)?;
    }

    info!(
        files = report.files.len(),
        structs = report.struct_count,
        enums = report.enum_count,
        "generated code in {}",
        out_dir.display()
    );
    Ok(report)
}

fn write(
    out_dir: &Path,
    rel: &str,
    content: &str,
    report: &mut GenerationReport,
) -> Result<(), EmitError> {
    emit::write_file(&out_dir.join(rel), content)?;
    debug!(file = rel, "wrote");
    report.files.push(rel.to_string());
    Ok(())
}

fn rel_path(dir: &[String], file: &str) -> String {
    let mut parts: Vec<&str> = dir.iter().map(String::as_str).collect();
    parts.push(file);
    parts.join("/")
}

/// Writes the module files of one package.
fn generate_package(
    out_dir: &Path,
    segments: &[String],
    package: &Package,
    nested_packages: &BTreeSet<String>,
    report: &mut GenerationReport,
) -> Result<(), EmitError> {
    let depth = segments.len();
    let mut modules: BTreeSet<String> = nested_packages.clone();
    let mut exports: Vec<(String, String)> = Vec::new();
    let names = ModuleNames::new(package, nested_packages.iter().map(String::as_str));

    for ty in &package.types {
        if ty.is_factory {
            let content = factory::generate_factory_file(package, ty, &names);
            write(
                out_dir,
                &rel_path(segments, &format!("{FACTORY_MODULE}.rs")),
                &content,
                report,
            )?;
            modules.insert(FACTORY_MODULE.to_string());
            exports.push((FACTORY_MODULE.to_string(), ty.name.clone()));
        } else {
            let module = names.file(&ty.name);
            let content = structs::generate_type_file(ty, depth, &names, report);
            write(
                out_dir,
                &rel_path(segments, &format!("{module}.rs")),
                &content,
                report,
            )?;
            exports.push((module.clone(), ty.name.clone()));
            modules.insert(module);
        }
    }

    let doc = match &package.namespace {
        Some(ns) => format!("Types generated for namespace `{ns}`."),
        None => "Types generated for schemas without a target namespace.".to_string(),
    };
    let mut f = RustFile::new(&doc);
    for module in &modules {
        f.line(&format!("pub mod {module};"));
    }
    f.blank();
    exports.sort();
    for (module, item) in &exports {
        f.line(&format!("pub use {module}::{item};"));
    }
    write(out_dir, &rel_path(segments, "mod.rs"), &f.finish(), report)
}

/// Writes a `mod.rs` declaring `modules` for a directory that holds no
/// package of its own.
fn generate_mod_file(
    out_dir: &Path,
    dir: &[String],
    modules: &BTreeSet<String>,
    report: &mut GenerationReport,
) -> Result<(), EmitError> {
    let doc = if dir.is_empty() {
        "Generated RDF-mapped types.".to_string()
    } else {
        format!("`{}` modules.", dir.join("::"))
    };
    let mut f = RustFile::new(&doc);
    for module in modules {
        f.line(&format!("pub mod {module};"));
    }
    write(out_dir, &rel_path(dir, "mod.rs"), &f.finish(), report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn rel_paths_use_forward_slashes() {
        let dir = vec!["org".to_string(), "example".to_string()];
        assert_eq!(rel_path(&dir, "mod.rs"), "org/example/mod.rs");
        assert_eq!(rel_path(&[], "mod.rs"), "mod.rs");
    }

    #[test]
    fn invalid_package_is_rejected_before_writing() {
        let tree = TypeTree {
            packages: vec![Package {
                name: "org.match".to_string(),
                namespace: None,
                types: Vec::new(),
            }],
        };
        let dir = tempfile::tempdir().unwrap();
        let err = generate(&tree, dir.path()).unwrap_err();
        assert!(matches!(err, EmitError::InvalidPackage { ref segment, .. } if segment == "match"));
        assert!(!dir.path().join(format!("{RUNTIME_MODULE}.rs")).exists());
    }
}
