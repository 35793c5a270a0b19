//! Mapping manifests for an annotated package.
//!
//! Two formats are supported:
//! - **Turtle** ([`turtle`]), for RDF tooling, written as `rdfbind.mapping.ttl`
//! - **JSON-LD** ([`jsonld`]), written as `rdfbind.mapping.jsonld`

pub mod jsonld;
pub mod turtle;

use crate::model::Package;

/// IRI naming a package in a manifest.
pub(crate) fn package_iri(package: &Package) -> String {
    format!("urn:rdfbind:{}", package.name)
}

/// IRI naming a generated type by its identifier path.
pub(crate) fn type_iri(package: &Package, path: &[String]) -> String {
    format!("urn:rdfbind:{}:{}", package.name, path.join("/"))
}

/// IRI naming a field of the type at `path`.
pub(crate) fn field_iri(package: &Package, path: &[String], field: &str) -> String {
    format!("{}#{field}", type_iri(package, path))
}
