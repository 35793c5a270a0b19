//! End-to-end generation of the Travel fixture after annotation.

use std::fs;

use rdfbind_codegen::{generate, GenerationReport};
use rdfbind_engine::{Engine, MappingRequest};
use rdfbind_model::{LinkHop, NamedGraph, NamespaceTable};
use rdfbind_test_helpers::{travel_tree, TRAVEL_NAMESPACE};

const PACKAGE_DIR: &str = "org/pts_fsm/domainmodel/_2015/_10/_29/transportation";

fn annotated_tree() -> rdfbind_model::TypeTree {
    let mut engine = Engine::with_tree(travel_tree());
    engine.select_scope(TRAVEL_NAMESPACE).expect("scope");
    engine
        .annotate_with_check("Travel", "st4rt:Travel", 'C')
        .expect("class");
    engine
        .annotate_request(
            "fareTravelUrl",
            &MappingRequest::new("st4rt:hasUrl")
                .with_links(vec![LinkHop::anonymous("st4rt:hasFare")]),
        )
        .expect("property");
    engine
        .annotate_request(
            "passengerType",
            &MappingRequest::new("st4rt:Passenger").with_graph(NamedGraph::Instance),
        )
        .expect("graph");
    engine
        .insert_namespaces(&NamespaceTable::standard())
        .expect("namespaces");
    engine.scoped_tree().expect("tree")
}

fn generate_into(dir: &tempfile::TempDir) -> GenerationReport {
    generate(&annotated_tree(), dir.path()).expect("generation succeeds")
}

#[test]
fn writes_package_layout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report = generate_into(&dir);

    for file in [
        "mod.rs".to_string(),
        "rdfbind_rt.rs".to_string(),
        "org/mod.rs".to_string(),
        format!("{PACKAGE_DIR}/mod.rs"),
        format!("{PACKAGE_DIR}/travel.rs"),
        format!("{PACKAGE_DIR}/passenger_type.rs"),
        format!("{PACKAGE_DIR}/travel_class.rs"),
        format!("{PACKAGE_DIR}/object_factory.rs"),
    ] {
        assert!(dir.path().join(&file).is_file(), "missing {file}");
        assert!(report.files.contains(&file), "unreported {file}");
    }
    assert_eq!(report.struct_count, 3);
    assert_eq!(report.enum_count, 1);
    assert_eq!(report.mapped_type_count, 2);
    assert_eq!(report.mapped_field_count, 1);
}

#[test]
fn module_files_declare_their_children() {
    let dir = tempfile::tempdir().expect("tempdir");
    generate_into(&dir);

    let root = fs::read_to_string(dir.path().join("mod.rs")).expect("root mod");
    assert!(root.contains("pub mod org;\npub mod rdfbind_rt;\n"));

    let package = fs::read_to_string(dir.path().join(PACKAGE_DIR).join("mod.rs"))
        .expect("package mod");
    assert!(package.contains(&format!("Types generated for namespace `{TRAVEL_NAMESPACE}`.")));
    assert!(package.contains(
        "pub mod object_factory;\npub mod passenger_type;\npub mod travel;\npub mod travel_class;\n"
    ));
    assert!(package.contains("pub use travel::Travel;"));
    assert!(package.contains("pub use object_factory::ObjectFactory;"));
}

#[test]
fn mappings_reach_the_generated_types() {
    let dir = tempfile::tempdir().expect("tempdir");
    generate_into(&dir);

    let travel = fs::read_to_string(dir.path().join(PACKAGE_DIR).join("travel.rs"))
        .expect("travel.rs");
    assert!(travel.starts_with("// @generated by rdfbind-codegen."));
    assert!(travel.contains(
        "use super::super::super::super::super::super::super::super::rdfbind_rt as rt;"
    ));
    assert!(travel.contains("const RDFS_CLASS: Option<&'static str> = Some(\"st4rt:Travel\");"));
    assert!(travel.contains("property_name: \"st4rt:hasUrl\","));
    assert!(travel.contains("node_type: rt::NodeType::Anonymous"));
    assert!(travel.contains("(\"rdf\", \"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"),"));
    assert!(travel.contains("pub mod travel {"));

    let passenger = fs::read_to_string(dir.path().join(PACKAGE_DIR).join("passenger_type.rs"))
        .expect("passenger_type.rs");
    assert!(passenger.contains("const NAMED_GRAPH: rt::NamedGraph = rt::NamedGraph::Instance;"));
    assert!(passenger.contains("Some(\"st4rt:Passenger\")"));

    let class = fs::read_to_string(dir.path().join(PACKAGE_DIR).join("travel_class.rs"))
        .expect("travel_class.rs");
    assert!(class.contains("pub enum TravelClass {"));
}

#[test]
fn generation_is_deterministic() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    let a = generate_into(&first);
    let b = generate_into(&second);
    assert_eq!(a, b);
    for file in &a.files {
        assert_eq!(
            fs::read_to_string(first.path().join(file)).expect("first"),
            fs::read_to_string(second.path().join(file)).expect("second"),
            "{file}"
        );
    }
}

#[test]
fn every_generated_file_is_valid_rust() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report = generate_into(&dir);
    for file in &report.files {
        let text = fs::read_to_string(dir.path().join(file)).expect("generated file");
        if let Err(e) = syn::parse_file(&text) {
            panic!("{file} is not valid Rust: {e}\n{text}");
        }
    }
}
