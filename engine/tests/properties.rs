//! Resolution soundness, kind fidelity, list inference, idempotent
//! indexing and namespace broadcast over the Travel fixture and generated
//! packages.

use proptest::prelude::*;
use rdfbind_engine::{Engine, EngineError, MappingKind, NodeCategory, NodeView, TypeTreeIndex};
use rdfbind_model::{
    Builtin, FieldNode, NamespaceTable, Package, TypeNode, TypeTree, ValueType,
};
use rdfbind_test_helpers::{travel_tree, TRAVEL_NAMESPACE};

fn engine() -> Engine {
    let mut engine = Engine::with_tree(travel_tree());
    engine.select_scope(TRAVEL_NAMESPACE).expect("fixture scope");
    engine
}

#[test]
fn every_unique_original_name_resolves_to_its_node() {
    let engine = engine();
    let entries = engine.index().entries().to_vec();
    for entry in &entries {
        let Some(name) = entry.original_name.as_deref() else {
            continue;
        };
        if engine.resolve_all(name).expect("scope").len() == 1 {
            assert_eq!(engine.resolve(name).as_ref(), Ok(&entry.node), "{name}");
        }
    }
}

#[test]
fn checked_path_rejects_wrong_kind_everywhere() {
    let mut engine = engine();
    let entries = engine.index().entries().to_vec();
    for entry in entries {
        let Some(name) = entry.original_name else {
            continue;
        };
        let wrong = match entry.node.category() {
            NodeCategory::Type => 'P',
            NodeCategory::Field => 'C',
        };
        let err = engine
            .annotate_with_check(&name, "st4rt:x", wrong)
            .expect_err("wrong kind must fail");
        assert!(matches!(err, EngineError::KindMismatch { .. }), "{name}: {err}");
    }
    let scope = engine.scope().expect("scope");
    assert!(scope.types.iter().all(|t| !t.has_mappings()));
}

#[test]
fn rebuilding_without_mutation_is_idempotent() {
    let mut engine = engine();
    let first = engine.index().clone();
    let second = engine.rebuild_index().expect("rebuild").clone();
    assert_eq!(first, second);
    for entry in first.entries() {
        if let Some(name) = entry.original_name.as_deref() {
            assert_eq!(first.resolve(name), second.resolve(name));
        }
    }
}

#[test]
fn annotation_does_not_change_traversal_order() {
    let mut engine = engine();
    let before: Vec<_> = engine.index().entries().iter().map(|e| e.node.clone()).collect();
    engine.annotate("Travel", "st4rt:Travel").expect("annotates");
    engine.annotate("givenName", "st4rt:givenName").expect("annotates");
    let after: Vec<_> = engine.index().entries().iter().map(|e| e.node.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn broadcast_attaches_the_table_unmodified() {
    let mut engine = engine();
    let table = NamespaceTable::new([
        ("xml", "http://www.w3.org/XML/1998/namespace"),
        ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
        ("st4rt", "http://st4rt.eu/ontologies/st4rt#"),
    ]);
    engine.insert_namespaces(&table).expect("broadcast");
    let scope = engine.scope().expect("scope");
    for ty in scope.types.iter().filter(|t| !t.is_factory) {
        assert_eq!(ty.namespaces(), Some(&table), "{}", ty.name);
    }
}

fn value_type() -> impl Strategy<Value = ValueType> {
    let leaf = prop_oneof![
        Just(ValueType::from(Builtin::String)),
        Just(ValueType::from(Builtin::I32)),
        Just(ValueType::from(Builtin::Bool)),
        Just(ValueType::reference("Other")),
    ];
    leaf.prop_recursive(2, 8, 3, |inner| {
        (prop::collection::vec(inner, 0..3)).prop_map(|args| ValueType::Generic {
            container: "Vec".to_string(),
            args,
        })
    })
}

fn package_with(value_type: ValueType) -> TypeTree {
    let mut ty = TypeNode::declared("Holder", Some("holder"));
    ty.fields.push(FieldNode::element("item", "item", value_type));
    TypeTree {
        packages: vec![Package {
            name: "org.example".to_string(),
            namespace: Some("http://example.org".to_string()),
            types: vec![ty, TypeNode::factory()],
        }],
    }
}

proptest! {
    #[test]
    fn list_flag_follows_declared_type(vt in value_type()) {
        let expected = matches!(&vt, ValueType::Generic { args, .. } if !args.is_empty());
        let mut engine = Engine::with_tree(package_with(vt));
        engine.select_scope("http://example.org").expect("scope");
        prop_assert_eq!(engine.annotate("item", "ex:item"), Ok(MappingKind::Property));
        let node = engine.resolve("item").expect("resolves");
        let is_list = match engine.node(&node) {
            Some(NodeView::Field(field)) => field.property_mapping().map(|m| m.is_list),
            _ => None,
        };
        prop_assert_eq!(is_list, Some(expected));
    }

    #[test]
    fn index_is_a_pure_function_of_the_package(vt in value_type()) {
        let tree = package_with(vt);
        let package = &tree.packages[0];
        prop_assert_eq!(TypeTreeIndex::build(package), TypeTreeIndex::build(package));
    }
}
