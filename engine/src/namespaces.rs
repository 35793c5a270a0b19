//! Namespace table broadcast.

use rdfbind_model::{Metadata, NamespaceTable, Package};

use crate::apply::upsert;
use crate::index::TypeTreeIndex;

/// Attaches `table` to every top-level type in `index`, replacing any table
/// already attached. Returns the number of types updated.
pub fn broadcast(package: &mut Package, index: &TypeTreeIndex, table: &NamespaceTable) -> usize {
    let mut updated = 0;
    for path in index.top_level_types() {
        if let Some(ty) = package.type_at_mut(path.as_slice()) {
            upsert(&mut ty.metadata, Metadata::Namespaces(table.clone()));
            updated += 1;
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfbind_model::TypeNode;

    #[test]
    fn nested_and_factory_types_are_untouched() {
        let mut travel = TypeNode::declared("Travel", None);
        travel.nested.push(TypeNode::declared("Stop", None));
        let mut package = Package {
            name: "org.example".to_string(),
            namespace: None,
            types: vec![travel, TypeNode::factory()],
        };
        let index = TypeTreeIndex::build(&package);
        assert_eq!(broadcast(&mut package, &index, &NamespaceTable::standard()), 1);
        assert_eq!(package.types[0].namespaces(), Some(&NamespaceTable::standard()));
        assert_eq!(package.types[0].nested[0].namespaces(), None);
        assert_eq!(package.types[1].namespaces(), None);
    }

    #[test]
    fn second_broadcast_replaces_the_table() {
        let mut package = Package {
            name: "org.example".to_string(),
            namespace: None,
            types: vec![TypeNode::declared("Travel", None)],
        };
        let index = TypeTreeIndex::build(&package);
        broadcast(&mut package, &index, &NamespaceTable::standard());
        let custom = NamespaceTable::new([("st4rt", "http://st4rt.eu/ontologies/st4rt#")]);
        broadcast(&mut package, &index, &custom);
        assert_eq!(package.types[0].metadata.len(), 1);
        assert_eq!(package.types[0].namespaces(), Some(&custom));
    }
}
