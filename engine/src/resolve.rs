//! Original-name resolution over a [`TypeTreeIndex`].

use crate::error::EngineError;
use crate::index::{NodeRef, TypeTreeIndex};

impl TypeTreeIndex {
    /// Returns the first node in traversal order whose original name equals
    /// `original_name`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConceptNotFound`] if no node matches.
    pub fn resolve(&self, original_name: &str) -> Result<&NodeRef, EngineError> {
        self.entries()
            .iter()
            .find(|e| e.original_name.as_deref() == Some(original_name))
            .map(|e| &e.node)
            .ok_or_else(|| EngineError::ConceptNotFound(original_name.to_string()))
    }

    /// Returns every node whose original name equals `original_name`, in
    /// traversal order.
    #[must_use]
    pub fn resolve_all(&self, original_name: &str) -> Vec<&NodeRef> {
        self.entries()
            .iter()
            .filter(|e| e.original_name.as_deref() == Some(original_name))
            .map(|e| &e.node)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TypePath;
    use rdfbind_model::{Builtin, FieldBinding, FieldNode, Package, TypeNode};

    fn package() -> Package {
        let mut travel = TypeNode::declared("Travel", Some("Travel"));
        travel
            .fields
            .push(FieldNode::element("code", "code", Builtin::String.into()));
        let mut text = FieldNode::element("value", "value", Builtin::String.into());
        text.binding = FieldBinding::Value;
        travel.fields.push(text);
        let mut leg = TypeNode::declared("Leg", None);
        leg.fields
            .push(FieldNode::element("code", "code", Builtin::String.into()));
        travel.nested.push(leg);
        Package {
            name: "org.example".to_string(),
            namespace: None,
            types: vec![travel, TypeNode::factory()],
        }
    }

    #[test]
    fn duplicates_resolve_to_first_in_traversal_order() {
        let index = TypeTreeIndex::build(&package());
        let first = NodeRef::Field {
            owner: TypePath(vec![0]),
            field: 0,
        };
        assert_eq!(index.resolve("code"), Ok(&first));
        assert_eq!(index.resolve_all("code").len(), 2);
    }

    #[test]
    fn value_bindings_never_match() {
        let index = TypeTreeIndex::build(&package());
        assert_eq!(
            index.resolve("value"),
            Err(EngineError::ConceptNotFound("value".to_string()))
        );
    }

    #[test]
    fn factory_cannot_be_resolved() {
        let index = TypeTreeIndex::build(&package());
        assert!(index.resolve("ObjectFactory").is_err());
        assert!(index.resolve_all("ObjectFactory").is_empty());
    }

    #[test]
    fn matching_is_exact() {
        let index = TypeTreeIndex::build(&package());
        assert!(index.resolve("travel").is_err());
        assert!(index.resolve("Travel ").is_err());
        assert_eq!(index.resolve("Leg"), Ok(&NodeRef::Type(TypePath(vec![0, 0]))));
    }
}
