//! The annotation engine: an explicit context owning one type tree.

use rdfbind_model::{names, FieldNode, NamespaceTable, Package, TypeNode, TypeTree};
use tracing::{debug, info, warn};

use crate::apply::{self, Expectation, MappingKind, MappingRequest};
use crate::error::EngineError;
use crate::index::{NodeRef, TypeTreeIndex};
use crate::namespaces;

/// Lifecycle stage of an [`Engine`].
///
/// `Uninitialized → TreeLoaded → ScopeSelected → (Indexed ⇄ Annotated)* → Emitted`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// No tree loaded.
    Uninitialized,
    /// A tree is loaded; no scope selected.
    TreeLoaded,
    /// A scope is selected.
    ScopeSelected,
    /// The index reflects the current scope.
    Indexed,
    /// At least one mapping or namespace table has been attached.
    Annotated,
    /// The scoped tree has been written out.
    Emitted,
}

/// Borrowed view of a resolved node.
#[derive(Debug, Clone, Copy)]
pub enum NodeView<'a> {
    /// A type.
    Type(&'a TypeNode),
    /// A field.
    Field(&'a FieldNode),
}

/// Annotation engine over one type tree.
#[derive(Debug, Clone)]
pub struct Engine {
    tree: Option<TypeTree>,
    scope: Option<usize>,
    index: TypeTreeIndex,
    stage: Stage,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Returns an engine with no tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            scope: None,
            index: TypeTreeIndex::default(),
            stage: Stage::Uninitialized,
        }
    }

    /// Returns an engine that owns `tree`.
    #[must_use]
    pub fn with_tree(tree: TypeTree) -> Self {
        let mut engine = Self::new();
        engine.load(tree);
        engine
    }

    /// Loads `tree`, discarding any previous tree, scope and index.
    pub fn load(&mut self, tree: TypeTree) {
        debug!(packages = tree.packages.len(), "loaded type tree");
        self.tree = Some(tree);
        self.scope = None;
        self.index = TypeTreeIndex::default();
        self.stage = Stage::TreeLoaded;
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The loaded tree, if any.
    #[must_use]
    pub fn tree(&self) -> Option<&TypeTree> {
        self.tree.as_ref()
    }

    /// The current index snapshot.
    #[must_use]
    pub fn index(&self) -> &TypeTreeIndex {
        &self.index
    }

    /// Selects the package derived from `namespace_uri` as the scope and
    /// rebuilds the index. Returns the package identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUninitialized`] if no tree is loaded and
    /// [`EngineError::ScopeNotFound`] if the tree has no such package.
    pub fn select_scope(&mut self, namespace_uri: &str) -> Result<String, EngineError> {
        let identifier = names::package_for_namespace(namespace_uri);
        debug!(namespace = namespace_uri, scope = %identifier, "selecting scope");
        self.select_package(&identifier)?;
        Ok(identifier)
    }

    /// Selects the package named `identifier` as the scope and rebuilds the
    /// index.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUninitialized`] if no tree is loaded and
    /// [`EngineError::ScopeNotFound`] if the tree has no such package.
    pub fn select_package(&mut self, identifier: &str) -> Result<(), EngineError> {
        let position = self
            .require_tree()?
            .position(identifier)
            .ok_or_else(|| EngineError::ScopeNotFound {
                scope: identifier.to_string(),
            })?;
        self.scope = Some(position);
        self.stage = Stage::ScopeSelected;
        self.rebuild_index()?;
        Ok(())
    }

    /// The selected package.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUninitialized`] if no tree is loaded or no
    /// scope is selected.
    pub fn scope(&self) -> Result<&Package, EngineError> {
        let position = self.require_scope()?;
        self.require_tree()?
            .packages
            .get(position)
            .ok_or(EngineError::ModelUninitialized {
                missing: "selected scope",
            })
    }

    /// Rebuilds the index from the selected scope.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUninitialized`] if no tree is loaded or no
    /// scope is selected.
    pub fn rebuild_index(&mut self) -> Result<&TypeTreeIndex, EngineError> {
        let index = TypeTreeIndex::build(self.scope()?);
        debug!(entries = index.len(), "rebuilt index");
        self.index = index;
        if self.stage < Stage::Indexed {
            self.stage = Stage::Indexed;
        }
        Ok(&self.index)
    }

    /// Resolves `original_name` to the first matching node in the scope.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUninitialized`] before a scope is selected
    /// and [`EngineError::ConceptNotFound`] if nothing matches.
    pub fn resolve(&self, original_name: &str) -> Result<NodeRef, EngineError> {
        self.require_scope()?;
        let node = self.index.resolve(original_name)?.clone();
        let matches = self.index.resolve_all(original_name).len();
        if matches > 1 {
            warn!(
                concept = original_name,
                matches, "ambiguous original name; using the first match"
            );
        }
        debug!(concept = original_name, category = %node.category(), "resolved");
        Ok(node)
    }

    /// Returns every node matching `original_name`, in traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUninitialized`] before a scope is selected.
    pub fn resolve_all(&self, original_name: &str) -> Result<Vec<NodeRef>, EngineError> {
        self.require_scope()?;
        Ok(self
            .index
            .resolve_all(original_name)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Looks up a resolved node in the scope.
    #[must_use]
    pub fn node(&self, node: &NodeRef) -> Option<NodeView<'_>> {
        let package = self.scope().ok()?;
        match node {
            NodeRef::Type(path) => package.type_at(path.as_slice()).map(NodeView::Type),
            NodeRef::Field { owner, field } => package
                .type_at(owner.as_slice())
                .and_then(|ty| ty.fields.get(*field))
                .map(NodeView::Field),
        }
    }

    /// Attaches `request` to an already resolved `node`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUninitialized`] before a scope is selected,
    /// [`EngineError::KindMismatch`] if the node cannot take the expected
    /// kind, and [`EngineError::ConceptNotFound`] if the node is stale.
    pub fn apply(
        &mut self,
        node: &NodeRef,
        concept: &str,
        request: &MappingRequest,
    ) -> Result<MappingKind, EngineError> {
        if self.stage == Stage::Emitted {
            warn!(concept, "annotating after the tree was emitted");
        }
        let kind = apply::apply(self.scope_mut()?, node, concept, request)?;
        info!(concept, reference = %request.reference, %kind, "applied mapping");
        self.stage = Stage::Annotated;
        Ok(kind)
    }

    /// Resolves `concept`, attaches `request` to it and rebuilds the index.
    ///
    /// # Errors
    ///
    /// Any error of [`Engine::resolve`] or [`Engine::apply`].
    pub fn annotate_request(
        &mut self,
        concept: &str,
        request: &MappingRequest,
    ) -> Result<MappingKind, EngineError> {
        let node = self.resolve(concept)?;
        let kind = self.apply(&node, concept, request)?;
        self.rebuild_index()?;
        Ok(kind)
    }

    /// Unchecked annotation: the kind is inferred from what `concept`
    /// resolves to.
    ///
    /// # Errors
    ///
    /// Any error of [`Engine::annotate_request`] except `KindMismatch`.
    pub fn annotate(&mut self, concept: &str, reference: &str) -> Result<MappingKind, EngineError> {
        self.annotate_request(concept, &MappingRequest::new(reference))
    }

    /// Checked annotation: `kind_code` (`'C'` or `'P'`) must match what
    /// `concept` resolves to.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::KindMismatch`] if the code is unknown or does
    /// not match the node category, plus any error of [`Engine::resolve`].
    pub fn annotate_with_check(
        &mut self,
        concept: &str,
        reference: &str,
        kind_code: char,
    ) -> Result<MappingKind, EngineError> {
        let request = MappingRequest::checked(reference, Expectation::from_code(kind_code));
        self.annotate_request(concept, &request)
    }

    /// Rebuilds the index and attaches `table` to every top-level type in
    /// the scope. Returns the number of types updated.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUninitialized`] before a scope is selected.
    pub fn insert_namespaces(&mut self, table: &NamespaceTable) -> Result<usize, EngineError> {
        self.rebuild_index()?;
        let index = std::mem::take(&mut self.index);
        let updated = namespaces::broadcast(self.scope_mut()?, &index, table);
        self.index = index;
        info!(types = updated, prefixes = table.pairs.len(), "attached namespace table");
        self.stage = Stage::Annotated;
        Ok(updated)
    }

    /// [`Engine::insert_namespaces`] from the flat alternating form
    /// `prefix_1, uri_1, prefix_2, uri_2, ...`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedNamespaceList`] on odd length, plus
    /// any error of [`Engine::insert_namespaces`].
    pub fn insert_namespaces_flat<S: AsRef<str>>(
        &mut self,
        items: &[S],
    ) -> Result<usize, EngineError> {
        let table = NamespaceTable::from_flat(items)
            .ok_or(EngineError::MalformedNamespaceList(items.len()))?;
        self.insert_namespaces(&table)
    }

    /// Returns a tree holding only the selected package, for emission.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUninitialized`] before a scope is selected.
    pub fn scoped_tree(&self) -> Result<TypeTree, EngineError> {
        Ok(TypeTree {
            packages: vec![self.scope()?.clone()],
        })
    }

    /// Records that the scoped tree has been written out.
    pub fn mark_emitted(&mut self) {
        self.stage = Stage::Emitted;
    }

    fn require_tree(&self) -> Result<&TypeTree, EngineError> {
        self.tree.as_ref().ok_or(EngineError::ModelUninitialized {
            missing: "type tree",
        })
    }

    fn require_scope(&self) -> Result<usize, EngineError> {
        self.require_tree()?;
        self.scope.ok_or(EngineError::ModelUninitialized {
            missing: "selected scope",
        })
    }

    fn scope_mut(&mut self) -> Result<&mut Package, EngineError> {
        let position = self.require_scope()?;
        self.tree
            .as_mut()
            .and_then(|tree| tree.packages.get_mut(position))
            .ok_or(EngineError::ModelUninitialized {
                missing: "selected scope",
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use rdfbind_test_helpers::{travel_tree, OTHER_PACKAGE, TRAVEL_NAMESPACE, TRAVEL_PACKAGE};

    #[test]
    fn operations_before_load_are_uninitialized() {
        let mut engine = Engine::new();
        let err = EngineError::ModelUninitialized {
            missing: "type tree",
        };
        assert_eq!(engine.stage(), Stage::Uninitialized);
        assert_eq!(engine.select_scope(TRAVEL_NAMESPACE), Err(err.clone()));
        assert_eq!(engine.resolve("Travel"), Err(err.clone()));
        assert_eq!(engine.annotate("Travel", "st4rt:Travel"), Err(err.clone()));
        assert_eq!(engine.insert_namespaces(&NamespaceTable::standard()), Err(err.clone()));
        assert_eq!(engine.scoped_tree(), Err(err));
    }

    #[test]
    fn operations_before_scope_name_the_missing_stage() {
        let mut engine = Engine::with_tree(travel_tree());
        assert_eq!(engine.stage(), Stage::TreeLoaded);
        assert_eq!(
            engine.resolve("Travel"),
            Err(EngineError::ModelUninitialized {
                missing: "selected scope"
            })
        );
    }

    #[test]
    fn lifecycle_stages() {
        let mut engine = Engine::with_tree(travel_tree());
        assert_eq!(engine.select_scope(TRAVEL_NAMESPACE).as_deref(), Ok(TRAVEL_PACKAGE));
        assert_eq!(engine.stage(), Stage::Indexed);
        engine.annotate("Travel", "st4rt:Travel").expect("annotates");
        assert_eq!(engine.stage(), Stage::Annotated);
        engine.mark_emitted();
        assert_eq!(engine.stage(), Stage::Emitted);
    }

    #[test]
    fn unknown_scope() {
        let mut engine = Engine::with_tree(travel_tree());
        assert_eq!(
            engine.select_scope("http://nowhere.example/x"),
            Err(EngineError::ScopeNotFound {
                scope: "example.nowhere.x".to_string()
            })
        );
    }

    #[test]
    fn scope_is_a_filter() {
        let mut engine = Engine::with_tree(travel_tree());
        engine.select_scope(TRAVEL_NAMESPACE).expect("scope");
        engine.annotate("Travel", "st4rt:Travel").expect("annotates");

        let scoped = engine.scoped_tree().expect("scoped");
        assert_eq!(scoped.packages.len(), 1);
        assert_eq!(scoped.packages[0].name, TRAVEL_PACKAGE);

        // The sibling package stays in the source tree, unannotated.
        let tree = engine.tree().expect("tree");
        let other = tree.find_package(OTHER_PACKAGE).expect("other package");
        assert!(other.types.iter().all(|t| t.metadata.is_empty()));
    }

    #[test]
    fn node_views() {
        let mut engine = Engine::with_tree(travel_tree());
        engine.select_scope(TRAVEL_NAMESPACE).expect("scope");
        let node = engine.resolve("givenName").expect("resolves");
        match engine.node(&node) {
            Some(NodeView::Field(field)) => assert_eq!(field.name, "given_name"),
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn flat_namespace_list_must_pair_up() {
        let mut engine = Engine::with_tree(travel_tree());
        engine.select_scope(TRAVEL_NAMESPACE).expect("scope");
        assert_eq!(
            engine.insert_namespaces_flat(&["xml", "http://www.w3.org/XML/1998/namespace", "rdf"]),
            Err(EngineError::MalformedNamespaceList(3))
        );
        assert_eq!(
            engine.insert_namespaces_flat(&["xml", "http://www.w3.org/XML/1998/namespace"]),
            Ok(3)
        );
    }
}
