//! Depth-first traversal index over the selected scope.
//!
//! The index is a snapshot: it records node positions and original names at
//! build time and must be rebuilt after the scope changes.

use rdfbind_model::{Package, TypeNode};

use crate::error::NodeCategory;

/// Position of a type inside a package: the first index selects a top-level
/// type, each following index a nested type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypePath(pub Vec<usize>);

impl TypePath {
    /// Returns the path as a slice of indices.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Returns true if the path names a top-level type.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.0.len() == 1
    }
}

/// A resolved node: a type, or a field of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// A generated type.
    Type(TypePath),
    /// A field, by owning type and declaration position.
    Field {
        /// Owning type.
        owner: TypePath,
        /// Position in the owner's field list.
        field: usize,
    },
}

impl NodeRef {
    /// Returns whether this is a type or a field.
    #[must_use]
    pub fn category(&self) -> NodeCategory {
        match self {
            NodeRef::Type(_) => NodeCategory::Type,
            NodeRef::Field { .. } => NodeCategory::Field,
        }
    }
}

/// One visited node with the original name it had at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// The visited node.
    pub node: NodeRef,
    /// Original schema name; `None` for fields without one.
    pub original_name: Option<String>,
}

/// Traversal snapshot of one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTreeIndex {
    entries: Vec<IndexEntry>,
}

impl TypeTreeIndex {
    /// Builds the index of `package`: each top-level type, then its fields,
    /// then its nested types recursively, before the next top-level type.
    /// Factory types are skipped.
    #[must_use]
    pub fn build(package: &Package) -> Self {
        let mut entries = Vec::new();
        for (i, ty) in package.types.iter().enumerate() {
            if !ty.is_factory {
                visit(ty, vec![i], &mut entries);
            }
        }
        Self { entries }
    }

    /// Entries in traversal order.
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Number of indexed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexed top-level types, in traversal order.
    pub fn top_level_types(&self) -> impl Iterator<Item = &TypePath> {
        self.entries.iter().filter_map(|e| match &e.node {
            NodeRef::Type(path) if path.is_top_level() => Some(path),
            _ => None,
        })
    }
}

fn visit(ty: &TypeNode, path: Vec<usize>, entries: &mut Vec<IndexEntry>) {
    entries.push(IndexEntry {
        node: NodeRef::Type(TypePath(path.clone())),
        original_name: Some(ty.original_name().to_string()),
    });
    for (i, field) in ty.fields.iter().enumerate() {
        entries.push(IndexEntry {
            node: NodeRef::Field {
                owner: TypePath(path.clone()),
                field: i,
            },
            original_name: field.original_name().map(str::to_string),
        });
    }
    for (i, nested) in ty.nested.iter().enumerate() {
        if nested.is_factory {
            continue;
        }
        let mut nested_path = path.clone();
        nested_path.push(i);
        visit(nested, nested_path, entries);
    }
}
