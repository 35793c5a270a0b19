//! Engine errors.

use std::fmt;

/// Category of a node in the type tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// A generated type.
    Type,
    /// A field of a generated type.
    Field,
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeCategory::Type => f.write_str("type"),
            NodeCategory::Field => f.write_str("field"),
        }
    }
}

/// Errors raised by the annotation engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The scope derived from the target namespace is not in the tree.
    #[error("scope `{scope}` not found in the compiled type tree")]
    ScopeNotFound {
        /// Package identifier that was looked up.
        scope: String,
    },

    /// An operation ran before the state it needs exists.
    #[error("model not initialized: no {missing} yet")]
    ModelUninitialized {
        /// The missing stage (`"type tree"` or `"selected scope"`).
        missing: &'static str,
    },

    /// No node in the selected scope has the requested original name.
    #[error("concept `{0}` not found in the selected scope")]
    ConceptNotFound(String),

    /// The resolved node cannot take the requested mapping kind.
    #[error("`{concept}` resolved to a {found}, which cannot take a {requested} mapping")]
    KindMismatch {
        /// Original name that was resolved.
        concept: String,
        /// Category of the resolved node.
        found: NodeCategory,
        /// Requested mapping kind, or the unrecognized kind code.
        requested: String,
    },

    /// A flat namespace list did not consist of prefix/URI pairs.
    #[error("namespace list has odd length {0}; expected prefix/URI pairs")]
    MalformedNamespaceList(usize),
}
