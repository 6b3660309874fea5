//! Error types for focus traversal.

use std::path::PathBuf;

/// Result type alias for traversal operations.
pub type Result<T> = std::result::Result<T, TraversalError>;

/// Errors that can occur while ordering or navigating a component tree.
///
/// Node identifiers are carried in their `Debug` form so the error type stays
/// independent of the tree implementation behind
/// [`TraversalAccess`](crate::TraversalAccess).
#[derive(Debug, thiserror::Error)]
pub enum TraversalError {
    /// A node's ancestry ends before reaching a traversal root.
    ///
    /// This is a tree-construction bug upstream. The comparator refuses to
    /// guess an order for nodes that are not attached to a window.
    #[error("node {node} is not attached to a traversal root")]
    Unattached { node: String },

    /// Two nodes were compared that live under different traversal roots.
    #[error("nodes {a} and {b} do not share a traversal root")]
    DisjointTrees { a: String, b: String },

    /// The node ID is invalid or has been destroyed.
    #[error("invalid or destroyed node ID")]
    InvalidNode,

    /// Attempted to set a node as its own parent or ancestor.
    #[error("cannot set a node as its own parent or ancestor")]
    CircularParentage,

    /// A traversal policy was asked to walk a node that bounds no focus cycle.
    #[error("node {node} is neither a traversal root nor a focus cycle root")]
    NotCycleRoot { node: String },

    /// Invalid traversal configuration.
    #[error("invalid traversal configuration: {message}")]
    Config { message: String },

    /// Configuration file could not be read.
    #[error("failed to read traversal configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TraversalError {
    /// Create an unattached-node error.
    pub fn unattached(node: impl std::fmt::Debug) -> Self {
        Self::Unattached {
            node: format!("{node:?}"),
        }
    }

    /// Create a disjoint-trees error.
    pub fn disjoint(a: impl std::fmt::Debug, b: impl std::fmt::Debug) -> Self {
        Self::DisjointTrees {
            a: format!("{a:?}"),
            b: format!("{b:?}"),
        }
    }

    /// Create a not-a-cycle-root error.
    pub fn not_cycle_root(node: impl std::fmt::Debug) -> Self {
        Self::NotCycleRoot {
            node: format!("{node:?}"),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error reports a precondition violation of the comparator.
    ///
    /// Both unattached nodes and nodes from disjoint trees mean the caller
    /// handed the comparator a malformed candidate set.
    pub fn is_attachment_error(&self) -> bool {
        matches!(self, Self::Unattached { .. } | Self::DisjointTrees { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unattached_message_names_node() {
        let err = TraversalError::unattached(42u32);
        assert_eq!(
            err.to_string(),
            "node 42 is not attached to a traversal root"
        );
        assert!(err.is_attachment_error());
    }

    #[test]
    fn test_invalid_node_is_not_attachment_error() {
        assert!(!TraversalError::InvalidNode.is_attachment_error());
        assert!(TraversalError::disjoint(1, 2).is_attachment_error());
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as _;

        let err = TraversalError::io(
            "focus.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.source().is_some());
        assert!(err.to_string().contains("focus.toml"));
    }
}
