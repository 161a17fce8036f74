//! Error types for the copier.
//!
//! Caller-side protocol mistakes surface as [`CopyError`]. Broken internal
//! invariants (a child definition missing from the identity cache while its
//! parent is rewritten) are not errors: they panic.

use thiserror::Error;

use metaclone_core::{NodeId, NodeKind};

/// Errors produced by [`Copier`](crate::Copier) operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CopyError {
    /// A root was registered after the first substitution froze the cone.
    #[error("cannot register root {root}: the cone is frozen")]
    ConeFrozen { root: NodeId },

    /// An id does not address a node in the graph.
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// The node's kind cannot root a cone (bodies, attributes, references).
    #[error("{id} is a {kind}, which cannot root a cone")]
    NotAConeRoot { id: NodeId, kind: NodeKind },

    /// A substitution was handed a node of the wrong kind.
    #[error("{id} is a {found}, expected {expected}")]
    KindMismatch {
        id: NodeId,
        expected: &'static str,
        found: NodeKind,
    },

    /// A definition that must come from a registered cone is not in the
    /// identity cache.
    #[error("{id} ({kind}) was not collected into the cone")]
    NotCollected { id: NodeId, kind: NodeKind },

    /// The kind is outside what the copier handles.
    #[error("{kind} nodes are not supported by the copier")]
    Unsupported { kind: NodeKind },
}
