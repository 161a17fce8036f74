//! Core error types for metaclone-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the graph builder API and graph validation.

use thiserror::Error;

use crate::edge::EdgeRole;
use crate::id::NodeId;
use crate::kind::NodeKind;

/// Core errors produced by the metaclone-core crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A node id does not address a slot in the arena.
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// A builder method was handed a node of the wrong kind, e.g. adding a
    /// field to a namespace.
    #[error("{id} is a {found}, expected {expected}")]
    KindMismatch {
        id: NodeId,
        expected: &'static str,
        found: NodeKind,
    },

    /// An edge names a node that is not in the arena.
    #[error("{from} has a {role:?} edge to missing node {to}")]
    DanglingEdge {
        from: NodeId,
        role: EdgeRole,
        to: NodeId,
    },
}
