//! Stable ID newtypes for metadata graph entities.
//!
//! Both IDs are distinct newtype wrappers over `u32`, providing type safety
//! so that a `Name` handle cannot be accidentally used where a `NodeId` is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identifier: an index into the [`MetadataGraph`] arena.
///
/// Node identity is the id, never the node's structural value. Two nodes with
/// identical contents but different ids are different nodes.
///
/// [`MetadataGraph`]: crate::graph::MetadataGraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Interned name handle. Resolved through the graph's
/// [`NameTable`](crate::names::NameTable). The default handle is
/// [`Name::EMPTY`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Name(pub u32);

impl NodeId {
    /// Returns the arena slot this id addresses.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Name {
    /// The pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Returns the interner slot this handle addresses.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// Display implementations -- just print the inner value.

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
