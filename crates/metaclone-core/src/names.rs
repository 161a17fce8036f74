//! Name interning for the metadata graph.
//!
//! Every identifier in the graph (type, member, namespace, assembly names) is
//! stored once in the [`NameTable`] and referenced by a [`Name`] handle. The
//! handle is `Copy`, so cloning a node never duplicates strings, and two
//! clones of the same original share their names by construction.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::id::Name;

/// Insertion-ordered string interner.
///
/// On construction the table pre-interns the empty string as [`Name::EMPTY`].
/// A handle's value is the string's position in the set, so handles stay
/// stable across serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameTable {
    strings: IndexSet<String>,
}

impl NameTable {
    /// Creates a table holding only the empty string.
    pub fn new() -> Self {
        let mut strings = IndexSet::new();
        strings.insert(String::new());
        NameTable { strings }
    }

    /// Interns `value`, returning the existing handle if it was seen before.
    pub fn intern(&mut self, value: &str) -> Name {
        if let Some(index) = self.strings.get_index_of(value) {
            return Name(index as u32);
        }
        let (index, _) = self.strings.insert_full(value.to_string());
        Name(index as u32)
    }

    /// Looks up an already-interned string without inserting it.
    pub fn find(&self, value: &str) -> Option<Name> {
        self.strings.get_index_of(value).map(|i| Name(i as u32))
    }

    /// Resolves a handle. Unknown handles resolve to the empty string.
    pub fn resolve(&self, name: Name) -> &str {
        self.strings
            .get_index(name.index())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Number of distinct interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Always `false`: the empty string is interned on construction.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}
