//! IdentityCache: the original → clone registry of a copy session.
//!
//! Every clone is also registered to itself, so a lookup answers "what is
//! the copy of this node" the same way whether it is handed an original or a
//! node that already is a copy. Entries are never removed.

use std::collections::HashMap;

use metaclone_core::NodeId;

/// Mapping from node identity to the identity of its clone.
#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    map: HashMap<NodeId, NodeId>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The clone registered for `original`, if any.
    pub fn get(&self, original: NodeId) -> Option<NodeId> {
        self.map.get(&original).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.map.contains_key(&id)
    }

    /// Records `clone` as the copy of `original`.
    ///
    /// # Panics
    ///
    /// If `original` already has an entry. A node has one clone per session.
    pub fn register(&mut self, original: NodeId, clone: NodeId) {
        if let Some(existing) = self.map.insert(original, clone) {
            panic!(
                "identity cache: {} already cloned as {}, cannot register {}",
                original, existing, clone
            );
        }
    }

    /// Records `clone` as its own copy. Idempotent.
    ///
    /// # Panics
    ///
    /// If `clone` is already mapped to a different node.
    pub fn register_self(&mut self, clone: NodeId) {
        let entry = self.map.entry(clone).or_insert(clone);
        if *entry != clone {
            panic!(
                "identity cache: {} is mapped to {}, cannot map it to itself",
                clone, entry
            );
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// All `(key, clone)` entries, self-entries included, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.map.iter().map(|(&k, &v)| (k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut cache = IdentityCache::new();
        assert!(cache.is_empty());
        cache.register(NodeId(1), NodeId(10));
        cache.register_self(NodeId(10));

        assert_eq!(cache.get(NodeId(1)), Some(NodeId(10)));
        assert_eq!(cache.get(NodeId(10)), Some(NodeId(10)));
        assert_eq!(cache.get(NodeId(2)), None);
        assert!(cache.contains(NodeId(1)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn register_self_is_idempotent() {
        let mut cache = IdentityCache::new();
        cache.register_self(NodeId(5));
        cache.register_self(NodeId(5));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already cloned")]
    fn second_clone_of_same_original_panics() {
        let mut cache = IdentityCache::new();
        cache.register(NodeId(1), NodeId(10));
        cache.register(NodeId(1), NodeId(11));
    }

    #[test]
    #[should_panic(expected = "cannot map it to itself")]
    fn self_registration_of_mapped_node_panics() {
        let mut cache = IdentityCache::new();
        cache.register(NodeId(1), NodeId(10));
        cache.register_self(NodeId(1));
    }
}
