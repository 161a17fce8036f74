//! Cone collection.
//!
//! Registering a root walks its structural children (`Child` edges) and
//! shallow-copies every definition reached, registering each copy in the
//! identity cache. Owned sub-structure is walked for children but not
//! copied. Edges are not rewritten here; that waits for the first
//! substitution, which also closes the cone to further registration.

use std::collections::HashSet;

use tracing::debug;

use metaclone_core::{EdgeRole, NodeId};

use crate::copier::Copier;
use crate::error::CopyError;

impl<'g> Copier<'g> {
    /// Collects the cone under `root`.
    ///
    /// Returns the clone of `root` and the named-type clones this call
    /// created, in visit order. Nodes already in the cache are not copied
    /// again but their children are still visited, so overlapping roots
    /// extend each other's cones.
    pub fn register_root(&mut self, root: NodeId) -> Result<(NodeId, Vec<NodeId>), CopyError> {
        if self.frozen {
            return Err(CopyError::ConeFrozen { root });
        }
        let kind = self
            .graph
            .kind(root)
            .ok_or(CopyError::NodeNotFound { id: root })?;
        if !kind.is_cone_root() {
            return Err(CopyError::NotAConeRoot { id: root, kind });
        }

        let (visited, new_types) = self.collect(root)?;

        let copy = self.collected_copy(root);
        debug!(
            root = %self.graph.describe(root),
            clone = %copy,
            nodes = visited,
            new_types = new_types.len(),
            "registered cone root"
        );
        Ok((copy, new_types))
    }

    /// Shallow-copies `root` and everything under it along `Child` edges.
    ///
    /// Owned nodes are looked through without being copied, so children
    /// that hang off a method body (its helper types) join the cone while
    /// the body itself waits for on-demand copying. Returns the number of
    /// nodes visited and the named-type clones created.
    pub(crate) fn collect(&mut self, root: NodeId) -> Result<(usize, Vec<NodeId>), CopyError> {
        let mut new_types = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(root, true)];

        while let Some((id, register)) = stack.pop() {
            // Global members are reached from both their namespace and the
            // global type.
            if !visited.insert(id) {
                continue;
            }
            let node = self
                .graph
                .get(id)
                .ok_or(CopyError::NodeNotFound { id })?;
            let is_named_type = node.kind().is_named_type_definition();
            let mut next: Vec<(NodeId, bool)> = node
                .edges()
                .into_iter()
                .filter_map(|edge| match edge.role {
                    EdgeRole::Child => Some((edge.target, true)),
                    EdgeRole::Owned => Some((edge.target, false)),
                    EdgeRole::Back | EdgeRole::Reference => None,
                })
                .collect();

            if register && !self.cache.contains(id) {
                let copy = self.shallow_copy_registered(id);
                if is_named_type {
                    new_types.push(copy);
                }
            }

            next.reverse();
            stack.extend(next);
        }
        Ok((visited.len(), new_types))
    }
}
