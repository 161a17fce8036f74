//! Structural fingerprint of a cone.
//!
//! [`ConeShape`] projects the part of the arena reachable from a root over
//! `Child` and `Owned` edges onto a petgraph [`DiGraph`], labelling nodes with
//! their kind and resolved name and edges with their [`EdgeRole`]. Edges of
//! any role are kept when both endpoints are inside the cone, so internal
//! identity (a field typed by its own containing type, a method pointing at
//! its body) shows up as graph structure.
//!
//! Two cones are structurally equal when their shapes are isomorphic. This is
//! how a clone is checked against its original: ids differ, the shape must
//! not.

use std::collections::HashMap;

use petgraph::algo::is_isomorphic_matching;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::edge::EdgeRole;
use crate::error::CoreError;
use crate::graph::MetadataGraph;
use crate::id::NodeId;
use crate::kind::NodeKind;

/// Node label in a [`ConeShape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeNode {
    pub kind: NodeKind,
    pub name: String,
}

/// Kind/name/role labelled projection of a cone.
#[derive(Debug, Clone)]
pub struct ConeShape {
    graph: DiGraph<ShapeNode, EdgeRole>,
    index: HashMap<NodeId, NodeIndex>,
}

impl ConeShape {
    /// Builds the shape of the cone rooted at `root`.
    pub fn of(metadata: &MetadataGraph, root: NodeId) -> Result<Self, CoreError> {
        metadata.node(root)?;

        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        let mut order = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if index.contains_key(&id) {
                continue;
            }
            let Some(node) = metadata.get(id) else {
                continue;
            };
            let ix = graph.add_node(ShapeNode {
                kind: node.kind(),
                name: metadata.name_of(id).to_string(),
            });
            index.insert(id, ix);
            order.push(id);

            let mut next: Vec<NodeId> = node
                .edges()
                .into_iter()
                .filter(|e| matches!(e.role, EdgeRole::Child | EdgeRole::Owned))
                .map(|e| e.target)
                .collect();
            // Reverse so children are visited in declaration order.
            next.reverse();
            stack.extend(next);
        }

        for id in order {
            let from = index[&id];
            for edge in metadata[id].edges() {
                if let Some(&to) = index.get(&edge.target) {
                    graph.add_edge(from, to, edge.role);
                }
            }
        }

        Ok(ConeShape { graph, index })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if `id` is part of this cone.
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Ids of every node in the cone.
    pub fn members(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.index.keys().copied()
    }

    /// Returns `true` if both cones have the same labelled structure.
    pub fn is_isomorphic(&self, other: &ConeShape) -> bool {
        self.node_count() == other.node_count()
            && self.edge_count() == other.edge_count()
            && is_isomorphic_matching(&self.graph, &other.graph, |a, b| a == b, |a, b| a == b)
    }
}
