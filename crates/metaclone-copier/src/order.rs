//! Type-order preservation for copied modules.
//!
//! Deep copy discovers named types in traversal order, which follows
//! namespace membership and not the module's type table. The
//! [`TypeOrderPreserver`] puts the copies back into the original table's
//! order. Copies are distinct nodes, so they are matched to their originals
//! by full structural name rather than identity.

use std::cmp::Ordering;
use std::collections::HashMap;

use metaclone_core::{MetadataGraph, NodeId};

/// Stable order over copied named types keyed by the original module's
/// type table.
#[derive(Debug, Clone, Default)]
pub struct TypeOrderPreserver {
    positions: HashMap<String, usize>,
}

impl TypeOrderPreserver {
    /// Indexes the original type table. If two entries share a full name the
    /// first one keeps its position.
    pub fn new(graph: &MetadataGraph, original_types: &[NodeId]) -> Self {
        let mut positions = HashMap::with_capacity(original_types.len());
        for (position, &ty) in original_types.iter().enumerate() {
            if let Some(name) = graph.type_full_name(ty) {
                positions.entry(name).or_insert(position);
            }
        }
        TypeOrderPreserver { positions }
    }

    /// Original position of the type whose full name matches `ty`'s.
    pub fn position(&self, graph: &MetadataGraph, ty: NodeId) -> Option<usize> {
        graph
            .type_full_name(ty)
            .and_then(|name| self.positions.get(&name).copied())
    }

    /// Orders by original position. Types with no original sort last.
    pub fn compare(&self, graph: &MetadataGraph, a: NodeId, b: NodeId) -> Ordering {
        self.sort_key(graph, a).cmp(&self.sort_key(graph, b))
    }

    /// Stable sort of `types` into original order.
    pub fn sort(&self, graph: &MetadataGraph, types: &mut [NodeId]) {
        types.sort_by_cached_key(|&ty| self.sort_key(graph, ty));
    }

    fn sort_key(&self, graph: &MetadataGraph, ty: NodeId) -> usize {
        self.position(graph, ty).unwrap_or(usize::MAX)
    }
}
