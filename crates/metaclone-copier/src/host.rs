//! Host services consulted while copying.
//!
//! The copier never loads metadata. When an assembly reference needs its
//! target and the identity cache does not know it, the copier asks a
//! [`MetadataHost`]. [`NullHost`] never answers; [`GraphHost`] looks for a
//! matching assembly definition already present in the graph.

use metaclone_core::{AssemblyIdentity, MetadataGraph, Node, NodeId};

/// Resolution services supplied by the embedding application.
pub trait MetadataHost {
    /// The assembly definition matching `identity`, if the host knows one.
    fn find_assembly(&self, graph: &MetadataGraph, identity: &AssemblyIdentity) -> Option<NodeId>;
}

/// Host that resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl MetadataHost for NullHost {
    fn find_assembly(&self, _graph: &MetadataGraph, _identity: &AssemblyIdentity) -> Option<NodeId> {
        None
    }
}

/// Host that matches assembly definitions loaded in the graph by name,
/// culture and version. The earliest matching node wins, so an original is
/// preferred over any copy made of it later.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphHost;

impl MetadataHost for GraphHost {
    fn find_assembly(&self, graph: &MetadataGraph, identity: &AssemblyIdentity) -> Option<NodeId> {
        graph.iter().find_map(|(id, node)| match node {
            Node::Assembly(a)
                if a.module.name == identity.name
                    && a.culture == identity.culture
                    && a.version == identity.version =>
            {
                Some(id)
            }
            _ => None,
        })
    }
}
