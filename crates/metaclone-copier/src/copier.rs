//! The copy session.
//!
//! A [`Copier`] borrows the graph mutably for its whole lifetime and owns the
//! session state: the identity cache, the set of clones whose edges have been
//! rewritten, the frozen flag and the per-module flat type list. Clones are
//! appended to the same arena as the originals.

use std::collections::{HashMap, HashSet};

use metaclone_core::{MetadataGraph, NodeId};

use crate::cache::IdentityCache;
use crate::config::CopierConfig;
use crate::host::{MetadataHost, NullHost};

static NULL_HOST: NullHost = NullHost;

/// One copy session over a metadata graph.
pub struct Copier<'g> {
    pub(crate) graph: &'g mut MetadataGraph,
    pub(crate) host: &'g dyn MetadataHost,
    pub(crate) config: CopierConfig,
    pub(crate) cache: IdentityCache,
    /// Clones whose edge rewriting has started.
    pub(crate) rewritten: HashSet<NodeId>,
    pub(crate) frozen: bool,
    /// Named-type clones produced while copying the current module.
    pub(crate) flat_types: Vec<NodeId>,
    /// Reference nodes built for out-of-cone definitions, by definition.
    /// Kept apart from the cache: they are not clones of the definition.
    pub(crate) fabricated: HashMap<NodeId, NodeId>,
    /// Fabricated assembly references no copied module lists yet.
    pub(crate) unlisted_assembly_refs: Vec<NodeId>,
    /// `(original, clone)` of the method reference being rewritten.
    pub(crate) in_progress_method: Option<(NodeId, NodeId)>,
    /// `(original, clone)` of the type reference being rewritten.
    pub(crate) in_progress_type: Option<(NodeId, NodeId)>,
}

impl<'g> Copier<'g> {
    /// Starts a session with the default configuration and no host.
    pub fn new(graph: &'g mut MetadataGraph) -> Self {
        Copier {
            graph,
            host: &NULL_HOST,
            config: CopierConfig::default(),
            cache: IdentityCache::new(),
            rewritten: HashSet::new(),
            frozen: false,
            flat_types: Vec::new(),
            fabricated: HashMap::new(),
            unlisted_assembly_refs: Vec::new(),
            in_progress_method: None,
            in_progress_type: None,
        }
    }

    /// Uses `host` to resolve assembly references.
    pub fn with_host(mut self, host: &'g dyn MetadataHost) -> Self {
        self.host = host;
        self
    }

    pub fn with_config(mut self, config: CopierConfig) -> Self {
        self.config = config;
        self
    }

    /// Seeds the session with existing `original → clone` entries. Seeded
    /// clones are treated as fully copied: they are returned as-is and never
    /// rewritten.
    pub fn with_cache(mut self, cache: IdentityCache) -> Self {
        self.rewritten.extend(cache.iter().map(|(_, clone)| clone));
        self.cache = cache;
        self
    }

    /// The graph being copied, originals and clones alike.
    pub fn graph(&self) -> &MetadataGraph {
        &*self.graph
    }

    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    pub fn config(&self) -> CopierConfig {
        self.config
    }

    /// Returns `true` once any substitution has run.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Releases the session, returning its identity cache.
    pub fn into_cache(self) -> IdentityCache {
        self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::GraphHost;
    use metaclone_core::Version;

    #[test]
    fn fresh_session_is_open_and_empty() {
        let mut graph = MetadataGraph::new();
        graph.add_assembly("App", Version::default());
        let copier = Copier::new(&mut graph);

        assert!(!copier.is_frozen());
        assert!(copier.cache().is_empty());
        assert_eq!(copier.config(), CopierConfig::default());
        assert_eq!(copier.graph().len(), 2);
    }

    #[test]
    fn builders_replace_settings() {
        let mut graph = MetadataGraph::new();
        let host = GraphHost;
        let config = CopierConfig {
            preserve_type_order: false,
            resolve_through_host: false,
        };
        let mut seed = IdentityCache::new();
        seed.register(NodeId(0), NodeId(0));

        let copier = Copier::new(&mut graph)
            .with_host(&host)
            .with_config(config)
            .with_cache(seed);

        assert_eq!(copier.config(), config);
        assert_eq!(copier.cache().get(NodeId(0)), Some(NodeId(0)));
        assert!(copier.rewritten.contains(&NodeId(0)));
    }
}
