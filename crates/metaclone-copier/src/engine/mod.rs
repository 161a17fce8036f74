//! The deep-copy engine.
//!
//! A clone starts life as a shallow copy: the original node's payload pushed
//! into a fresh arena slot, edges still naming original targets. Deep copy
//! rewrites those edges in place. The clone's payload is taken out of the
//! arena, rewritten edge by edge, and written back.
//!
//! Each edge role has its own policy:
//!
//! - `Child`: the target was collected into the cone; its clone is fetched
//!   from the cache and deep-copied in turn.
//! - `Owned`: the target is shallow-copied on first use and deep-copied.
//!   Owned nodes with children of their own (helper types listed by a
//!   method body) have those children collected at the same time.
//! - `Back`: the target's clone if it has one, else the original. Never
//!   creates a node.
//! - `Reference`: see [`Copier::copy_reference`] in `references.rs`.
//!
//! A clone is marked as rewritten before its edges are visited, so cycles
//! (a method whose body points back at the method) end at the marker.
//!
//! The policies are written per kind in the `rewrite_*` functions, apart
//! from the edge table in `metaclone_core::edge`. Debug builds check every
//! rewritten node against that table.

mod attributes;
mod definitions;
mod references;

use tracing::trace;

use metaclone_core::types::{CustomModifier, MarshallingInformation, ParameterTypeInfo};
use metaclone_core::{Edge, EdgeRole, Node, NodeId};

use crate::copier::Copier;

impl<'g> Copier<'g> {
    // -----------------------------------------------------------------------
    // Node creation
    // -----------------------------------------------------------------------

    /// Pushes a copy of `original`'s payload as a new node.
    pub(crate) fn shallow_copy(&mut self, original: NodeId) -> NodeId {
        let node = self.node(original).clone();
        let copy = self.graph.add(node);
        trace!(original = %original, copy = %copy, kind = %self.graph[copy].kind(), "shallow copy");
        copy
    }

    /// The cached clone of `original`, creating and registering a shallow
    /// copy when there is none.
    pub(crate) fn shallow_copy_registered(&mut self, original: NodeId) -> NodeId {
        if let Some(copy) = self.cache.get(original) {
            return copy;
        }
        let copy = self.shallow_copy(original);
        self.cache.register(original, copy);
        self.cache.register_self(copy);
        copy
    }

    /// Arena lookup for ids that must exist.
    ///
    /// # Panics
    ///
    /// If `id` is outside the arena: an edge names a node that was never
    /// added.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        match self.graph.get(id) {
            Some(node) => node,
            None => panic!("edge to missing node {}", id),
        }
    }

    // -----------------------------------------------------------------------
    // Edge policies
    // -----------------------------------------------------------------------

    /// Back-edge resolution: the clone if one exists, else `id` itself.
    pub(crate) fn existing_copy(&self, id: NodeId) -> NodeId {
        self.cache.get(id).unwrap_or(id)
    }

    /// The clone of a definition that must have been collected.
    ///
    /// # Panics
    ///
    /// If `id` has no cache entry. The cone was collected inconsistently
    /// with the containment graph.
    pub(crate) fn collected_copy(&self, id: NodeId) -> NodeId {
        match self.cache.get(id) {
            Some(copy) => copy,
            None => panic!(
                "{} was expected in the cone but has no clone",
                self.graph.describe(id)
            ),
        }
    }

    /// Deep-copies the collected clone of a child definition.
    pub(crate) fn copy_child(&mut self, id: NodeId) -> NodeId {
        let copy = self.collected_copy(id);
        self.deep_copy(copy);
        copy
    }

    /// Deep-copies an owned node, creating its clone on demand.
    ///
    /// # Panics
    ///
    /// If the node or one of its children is missing from the arena.
    pub(crate) fn copy_owned(&mut self, id: NodeId) -> NodeId {
        if !self.cache.contains(id) {
            if let Err(e) = self.collect(id) {
                panic!("owned node {} could not be collected: {}", id, e);
            }
        }
        let copy = self.collected_copy(id);
        self.deep_copy(copy);
        copy
    }

    pub(crate) fn copy_children(&mut self, ids: &mut [NodeId]) {
        for id in ids {
            *id = self.copy_child(*id);
        }
    }

    pub(crate) fn copy_owned_all(&mut self, ids: &mut [NodeId]) {
        for id in ids {
            *id = self.copy_owned(*id);
        }
    }

    pub(crate) fn copy_owned_opt(&mut self, id: &mut Option<NodeId>) {
        if let Some(id) = id {
            *id = self.copy_owned(*id);
        }
    }

    pub(crate) fn copy_references(&mut self, ids: &mut [NodeId]) {
        for id in ids {
            *id = self.copy_reference(*id);
        }
    }

    pub(crate) fn copy_reference_opt(&mut self, id: &mut Option<NodeId>) {
        if let Some(id) = id {
            *id = self.copy_reference(*id);
        }
    }

    pub(crate) fn resolve_back(&self, id: &mut NodeId) {
        *id = self.existing_copy(*id);
    }

    pub(crate) fn resolve_back_opt(&self, id: &mut Option<NodeId>) {
        if let Some(id) = id {
            *id = self.existing_copy(*id);
        }
    }

    pub(crate) fn copy_modifiers(&mut self, modifiers: &mut [CustomModifier]) {
        for m in modifiers {
            m.modifier = self.copy_reference(m.modifier);
        }
    }

    pub(crate) fn copy_parameter_types(&mut self, parameters: &mut [ParameterTypeInfo]) {
        for p in parameters {
            p.ty = self.copy_reference(p.ty);
            self.copy_modifiers(&mut p.custom_modifiers);
        }
    }

    pub(crate) fn copy_marshalling(&mut self, info: &mut Option<MarshallingInformation>) {
        if let Some(info) = info {
            self.copy_reference_opt(&mut info.custom_marshaller);
            self.copy_reference_opt(&mut info.safe_array_user_defined_subtype);
        }
    }

    // -----------------------------------------------------------------------
    // Deep copy
    // -----------------------------------------------------------------------

    /// Rewrites every edge of `copy`. Does nothing if the rewrite of `copy`
    /// has already started.
    pub(crate) fn deep_copy(&mut self, copy: NodeId) {
        if !self.rewritten.insert(copy) {
            return;
        }
        let mut node = self.node(copy).clone();
        self.rewrite(copy, &mut node);
        if cfg!(debug_assertions) {
            if let Some(edge) = self.stale_edge(&node) {
                panic!(
                    "{} kept a {:?} edge to {} after its rewrite",
                    self.graph.describe(copy),
                    edge.role,
                    self.graph.describe(edge.target)
                );
            }
        }
        self.graph[copy] = node;
    }

    /// The first edge of a rewritten node that disagrees with its role in
    /// [`Node::edges`]: any edge still naming an original that has a clone,
    /// or a `Child` or `Owned` edge to a node that was never copied.
    pub(crate) fn stale_edge(&self, node: &Node) -> Option<Edge> {
        node.edges().into_iter().find(|edge| {
            let redirected = self
                .cache
                .get(edge.target)
                .is_some_and(|copy| copy != edge.target);
            let uncopied = matches!(edge.role, EdgeRole::Child | EdgeRole::Owned)
                && !self.rewritten.contains(&edge.target);
            redirected || uncopied
        })
    }

    fn rewrite(&mut self, copy: NodeId, node: &mut Node) {
        match node {
            Node::Assembly(_)
            | Node::Module(_)
            | Node::RootNamespace(_)
            | Node::NestedNamespace(_)
            | Node::NamespaceType(_)
            | Node::NestedType(_)
            | Node::GenericTypeParameter(_)
            | Node::GenericMethodParameter(_)
            | Node::Field(_)
            | Node::GlobalField(_)
            | Node::Method(_)
            | Node::GlobalMethod(_)
            | Node::Property(_)
            | Node::Event(_)
            | Node::Parameter(_)
            | Node::MethodBody(_)
            | Node::Local(_) => self.rewrite_definition(copy, node),

            Node::CustomAttribute(_)
            | Node::SecurityAttribute(_)
            | Node::Constant(_)
            | Node::CreateArray(_)
            | Node::NamedArgument(_)
            | Node::TypeOf(_)
            | Node::NamespaceAlias(_)
            | Node::NestedAlias(_)
            | Node::FileReference(_)
            | Node::ResourceReference(_)
            | Node::Win32Resource(_) => self.rewrite_attached(node),

            Node::AssemblyRef(_)
            | Node::ModuleRef(_)
            | Node::RootNamespaceRef(_)
            | Node::NestedNamespaceRef(_)
            | Node::NamespaceTypeRef(_)
            | Node::NestedTypeRef(_)
            | Node::SpecializedNestedTypeRef(_)
            | Node::GenericTypeInstance(_)
            | Node::GenericTypeParameterRef(_)
            | Node::GenericMethodParameterRef(_)
            | Node::ArrayType(_)
            | Node::PointerType(_)
            | Node::ManagedPointerType(_)
            | Node::ModifiedType(_)
            | Node::FunctionPointerType(_)
            | Node::FieldRef(_)
            | Node::SpecializedFieldRef(_)
            | Node::MethodRef(_)
            | Node::SpecializedMethodRef(_)
            | Node::GenericMethodInstance(_) => self.rewrite_reference(node),

            Node::UnitSet(_) | Node::UnitSetNamespace(_) => {
                panic!("{} cannot be copied", self.graph.describe(copy))
            }
        }
    }
}
