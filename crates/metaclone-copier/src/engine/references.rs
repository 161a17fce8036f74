//! Copying of edges in reference position.
//!
//! A reference-position edge may name a reference node or a definition.
//! Reference nodes are copied through the cache like anything else. A
//! definition inside the cone resolves to its clone. A definition outside
//! the cone is replaced by a new reference node describing it, so the copy
//! never points into the original graph for types, members, namespaces or
//! units it does not own.

use tracing::trace;

use metaclone_core::reference::{
    AssemblyRef, FieldRef, GenericMethodParameterRef, GenericTypeParameterRef, MethodRef,
    ModuleRef, NamespaceTypeRef, NestedNamespaceRef, NestedTypeRef, RootNamespaceRef,
};
use metaclone_core::types::{AssemblyIdentity, ParameterTypeInfo};
use metaclone_core::{Node, NodeId, NodeKind};

use crate::copier::Copier;

impl<'g> Copier<'g> {
    /// Resolves an edge in reference position to its copy.
    ///
    /// Cached nodes return their clone. Reference nodes are shallow-copied,
    /// registered and deep-copied. Out-of-cone definitions of fabricable
    /// kinds become a reference node, built once per definition and
    /// registered only to itself; other definitions resolve like back-edges.
    pub(crate) fn copy_reference(&mut self, id: NodeId) -> NodeId {
        if let Some(copy) = self.cache.get(id) {
            return copy;
        }
        if let Some(&copy) = self.fabricated.get(&id) {
            return copy;
        }
        let kind = self.node(id).kind();

        if kind.is_reference() {
            let copy = self.shallow_copy_registered(id);
            self.deep_copy_reference(kind, id, copy);
            return copy;
        }

        match self.fabricate_reference(id) {
            Some(reference) => {
                let copy = self.graph.add(reference);
                self.cache.register_self(copy);
                self.fabricated.insert(id, copy);
                if kind == NodeKind::Assembly {
                    self.unlisted_assembly_refs.push(copy);
                }
                trace!(
                    definition = %self.graph.describe(id),
                    reference = %copy,
                    "fabricated reference to out-of-cone definition"
                );
                self.deep_copy_reference(kind, id, copy);
                copy
            }
            None => self.existing_copy(id),
        }
    }

    /// Deep-copies `copy` with the in-progress slot for its kind pointing at
    /// `(original, copy)`, restoring the previous slots afterwards.
    fn deep_copy_reference(&mut self, kind: NodeKind, original: NodeId, copy: NodeId) {
        let saved = (self.in_progress_method, self.in_progress_type);
        if kind.is_method_reference() {
            self.in_progress_method = Some((original, copy));
        } else if matches!(
            kind,
            NodeKind::NamespaceType
                | NodeKind::NestedType
                | NodeKind::NamespaceTypeRef
                | NodeKind::NestedTypeRef
                | NodeKind::SpecializedNestedTypeRef
        ) {
            self.in_progress_type = Some((original, copy));
        }
        self.deep_copy(copy);
        (self.in_progress_method, self.in_progress_type) = saved;
    }

    /// Builds a reference node denoting the definition `id`, or `None` if
    /// the definition's kind has no reference counterpart.
    fn fabricate_reference(&self, id: NodeId) -> Option<Node> {
        let node = self.node(id);
        let reference = match node {
            Node::NamespaceType(t) => Node::NamespaceTypeRef(NamespaceTypeRef {
                name: t.ty.name,
                containing_namespace: t.containing_namespace,
                generic_parameter_count: self.generic_count(id, &t.ty.generic_parameters),
                is_value_type: t.ty.flags.is_value_type,
                mangle_name: !t.ty.generic_parameters.is_empty(),
                attributes: Vec::new(),
            }),
            Node::NestedType(t) => Node::NestedTypeRef(NestedTypeRef {
                name: t.ty.name,
                containing_type: t.containing_type,
                generic_parameter_count: self.generic_count(id, &t.ty.generic_parameters),
                is_value_type: t.ty.flags.is_value_type,
                mangle_name: !t.ty.generic_parameters.is_empty(),
                attributes: Vec::new(),
            }),
            Node::GenericTypeParameter(p) => Node::GenericTypeParameterRef(GenericTypeParameterRef {
                name: p.parameter.name,
                index: p.parameter.index,
                defining_type: p.defining_type,
            }),
            Node::GenericMethodParameter(p) => {
                Node::GenericMethodParameterRef(GenericMethodParameterRef {
                    name: p.parameter.name,
                    index: p.parameter.index,
                    defining_method: p.defining_method,
                })
            }
            Node::Field(_) | Node::GlobalField(_) => {
                let f = node.field_data()?;
                Node::FieldRef(FieldRef {
                    name: f.name,
                    containing_type: f.containing_type,
                    ty: f.ty,
                    custom_modifiers: f.custom_modifiers.clone(),
                    is_static: f.is_static,
                    attributes: Vec::new(),
                })
            }
            Node::Method(_) | Node::GlobalMethod(_) => {
                let m = node.method_data()?;
                let parameters = m
                    .parameters
                    .iter()
                    .filter_map(|&p| match self.graph.get(p) {
                        Some(Node::Parameter(p)) => Some(ParameterTypeInfo {
                            index: p.index,
                            ty: p.ty,
                            is_by_reference: p.is_by_reference,
                            custom_modifiers: p.custom_modifiers.clone(),
                        }),
                        _ => None,
                    })
                    .collect();
                Node::MethodRef(MethodRef {
                    name: m.name,
                    containing_type: m.containing_type,
                    generic_parameter_count: self.generic_count(id, &m.generic_parameters),
                    calling_convention: m.calling_convention,
                    parameters,
                    extra_parameters: Vec::new(),
                    return_type: m.return_type,
                    returns_by_reference: m.return_value_is_by_ref,
                    return_value_custom_modifiers: m.return_value_custom_modifiers.clone(),
                    attributes: Vec::new(),
                })
            }
            Node::RootNamespace(n) => Node::RootNamespaceRef(RootNamespaceRef { unit: n.unit }),
            Node::NestedNamespace(n) => Node::NestedNamespaceRef(NestedNamespaceRef {
                name: n.namespace.name,
                containing_namespace: n.containing_namespace,
            }),
            Node::Assembly(a) => Node::AssemblyRef(AssemblyRef {
                identity: AssemblyIdentity {
                    name: a.module.name,
                    culture: a.culture,
                    version: a.version,
                    public_key_token: Vec::new(),
                    location: a.module.location.clone(),
                },
                is_retargetable: a.is_retargetable,
                resolved_assembly: Some(id),
                attributes: Vec::new(),
            }),
            Node::Module(m) => Node::ModuleRef(ModuleRef {
                name: m.module.name,
                containing_assembly: m.module.containing_assembly,
                resolved_module: Some(id),
                attributes: Vec::new(),
            }),
            _ => return None,
        };
        Some(reference)
    }

    /// Generic arity recorded in a reference to `id`.
    ///
    /// # Panics
    ///
    /// If the definition has more generic parameters than a reference can
    /// record.
    fn generic_count(&self, id: NodeId, parameters: &[NodeId]) -> u16 {
        match u16::try_from(parameters.len()) {
            Ok(count) => count,
            Err(_) => panic!(
                "{} has {} generic parameters, more than a reference can record",
                self.graph.describe(id),
                parameters.len()
            ),
        }
    }

    // -----------------------------------------------------------------------
    // Reference rewriting
    // -----------------------------------------------------------------------

    pub(super) fn rewrite_reference(&mut self, node: &mut Node) {
        match node {
            Node::AssemblyRef(r) => {
                r.resolved_assembly = self.resolve_assembly(r);
                self.copy_owned_all(&mut r.attributes);
            }
            Node::ModuleRef(r) => {
                self.copy_reference_opt(&mut r.containing_assembly);
                self.resolve_back_opt(&mut r.resolved_module);
                self.copy_owned_all(&mut r.attributes);
            }
            Node::RootNamespaceRef(r) => r.unit = self.copy_reference(r.unit),
            Node::NestedNamespaceRef(r) => {
                r.containing_namespace = self.copy_reference(r.containing_namespace)
            }
            Node::NamespaceTypeRef(r) => {
                r.containing_namespace = self.copy_reference(r.containing_namespace);
                self.copy_owned_all(&mut r.attributes);
            }
            Node::NestedTypeRef(r) => self.rewrite_nested_type_ref(r),
            Node::SpecializedNestedTypeRef(r) => {
                self.rewrite_nested_type_ref(&mut r.nested);
                r.unspecialized_version = self.copy_reference(r.unspecialized_version);
            }
            Node::GenericTypeInstance(r) => {
                r.generic_type = self.copy_reference(r.generic_type);
                self.copy_references(&mut r.generic_arguments);
            }
            Node::GenericTypeParameterRef(r) => {
                let scratch = self.in_progress_type;
                r.defining_type = match scratch {
                    Some((original, copy)) if original == r.defining_type => copy,
                    _ => self.copy_reference(r.defining_type),
                };
            }
            Node::GenericMethodParameterRef(r) => {
                let scratch = self.in_progress_method;
                r.defining_method = match scratch {
                    Some((original, copy)) if original == r.defining_method => copy,
                    _ => self.copy_reference(r.defining_method),
                };
            }
            Node::ArrayType(r) => r.element_type = self.copy_reference(r.element_type),
            Node::PointerType(r) => r.target_type = self.copy_reference(r.target_type),
            Node::ManagedPointerType(r) => r.target_type = self.copy_reference(r.target_type),
            Node::ModifiedType(r) => {
                r.unmodified_type = self.copy_reference(r.unmodified_type);
                self.copy_modifiers(&mut r.custom_modifiers);
            }
            Node::FunctionPointerType(r) => {
                self.copy_parameter_types(&mut r.parameters);
                self.copy_parameter_types(&mut r.extra_argument_types);
                r.return_type = self.copy_reference(r.return_type);
                self.copy_modifiers(&mut r.return_value_custom_modifiers);
            }
            Node::FieldRef(r) => self.rewrite_field_ref(r),
            Node::SpecializedFieldRef(r) => {
                self.rewrite_field_ref(&mut r.field);
                r.unspecialized_version = self.copy_reference(r.unspecialized_version);
            }
            Node::MethodRef(r) => self.rewrite_method_ref(r),
            Node::SpecializedMethodRef(r) => {
                self.rewrite_method_ref(&mut r.method);
                r.unspecialized_version = self.copy_reference(r.unspecialized_version);
            }
            Node::GenericMethodInstance(r) => {
                self.rewrite_method_ref(&mut r.method);
                r.generic_method = self.copy_reference(r.generic_method);
                self.copy_references(&mut r.generic_arguments);
            }
            other => unreachable!("{} is not a reference", other.kind()),
        }
    }

    /// Target of a copied assembly reference: the clone of the resolved
    /// assembly if it was copied, else whatever the host resolves the
    /// identity to, else the original target unchanged.
    fn resolve_assembly(&self, r: &AssemblyRef) -> Option<NodeId> {
        if let Some(copy) = r.resolved_assembly.and_then(|a| self.cache.get(a)) {
            return Some(copy);
        }
        if self.config.resolve_through_host {
            if let Some(found) = self.host.find_assembly(&*self.graph, &r.identity) {
                return Some(self.existing_copy(found));
            }
        }
        r.resolved_assembly
    }

    fn rewrite_nested_type_ref(&mut self, r: &mut NestedTypeRef) {
        r.containing_type = self.copy_reference(r.containing_type);
        self.copy_owned_all(&mut r.attributes);
    }

    fn rewrite_field_ref(&mut self, r: &mut FieldRef) {
        r.containing_type = self.copy_reference(r.containing_type);
        r.ty = self.copy_reference(r.ty);
        self.copy_modifiers(&mut r.custom_modifiers);
        self.copy_owned_all(&mut r.attributes);
    }

    fn rewrite_method_ref(&mut self, r: &mut MethodRef) {
        r.containing_type = self.copy_reference(r.containing_type);
        self.copy_parameter_types(&mut r.parameters);
        self.copy_parameter_types(&mut r.extra_parameters);
        r.return_type = self.copy_reference(r.return_type);
        self.copy_modifiers(&mut r.return_value_custom_modifiers);
        self.copy_owned_all(&mut r.attributes);
    }
}
