//! Rewriting of unit, namespace, type, member and body definitions.

use std::collections::HashSet;

use tracing::debug;

use metaclone_core::definition::{FieldData, GenericParameterData, MethodData, ModuleData, TypeData};
use metaclone_core::{Node, NodeId, OperationValue};

use crate::copier::Copier;
use crate::order::TypeOrderPreserver;

impl<'g> Copier<'g> {
    pub(super) fn rewrite_definition(&mut self, copy: NodeId, node: &mut Node) {
        match node {
            Node::Assembly(a) => {
                self.rewrite_module(copy, &mut a.module);
                self.copy_owned_all(&mut a.assembly_attributes);
                self.copy_owned_all(&mut a.security_attributes);
                self.copy_children(&mut a.exported_types);
                self.copy_children(&mut a.files);
                self.copy_owned_all(&mut a.resources);
                self.list_fabricated_assembly_refs(&mut a.module);
                // Member modules rebuild their own type tables after the
                // manifest module's table is final.
                self.copy_children(&mut a.member_modules);
            }
            Node::Module(m) => self.rewrite_module(copy, &mut m.module),
            Node::RootNamespace(n) => {
                self.resolve_back(&mut n.unit);
                self.copy_children(&mut n.namespace.members);
                self.copy_owned_all(&mut n.namespace.attributes);
            }
            Node::NestedNamespace(n) => {
                self.resolve_back(&mut n.containing_namespace);
                self.copy_children(&mut n.namespace.members);
                self.copy_owned_all(&mut n.namespace.attributes);
            }
            Node::NamespaceType(t) => {
                self.flat_types.push(copy);
                self.resolve_back(&mut t.containing_namespace);
                self.rewrite_type(&mut t.ty);
            }
            Node::NestedType(t) => {
                self.flat_types.push(copy);
                self.resolve_back(&mut t.containing_type);
                self.rewrite_type(&mut t.ty);
            }
            Node::GenericTypeParameter(p) => {
                self.resolve_back(&mut p.defining_type);
                self.rewrite_generic_parameter(&mut p.parameter);
            }
            Node::GenericMethodParameter(p) => {
                self.resolve_back(&mut p.defining_method);
                self.rewrite_generic_parameter(&mut p.parameter);
            }
            Node::Field(f) => self.rewrite_field(&mut f.field),
            Node::GlobalField(f) => {
                self.resolve_back(&mut f.containing_namespace);
                self.rewrite_field(&mut f.field);
            }
            Node::Method(m) => self.rewrite_method(&mut m.method),
            Node::GlobalMethod(m) => {
                self.resolve_back(&mut m.containing_namespace);
                self.rewrite_method(&mut m.method);
            }
            Node::Property(p) => {
                self.resolve_back(&mut p.containing_type);
                p.ty = self.copy_reference(p.ty);
                self.copy_modifiers(&mut p.return_value_custom_modifiers);
                self.copy_children(&mut p.parameters);
                // Accessors are methods of the same type and were collected
                // with it.
                p.getter = p.getter.map(|g| self.collected_copy(g));
                p.setter = p.setter.map(|s| self.collected_copy(s));
                for accessor in &mut p.accessors {
                    *accessor = self.collected_copy(*accessor);
                }
                self.copy_owned_opt(&mut p.default_value);
                self.copy_owned_all(&mut p.attributes);
            }
            Node::Event(e) => {
                self.resolve_back(&mut e.containing_type);
                e.ty = self.copy_reference(e.ty);
                self.copy_reference_opt(&mut e.adder);
                self.copy_reference_opt(&mut e.remover);
                self.copy_reference_opt(&mut e.caller);
                self.copy_references(&mut e.accessors);
                self.copy_owned_all(&mut e.attributes);
            }
            Node::Parameter(p) => {
                self.resolve_back(&mut p.containing_signature);
                p.ty = self.copy_reference(p.ty);
                self.copy_modifiers(&mut p.custom_modifiers);
                self.copy_owned_opt(&mut p.default_value);
                self.copy_marshalling(&mut p.marshalling_information);
                self.copy_owned_all(&mut p.attributes);
            }
            Node::MethodBody(b) => {
                self.resolve_back(&mut b.method_definition);
                // Locals first: operations refer to them by back-edge.
                self.copy_owned_all(&mut b.locals);
                for op in &mut b.operations {
                    match &mut op.value {
                        OperationValue::Local(id) | OperationValue::Parameter(id) => {
                            self.resolve_back(id)
                        }
                        OperationValue::Field(id)
                        | OperationValue::Method(id)
                        | OperationValue::Type(id)
                        | OperationValue::Signature(id) => *id = self.copy_reference(*id),
                        OperationValue::None
                        | OperationValue::Int(_)
                        | OperationValue::Float(_)
                        | OperationValue::String(_)
                        | OperationValue::Target(_)
                        | OperationValue::Targets(_) => {}
                    }
                }
                for handler in &mut b.exception_handlers {
                    self.copy_reference_opt(&mut handler.exception_type);
                }
                // Helper types were collected with the cone, or with the
                // body when it was copied on demand.
                self.copy_children(&mut b.private_helper_types);
            }
            Node::Local(l) => {
                self.resolve_back(&mut l.method_definition);
                l.ty = self.copy_reference(l.ty);
                self.copy_modifiers(&mut l.custom_modifiers);
            }
            other => unreachable!("{} is not a member definition", other.kind()),
        }
    }

    // -----------------------------------------------------------------------
    // Units
    // -----------------------------------------------------------------------

    /// Rewrites module data and rebuilds the module's type table from the
    /// named types copied while walking it.
    fn rewrite_module(&mut self, copy: NodeId, m: &mut ModuleData) {
        // The shallow copy still lists the original types.
        let original_types = std::mem::take(&mut m.all_types);
        self.flat_types.clear();

        self.resolve_back_opt(&mut m.containing_assembly);
        m.namespace_root = self.copy_child(m.namespace_root);
        if let Some(global) = m.global_type {
            m.global_type = Some(self.copy_child(global));
        }
        self.copy_owned_all(&mut m.module_attributes);
        self.copy_references(&mut m.assembly_references);
        self.copy_references(&mut m.module_references);
        self.copy_reference_opt(&mut m.entry_point);
        self.copy_owned_all(&mut m.win32_resources);
        self.list_fabricated_assembly_refs(m);

        m.all_types = self.finish_type_table(&original_types);
        debug!(
            module = %self.graph.resolve(m.name),
            clone = %copy,
            types = m.all_types.len(),
            "copied module"
        );
    }

    /// Appends the assembly references fabricated so far to the module's
    /// reference list, skipping identities the module already lists.
    fn list_fabricated_assembly_refs(&mut self, m: &mut ModuleData) {
        for reference in std::mem::take(&mut self.unlisted_assembly_refs) {
            let Some(Node::AssemblyRef(fabricated)) = self.graph.get(reference) else {
                continue;
            };
            let identity = &fabricated.identity;
            let listed = m.assembly_references.iter().any(|&existing| {
                matches!(
                    self.graph.get(existing),
                    Some(Node::AssemblyRef(r))
                        if r.identity.name == identity.name
                            && r.identity.culture == identity.culture
                            && r.identity.version == identity.version
                )
            });
            if !listed {
                m.assembly_references.push(reference);
            }
        }
    }

    /// Takes the flat type list, adds clones of original table entries that
    /// were copied earlier in the session but not reached by this walk, and
    /// restores the original order.
    fn finish_type_table(&mut self, original_types: &[NodeId]) -> Vec<NodeId> {
        let mut types = std::mem::take(&mut self.flat_types);
        let mut seen: HashSet<NodeId> = types.iter().copied().collect();
        for &original in original_types {
            if let Some(copy) = self.cache.get(original) {
                if self.rewritten.contains(&copy) && seen.insert(copy) {
                    types.push(copy);
                }
            }
        }
        if self.config.preserve_type_order {
            let order = TypeOrderPreserver::new(&*self.graph, original_types);
            order.sort(&*self.graph, &mut types);
        }
        types
    }

    // -----------------------------------------------------------------------
    // Types and members
    // -----------------------------------------------------------------------

    fn rewrite_type(&mut self, t: &mut TypeData) {
        self.copy_children(&mut t.generic_parameters);
        self.copy_references(&mut t.base_classes);
        self.copy_references(&mut t.interfaces);
        for imp in &mut t.explicit_implementation_overrides {
            self.resolve_back(&mut imp.containing_type);
            imp.implementing_method = self.copy_reference(imp.implementing_method);
            imp.implemented_method = self.copy_reference(imp.implemented_method);
        }
        self.copy_children(&mut t.fields);
        self.copy_children(&mut t.methods);
        self.copy_children(&mut t.properties);
        self.copy_children(&mut t.events);
        self.copy_children(&mut t.nested_types);
        self.copy_owned_all(&mut t.attributes);
        self.copy_owned_all(&mut t.security_attributes);
    }

    fn rewrite_generic_parameter(&mut self, p: &mut GenericParameterData) {
        self.copy_references(&mut p.constraints);
        self.copy_owned_all(&mut p.attributes);
    }

    fn rewrite_field(&mut self, f: &mut FieldData) {
        self.resolve_back(&mut f.containing_type);
        f.ty = self.copy_reference(f.ty);
        self.copy_modifiers(&mut f.custom_modifiers);
        self.copy_owned_opt(&mut f.compile_time_value);
        self.copy_marshalling(&mut f.marshalling_information);
        self.copy_owned_all(&mut f.attributes);
    }

    fn rewrite_method(&mut self, m: &mut MethodData) {
        self.resolve_back(&mut m.containing_type);
        self.copy_children(&mut m.generic_parameters);
        self.copy_children(&mut m.parameters);
        m.return_type = self.copy_reference(m.return_type);
        self.copy_modifiers(&mut m.return_value_custom_modifiers);
        self.copy_owned_all(&mut m.return_value_attributes);
        self.copy_marshalling(&mut m.return_value_marshalling);
        self.copy_owned_opt(&mut m.body);
        if let Some(pinvoke) = &mut m.platform_invoke {
            pinvoke.import_module = self.copy_reference(pinvoke.import_module);
        }
        self.copy_owned_all(&mut m.security_attributes);
        self.copy_owned_all(&mut m.attributes);
    }
}
