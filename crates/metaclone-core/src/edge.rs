//! Edge enumeration: the traversal hook of every node kind.
//!
//! [`Node::edges`] lists every outgoing edge of a node in field declaration
//! order together with its [`EdgeRole`]. The cone collector registers the
//! targets of [`EdgeRole::Child`] edges and looks through
//! [`EdgeRole::Owned`] ones for children underneath (helper types listed by
//! a method body). Structural comparisons walk all of them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::definition::{FieldData, GenericParameterData, MethodData, ModuleData, TypeData};
use crate::id::NodeId;
use crate::node::Node;
use crate::reference::{FieldRef, MethodRef, NestedTypeRef};
use crate::types::{CustomModifier, MarshallingInformation, OperationValue, ParameterTypeInfo};

/// How an edge relates its source to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeRole {
    /// Structural containment. Children are collected into the cone.
    Child,
    /// Owned sub-structure that is not collected: attributes, bodies, locals,
    /// metadata expressions, resources. It is copied on first use.
    Owned,
    /// Edge to an enclosing or sibling node that is resolved by lookup only.
    Back,
    /// Cross-reference to a definition or reference node.
    Reference,
}

/// One outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub role: EdgeRole,
    pub target: NodeId,
}

/// Inline capacity covers most members and references without spilling.
pub type EdgeList = SmallVec<[Edge; 8]>;

#[derive(Default)]
struct Collector {
    edges: EdgeList,
}

impl Collector {
    fn one(&mut self, role: EdgeRole, target: NodeId) {
        self.edges.push(Edge { role, target });
    }

    fn opt(&mut self, role: EdgeRole, target: Option<NodeId>) {
        if let Some(target) = target {
            self.one(role, target);
        }
    }

    fn all(&mut self, role: EdgeRole, targets: &[NodeId]) {
        self.edges
            .extend(targets.iter().map(|&target| Edge { role, target }));
    }

    fn modifiers(&mut self, modifiers: &[CustomModifier]) {
        for m in modifiers {
            self.one(EdgeRole::Reference, m.modifier);
        }
    }

    fn parameter_types(&mut self, parameters: &[ParameterTypeInfo]) {
        for p in parameters {
            self.one(EdgeRole::Reference, p.ty);
            self.modifiers(&p.custom_modifiers);
        }
    }

    fn marshalling(&mut self, info: Option<&MarshallingInformation>) {
        if let Some(info) = info {
            self.opt(EdgeRole::Reference, info.custom_marshaller);
            self.opt(EdgeRole::Reference, info.safe_array_user_defined_subtype);
        }
    }

    fn module(&mut self, m: &ModuleData) {
        self.opt(EdgeRole::Back, m.containing_assembly);
        self.one(EdgeRole::Child, m.namespace_root);
        self.opt(EdgeRole::Child, m.global_type);
        self.all(EdgeRole::Owned, &m.module_attributes);
        self.all(EdgeRole::Reference, &m.assembly_references);
        self.all(EdgeRole::Reference, &m.module_references);
        self.opt(EdgeRole::Reference, m.entry_point);
        self.all(EdgeRole::Owned, &m.win32_resources);
    }

    fn type_data(&mut self, t: &TypeData) {
        self.all(EdgeRole::Child, &t.generic_parameters);
        self.all(EdgeRole::Reference, &t.base_classes);
        self.all(EdgeRole::Reference, &t.interfaces);
        for imp in &t.explicit_implementation_overrides {
            self.one(EdgeRole::Back, imp.containing_type);
            self.one(EdgeRole::Reference, imp.implementing_method);
            self.one(EdgeRole::Reference, imp.implemented_method);
        }
        self.all(EdgeRole::Child, &t.fields);
        self.all(EdgeRole::Child, &t.methods);
        self.all(EdgeRole::Child, &t.properties);
        self.all(EdgeRole::Child, &t.events);
        self.all(EdgeRole::Child, &t.nested_types);
        self.all(EdgeRole::Owned, &t.attributes);
        self.all(EdgeRole::Owned, &t.security_attributes);
    }

    fn generic_parameter(&mut self, p: &GenericParameterData) {
        self.all(EdgeRole::Reference, &p.constraints);
        self.all(EdgeRole::Owned, &p.attributes);
    }

    fn field(&mut self, f: &FieldData) {
        self.one(EdgeRole::Back, f.containing_type);
        self.one(EdgeRole::Reference, f.ty);
        self.modifiers(&f.custom_modifiers);
        self.opt(EdgeRole::Owned, f.compile_time_value);
        self.marshalling(f.marshalling_information.as_ref());
        self.all(EdgeRole::Owned, &f.attributes);
    }

    fn method(&mut self, m: &MethodData) {
        self.one(EdgeRole::Back, m.containing_type);
        self.all(EdgeRole::Child, &m.generic_parameters);
        self.all(EdgeRole::Child, &m.parameters);
        self.one(EdgeRole::Reference, m.return_type);
        self.modifiers(&m.return_value_custom_modifiers);
        self.all(EdgeRole::Owned, &m.return_value_attributes);
        self.marshalling(m.return_value_marshalling.as_ref());
        self.opt(EdgeRole::Owned, m.body);
        if let Some(pinvoke) = &m.platform_invoke {
            self.one(EdgeRole::Reference, pinvoke.import_module);
        }
        self.all(EdgeRole::Owned, &m.security_attributes);
        self.all(EdgeRole::Owned, &m.attributes);
    }

    fn nested_type_ref(&mut self, r: &NestedTypeRef) {
        self.one(EdgeRole::Reference, r.containing_type);
        self.all(EdgeRole::Owned, &r.attributes);
    }

    fn field_ref(&mut self, r: &FieldRef) {
        self.one(EdgeRole::Reference, r.containing_type);
        self.one(EdgeRole::Reference, r.ty);
        self.modifiers(&r.custom_modifiers);
        self.all(EdgeRole::Owned, &r.attributes);
    }

    fn method_ref(&mut self, r: &MethodRef) {
        self.one(EdgeRole::Reference, r.containing_type);
        self.parameter_types(&r.parameters);
        self.parameter_types(&r.extra_parameters);
        self.one(EdgeRole::Reference, r.return_type);
        self.modifiers(&r.return_value_custom_modifiers);
        self.all(EdgeRole::Owned, &r.attributes);
    }
}

impl Node {
    /// Lists every outgoing edge in field declaration order.
    pub fn edges(&self) -> EdgeList {
        use EdgeRole::*;

        let mut c = Collector::default();
        match self {
            Node::Assembly(a) => {
                c.module(&a.module);
                c.all(Owned, &a.assembly_attributes);
                c.all(Owned, &a.security_attributes);
                c.all(Child, &a.exported_types);
                c.all(Child, &a.files);
                c.all(Owned, &a.resources);
                c.all(Child, &a.member_modules);
            }
            Node::Module(m) => c.module(&m.module),
            Node::RootNamespace(n) => {
                c.one(Back, n.unit);
                c.all(Child, &n.namespace.members);
                c.all(Owned, &n.namespace.attributes);
            }
            Node::NestedNamespace(n) => {
                c.one(Back, n.containing_namespace);
                c.all(Child, &n.namespace.members);
                c.all(Owned, &n.namespace.attributes);
            }
            Node::NamespaceType(t) => {
                c.one(Back, t.containing_namespace);
                c.type_data(&t.ty);
            }
            Node::NestedType(t) => {
                c.one(Back, t.containing_type);
                c.type_data(&t.ty);
            }
            Node::GenericTypeParameter(p) => {
                c.one(Back, p.defining_type);
                c.generic_parameter(&p.parameter);
            }
            Node::GenericMethodParameter(p) => {
                c.one(Back, p.defining_method);
                c.generic_parameter(&p.parameter);
            }
            Node::Field(f) => c.field(&f.field),
            Node::GlobalField(f) => {
                c.one(Back, f.containing_namespace);
                c.field(&f.field);
            }
            Node::Method(m) => c.method(&m.method),
            Node::GlobalMethod(m) => {
                c.one(Back, m.containing_namespace);
                c.method(&m.method);
            }
            Node::Property(p) => {
                c.one(Back, p.containing_type);
                c.one(Reference, p.ty);
                c.modifiers(&p.return_value_custom_modifiers);
                c.all(Child, &p.parameters);
                c.opt(Reference, p.getter);
                c.opt(Reference, p.setter);
                c.all(Reference, &p.accessors);
                c.opt(Owned, p.default_value);
                c.all(Owned, &p.attributes);
            }
            Node::Event(e) => {
                c.one(Back, e.containing_type);
                c.one(Reference, e.ty);
                c.opt(Reference, e.adder);
                c.opt(Reference, e.remover);
                c.opt(Reference, e.caller);
                c.all(Reference, &e.accessors);
                c.all(Owned, &e.attributes);
            }
            Node::Parameter(p) => {
                c.one(Back, p.containing_signature);
                c.one(Reference, p.ty);
                c.modifiers(&p.custom_modifiers);
                c.opt(Owned, p.default_value);
                c.marshalling(p.marshalling_information.as_ref());
                c.all(Owned, &p.attributes);
            }
            Node::MethodBody(b) => {
                c.one(Back, b.method_definition);
                c.all(Owned, &b.locals);
                for op in &b.operations {
                    match &op.value {
                        OperationValue::Local(id) | OperationValue::Parameter(id) => {
                            c.one(Back, *id)
                        }
                        OperationValue::Field(id)
                        | OperationValue::Method(id)
                        | OperationValue::Type(id)
                        | OperationValue::Signature(id) => c.one(Reference, *id),
                        OperationValue::None
                        | OperationValue::Int(_)
                        | OperationValue::Float(_)
                        | OperationValue::String(_)
                        | OperationValue::Target(_)
                        | OperationValue::Targets(_) => {}
                    }
                }
                for handler in &b.exception_handlers {
                    c.opt(Reference, handler.exception_type);
                }
                c.all(Child, &b.private_helper_types);
            }
            Node::Local(l) => {
                c.one(Back, l.method_definition);
                c.one(Reference, l.ty);
                c.modifiers(&l.custom_modifiers);
            }
            Node::CustomAttribute(a) => {
                c.one(Reference, a.constructor);
                c.all(Owned, &a.arguments);
                c.all(Owned, &a.named_arguments);
            }
            Node::SecurityAttribute(a) => c.all(Owned, &a.attributes),
            Node::Constant(k) => c.one(Reference, k.ty),
            Node::CreateArray(a) => {
                c.one(Reference, a.element_type);
                c.one(Reference, a.ty);
                c.all(Owned, &a.initializers);
            }
            Node::NamedArgument(a) => {
                c.one(Owned, a.argument_value);
                c.one(Reference, a.ty);
                c.opt(Back, a.resolved_definition);
            }
            Node::TypeOf(t) => {
                c.one(Reference, t.type_to_get);
                c.one(Reference, t.ty);
            }
            Node::NamespaceAlias(a) => {
                c.one(Back, a.containing_namespace);
                c.one(Reference, a.aliased_type);
                c.all(Child, &a.members);
                c.all(Owned, &a.attributes);
            }
            Node::NestedAlias(a) => {
                c.one(Back, a.containing_alias);
                c.one(Reference, a.aliased_type);
                c.all(Owned, &a.attributes);
            }
            Node::FileReference(f) => c.one(Back, f.containing_assembly),
            Node::ResourceReference(r) => {
                c.one(Reference, r.defining_assembly);
                c.opt(Back, r.external_file);
                c.all(Owned, &r.attributes);
            }
            Node::Win32Resource(_) => {}
            Node::AssemblyRef(r) => {
                c.opt(Back, r.resolved_assembly);
                c.all(Owned, &r.attributes);
            }
            Node::ModuleRef(r) => {
                c.opt(Reference, r.containing_assembly);
                c.opt(Back, r.resolved_module);
                c.all(Owned, &r.attributes);
            }
            Node::RootNamespaceRef(r) => c.one(Reference, r.unit),
            Node::NestedNamespaceRef(r) => c.one(Reference, r.containing_namespace),
            Node::NamespaceTypeRef(r) => {
                c.one(Reference, r.containing_namespace);
                c.all(Owned, &r.attributes);
            }
            Node::NestedTypeRef(r) => c.nested_type_ref(r),
            Node::SpecializedNestedTypeRef(r) => {
                c.nested_type_ref(&r.nested);
                c.one(Reference, r.unspecialized_version);
            }
            Node::GenericTypeInstance(r) => {
                c.one(Reference, r.generic_type);
                c.all(Reference, &r.generic_arguments);
            }
            Node::GenericTypeParameterRef(r) => c.one(Reference, r.defining_type),
            Node::GenericMethodParameterRef(r) => c.one(Reference, r.defining_method),
            Node::ArrayType(r) => c.one(Reference, r.element_type),
            Node::PointerType(r) => c.one(Reference, r.target_type),
            Node::ManagedPointerType(r) => c.one(Reference, r.target_type),
            Node::ModifiedType(r) => {
                c.one(Reference, r.unmodified_type);
                c.modifiers(&r.custom_modifiers);
            }
            Node::FunctionPointerType(r) => {
                c.parameter_types(&r.parameters);
                c.parameter_types(&r.extra_argument_types);
                c.one(Reference, r.return_type);
                c.modifiers(&r.return_value_custom_modifiers);
            }
            Node::FieldRef(r) => c.field_ref(r),
            Node::SpecializedFieldRef(r) => {
                c.field_ref(&r.field);
                c.one(Reference, r.unspecialized_version);
            }
            Node::MethodRef(r) => c.method_ref(r),
            Node::SpecializedMethodRef(r) => {
                c.method_ref(&r.method);
                c.one(Reference, r.unspecialized_version);
            }
            Node::GenericMethodInstance(r) => {
                c.method_ref(&r.method);
                c.one(Reference, r.generic_method);
                c.all(Reference, &r.generic_arguments);
            }
            Node::UnitSet(s) => c.all(Reference, &s.units),
            Node::UnitSetNamespace(n) => {
                c.one(Reference, n.unit_set);
                c.opt(Back, n.containing_namespace);
            }
        }
        c.edges
    }

    /// Structural children, in declaration order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        self.edges()
            .into_iter()
            .filter(|e| e.role == EdgeRole::Child)
            .map(|e| e.target)
    }
}
