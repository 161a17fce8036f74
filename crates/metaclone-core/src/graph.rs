//! MetadataGraph: the arena holding every node of a metadata model.
//!
//! [`MetadataGraph`] owns all nodes in one `Vec` addressed by [`NodeId`] and
//! the [`NameTable`] their names are interned in. Originals and copies live
//! side by side; a node's identity is its slot.
//!
//! The builder methods keep both directions of containment consistent: adding
//! a field pushes it onto its type's field list *and* points the field's
//! back-edge at the type, and adding a named type appends it to the owning
//! module's type table. Raw [`add`](MetadataGraph::add) is available for
//! nodes the builder does not cover.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::attribute::{CustomAttribute, MetadataConstant};
use crate::definition::{
    AssemblyDef, EventDef, FieldData, FieldDef, GenericMethodParameterDef, GenericParameterData,
    GenericTypeParameterDef, GlobalFieldDef, GlobalMethodDef, LocalDef, MethodBodyDef, MethodData,
    MethodDef, ModuleData, ModuleDef, NamespaceData, NamespaceTypeDef, NestedNamespaceDef,
    NestedTypeDef, ParameterDef, PropertyDef, RootNamespaceDef, TypeData,
};
use crate::error::CoreError;
use crate::id::{Name, NodeId};
use crate::kind::NodeKind;
use crate::names::NameTable;
use crate::node::Node;
use crate::reference::{
    ArrayTypeRef, AssemblyRef, FieldRef, GenericTypeInstanceRef, MethodRef, NamespaceTypeRef,
    NestedNamespaceRef, NestedTypeRef, RootNamespaceRef,
};
use crate::types::{
    AssemblyIdentity, CallingConvention, ConstantValue, MethodFlags, ModuleKind, Operation,
    ParameterTypeInfo, Version, Visibility,
};

/// The metadata arena.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataGraph {
    nodes: Vec<Node>,
    /// Interned names of every node.
    pub names: NameTable,
}

impl MetadataGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        MetadataGraph {
            nodes: Vec::new(),
            names: NameTable::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Arena access
    // -----------------------------------------------------------------------

    /// Appends a node and returns its id.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.next_id();
        self.nodes.push(node);
        id
    }

    /// Returns the id the next [`add`](Self::add) will hand out.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u32)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Like [`get`](Self::get) but reports a missing node as an error.
    pub fn node(&self, id: NodeId) -> Result<&Node, CoreError> {
        self.get(id).ok_or(CoreError::NodeNotFound { id })
    }

    /// Kind of the node at `id`, if it exists.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Checks that every edge of every node names a node in the arena.
    ///
    /// Graphs built with the builder API always pass. Deserialized graphs
    /// should be validated before they are copied.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (from, node) in self.iter() {
            let dangling = node
                .edges()
                .into_iter()
                .find(|edge| self.get(edge.target).is_none());
            if let Some(edge) = dangling {
                return Err(CoreError::DanglingEdge {
                    from,
                    role: edge.role,
                    to: edge.target,
                });
            }
        }
        Ok(())
    }

    /// Interns a name.
    pub fn intern(&mut self, value: &str) -> Name {
        self.names.intern(value)
    }

    /// Resolves a name handle.
    pub fn resolve(&self, name: Name) -> &str {
        self.names.resolve(name)
    }

    /// The simple name of a node, or `""` for nameless kinds.
    pub fn name_of(&self, id: NodeId) -> &str {
        self.get(id)
            .and_then(Node::name)
            .map(|n| self.resolve(n))
            .unwrap_or("")
    }

    /// Short description used in log and panic messages.
    pub fn describe(&self, id: NodeId) -> String {
        match self.get(id) {
            Some(node) => match self.type_full_name(id) {
                Some(full) => format!("{} {} {}", node.kind(), full, id),
                None => format!("{} '{}' {}", node.kind(), self.name_of(id), id),
            },
            None => format!("missing node {}", id),
        }
    }

    fn expect_kind(
        &self,
        id: NodeId,
        accepts: fn(NodeKind) -> bool,
        expected: &'static str,
    ) -> Result<NodeKind, CoreError> {
        let found = self.node(id)?.kind();
        if accepts(found) {
            Ok(found)
        } else {
            Err(CoreError::KindMismatch {
                id,
                expected,
                found,
            })
        }
    }

    // -----------------------------------------------------------------------
    // Naming
    // -----------------------------------------------------------------------

    /// Dotted path of a namespace definition or reference. The root namespace
    /// has the empty path.
    pub fn namespace_path(&self, namespace: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = namespace;

        // Bounded by the arena size so a malformed cycle cannot spin forever.
        for _ in 0..=self.nodes.len() {
            match self.get(current) {
                Some(Node::NestedNamespace(n)) => {
                    parts.push(self.resolve(n.namespace.name));
                    current = n.containing_namespace;
                }
                Some(Node::NestedNamespaceRef(r)) => {
                    parts.push(self.resolve(r.name));
                    current = r.containing_namespace;
                }
                _ => break,
            }
        }

        parts.reverse();
        parts.join(".")
    }

    /// Fully qualified structural name of a named type definition or
    /// reference: `Namespace.Outer`1+Inner`. `None` for other kinds.
    pub fn type_full_name(&self, id: NodeId) -> Option<String> {
        self.type_full_name_bounded(id, self.nodes.len())
    }

    fn type_full_name_bounded(&self, id: NodeId, depth: usize) -> Option<String> {
        let node = self.get(id)?;
        let name = self.resolve(node.name()?);
        let mut full = match node.kind() {
            NodeKind::NamespaceType | NodeKind::NamespaceTypeRef => {
                let path = self.namespace_path(node.container()?);
                if path.is_empty() {
                    name.to_string()
                } else {
                    format!("{}.{}", path, name)
                }
            }
            NodeKind::NestedType | NodeKind::NestedTypeRef | NodeKind::SpecializedNestedTypeRef => {
                let parent = self.type_full_name_bounded(node.container()?, depth.checked_sub(1)?)?;
                format!("{}+{}", parent, name)
            }
            _ => return None,
        };
        let arity = node.generic_parameter_count();
        if arity > 0 {
            full.push_str(&format!("`{}", arity));
        }
        Some(full)
    }

    /// Finds the module or assembly a namespace belongs to.
    pub fn unit_of_namespace(&self, namespace: NodeId) -> Option<NodeId> {
        let mut current = namespace;
        for _ in 0..=self.nodes.len() {
            match self.get(current)? {
                Node::RootNamespace(n) => return Some(n.unit),
                Node::NestedNamespace(n) => current = n.containing_namespace,
                _ => return None,
            }
        }
        None
    }

    /// Finds the module or assembly a named type definition belongs to.
    pub fn unit_of_type(&self, ty: NodeId) -> Option<NodeId> {
        let mut current = ty;
        for _ in 0..=self.nodes.len() {
            match self.get(current)? {
                Node::NamespaceType(t) => return self.unit_of_namespace(t.containing_namespace),
                Node::NestedType(t) => current = t.containing_type,
                _ => return None,
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Units and namespaces
    // -----------------------------------------------------------------------

    fn module_data(name: Name, containing_assembly: Option<NodeId>, namespace_root: NodeId) -> ModuleData {
        ModuleData {
            name,
            location: String::new(),
            kind: ModuleKind::DynamicallyLinkedLibrary,
            target_runtime_version: String::new(),
            persistent_identifier: [0; 16],
            il_only: true,
            requires_32_bit: false,
            containing_assembly,
            namespace_root,
            global_type: None,
            all_types: Vec::new(),
            module_attributes: Vec::new(),
            assembly_references: Vec::new(),
            module_references: Vec::new(),
            entry_point: None,
            win32_resources: Vec::new(),
        }
    }

    /// Adds an assembly together with its root namespace.
    pub fn add_assembly(&mut self, name: &str, version: Version) -> NodeId {
        let name = self.intern(name);
        let assembly = self.next_id();
        let root = NodeId(assembly.0 + 1);

        self.add(Node::Assembly(AssemblyDef {
            module: Self::module_data(name, Some(assembly), root),
            culture: Name::EMPTY,
            version,
            public_key: Vec::new(),
            is_retargetable: false,
            contains_foreign_types: false,
            assembly_attributes: Vec::new(),
            security_attributes: Vec::new(),
            exported_types: Vec::new(),
            files: Vec::new(),
            resources: Vec::new(),
            member_modules: Vec::new(),
        }));
        self.add(Node::RootNamespace(RootNamespaceDef {
            namespace: NamespaceData {
                name: Name::EMPTY,
                ..NamespaceData::default()
            },
            unit: assembly,
        }));
        assembly
    }

    /// Adds a member module to an assembly, with its own root namespace.
    pub fn add_module(&mut self, assembly: NodeId, name: &str) -> Result<NodeId, CoreError> {
        self.expect_kind(assembly, |k| k == NodeKind::Assembly, "assembly")?;
        let name = self.intern(name);
        let module = self.next_id();
        let root = NodeId(module.0 + 1);

        self.add(Node::Module(ModuleDef {
            module: Self::module_data(name, Some(assembly), root),
        }));
        self.add(Node::RootNamespace(RootNamespaceDef {
            namespace: NamespaceData {
                name: Name::EMPTY,
                ..NamespaceData::default()
            },
            unit: module,
        }));
        if let Some(Node::Assembly(a)) = self.get_mut(assembly) {
            a.member_modules.push(module);
        }
        Ok(module)
    }

    /// Root namespace of a module or assembly.
    pub fn root_namespace(&self, unit: NodeId) -> Result<NodeId, CoreError> {
        self.expect_kind(unit, |k| matches!(k, NodeKind::Assembly | NodeKind::Module), "module")?;
        Ok(self[unit]
            .module_data()
            .map(|m| m.namespace_root)
            .unwrap_or(unit))
    }

    /// Adds a nested namespace under `parent` (a root or nested namespace).
    pub fn add_namespace(&mut self, parent: NodeId, name: &str) -> Result<NodeId, CoreError> {
        self.expect_kind(
            parent,
            |k| matches!(k, NodeKind::RootNamespace | NodeKind::NestedNamespace),
            "namespace",
        )?;
        let name = self.intern(name);
        let id = self.add(Node::NestedNamespace(NestedNamespaceDef {
            namespace: NamespaceData {
                name,
                ..NamespaceData::default()
            },
            containing_namespace: parent,
        }));
        self.push_namespace_member(parent, id);
        Ok(id)
    }

    fn push_namespace_member(&mut self, namespace: NodeId, member: NodeId) {
        if let Some(data) = self.get_mut(namespace).and_then(Node::namespace_data_mut) {
            data.members.push(member);
        }
    }

    fn push_to_type_table(&mut self, unit: Option<NodeId>, ty: NodeId) {
        if let Some(module) = unit.and_then(|u| self.get_mut(u)).and_then(Node::module_data_mut) {
            module.all_types.push(ty);
        }
    }

    // -----------------------------------------------------------------------
    // Types
    // -----------------------------------------------------------------------

    /// Adds a public class to a namespace and the owning module's type table.
    pub fn add_namespace_type(&mut self, namespace: NodeId, name: &str) -> Result<NodeId, CoreError> {
        self.expect_kind(
            namespace,
            |k| matches!(k, NodeKind::RootNamespace | NodeKind::NestedNamespace),
            "namespace",
        )?;
        let name = self.intern(name);
        let id = self.add(Node::NamespaceType(NamespaceTypeDef {
            ty: TypeData {
                name,
                ..TypeData::default()
            },
            containing_namespace: namespace,
            is_public: true,
            is_foreign: false,
        }));
        self.push_namespace_member(namespace, id);
        let unit = self.unit_of_namespace(namespace);
        self.push_to_type_table(unit, id);
        Ok(id)
    }

    /// Adds a public nested type to a type definition.
    pub fn add_nested_type(&mut self, containing_type: NodeId, name: &str) -> Result<NodeId, CoreError> {
        self.expect_kind(containing_type, NodeKind::is_named_type_definition, "type definition")?;
        let name = self.intern(name);
        let id = self.add(Node::NestedType(NestedTypeDef {
            ty: TypeData {
                name,
                ..TypeData::default()
            },
            containing_type,
            visibility: Visibility::Public,
        }));
        if let Some(t) = self.get_mut(containing_type).and_then(Node::type_data_mut) {
            t.nested_types.push(id);
        }
        let unit = self.unit_of_type(containing_type);
        self.push_to_type_table(unit, id);
        Ok(id)
    }

    /// Adds a generic parameter to a type definition.
    pub fn add_generic_type_parameter(&mut self, ty: NodeId, name: &str) -> Result<NodeId, CoreError> {
        self.expect_kind(ty, NodeKind::is_named_type_definition, "type definition")?;
        let name = self.intern(name);
        let index = self[ty]
            .type_data()
            .map(|t| t.generic_parameters.len() as u16)
            .unwrap_or(0);
        let id = self.add(Node::GenericTypeParameter(GenericTypeParameterDef {
            parameter: GenericParameterData {
                name,
                index,
                ..GenericParameterData::default()
            },
            defining_type: ty,
        }));
        if let Some(t) = self.get_mut(ty).and_then(Node::type_data_mut) {
            t.generic_parameters.push(id);
        }
        Ok(id)
    }

    /// Makes `ty` a `struct` (value type).
    pub fn set_value_type(&mut self, ty: NodeId) -> Result<(), CoreError> {
        self.expect_kind(ty, NodeKind::is_named_type_definition, "type definition")?;
        if let Some(t) = self.get_mut(ty).and_then(Node::type_data_mut) {
            t.flags.is_value_type = true;
            t.flags.is_sealed = true;
        }
        Ok(())
    }

    /// Appends a base class reference to a type definition.
    pub fn add_base_class(&mut self, ty: NodeId, base: NodeId) -> Result<(), CoreError> {
        self.expect_kind(ty, NodeKind::is_named_type_definition, "type definition")?;
        if let Some(t) = self.get_mut(ty).and_then(Node::type_data_mut) {
            t.base_classes.push(base);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Members
    // -----------------------------------------------------------------------

    fn field_data(name: Name, containing_type: NodeId, ty: NodeId) -> FieldData {
        FieldData {
            name,
            containing_type,
            ty,
            custom_modifiers: Vec::new(),
            visibility: Visibility::Public,
            is_static: false,
            is_read_only: false,
            is_compile_time_constant: false,
            is_not_serialized: false,
            is_special_name: false,
            is_runtime_special: false,
            compile_time_value: None,
            marshalling_information: None,
            offset: None,
            sequence_number: 0,
            attributes: Vec::new(),
        }
    }

    fn method_data(name: Name, containing_type: NodeId, return_type: NodeId) -> MethodData {
        MethodData {
            name,
            containing_type,
            visibility: Visibility::Public,
            flags: MethodFlags::default(),
            calling_convention: CallingConvention {
                has_this: true,
                ..CallingConvention::default()
            },
            generic_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type,
            return_value_is_by_ref: false,
            return_value_custom_modifiers: Vec::new(),
            return_value_attributes: Vec::new(),
            return_value_marshalling: None,
            body: None,
            platform_invoke: None,
            security_attributes: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Adds a public instance field of type `field_type` to a type definition.
    pub fn add_field(&mut self, ty: NodeId, name: &str, field_type: NodeId) -> Result<NodeId, CoreError> {
        self.expect_kind(ty, NodeKind::is_named_type_definition, "type definition")?;
        let name = self.intern(name);
        let sequence = self[ty].type_data().map(|t| t.fields.len() as u32).unwrap_or(0);
        let mut field = Self::field_data(name, ty, field_type);
        field.sequence_number = sequence;
        let id = self.add(Node::Field(FieldDef { field }));
        if let Some(t) = self.get_mut(ty).and_then(Node::type_data_mut) {
            t.fields.push(id);
        }
        Ok(id)
    }

    /// Adds a public instance method with no parameters to a type definition.
    pub fn add_method(&mut self, ty: NodeId, name: &str, return_type: NodeId) -> Result<NodeId, CoreError> {
        self.expect_kind(ty, NodeKind::is_named_type_definition, "type definition")?;
        let name = self.intern(name);
        let id = self.add(Node::Method(MethodDef {
            method: Self::method_data(name, ty, return_type),
        }));
        if let Some(t) = self.get_mut(ty).and_then(Node::type_data_mut) {
            t.methods.push(id);
        }
        Ok(id)
    }

    /// Adds a generic parameter to a method or global method.
    pub fn add_generic_method_parameter(&mut self, method: NodeId, name: &str) -> Result<NodeId, CoreError> {
        self.expect_kind(
            method,
            |k| matches!(k, NodeKind::Method | NodeKind::GlobalMethod),
            "method definition",
        )?;
        let name = self.intern(name);
        let index = self[method]
            .method_data()
            .map(|m| m.generic_parameters.len() as u16)
            .unwrap_or(0);
        let id = self.add(Node::GenericMethodParameter(GenericMethodParameterDef {
            parameter: GenericParameterData {
                name,
                index,
                ..GenericParameterData::default()
            },
            defining_method: method,
        }));
        if let Some(m) = self.get_mut(method).and_then(Node::method_data_mut) {
            m.generic_parameters.push(id);
            m.calling_convention.is_generic = true;
        }
        Ok(id)
    }

    /// Adds a parameter to a method, global method or indexer property.
    pub fn add_parameter(&mut self, signature: NodeId, name: &str, ty: NodeId) -> Result<NodeId, CoreError> {
        self.expect_kind(
            signature,
            |k| matches!(k, NodeKind::Method | NodeKind::GlobalMethod | NodeKind::Property),
            "method or property definition",
        )?;
        let name = self.intern(name);
        let index = match &self[signature] {
            Node::Property(p) => p.parameters.len(),
            node => node.method_data().map(|m| m.parameters.len()).unwrap_or(0),
        } as u16;
        let id = self.add(Node::Parameter(ParameterDef {
            name,
            index,
            containing_signature: signature,
            ty,
            custom_modifiers: Vec::new(),
            is_by_reference: false,
            is_in: false,
            is_out: false,
            is_optional: false,
            is_param_array: false,
            default_value: None,
            marshalling_information: None,
            attributes: Vec::new(),
        }));
        match self.get_mut(signature) {
            Some(Node::Property(p)) => p.parameters.push(id),
            Some(node) => {
                if let Some(m) = node.method_data_mut() {
                    m.parameters.push(id);
                }
            }
            None => {}
        }
        Ok(id)
    }

    /// Adds a property with the given accessor methods of the same type.
    pub fn add_property(
        &mut self,
        ty: NodeId,
        name: &str,
        property_type: NodeId,
        getter: Option<NodeId>,
        setter: Option<NodeId>,
    ) -> Result<NodeId, CoreError> {
        self.expect_kind(ty, NodeKind::is_named_type_definition, "type definition")?;
        let name = self.intern(name);
        let accessors = getter.iter().chain(setter.iter()).copied().collect();
        let id = self.add(Node::Property(PropertyDef {
            name,
            containing_type: ty,
            ty: property_type,
            calling_convention: CallingConvention {
                has_this: true,
                ..CallingConvention::default()
            },
            return_value_custom_modifiers: Vec::new(),
            is_special_name: false,
            is_runtime_special: false,
            parameters: Vec::new(),
            getter,
            setter,
            accessors,
            default_value: None,
            attributes: Vec::new(),
        }));
        if let Some(t) = self.get_mut(ty).and_then(Node::type_data_mut) {
            t.properties.push(id);
        }
        Ok(id)
    }

    /// Adds an event with the given accessor methods of the same type.
    pub fn add_event(
        &mut self,
        ty: NodeId,
        name: &str,
        event_type: NodeId,
        adder: Option<NodeId>,
        remover: Option<NodeId>,
    ) -> Result<NodeId, CoreError> {
        self.expect_kind(ty, NodeKind::is_named_type_definition, "type definition")?;
        let name = self.intern(name);
        let accessors = adder.iter().chain(remover.iter()).copied().collect();
        let id = self.add(Node::Event(EventDef {
            name,
            containing_type: ty,
            ty: event_type,
            is_special_name: false,
            is_runtime_special: false,
            adder,
            remover,
            caller: None,
            accessors,
            attributes: Vec::new(),
        }));
        if let Some(t) = self.get_mut(ty).and_then(Node::type_data_mut) {
            t.events.push(id);
        }
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Bodies
    // -----------------------------------------------------------------------

    /// Gives a method a body with the given operations, replacing any
    /// existing body link.
    pub fn set_method_body(&mut self, method: NodeId, operations: Vec<Operation>) -> Result<NodeId, CoreError> {
        self.expect_kind(
            method,
            |k| matches!(k, NodeKind::Method | NodeKind::GlobalMethod),
            "method definition",
        )?;
        let id = self.add(Node::MethodBody(MethodBodyDef {
            method_definition: method,
            max_stack: 8,
            locals_are_zero_initialized: true,
            locals: Vec::new(),
            operations,
            exception_handlers: Vec::new(),
            private_helper_types: Vec::new(),
        }));
        if let Some(m) = self.get_mut(method).and_then(Node::method_data_mut) {
            m.body = Some(id);
        }
        Ok(id)
    }

    /// Adds a local to a method body.
    pub fn add_local(&mut self, body: NodeId, name: &str, ty: NodeId) -> Result<NodeId, CoreError> {
        let method = match self.node(body)? {
            Node::MethodBody(b) => b.method_definition,
            other => {
                return Err(CoreError::KindMismatch {
                    id: body,
                    expected: "method body",
                    found: other.kind(),
                })
            }
        };
        let name = self.intern(name);
        let id = self.add(Node::Local(LocalDef {
            name,
            method_definition: method,
            ty,
            custom_modifiers: Vec::new(),
            is_pinned: false,
            is_reference: false,
        }));
        if let Some(Node::MethodBody(b)) = self.get_mut(body) {
            b.locals.push(id);
        }
        Ok(id)
    }

    /// Adds a compiler-generated helper type to a method body. The helper is
    /// a private nested type of the method's type that the type itself does
    /// not list; only the body and the module's type table do.
    pub fn add_private_helper_type(&mut self, body: NodeId, name: &str) -> Result<NodeId, CoreError> {
        let method = match self.node(body)? {
            Node::MethodBody(b) => b.method_definition,
            other => {
                return Err(CoreError::KindMismatch {
                    id: body,
                    expected: "method body",
                    found: other.kind(),
                })
            }
        };
        let containing_type = self
            .node(method)?
            .method_data()
            .map(|m| m.containing_type)
            .ok_or(CoreError::KindMismatch {
                id: method,
                expected: "method definition",
                found: self[method].kind(),
            })?;
        let name = self.intern(name);
        let id = self.add(Node::NestedType(NestedTypeDef {
            ty: TypeData {
                name,
                ..TypeData::default()
            },
            containing_type,
            visibility: Visibility::Private,
        }));
        if let Some(Node::MethodBody(b)) = self.get_mut(body) {
            b.private_helper_types.push(id);
        }
        let unit = self.unit_of_type(containing_type);
        self.push_to_type_table(unit, id);
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Attributes and expressions
    // -----------------------------------------------------------------------

    /// Adds a metadata constant expression.
    pub fn add_constant(&mut self, value: ConstantValue, ty: NodeId) -> NodeId {
        self.add(Node::Constant(MetadataConstant { value, ty }))
    }

    /// Attaches a custom attribute to a definition's attribute list.
    pub fn add_custom_attribute(
        &mut self,
        target: NodeId,
        constructor: NodeId,
        arguments: Vec<NodeId>,
    ) -> Result<NodeId, CoreError> {
        let found = self.node(target)?.kind();
        let id = self.next_id();
        let list = match self.get_mut(target) {
            Some(Node::Assembly(a)) => &mut a.assembly_attributes,
            Some(Node::Module(m)) => &mut m.module.module_attributes,
            Some(Node::NamespaceType(t)) => &mut t.ty.attributes,
            Some(Node::NestedType(t)) => &mut t.ty.attributes,
            Some(Node::Field(f)) => &mut f.field.attributes,
            Some(Node::GlobalField(f)) => &mut f.field.attributes,
            Some(Node::Method(m)) => &mut m.method.attributes,
            Some(Node::GlobalMethod(m)) => &mut m.method.attributes,
            Some(Node::Property(p)) => &mut p.attributes,
            Some(Node::Event(e)) => &mut e.attributes,
            Some(Node::Parameter(p)) => &mut p.attributes,
            Some(Node::GenericTypeParameter(p)) => &mut p.parameter.attributes,
            Some(Node::GenericMethodParameter(p)) => &mut p.parameter.attributes,
            _ => {
                return Err(CoreError::KindMismatch {
                    id: target,
                    expected: "attributable definition",
                    found,
                })
            }
        };
        list.push(id);
        self.add(Node::CustomAttribute(CustomAttribute {
            constructor,
            arguments,
            named_arguments: Vec::new(),
        }));
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Global members
    // -----------------------------------------------------------------------

    /// Creates the `<Module>` type of a module or assembly. The type is not
    /// listed in any namespace but heads the module's type table.
    pub fn set_global_type(&mut self, unit: NodeId) -> Result<NodeId, CoreError> {
        let root = self.root_namespace(unit)?;
        if let Some(existing) = self[unit].module_data().and_then(|m| m.global_type) {
            return Ok(existing);
        }
        let name = self.intern("<Module>");
        let id = self.add(Node::NamespaceType(NamespaceTypeDef {
            ty: TypeData {
                name,
                ..TypeData::default()
            },
            containing_namespace: root,
            is_public: false,
            is_foreign: false,
        }));
        if let Some(module) = self.get_mut(unit).and_then(Node::module_data_mut) {
            module.global_type = Some(id);
            module.all_types.insert(0, id);
        }
        Ok(id)
    }

    /// Adds a free-standing static field, listed both in the root namespace
    /// and in the `<Module>` type.
    pub fn add_global_field(&mut self, unit: NodeId, name: &str, ty: NodeId) -> Result<NodeId, CoreError> {
        let global_type = self.set_global_type(unit)?;
        let root = self.root_namespace(unit)?;
        let name = self.intern(name);
        let mut field = Self::field_data(name, global_type, ty);
        field.is_static = true;
        let id = self.add(Node::GlobalField(GlobalFieldDef {
            field,
            containing_namespace: root,
        }));
        self.push_namespace_member(root, id);
        if let Some(t) = self.get_mut(global_type).and_then(Node::type_data_mut) {
            t.fields.push(id);
        }
        Ok(id)
    }

    /// Adds a free-standing static method, listed both in the root namespace
    /// and in the `<Module>` type.
    pub fn add_global_method(&mut self, unit: NodeId, name: &str, return_type: NodeId) -> Result<NodeId, CoreError> {
        let global_type = self.set_global_type(unit)?;
        let root = self.root_namespace(unit)?;
        let name = self.intern(name);
        let mut method = Self::method_data(name, global_type, return_type);
        method.flags.is_static = true;
        method.calling_convention.has_this = false;
        let id = self.add(Node::GlobalMethod(GlobalMethodDef {
            method,
            containing_namespace: root,
        }));
        self.push_namespace_member(root, id);
        if let Some(t) = self.get_mut(global_type).and_then(Node::type_data_mut) {
            t.methods.push(id);
        }
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // References
    // -----------------------------------------------------------------------

    /// Adds an assembly reference and records it on the referencing unit.
    pub fn add_assembly_ref(&mut self, unit: NodeId, name: &str, version: Version) -> Result<NodeId, CoreError> {
        self.expect_kind(unit, |k| matches!(k, NodeKind::Assembly | NodeKind::Module), "module")?;
        let name = self.intern(name);
        let id = self.add(Node::AssemblyRef(AssemblyRef {
            identity: AssemblyIdentity {
                name,
                version,
                ..AssemblyIdentity::default()
            },
            is_retargetable: false,
            resolved_assembly: None,
            attributes: Vec::new(),
        }));
        if let Some(module) = self.get_mut(unit).and_then(Node::module_data_mut) {
            module.assembly_references.push(id);
        }
        Ok(id)
    }

    /// Adds a reference to a top-level type `namespace.name` in `unit`
    /// (a unit reference or definition). Namespace reference nodes are
    /// created fresh for every call.
    pub fn add_namespace_type_ref(&mut self, unit: NodeId, namespace: &str, name: &str) -> Result<NodeId, CoreError> {
        self.expect_kind(unit, NodeKind::is_unit_reference, "unit reference")?;
        let mut containing = self.add(Node::RootNamespaceRef(RootNamespaceRef { unit }));
        for part in namespace.split('.').filter(|p| !p.is_empty()) {
            let part = self.intern(part);
            containing = self.add(Node::NestedNamespaceRef(NestedNamespaceRef {
                name: part,
                containing_namespace: containing,
            }));
        }
        let name = self.intern(name);
        Ok(self.add(Node::NamespaceTypeRef(NamespaceTypeRef {
            name,
            containing_namespace: containing,
            generic_parameter_count: 0,
            is_value_type: false,
            mangle_name: false,
            attributes: Vec::new(),
        })))
    }

    /// Adds a reference to a nested type of `containing_type`.
    pub fn add_nested_type_ref(&mut self, containing_type: NodeId, name: &str) -> Result<NodeId, CoreError> {
        self.expect_kind(containing_type, NodeKind::is_type_reference, "type reference")?;
        let name = self.intern(name);
        Ok(self.add(Node::NestedTypeRef(NestedTypeRef {
            name,
            containing_type,
            generic_parameter_count: 0,
            is_value_type: false,
            mangle_name: false,
            attributes: Vec::new(),
        })))
    }

    /// Adds an instance method reference with positional parameter types.
    pub fn add_method_ref(
        &mut self,
        containing_type: NodeId,
        name: &str,
        parameter_types: &[NodeId],
        return_type: NodeId,
    ) -> Result<NodeId, CoreError> {
        self.expect_kind(containing_type, NodeKind::is_type_reference, "type reference")?;
        let name = self.intern(name);
        let parameters = parameter_types
            .iter()
            .enumerate()
            .map(|(i, &ty)| ParameterTypeInfo {
                index: i as u16,
                ty,
                is_by_reference: false,
                custom_modifiers: Vec::new(),
            })
            .collect();
        Ok(self.add(Node::MethodRef(MethodRef {
            name,
            containing_type,
            generic_parameter_count: 0,
            calling_convention: CallingConvention {
                has_this: true,
                ..CallingConvention::default()
            },
            parameters,
            extra_parameters: Vec::new(),
            return_type,
            returns_by_reference: false,
            return_value_custom_modifiers: Vec::new(),
            attributes: Vec::new(),
        })))
    }

    /// Adds an instance field reference.
    pub fn add_field_ref(&mut self, containing_type: NodeId, name: &str, ty: NodeId) -> Result<NodeId, CoreError> {
        self.expect_kind(containing_type, NodeKind::is_type_reference, "type reference")?;
        let name = self.intern(name);
        Ok(self.add(Node::FieldRef(FieldRef {
            name,
            containing_type,
            ty,
            custom_modifiers: Vec::new(),
            is_static: false,
            attributes: Vec::new(),
        })))
    }

    /// Adds a single-dimensional zero-based array of `element_type`.
    pub fn add_vector_type(&mut self, element_type: NodeId) -> NodeId {
        self.add(Node::ArrayType(ArrayTypeRef {
            element_type,
            rank: 1,
            is_vector: true,
            lower_bounds: Vec::new(),
            sizes: Vec::new(),
        }))
    }

    /// Adds an instantiation of a generic type.
    pub fn add_generic_type_instance(&mut self, generic_type: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.add(Node::GenericTypeInstance(GenericTypeInstanceRef {
            generic_type,
            generic_arguments: arguments,
            is_value_type: false,
        }))
    }
}

impl Index<NodeId> for MetadataGraph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for MetadataGraph {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
