//! The substitution facade.
//!
//! Every `substitute_*` operation freezes the cone, checks the argument's
//! kind, and returns the fully copied clone. Three preconditions apply:
//!
//! - **collected**: the argument must be part of a registered cone, or the
//!   call fails with [`CopyError::NotCollected`];
//! - **on demand**: the argument is owned sub-structure, cloned on first use;
//! - **reference**: the argument is copied with reference-position policy,
//!   so an out-of-cone definition yields a new reference node.
//!
//! [`Copier::substitute`] routes any node to the operation for its kind.

use tracing::debug;

use metaclone_core::{NodeId, NodeKind};

use crate::copier::Copier;
use crate::error::CopyError;

impl<'g> Copier<'g> {
    // -----------------------------------------------------------------------
    // Shared plumbing
    // -----------------------------------------------------------------------

    fn freeze(&mut self) {
        if !self.frozen {
            self.frozen = true;
            debug!(cached = self.cache.len(), "cone frozen");
        }
    }

    /// Freezes the cone and checks that `id` exists and `accepts` its kind.
    fn prepare(
        &mut self,
        id: NodeId,
        expected: &'static str,
        accepts: fn(NodeKind) -> bool,
    ) -> Result<NodeKind, CopyError> {
        self.freeze();
        let found = self.graph.kind(id).ok_or(CopyError::NodeNotFound { id })?;
        if accepts(found) {
            Ok(found)
        } else {
            Err(CopyError::KindMismatch {
                id,
                expected,
                found,
            })
        }
    }

    fn collected(
        &mut self,
        id: NodeId,
        expected: &'static str,
        accepts: fn(NodeKind) -> bool,
    ) -> Result<NodeId, CopyError> {
        let kind = self.prepare(id, expected, accepts)?;
        let copy = self
            .cache
            .get(id)
            .ok_or(CopyError::NotCollected { id, kind })?;
        self.deep_copy(copy);
        Ok(copy)
    }

    fn on_demand(
        &mut self,
        id: NodeId,
        expected: &'static str,
        accepts: fn(NodeKind) -> bool,
    ) -> Result<NodeId, CopyError> {
        self.prepare(id, expected, accepts)?;
        Ok(self.copy_owned(id))
    }

    fn reference(
        &mut self,
        id: NodeId,
        expected: &'static str,
        accepts: fn(NodeKind) -> bool,
    ) -> Result<NodeId, CopyError> {
        self.prepare(id, expected, accepts)?;
        let copy = self.copy_reference(id);
        // An in-cone definition resolves to its collected clone, which may
        // not have been rewritten yet. An uncached original is left alone.
        if self.cache.contains(copy) {
            self.deep_copy(copy);
        }
        Ok(copy)
    }

    // -----------------------------------------------------------------------
    // Units and namespaces
    // -----------------------------------------------------------------------

    /// Copies a collected assembly, its modules and everything it contains.
    pub fn substitute_assembly(&mut self, assembly: NodeId) -> Result<NodeId, CopyError> {
        self.collected(assembly, "assembly", |k| k == NodeKind::Assembly)
    }

    /// Copies a collected module. Assemblies are accepted as their manifest
    /// module.
    pub fn substitute_module(&mut self, module: NodeId) -> Result<NodeId, CopyError> {
        self.collected(module, "module", |k| {
            matches!(k, NodeKind::Module | NodeKind::Assembly)
        })
    }

    pub fn substitute_root_namespace(&mut self, namespace: NodeId) -> Result<NodeId, CopyError> {
        self.collected(namespace, "root namespace", |k| k == NodeKind::RootNamespace)
    }

    pub fn substitute_nested_namespace(&mut self, namespace: NodeId) -> Result<NodeId, CopyError> {
        self.collected(namespace, "nested namespace", |k| k == NodeKind::NestedNamespace)
    }

    pub fn substitute_namespace(&mut self, namespace: NodeId) -> Result<NodeId, CopyError> {
        self.collected(namespace, "namespace definition", |k| {
            matches!(k, NodeKind::RootNamespace | NodeKind::NestedNamespace)
        })
    }

    // -----------------------------------------------------------------------
    // Types
    // -----------------------------------------------------------------------

    pub fn substitute_namespace_type(&mut self, ty: NodeId) -> Result<NodeId, CopyError> {
        self.collected(ty, "namespace type", |k| k == NodeKind::NamespaceType)
    }

    pub fn substitute_nested_type(&mut self, ty: NodeId) -> Result<NodeId, CopyError> {
        self.collected(ty, "nested type", |k| k == NodeKind::NestedType)
    }

    /// Copies a collected namespace or nested type.
    pub fn substitute_type_definition(&mut self, ty: NodeId) -> Result<NodeId, CopyError> {
        self.collected(ty, "type definition", NodeKind::is_named_type_definition)
    }

    pub fn substitute_generic_type_parameter(&mut self, parameter: NodeId) -> Result<NodeId, CopyError> {
        self.collected(parameter, "generic type parameter", |k| {
            k == NodeKind::GenericTypeParameter
        })
    }

    pub fn substitute_generic_method_parameter(&mut self, parameter: NodeId) -> Result<NodeId, CopyError> {
        self.collected(parameter, "generic method parameter", |k| {
            k == NodeKind::GenericMethodParameter
        })
    }

    // -----------------------------------------------------------------------
    // Members
    // -----------------------------------------------------------------------

    /// Copies a collected field. Global fields are accepted too.
    pub fn substitute_field(&mut self, field: NodeId) -> Result<NodeId, CopyError> {
        self.collected(field, "field definition", |k| {
            matches!(k, NodeKind::Field | NodeKind::GlobalField)
        })
    }

    pub fn substitute_global_field(&mut self, field: NodeId) -> Result<NodeId, CopyError> {
        self.collected(field, "global field", |k| k == NodeKind::GlobalField)
    }

    /// Copies a collected method with its parameters and body. Global
    /// methods are accepted too.
    pub fn substitute_method(&mut self, method: NodeId) -> Result<NodeId, CopyError> {
        self.collected(method, "method definition", |k| {
            matches!(k, NodeKind::Method | NodeKind::GlobalMethod)
        })
    }

    pub fn substitute_global_method(&mut self, method: NodeId) -> Result<NodeId, CopyError> {
        self.collected(method, "global method", |k| k == NodeKind::GlobalMethod)
    }

    /// Copies a collected property. Its accessors must be in the cone.
    pub fn substitute_property(&mut self, property: NodeId) -> Result<NodeId, CopyError> {
        self.collected(property, "property definition", |k| k == NodeKind::Property)
    }

    pub fn substitute_event(&mut self, event: NodeId) -> Result<NodeId, CopyError> {
        self.collected(event, "event definition", |k| k == NodeKind::Event)
    }

    pub fn substitute_parameter(&mut self, parameter: NodeId) -> Result<NodeId, CopyError> {
        self.collected(parameter, "parameter definition", |k| k == NodeKind::Parameter)
    }

    pub fn substitute_namespace_alias(&mut self, alias: NodeId) -> Result<NodeId, CopyError> {
        self.collected(alias, "namespace alias", |k| k == NodeKind::NamespaceAlias)
    }

    pub fn substitute_nested_alias(&mut self, alias: NodeId) -> Result<NodeId, CopyError> {
        self.collected(alias, "nested alias", |k| k == NodeKind::NestedAlias)
    }

    // -----------------------------------------------------------------------
    // Owned sub-structure
    // -----------------------------------------------------------------------

    pub fn substitute_method_body(&mut self, body: NodeId) -> Result<NodeId, CopyError> {
        self.on_demand(body, "method body", |k| k == NodeKind::MethodBody)
    }

    pub fn substitute_local(&mut self, local: NodeId) -> Result<NodeId, CopyError> {
        self.on_demand(local, "local definition", |k| k == NodeKind::Local)
    }

    pub fn substitute_custom_attribute(&mut self, attribute: NodeId) -> Result<NodeId, CopyError> {
        self.on_demand(attribute, "custom attribute", |k| k == NodeKind::CustomAttribute)
    }

    pub fn substitute_security_attribute(&mut self, attribute: NodeId) -> Result<NodeId, CopyError> {
        self.on_demand(attribute, "security attribute", |k| {
            k == NodeKind::SecurityAttribute
        })
    }

    /// Copies a constant, array creation, named argument or typeof
    /// expression.
    pub fn substitute_metadata_expression(&mut self, expression: NodeId) -> Result<NodeId, CopyError> {
        self.on_demand(
            expression,
            "metadata expression",
            NodeKind::is_metadata_expression,
        )
    }

    pub fn substitute_file_reference(&mut self, file: NodeId) -> Result<NodeId, CopyError> {
        self.on_demand(file, "file reference", |k| k == NodeKind::FileReference)
    }

    pub fn substitute_resource_reference(&mut self, resource: NodeId) -> Result<NodeId, CopyError> {
        self.on_demand(resource, "resource reference", |k| {
            k == NodeKind::ResourceReference
        })
    }

    pub fn substitute_win32_resource(&mut self, resource: NodeId) -> Result<NodeId, CopyError> {
        self.on_demand(resource, "win32 resource", |k| k == NodeKind::Win32Resource)
    }

    // -----------------------------------------------------------------------
    // References
    // -----------------------------------------------------------------------

    /// Copies anything in type position: type references, named types and
    /// generic parameters.
    pub fn substitute_type_reference(&mut self, ty: NodeId) -> Result<NodeId, CopyError> {
        self.reference(ty, "type reference", NodeKind::is_type_reference)
    }

    pub fn substitute_method_reference(&mut self, method: NodeId) -> Result<NodeId, CopyError> {
        self.reference(method, "method reference", NodeKind::is_method_reference)
    }

    pub fn substitute_field_reference(&mut self, field: NodeId) -> Result<NodeId, CopyError> {
        self.reference(field, "field reference", NodeKind::is_field_reference)
    }

    pub fn substitute_assembly_reference(&mut self, assembly: NodeId) -> Result<NodeId, CopyError> {
        self.reference(assembly, "assembly reference", |k| {
            matches!(k, NodeKind::AssemblyRef | NodeKind::Assembly)
        })
    }

    pub fn substitute_module_reference(&mut self, module: NodeId) -> Result<NodeId, CopyError> {
        self.reference(module, "module reference", |k| {
            matches!(k, NodeKind::ModuleRef | NodeKind::Module | NodeKind::Assembly)
        })
    }

    pub fn substitute_unit_reference(&mut self, unit: NodeId) -> Result<NodeId, CopyError> {
        self.reference(unit, "unit reference", NodeKind::is_unit_reference)
    }

    pub fn substitute_namespace_reference(&mut self, namespace: NodeId) -> Result<NodeId, CopyError> {
        self.reference(namespace, "namespace reference", NodeKind::is_namespace_reference)
    }

    /// Unit sets cannot be copied.
    pub fn substitute_unit_set(&mut self, _unit_set: NodeId) -> Result<NodeId, CopyError> {
        self.freeze();
        Err(CopyError::Unsupported {
            kind: NodeKind::UnitSet,
        })
    }

    /// Unit set namespaces cannot be copied.
    pub fn substitute_unit_set_namespace(&mut self, _namespace: NodeId) -> Result<NodeId, CopyError> {
        self.freeze();
        Err(CopyError::Unsupported {
            kind: NodeKind::UnitSetNamespace,
        })
    }

    // -----------------------------------------------------------------------
    // Routing
    // -----------------------------------------------------------------------

    /// Copies `id` with the operation for its kind.
    pub fn substitute(&mut self, id: NodeId) -> Result<NodeId, CopyError> {
        self.freeze();
        let kind = self.graph.kind(id).ok_or(CopyError::NodeNotFound { id })?;
        match kind {
            NodeKind::Assembly => self.substitute_assembly(id),
            NodeKind::Module => self.substitute_module(id),
            NodeKind::RootNamespace => self.substitute_root_namespace(id),
            NodeKind::NestedNamespace => self.substitute_nested_namespace(id),
            NodeKind::NamespaceType => self.substitute_namespace_type(id),
            NodeKind::NestedType => self.substitute_nested_type(id),
            NodeKind::GenericTypeParameter => self.substitute_generic_type_parameter(id),
            NodeKind::GenericMethodParameter => self.substitute_generic_method_parameter(id),
            NodeKind::Field => self.substitute_field(id),
            NodeKind::GlobalField => self.substitute_global_field(id),
            NodeKind::Method => self.substitute_method(id),
            NodeKind::GlobalMethod => self.substitute_global_method(id),
            NodeKind::Property => self.substitute_property(id),
            NodeKind::Event => self.substitute_event(id),
            NodeKind::Parameter => self.substitute_parameter(id),
            NodeKind::MethodBody => self.substitute_method_body(id),
            NodeKind::Local => self.substitute_local(id),
            NodeKind::CustomAttribute => self.substitute_custom_attribute(id),
            NodeKind::SecurityAttribute => self.substitute_security_attribute(id),
            NodeKind::Constant
            | NodeKind::CreateArray
            | NodeKind::NamedArgument
            | NodeKind::TypeOf => self.substitute_metadata_expression(id),
            NodeKind::NamespaceAlias => self.substitute_namespace_alias(id),
            NodeKind::NestedAlias => self.substitute_nested_alias(id),
            NodeKind::FileReference => self.substitute_file_reference(id),
            NodeKind::ResourceReference => self.substitute_resource_reference(id),
            NodeKind::Win32Resource => self.substitute_win32_resource(id),
            NodeKind::AssemblyRef => self.substitute_assembly_reference(id),
            NodeKind::ModuleRef => self.substitute_module_reference(id),
            NodeKind::RootNamespaceRef | NodeKind::NestedNamespaceRef => {
                self.substitute_namespace_reference(id)
            }
            NodeKind::NamespaceTypeRef
            | NodeKind::NestedTypeRef
            | NodeKind::SpecializedNestedTypeRef
            | NodeKind::GenericTypeInstance
            | NodeKind::GenericTypeParameterRef
            | NodeKind::GenericMethodParameterRef
            | NodeKind::ArrayType
            | NodeKind::PointerType
            | NodeKind::ManagedPointerType
            | NodeKind::ModifiedType
            | NodeKind::FunctionPointerType => self.substitute_type_reference(id),
            NodeKind::FieldRef | NodeKind::SpecializedFieldRef => {
                self.substitute_field_reference(id)
            }
            NodeKind::MethodRef
            | NodeKind::SpecializedMethodRef
            | NodeKind::GenericMethodInstance => self.substitute_method_reference(id),
            NodeKind::UnitSet => self.substitute_unit_set(id),
            NodeKind::UnitSetNamespace => self.substitute_unit_set_namespace(id),
        }
    }
}
