//! Definition node payloads: units, namespaces, types, members and bodies.
//!
//! Edge fields are documented with their role. Back-edges name the enclosing
//! node and are never followed to create copies; child lists are walked by
//! the cone collector.

use serde::{Deserialize, Serialize};

use crate::id::{Name, NodeId};
use crate::types::{
    CallingConvention, CustomModifier, ExceptionHandler, MarshallingInformation, MethodFlags,
    MethodImplementation, ModuleKind, Operation, PlatformInvokeInformation, TypeFlags,
    TypeLayout, Variance, Version, Visibility,
};

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Data shared by modules and assemblies (an assembly is its manifest module).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleData {
    pub name: Name,
    pub location: String,
    pub kind: ModuleKind,
    pub target_runtime_version: String,
    pub persistent_identifier: [u8; 16],
    pub il_only: bool,
    pub requires_32_bit: bool,
    /// Back-edge to the owning assembly. An assembly points at itself.
    pub containing_assembly: Option<NodeId>,
    /// Child: the root namespace.
    pub namespace_root: NodeId,
    /// Child: the synthetic `<Module>` type holding free-standing fields and
    /// methods. Not listed in any namespace.
    pub global_type: Option<NodeId>,
    /// The module's type table, in declaration order. Rebuilt by the copier.
    pub all_types: Vec<NodeId>,
    /// Owned custom attributes.
    pub module_attributes: Vec<NodeId>,
    /// References.
    pub assembly_references: Vec<NodeId>,
    /// References.
    pub module_references: Vec<NodeId>,
    /// Reference to the entry point method.
    pub entry_point: Option<NodeId>,
    /// Owned.
    pub win32_resources: Vec<NodeId>,
}

/// An assembly: manifest module plus assembly-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyDef {
    pub module: ModuleData,
    pub culture: Name,
    pub version: Version,
    pub public_key: Vec<u8>,
    pub is_retargetable: bool,
    pub contains_foreign_types: bool,
    /// Owned custom attributes.
    pub assembly_attributes: Vec<NodeId>,
    /// Owned security attributes.
    pub security_attributes: Vec<NodeId>,
    /// Children: exported type aliases.
    pub exported_types: Vec<NodeId>,
    /// Children: files of a multi-file assembly.
    pub files: Vec<NodeId>,
    /// Owned manifest resources.
    pub resources: Vec<NodeId>,
    /// Children: additional modules.
    pub member_modules: Vec<NodeId>,
}

/// A module that is not an assembly's manifest module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDef {
    pub module: ModuleData,
}

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

/// Data shared by root and nested namespaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceData {
    pub name: Name,
    /// Children: nested namespaces, namespace types, global fields and
    /// methods, namespace aliases.
    pub members: Vec<NodeId>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootNamespaceDef {
    pub namespace: NamespaceData,
    /// Back-edge to the module or assembly.
    pub unit: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedNamespaceDef {
    pub namespace: NamespaceData,
    /// Back-edge.
    pub containing_namespace: NodeId,
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Data shared by namespace and nested type definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeData {
    pub name: Name,
    pub flags: TypeFlags,
    pub layout: TypeLayout,
    /// Children.
    pub generic_parameters: Vec<NodeId>,
    /// References.
    pub base_classes: Vec<NodeId>,
    /// References.
    pub interfaces: Vec<NodeId>,
    pub explicit_implementation_overrides: Vec<MethodImplementation>,
    /// Children.
    pub fields: Vec<NodeId>,
    /// Children.
    pub methods: Vec<NodeId>,
    /// Children.
    pub properties: Vec<NodeId>,
    /// Children.
    pub events: Vec<NodeId>,
    /// Children.
    pub nested_types: Vec<NodeId>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
    /// Owned security attributes.
    pub security_attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceTypeDef {
    pub ty: TypeData,
    /// Back-edge.
    pub containing_namespace: NodeId,
    pub is_public: bool,
    pub is_foreign: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedTypeDef {
    pub ty: TypeData,
    /// Back-edge.
    pub containing_type: NodeId,
    pub visibility: Visibility,
}

/// Data shared by generic type and generic method parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenericParameterData {
    pub name: Name,
    pub index: u16,
    pub variance: Variance,
    pub must_be_reference_type: bool,
    pub must_be_value_type: bool,
    pub must_have_default_constructor: bool,
    /// References.
    pub constraints: Vec<NodeId>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericTypeParameterDef {
    pub parameter: GenericParameterData,
    /// Back-edge.
    pub defining_type: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericMethodParameterDef {
    pub parameter: GenericParameterData,
    /// Back-edge.
    pub defining_method: NodeId,
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// Data shared by fields and global fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldData {
    pub name: Name,
    /// Back-edge.
    pub containing_type: NodeId,
    /// Reference.
    pub ty: NodeId,
    pub custom_modifiers: Vec<CustomModifier>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_read_only: bool,
    pub is_compile_time_constant: bool,
    pub is_not_serialized: bool,
    pub is_special_name: bool,
    pub is_runtime_special: bool,
    /// Owned constant.
    pub compile_time_value: Option<NodeId>,
    pub marshalling_information: Option<MarshallingInformation>,
    pub offset: Option<u32>,
    pub sequence_number: u32,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub field: FieldData,
}

/// A field declared outside any type, reachable from its namespace and from
/// the module's global type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalFieldDef {
    pub field: FieldData,
    /// Back-edge.
    pub containing_namespace: NodeId,
}

/// Data shared by methods and global methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodData {
    pub name: Name,
    /// Back-edge.
    pub containing_type: NodeId,
    pub visibility: Visibility,
    pub flags: MethodFlags,
    pub calling_convention: CallingConvention,
    /// Children.
    pub generic_parameters: Vec<NodeId>,
    /// Children.
    pub parameters: Vec<NodeId>,
    /// Reference.
    pub return_type: NodeId,
    pub return_value_is_by_ref: bool,
    pub return_value_custom_modifiers: Vec<CustomModifier>,
    /// Owned custom attributes.
    pub return_value_attributes: Vec<NodeId>,
    pub return_value_marshalling: Option<MarshallingInformation>,
    /// Owned body.
    pub body: Option<NodeId>,
    pub platform_invoke: Option<PlatformInvokeInformation>,
    /// Owned security attributes.
    pub security_attributes: Vec<NodeId>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDef {
    pub method: MethodData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalMethodDef {
    pub method: MethodData,
    /// Back-edge.
    pub containing_namespace: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: Name,
    /// Back-edge.
    pub containing_type: NodeId,
    /// Reference.
    pub ty: NodeId,
    pub calling_convention: CallingConvention,
    pub return_value_custom_modifiers: Vec<CustomModifier>,
    pub is_special_name: bool,
    pub is_runtime_special: bool,
    /// Children: indexer parameters.
    pub parameters: Vec<NodeId>,
    /// Collected method of the containing type.
    pub getter: Option<NodeId>,
    /// Collected method of the containing type.
    pub setter: Option<NodeId>,
    /// Collected methods of the containing type.
    pub accessors: Vec<NodeId>,
    /// Owned constant.
    pub default_value: Option<NodeId>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDef {
    pub name: Name,
    /// Back-edge.
    pub containing_type: NodeId,
    /// Reference.
    pub ty: NodeId,
    pub is_special_name: bool,
    pub is_runtime_special: bool,
    /// Collected method of the containing type.
    pub adder: Option<NodeId>,
    /// Collected method of the containing type.
    pub remover: Option<NodeId>,
    /// Collected method of the containing type.
    pub caller: Option<NodeId>,
    /// Collected methods of the containing type.
    pub accessors: Vec<NodeId>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: Name,
    pub index: u16,
    /// Back-edge to the declaring method or property.
    pub containing_signature: NodeId,
    /// Reference.
    pub ty: NodeId,
    pub custom_modifiers: Vec<CustomModifier>,
    pub is_by_reference: bool,
    pub is_in: bool,
    pub is_out: bool,
    pub is_optional: bool,
    pub is_param_array: bool,
    /// Owned constant.
    pub default_value: Option<NodeId>,
    pub marshalling_information: Option<MarshallingInformation>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodBodyDef {
    /// Back-edge.
    pub method_definition: NodeId,
    pub max_stack: u16,
    pub locals_are_zero_initialized: bool,
    /// Owned locals.
    pub locals: Vec<NodeId>,
    pub operations: Vec<Operation>,
    pub exception_handlers: Vec<ExceptionHandler>,
    /// Children: compiler-generated helper types.
    pub private_helper_types: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalDef {
    pub name: Name,
    /// Back-edge.
    pub method_definition: NodeId,
    /// Reference.
    pub ty: NodeId,
    pub custom_modifiers: Vec<CustomModifier>,
    pub is_pinned: bool,
    pub is_reference: bool,
}
