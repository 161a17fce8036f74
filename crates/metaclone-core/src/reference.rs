//! Reference node payloads.
//!
//! A reference denotes a unit, namespace, type or member that may live in
//! another assembly, or is structural (arrays, pointers, instantiations).
//! Every edge of a reference is a forward reference: copying a reference
//! copies what it points at.

use serde::{Deserialize, Serialize};

use crate::id::{Name, NodeId};
use crate::types::{AssemblyIdentity, CallingConvention, CustomModifier, ParameterTypeInfo};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyRef {
    pub identity: AssemblyIdentity,
    pub is_retargetable: bool,
    /// The assembly definition this reference was resolved to, if any.
    pub resolved_assembly: Option<NodeId>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRef {
    pub name: Name,
    pub containing_assembly: Option<NodeId>,
    /// The module definition this reference was resolved to, if any.
    pub resolved_module: Option<NodeId>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootNamespaceRef {
    /// Unit reference or definition.
    pub unit: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedNamespaceRef {
    pub name: Name,
    pub containing_namespace: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceTypeRef {
    pub name: Name,
    /// Namespace reference or definition.
    pub containing_namespace: NodeId,
    pub generic_parameter_count: u16,
    pub is_value_type: bool,
    pub mangle_name: bool,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedTypeRef {
    pub name: Name,
    pub containing_type: NodeId,
    pub generic_parameter_count: u16,
    pub is_value_type: bool,
    pub mangle_name: bool,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

/// A nested type of a generic type instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecializedNestedTypeRef {
    pub nested: NestedTypeRef,
    pub unspecialized_version: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericTypeInstanceRef {
    pub generic_type: NodeId,
    pub generic_arguments: Vec<NodeId>,
    pub is_value_type: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericTypeParameterRef {
    pub name: Name,
    pub index: u16,
    pub defining_type: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericMethodParameterRef {
    pub name: Name,
    pub index: u16,
    pub defining_method: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayTypeRef {
    pub element_type: NodeId,
    pub rank: u32,
    pub is_vector: bool,
    pub lower_bounds: Vec<i32>,
    pub sizes: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerTypeRef {
    pub target_type: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedPointerTypeRef {
    pub target_type: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifiedTypeRef {
    pub unmodified_type: NodeId,
    pub custom_modifiers: Vec<CustomModifier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionPointerTypeRef {
    pub calling_convention: CallingConvention,
    pub parameters: Vec<ParameterTypeInfo>,
    pub extra_argument_types: Vec<ParameterTypeInfo>,
    pub return_type: NodeId,
    pub returns_by_reference: bool,
    pub return_value_custom_modifiers: Vec<CustomModifier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRef {
    pub name: Name,
    pub containing_type: NodeId,
    pub ty: NodeId,
    pub custom_modifiers: Vec<CustomModifier>,
    pub is_static: bool,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

/// A field of a generic type instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecializedFieldRef {
    pub field: FieldRef,
    pub unspecialized_version: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodRef {
    pub name: Name,
    pub containing_type: NodeId,
    pub generic_parameter_count: u16,
    pub calling_convention: CallingConvention,
    pub parameters: Vec<ParameterTypeInfo>,
    /// Vararg arguments supplied at a call site.
    pub extra_parameters: Vec<ParameterTypeInfo>,
    pub return_type: NodeId,
    pub returns_by_reference: bool,
    pub return_value_custom_modifiers: Vec<CustomModifier>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

/// A method of a generic type instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecializedMethodRef {
    pub method: MethodRef,
    pub unspecialized_version: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericMethodInstanceRef {
    pub method: MethodRef,
    pub generic_method: NodeId,
    pub generic_arguments: Vec<NodeId>,
}

/// A set of units treated as one. The copier does not support it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSet {
    pub units: Vec<NodeId>,
}

/// A namespace spanning a unit set. The copier does not support it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSetNamespace {
    pub name: Name,
    pub unit_set: NodeId,
    pub containing_namespace: Option<NodeId>,
}
