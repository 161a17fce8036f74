//! Attributes, metadata expressions, type aliases and resources.

use serde::{Deserialize, Serialize};

use crate::id::{Name, NodeId};
use crate::types::{ConstantValue, SecurityAction, Visibility};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomAttribute {
    /// Reference to the attribute constructor.
    pub constructor: NodeId,
    /// Owned positional argument expressions.
    pub arguments: Vec<NodeId>,
    /// Owned named argument expressions.
    pub named_arguments: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAttribute {
    pub action: SecurityAction,
    /// Owned custom attributes describing the permission set.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConstant {
    pub value: ConstantValue,
    pub ty: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataCreateArray {
    pub element_type: NodeId,
    pub ty: NodeId,
    pub rank: u32,
    pub lower_bounds: Vec<i32>,
    pub sizes: Vec<u64>,
    /// Owned element expressions.
    pub initializers: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataNamedArgument {
    pub argument_name: Name,
    /// Owned value expression.
    pub argument_value: NodeId,
    pub ty: NodeId,
    pub is_field: bool,
    /// The field or property this argument sets, resolved by lookup only.
    pub resolved_definition: Option<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataTypeOf {
    pub type_to_get: NodeId,
    pub ty: NodeId,
}

/// A namespace-level type forwarder or exported type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceAliasForType {
    pub name: Name,
    /// Back-edge.
    pub containing_namespace: NodeId,
    pub aliased_type: NodeId,
    pub is_public: bool,
    /// Children: nested aliases.
    pub members: Vec<NodeId>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedAliasForType {
    pub name: Name,
    /// Back-edge.
    pub containing_alias: NodeId,
    pub aliased_type: NodeId,
    pub visibility: Visibility,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReference {
    pub file_name: Name,
    /// Back-edge.
    pub containing_assembly: NodeId,
    pub has_metadata: bool,
    pub hash_value: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceReference {
    pub name: Name,
    /// Unit reference or definition.
    pub defining_assembly: NodeId,
    pub is_public: bool,
    /// File of the assembly holding the resource, resolved by lookup only.
    pub external_file: Option<NodeId>,
    pub data: Vec<u8>,
    /// Owned custom attributes.
    pub attributes: Vec<NodeId>,
}

/// An unmanaged resource. Has no edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Win32Resource {
    pub type_name: Option<Name>,
    pub type_id: i32,
    pub name: Option<Name>,
    pub id: i32,
    pub language_id: u32,
    pub code_page: u32,
    pub data: Vec<u8>,
}
