//! Inline value types shared by several node kinds.
//!
//! These are not nodes: they have no identity of their own and are cloned
//! along with whichever node embeds them. Several of them carry edges
//! ([`NodeId`] fields) that the copier rewrites in place.
//!
//! Flags that a binary metadata format packs into one integer are spelled out
//! here as individual named booleans or enums.

use serde::{Deserialize, Serialize};

use crate::id::{Name, NodeId};

/// Accessibility of a type member or nested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Private,
    FamilyAndAssembly,
    Assembly,
    Family,
    FamilyOrAssembly,
    Public,
}

/// Variance annotation of a generic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variance {
    #[default]
    NonVariant,
    Covariant,
    Contravariant,
}

/// Four-part assembly version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl Version {
    pub fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Version {
            major,
            minor,
            build,
            revision,
        }
    }
}

/// The identifying tuple of an assembly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssemblyIdentity {
    pub name: Name,
    pub culture: Name,
    pub version: Version,
    pub public_key_token: Vec<u8>,
    pub location: String,
}

/// Kind of calling convention, independent of the `this`/generic modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallKind {
    #[default]
    Default,
    C,
    StandardCall,
    ThisCall,
    FastCall,
    ExtraArguments,
}

/// Calling convention of a method, method reference, or function pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallingConvention {
    pub kind: CallKind,
    pub is_generic: bool,
    pub has_this: bool,
    pub explicit_this: bool,
}

/// A required (`modreq`) or optional (`modopt`) custom modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomModifier {
    pub is_optional: bool,
    /// Type reference naming the modifier.
    pub modifier: NodeId,
}

/// One parameter slot of a method reference or function pointer signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterTypeInfo {
    pub index: u16,
    pub ty: NodeId,
    pub is_by_reference: bool,
    pub custom_modifiers: Vec<CustomModifier>,
}

/// Literal values held by metadata constants.
///
/// `F32` is widened to `f64` in storage, narrowing happens at emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Char(u16),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f64),
    F64(f64),
    String(String),
}

/// Layout strategy of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutKind {
    #[default]
    Auto,
    Sequential,
    Explicit,
}

/// Layout of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeLayout {
    pub kind: LayoutKind,
    pub size_of: u32,
    pub alignment: u16,
}

/// Type attribute flags, one field per flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeFlags {
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub is_interface: bool,
    pub is_value_type: bool,
    pub is_enum: bool,
    pub is_delegate: bool,
    pub is_static: bool,
    pub is_serializable: bool,
    pub is_special_name: bool,
    pub is_runtime_special: bool,
    pub is_com_object: bool,
    pub is_before_field_init: bool,
    pub has_declarative_security: bool,
}

/// Method attribute and implementation flags, one field per flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MethodFlags {
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub is_new_slot: bool,
    pub is_hidden_by_signature: bool,
    pub is_special_name: bool,
    pub is_runtime_special: bool,
    pub is_external: bool,
    pub is_runtime_implemented: bool,
    pub is_synchronized: bool,
    pub is_never_inlined: bool,
    pub is_never_optimized: bool,
    pub preserves_signature: bool,
    pub is_platform_invoke: bool,
    pub has_declarative_security: bool,
}

/// Native marshalling description of a field, parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarshallingInformation {
    pub unmanaged_type: u32,
    pub element_type: u32,
    pub element_size: u32,
    pub number_of_elements: u32,
    pub param_index: Option<u32>,
    /// Type reference to a custom marshaller.
    pub custom_marshaller: Option<NodeId>,
    pub custom_marshaller_cookie: String,
    /// Type reference for a user-defined `SAFEARRAY` subtype.
    pub safe_array_user_defined_subtype: Option<NodeId>,
}

/// String marshalling format for platform invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StringFormat {
    #[default]
    Ansi,
    Unicode,
    Auto,
}

/// Platform-invoke record of an external method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInvokeInformation {
    /// Module reference naming the native library.
    pub import_module: NodeId,
    pub import_name: Name,
    pub no_mangle: bool,
    pub supports_last_error: bool,
    pub string_format: StringFormat,
    pub calling_convention: CallKind,
}

/// An explicit interface implementation (`MethodImpl` row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodImplementation {
    /// Back-edge to the type declaring the override.
    pub containing_type: NodeId,
    pub implementing_method: NodeId,
    pub implemented_method: NodeId,
}

/// Security action of a declarative security attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SecurityAction {
    #[default]
    Demand,
    Assert,
    Deny,
    PermitOnly,
    LinkDemand,
    InheritanceDemand,
    RequestMinimum,
    RequestOptional,
    RequestRefuse,
}

/// IL opcode. Only the value is stored; the copier never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationCode(pub u16);

impl OperationCode {
    pub const NOP: OperationCode = OperationCode(0x00);
    pub const LDARG_0: OperationCode = OperationCode(0x02);
    pub const LDLOC_0: OperationCode = OperationCode(0x06);
    pub const STLOC_0: OperationCode = OperationCode(0x0A);
    pub const LDARG: OperationCode = OperationCode(0xFE09);
    pub const LDLOC: OperationCode = OperationCode(0xFE0C);
    pub const STLOC: OperationCode = OperationCode(0xFE0E);
    pub const LDC_I4: OperationCode = OperationCode(0x20);
    pub const LDSTR: OperationCode = OperationCode(0x72);
    pub const CALL: OperationCode = OperationCode(0x28);
    pub const CALLVIRT: OperationCode = OperationCode(0x6F);
    pub const CALLI: OperationCode = OperationCode(0x29);
    pub const RET: OperationCode = OperationCode(0x2A);
    pub const BR: OperationCode = OperationCode(0x38);
    pub const NEWOBJ: OperationCode = OperationCode(0x73);
    pub const LDFLD: OperationCode = OperationCode(0x7B);
    pub const STFLD: OperationCode = OperationCode(0x7D);
    pub const BOX: OperationCode = OperationCode(0x8C);
    pub const LDTOKEN: OperationCode = OperationCode(0xD0);
    pub const SWITCH: OperationCode = OperationCode(0x45);
}

/// Operand of an IL operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperationValue {
    None,
    Int(i64),
    Float(f64),
    String(String),
    /// Branch target offset.
    Target(u32),
    /// `switch` target offsets.
    Targets(Vec<u32>),
    /// A local of the enclosing body.
    Local(NodeId),
    /// A parameter of the enclosing method.
    Parameter(NodeId),
    /// Field reference or definition.
    Field(NodeId),
    /// Method reference or definition.
    Method(NodeId),
    /// Type reference or definition.
    Type(NodeId),
    /// Function-pointer type for `calli`.
    Signature(NodeId),
}

/// One IL instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub code: OperationCode,
    pub offset: u32,
    pub value: OperationValue,
}

impl Operation {
    pub fn new(code: OperationCode, offset: u32, value: OperationValue) -> Self {
        Operation {
            code,
            offset,
            value,
        }
    }
}

/// Kind of exception handling region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandlerKind {
    #[default]
    Catch,
    Filter,
    Finally,
    Fault,
}

/// One exception handling clause of a method body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionHandler {
    pub kind: HandlerKind,
    /// Caught type for `Catch` handlers.
    pub exception_type: Option<NodeId>,
    pub try_start: u32,
    pub try_end: u32,
    pub handler_start: u32,
    pub handler_end: u32,
    pub filter_start: Option<u32>,
}

/// Kind of module image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModuleKind {
    #[default]
    DynamicallyLinkedLibrary,
    ConsoleApplication,
    WindowsApplication,
    ManifestResourceFile,
}
