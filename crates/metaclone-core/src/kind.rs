//! Field-less node kind tags and their classification.
//!
//! [`NodeKind`] mirrors the variants of [`Node`](crate::node::Node) one to
//! one. Classification predicates (family, named type, type reference, ...)
//! are exhaustive matches so that adding a kind is a compile-checked change.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two disjoint node families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeFamily {
    /// Authoritative declaration owned by a containing scope.
    Definition,
    /// Denotes another node without being its declaration.
    Reference,
}

/// Tag of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    // Units and namespaces
    Assembly,
    Module,
    RootNamespace,
    NestedNamespace,
    // Types
    NamespaceType,
    NestedType,
    GenericTypeParameter,
    GenericMethodParameter,
    // Members
    Field,
    GlobalField,
    Method,
    GlobalMethod,
    Property,
    Event,
    Parameter,
    // Bodies
    MethodBody,
    Local,
    // Attributes and metadata expressions
    CustomAttribute,
    SecurityAttribute,
    Constant,
    CreateArray,
    NamedArgument,
    TypeOf,
    // Aliases and resources
    NamespaceAlias,
    NestedAlias,
    FileReference,
    ResourceReference,
    Win32Resource,
    // Unit and namespace references
    AssemblyRef,
    ModuleRef,
    RootNamespaceRef,
    NestedNamespaceRef,
    // Type references
    NamespaceTypeRef,
    NestedTypeRef,
    SpecializedNestedTypeRef,
    GenericTypeInstance,
    GenericTypeParameterRef,
    GenericMethodParameterRef,
    ArrayType,
    PointerType,
    ManagedPointerType,
    ModifiedType,
    FunctionPointerType,
    // Member references
    FieldRef,
    SpecializedFieldRef,
    MethodRef,
    SpecializedMethodRef,
    GenericMethodInstance,
    // Unit sets
    UnitSet,
    UnitSetNamespace,
}

impl NodeKind {
    /// Returns the family this kind belongs to.
    pub fn family(self) -> NodeFamily {
        use NodeKind::*;
        match self {
            Assembly | Module | RootNamespace | NestedNamespace | NamespaceType | NestedType
            | GenericTypeParameter | GenericMethodParameter | Field | GlobalField | Method
            | GlobalMethod | Property | Event | Parameter | MethodBody | Local
            | CustomAttribute | SecurityAttribute | Constant | CreateArray | NamedArgument
            | TypeOf | NamespaceAlias | NestedAlias | FileReference | ResourceReference
            | Win32Resource => NodeFamily::Definition,
            AssemblyRef | ModuleRef | RootNamespaceRef | NestedNamespaceRef | NamespaceTypeRef
            | NestedTypeRef | SpecializedNestedTypeRef | GenericTypeInstance
            | GenericTypeParameterRef | GenericMethodParameterRef | ArrayType | PointerType
            | ManagedPointerType | ModifiedType | FunctionPointerType | FieldRef
            | SpecializedFieldRef | MethodRef | SpecializedMethodRef | GenericMethodInstance
            | UnitSet | UnitSetNamespace => NodeFamily::Reference,
        }
    }

    /// Returns `true` for definition kinds.
    pub fn is_definition(self) -> bool {
        self.family() == NodeFamily::Definition
    }

    /// Returns `true` for reference kinds.
    pub fn is_reference(self) -> bool {
        self.family() == NodeFamily::Reference
    }

    /// Kinds that may root a cone: definitions that own a position in a
    /// containing scope. Bodies, attributes and expressions are owned by
    /// their container and are copied on demand instead.
    pub fn is_cone_root(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Assembly
                | Module
                | RootNamespace
                | NestedNamespace
                | NamespaceType
                | NestedType
                | GenericTypeParameter
                | GenericMethodParameter
                | Field
                | GlobalField
                | Method
                | GlobalMethod
                | Property
                | Event
                | Parameter
                | NamespaceAlias
                | NestedAlias
        )
    }

    /// Named type definitions: the entries of a module's type table.
    pub fn is_named_type_definition(self) -> bool {
        matches!(self, NodeKind::NamespaceType | NodeKind::NestedType)
    }

    /// Anything that can stand in a type-reference position.
    pub fn is_type_reference(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            NamespaceType
                | NestedType
                | GenericTypeParameter
                | GenericMethodParameter
                | NamespaceTypeRef
                | NestedTypeRef
                | SpecializedNestedTypeRef
                | GenericTypeInstance
                | GenericTypeParameterRef
                | GenericMethodParameterRef
                | ArrayType
                | PointerType
                | ManagedPointerType
                | ModifiedType
                | FunctionPointerType
        )
    }

    /// Type references whose identity is structural rather than nominal.
    pub fn is_structural_type(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            ArrayType | PointerType | ManagedPointerType | ModifiedType | FunctionPointerType
        )
    }

    /// Anything that can stand in a method-reference position.
    pub fn is_method_reference(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Method | GlobalMethod | MethodRef | SpecializedMethodRef | GenericMethodInstance
        )
    }

    /// Anything that can stand in a field-reference position.
    pub fn is_field_reference(self) -> bool {
        use NodeKind::*;
        matches!(self, Field | GlobalField | FieldRef | SpecializedFieldRef)
    }

    /// Anything that can stand in a unit-reference position.
    pub fn is_unit_reference(self) -> bool {
        use NodeKind::*;
        matches!(self, Assembly | Module | AssemblyRef | ModuleRef)
    }

    /// Anything that can stand in a namespace-reference position.
    pub fn is_namespace_reference(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            RootNamespace | NestedNamespace | RootNamespaceRef | NestedNamespaceRef
        )
    }

    /// Metadata expressions that appear as attribute arguments.
    pub fn is_metadata_expression(self) -> bool {
        use NodeKind::*;
        matches!(self, Constant | CreateArray | NamedArgument | TypeOf)
    }

    /// Kinds the copier refuses to handle.
    pub fn is_unsupported(self) -> bool {
        matches!(self, NodeKind::UnitSet | NodeKind::UnitSetNamespace)
    }

    /// Human readable kind name.
    pub fn as_str(self) -> &'static str {
        use NodeKind::*;
        match self {
            Assembly => "assembly",
            Module => "module",
            RootNamespace => "root namespace",
            NestedNamespace => "nested namespace",
            NamespaceType => "namespace type",
            NestedType => "nested type",
            GenericTypeParameter => "generic type parameter",
            GenericMethodParameter => "generic method parameter",
            Field => "field",
            GlobalField => "global field",
            Method => "method",
            GlobalMethod => "global method",
            Property => "property",
            Event => "event",
            Parameter => "parameter",
            MethodBody => "method body",
            Local => "local",
            CustomAttribute => "custom attribute",
            SecurityAttribute => "security attribute",
            Constant => "metadata constant",
            CreateArray => "metadata create-array",
            NamedArgument => "metadata named argument",
            TypeOf => "metadata typeof",
            NamespaceAlias => "namespace alias",
            NestedAlias => "nested alias",
            FileReference => "file reference",
            ResourceReference => "resource reference",
            Win32Resource => "win32 resource",
            AssemblyRef => "assembly reference",
            ModuleRef => "module reference",
            RootNamespaceRef => "root namespace reference",
            NestedNamespaceRef => "nested namespace reference",
            NamespaceTypeRef => "namespace type reference",
            NestedTypeRef => "nested type reference",
            SpecializedNestedTypeRef => "specialized nested type reference",
            GenericTypeInstance => "generic type instance",
            GenericTypeParameterRef => "generic type parameter reference",
            GenericMethodParameterRef => "generic method parameter reference",
            ArrayType => "array type",
            PointerType => "pointer type",
            ManagedPointerType => "managed pointer type",
            ModifiedType => "modified type",
            FunctionPointerType => "function pointer type",
            FieldRef => "field reference",
            SpecializedFieldRef => "specialized field reference",
            MethodRef => "method reference",
            SpecializedMethodRef => "specialized method reference",
            GenericMethodInstance => "generic method instance",
            UnitSet => "unit set",
            UnitSetNamespace => "unit set namespace",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
