//! The closed tagged union over every node kind.
//!
//! [`Node`] is what the arena stores. Cloning a `Node` is the kind's
//! populate-from-source operation: scalar state and owned collections are
//! copied, edges still name the original targets.

use serde::{Deserialize, Serialize};

use crate::attribute::{
    CustomAttribute, FileReference, MetadataConstant, MetadataCreateArray, MetadataNamedArgument,
    MetadataTypeOf, NamespaceAliasForType, NestedAliasForType, ResourceReference,
    SecurityAttribute, Win32Resource,
};
use crate::definition::{
    AssemblyDef, EventDef, FieldData, FieldDef, GenericMethodParameterDef, GenericParameterData,
    GenericTypeParameterDef, GlobalFieldDef, GlobalMethodDef, LocalDef, MethodBodyDef, MethodData,
    MethodDef, ModuleData, ModuleDef, NamespaceData, NamespaceTypeDef, NestedNamespaceDef,
    NestedTypeDef, ParameterDef, PropertyDef, RootNamespaceDef, TypeData,
};
use crate::id::{Name, NodeId};
use crate::kind::NodeKind;
use crate::reference::{
    ArrayTypeRef, AssemblyRef, FieldRef, FunctionPointerTypeRef, GenericMethodInstanceRef,
    GenericMethodParameterRef, GenericTypeInstanceRef, GenericTypeParameterRef,
    ManagedPointerTypeRef, MethodRef, ModifiedTypeRef, ModuleRef, NamespaceTypeRef,
    NestedNamespaceRef, NestedTypeRef, PointerTypeRef, RootNamespaceRef, SpecializedFieldRef,
    SpecializedMethodRef, SpecializedNestedTypeRef, UnitSet, UnitSetNamespace,
};

/// A node of the metadata graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Assembly(AssemblyDef),
    Module(ModuleDef),
    RootNamespace(RootNamespaceDef),
    NestedNamespace(NestedNamespaceDef),
    NamespaceType(NamespaceTypeDef),
    NestedType(NestedTypeDef),
    GenericTypeParameter(GenericTypeParameterDef),
    GenericMethodParameter(GenericMethodParameterDef),
    Field(FieldDef),
    GlobalField(GlobalFieldDef),
    Method(MethodDef),
    GlobalMethod(GlobalMethodDef),
    Property(PropertyDef),
    Event(EventDef),
    Parameter(ParameterDef),
    MethodBody(MethodBodyDef),
    Local(LocalDef),
    CustomAttribute(CustomAttribute),
    SecurityAttribute(SecurityAttribute),
    Constant(MetadataConstant),
    CreateArray(MetadataCreateArray),
    NamedArgument(MetadataNamedArgument),
    TypeOf(MetadataTypeOf),
    NamespaceAlias(NamespaceAliasForType),
    NestedAlias(NestedAliasForType),
    FileReference(FileReference),
    ResourceReference(ResourceReference),
    Win32Resource(Win32Resource),
    AssemblyRef(AssemblyRef),
    ModuleRef(ModuleRef),
    RootNamespaceRef(RootNamespaceRef),
    NestedNamespaceRef(NestedNamespaceRef),
    NamespaceTypeRef(NamespaceTypeRef),
    NestedTypeRef(NestedTypeRef),
    SpecializedNestedTypeRef(SpecializedNestedTypeRef),
    GenericTypeInstance(GenericTypeInstanceRef),
    GenericTypeParameterRef(GenericTypeParameterRef),
    GenericMethodParameterRef(GenericMethodParameterRef),
    ArrayType(ArrayTypeRef),
    PointerType(PointerTypeRef),
    ManagedPointerType(ManagedPointerTypeRef),
    ModifiedType(ModifiedTypeRef),
    FunctionPointerType(FunctionPointerTypeRef),
    FieldRef(FieldRef),
    SpecializedFieldRef(SpecializedFieldRef),
    MethodRef(MethodRef),
    SpecializedMethodRef(SpecializedMethodRef),
    GenericMethodInstance(GenericMethodInstanceRef),
    UnitSet(UnitSet),
    UnitSetNamespace(UnitSetNamespace),
}

impl Node {
    /// Returns the kind tag of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Assembly(_) => NodeKind::Assembly,
            Node::Module(_) => NodeKind::Module,
            Node::RootNamespace(_) => NodeKind::RootNamespace,
            Node::NestedNamespace(_) => NodeKind::NestedNamespace,
            Node::NamespaceType(_) => NodeKind::NamespaceType,
            Node::NestedType(_) => NodeKind::NestedType,
            Node::GenericTypeParameter(_) => NodeKind::GenericTypeParameter,
            Node::GenericMethodParameter(_) => NodeKind::GenericMethodParameter,
            Node::Field(_) => NodeKind::Field,
            Node::GlobalField(_) => NodeKind::GlobalField,
            Node::Method(_) => NodeKind::Method,
            Node::GlobalMethod(_) => NodeKind::GlobalMethod,
            Node::Property(_) => NodeKind::Property,
            Node::Event(_) => NodeKind::Event,
            Node::Parameter(_) => NodeKind::Parameter,
            Node::MethodBody(_) => NodeKind::MethodBody,
            Node::Local(_) => NodeKind::Local,
            Node::CustomAttribute(_) => NodeKind::CustomAttribute,
            Node::SecurityAttribute(_) => NodeKind::SecurityAttribute,
            Node::Constant(_) => NodeKind::Constant,
            Node::CreateArray(_) => NodeKind::CreateArray,
            Node::NamedArgument(_) => NodeKind::NamedArgument,
            Node::TypeOf(_) => NodeKind::TypeOf,
            Node::NamespaceAlias(_) => NodeKind::NamespaceAlias,
            Node::NestedAlias(_) => NodeKind::NestedAlias,
            Node::FileReference(_) => NodeKind::FileReference,
            Node::ResourceReference(_) => NodeKind::ResourceReference,
            Node::Win32Resource(_) => NodeKind::Win32Resource,
            Node::AssemblyRef(_) => NodeKind::AssemblyRef,
            Node::ModuleRef(_) => NodeKind::ModuleRef,
            Node::RootNamespaceRef(_) => NodeKind::RootNamespaceRef,
            Node::NestedNamespaceRef(_) => NodeKind::NestedNamespaceRef,
            Node::NamespaceTypeRef(_) => NodeKind::NamespaceTypeRef,
            Node::NestedTypeRef(_) => NodeKind::NestedTypeRef,
            Node::SpecializedNestedTypeRef(_) => NodeKind::SpecializedNestedTypeRef,
            Node::GenericTypeInstance(_) => NodeKind::GenericTypeInstance,
            Node::GenericTypeParameterRef(_) => NodeKind::GenericTypeParameterRef,
            Node::GenericMethodParameterRef(_) => NodeKind::GenericMethodParameterRef,
            Node::ArrayType(_) => NodeKind::ArrayType,
            Node::PointerType(_) => NodeKind::PointerType,
            Node::ManagedPointerType(_) => NodeKind::ManagedPointerType,
            Node::ModifiedType(_) => NodeKind::ModifiedType,
            Node::FunctionPointerType(_) => NodeKind::FunctionPointerType,
            Node::FieldRef(_) => NodeKind::FieldRef,
            Node::SpecializedFieldRef(_) => NodeKind::SpecializedFieldRef,
            Node::MethodRef(_) => NodeKind::MethodRef,
            Node::SpecializedMethodRef(_) => NodeKind::SpecializedMethodRef,
            Node::GenericMethodInstance(_) => NodeKind::GenericMethodInstance,
            Node::UnitSet(_) => NodeKind::UnitSet,
            Node::UnitSetNamespace(_) => NodeKind::UnitSetNamespace,
        }
    }

    /// Returns the node's own simple name, if the kind has one.
    pub fn name(&self) -> Option<Name> {
        match self {
            Node::Assembly(a) => Some(a.module.name),
            Node::Module(m) => Some(m.module.name),
            Node::RootNamespace(n) => Some(n.namespace.name),
            Node::NestedNamespace(n) => Some(n.namespace.name),
            Node::NamespaceType(t) => Some(t.ty.name),
            Node::NestedType(t) => Some(t.ty.name),
            Node::GenericTypeParameter(p) => Some(p.parameter.name),
            Node::GenericMethodParameter(p) => Some(p.parameter.name),
            Node::Field(f) => Some(f.field.name),
            Node::GlobalField(f) => Some(f.field.name),
            Node::Method(m) => Some(m.method.name),
            Node::GlobalMethod(m) => Some(m.method.name),
            Node::Property(p) => Some(p.name),
            Node::Event(e) => Some(e.name),
            Node::Parameter(p) => Some(p.name),
            Node::Local(l) => Some(l.name),
            Node::NamedArgument(a) => Some(a.argument_name),
            Node::NamespaceAlias(a) => Some(a.name),
            Node::NestedAlias(a) => Some(a.name),
            Node::FileReference(f) => Some(f.file_name),
            Node::ResourceReference(r) => Some(r.name),
            Node::Win32Resource(r) => r.name,
            Node::AssemblyRef(r) => Some(r.identity.name),
            Node::ModuleRef(r) => Some(r.name),
            Node::NestedNamespaceRef(r) => Some(r.name),
            Node::NamespaceTypeRef(r) => Some(r.name),
            Node::NestedTypeRef(r) => Some(r.name),
            Node::SpecializedNestedTypeRef(r) => Some(r.nested.name),
            Node::GenericTypeParameterRef(r) => Some(r.name),
            Node::GenericMethodParameterRef(r) => Some(r.name),
            Node::FieldRef(r) => Some(r.name),
            Node::SpecializedFieldRef(r) => Some(r.field.name),
            Node::MethodRef(r) => Some(r.name),
            Node::SpecializedMethodRef(r) => Some(r.method.name),
            Node::GenericMethodInstance(r) => Some(r.method.name),
            Node::UnitSetNamespace(n) => Some(n.name),
            Node::MethodBody(_)
            | Node::CustomAttribute(_)
            | Node::SecurityAttribute(_)
            | Node::Constant(_)
            | Node::CreateArray(_)
            | Node::TypeOf(_)
            | Node::RootNamespaceRef(_)
            | Node::GenericTypeInstance(_)
            | Node::ArrayType(_)
            | Node::PointerType(_)
            | Node::ManagedPointerType(_)
            | Node::ModifiedType(_)
            | Node::FunctionPointerType(_)
            | Node::UnitSet(_) => None,
        }
    }

    /// Module data of an assembly or module.
    pub fn module_data(&self) -> Option<&ModuleData> {
        match self {
            Node::Assembly(a) => Some(&a.module),
            Node::Module(m) => Some(&m.module),
            _ => None,
        }
    }

    pub fn module_data_mut(&mut self) -> Option<&mut ModuleData> {
        match self {
            Node::Assembly(a) => Some(&mut a.module),
            Node::Module(m) => Some(&mut m.module),
            _ => None,
        }
    }

    /// Namespace data of a root or nested namespace.
    pub fn namespace_data(&self) -> Option<&NamespaceData> {
        match self {
            Node::RootNamespace(n) => Some(&n.namespace),
            Node::NestedNamespace(n) => Some(&n.namespace),
            _ => None,
        }
    }

    pub fn namespace_data_mut(&mut self) -> Option<&mut NamespaceData> {
        match self {
            Node::RootNamespace(n) => Some(&mut n.namespace),
            Node::NestedNamespace(n) => Some(&mut n.namespace),
            _ => None,
        }
    }

    /// Type data of a namespace or nested type definition.
    pub fn type_data(&self) -> Option<&TypeData> {
        match self {
            Node::NamespaceType(t) => Some(&t.ty),
            Node::NestedType(t) => Some(&t.ty),
            _ => None,
        }
    }

    pub fn type_data_mut(&mut self) -> Option<&mut TypeData> {
        match self {
            Node::NamespaceType(t) => Some(&mut t.ty),
            Node::NestedType(t) => Some(&mut t.ty),
            _ => None,
        }
    }

    /// Method data of a method or global method.
    pub fn method_data(&self) -> Option<&MethodData> {
        match self {
            Node::Method(m) => Some(&m.method),
            Node::GlobalMethod(m) => Some(&m.method),
            _ => None,
        }
    }

    pub fn method_data_mut(&mut self) -> Option<&mut MethodData> {
        match self {
            Node::Method(m) => Some(&mut m.method),
            Node::GlobalMethod(m) => Some(&mut m.method),
            _ => None,
        }
    }

    /// Field data of a field or global field.
    pub fn field_data(&self) -> Option<&FieldData> {
        match self {
            Node::Field(f) => Some(&f.field),
            Node::GlobalField(f) => Some(&f.field),
            _ => None,
        }
    }

    /// Generic parameter data of a generic type or method parameter.
    pub fn generic_parameter_data(&self) -> Option<&GenericParameterData> {
        match self {
            Node::GenericTypeParameter(p) => Some(&p.parameter),
            Node::GenericMethodParameter(p) => Some(&p.parameter),
            _ => None,
        }
    }

    /// Method reference data shared by the three method reference kinds.
    pub fn method_ref_data(&self) -> Option<&MethodRef> {
        match self {
            Node::MethodRef(m) => Some(m),
            Node::SpecializedMethodRef(m) => Some(&m.method),
            Node::GenericMethodInstance(m) => Some(&m.method),
            _ => None,
        }
    }

    /// The namespace or type this node is declared in, when it has one.
    pub fn container(&self) -> Option<NodeId> {
        match self {
            Node::NestedNamespace(n) => Some(n.containing_namespace),
            Node::NamespaceType(t) => Some(t.containing_namespace),
            Node::NestedType(t) => Some(t.containing_type),
            Node::NestedNamespaceRef(r) => Some(r.containing_namespace),
            Node::NamespaceTypeRef(r) => Some(r.containing_namespace),
            Node::NestedTypeRef(r) => Some(r.containing_type),
            Node::SpecializedNestedTypeRef(r) => Some(r.nested.containing_type),
            _ => None,
        }
    }

    /// Generic arity of a named type definition or reference.
    pub fn generic_parameter_count(&self) -> u16 {
        match self {
            Node::NamespaceType(t) => u16::try_from(t.ty.generic_parameters.len()).unwrap_or(u16::MAX),
            Node::NestedType(t) => u16::try_from(t.ty.generic_parameters.len()).unwrap_or(u16::MAX),
            Node::NamespaceTypeRef(r) => r.generic_parameter_count,
            Node::NestedTypeRef(r) => r.generic_parameter_count,
            Node::SpecializedNestedTypeRef(r) => r.nested.generic_parameter_count,
            _ => 0,
        }
    }
}
