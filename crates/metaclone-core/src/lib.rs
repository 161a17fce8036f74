//! Core data model for metaclone.
//!
//! An arena-backed metadata graph: assemblies, modules, namespaces, types,
//! members, method bodies and the references connecting them. Every node is a
//! variant of the closed [`Node`] enum stored in a [`MetadataGraph`] and
//! addressed by a stable [`NodeId`].

pub mod attribute;
pub mod definition;
pub mod edge;
pub mod error;
pub mod graph;
pub mod id;
pub mod kind;
pub mod names;
pub mod node;
pub mod reference;
pub mod shape;
pub mod types;

// Re-export commonly used types
pub use edge::{Edge, EdgeList, EdgeRole};
pub use error::CoreError;
pub use graph::MetadataGraph;
pub use id::{Name, NodeId};
pub use kind::{NodeFamily, NodeKind};
pub use names::NameTable;
pub use node::Node;
pub use shape::ConeShape;
pub use types::{
    AssemblyIdentity, ConstantValue, Operation, OperationCode, OperationValue, Version, Visibility,
};
