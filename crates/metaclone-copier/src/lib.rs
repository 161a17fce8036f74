//! Identity-preserving deep copy of metadata graph cones.
//!
//! A [`Copier`] session runs in two phases:
//!
//! 1. [`Copier::register_root`] collects the cone under each root: every
//!    definition reachable over structural containment gets a shallow clone,
//!    recorded in the [`IdentityCache`].
//! 2. The first `substitute_*` call freezes the cone and deep-copies the
//!    requested node. Edges are rewritten so that two edges sharing a target
//!    in the original share the target's clone in the copy, and edges to
//!    definitions outside the cone become fresh reference nodes.
//!
//! Each copied module's type table is put back into the original order by
//! the [`TypeOrderPreserver`].
//!
//! ```
//! use metaclone_copier::Copier;
//! use metaclone_core::{MetadataGraph, Version};
//!
//! let mut graph = MetadataGraph::new();
//! let asm = graph.add_assembly("App", Version::default());
//! let root = graph.root_namespace(asm).unwrap();
//! let point = graph.add_namespace_type(root, "Point").unwrap();
//! graph.add_field(point, "Next", point).unwrap();
//!
//! let mut copier = Copier::new(&mut graph);
//! copier.register_root(point).unwrap();
//! let copy = copier.substitute_type_definition(point).unwrap();
//! assert_ne!(copy, point);
//! ```

pub mod cache;
pub mod config;
mod cone;
pub mod copier;
mod engine;
pub mod error;
pub mod host;
pub mod order;
mod substitute;

pub use cache::IdentityCache;
pub use config::CopierConfig;
pub use copier::Copier;
pub use error::CopyError;
pub use host::{GraphHost, MetadataHost, NullHost};
pub use order::TypeOrderPreserver;
