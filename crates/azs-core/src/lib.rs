//! azs-core - Core library for azsync
//!
//! This crate provides the shared object model (kinds, identities, schema
//! objects and diff verdicts), the dependency graph with its deterministic
//! topological ordering, configuration parsing, and small SQL identifier
//! helpers used across all azsync components.

pub mod checksum;
pub mod config;
pub mod dag;
pub mod error;
pub mod object;
pub mod sql_utils;
pub mod verdict;

pub use checksum::compute_checksum;
pub use config::{Config, ConfigOverrides, ResolvedConfig};
pub use dag::{CyclicDependencyWarning, DependencyGraph, TopologicalOrder};
pub use error::{CoreError, CoreResult};
pub use object::{ObjectIdentity, ObjectKind, SchemaObject};
pub use verdict::{ChangeKind, Ddl, DiffVerdict};
