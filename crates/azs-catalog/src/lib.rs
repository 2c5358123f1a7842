//! azs-catalog - Object catalogs for azsync
//!
//! This crate provides the `ObjectCatalog` trait and its implementations:
//! an exported schema tree on disk, a live database reached through a
//! caller-supplied query executor, and an in-memory catalog. Snapshots of
//! all object kinds are fetched concurrently.

pub mod error;
pub mod file;
pub mod memory;
pub mod query;
pub mod snapshot;
pub mod table_ddl;
pub mod traits;

pub use error::{CatalogError, CatalogResult};
pub use file::FileCatalog;
pub use memory::MemoryCatalog;
pub use query::{object_query, DefinitionQuery, DefinitionRow, QueryCatalog};
pub use snapshot::{fetch_pair, fetch_snapshot, CatalogSnapshot};
pub use table_ddl::{table_definition, TableColumnRow};
pub use traits::{KindDefinitions, ObjectCatalog};
