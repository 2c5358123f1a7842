//! Catalog trait definition

use crate::error::CatalogResult;
use async_trait::async_trait;
use azs_core::{ObjectIdentity, ObjectKind};
use std::collections::BTreeMap;

/// Definitions of one kind keyed by identity. `None` marks an object that
/// exists but whose text could not be read.
pub type KindDefinitions = BTreeMap<ObjectIdentity, Option<String>>;

/// Source of schema object definitions
///
/// Implementations must be Send + Sync so kinds can be fetched concurrently.
#[async_trait]
pub trait ObjectCatalog: Send + Sync {
    /// Every object of `kind` with its definition
    async fn fetch(&self, kind: ObjectKind) -> CatalogResult<KindDefinitions>;

    /// Human-readable description for logging
    fn describe(&self) -> String;
}
