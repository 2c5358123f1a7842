//! All-kinds snapshot of a catalog
//!
//! Planning needs every kind from both sides. The fetches are independent,
//! so they run concurrently and are joined before planning starts.

use crate::error::CatalogResult;
use crate::traits::{KindDefinitions, ObjectCatalog};
use azs_core::{ObjectIdentity, ObjectKind, SchemaObject};
use futures::future::try_join_all;
use std::collections::BTreeMap;

/// Definitions of every kind from one catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    kinds: BTreeMap<ObjectKind, KindDefinitions>,
}

impl CatalogSnapshot {
    /// Empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from individual objects. Later objects replace
    /// earlier ones with the same kind and identity.
    pub fn from_objects(objects: impl IntoIterator<Item = SchemaObject>) -> Self {
        let mut snapshot = Self::new();
        for object in objects {
            snapshot.insert(object.kind, object.identity, object.definition);
        }
        snapshot
    }

    /// Add or replace one object
    pub fn insert(&mut self, kind: ObjectKind, identity: ObjectIdentity, definition: Option<String>) {
        self.kinds.entry(kind).or_default().insert(identity, definition);
    }

    /// Replace every object of `kind`
    pub fn set_kind(&mut self, kind: ObjectKind, definitions: KindDefinitions) {
        self.kinds.insert(kind, definitions);
    }

    /// Objects of `kind`; empty when the kind was never fetched
    pub fn kind(&self, kind: ObjectKind) -> impl Iterator<Item = (&ObjectIdentity, &Option<String>)> {
        self.kinds.get(&kind).into_iter().flat_map(|defs| defs.iter())
    }

    /// Catalog entry for one object: `None` when not listed, `Some(None)`
    /// when listed without text
    pub fn entry(&self, kind: ObjectKind, identity: &ObjectIdentity) -> Option<&Option<String>> {
        self.kinds.get(&kind).and_then(|defs| defs.get(identity))
    }

    /// Every object as `(kind, identity, definition)`, ordered by kind then
    /// identity
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKind, &ObjectIdentity, &Option<String>)> {
        self.kinds
            .iter()
            .flat_map(|(kind, defs)| defs.iter().map(move |(id, def)| (*kind, id, def)))
    }

    /// Object count across kinds
    pub fn len(&self) -> usize {
        self.kinds.values().map(|defs| defs.len()).sum()
    }

    /// Whether the snapshot holds no objects
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetch all five kinds from `catalog` concurrently.
pub async fn fetch_snapshot(catalog: &dyn ObjectCatalog) -> CatalogResult<CatalogSnapshot> {
    let fetched = try_join_all(ObjectKind::ALL.iter().map(|&kind| async move {
        catalog.fetch(kind).await.map(|defs| (kind, defs))
    }))
    .await?;

    let mut snapshot = CatalogSnapshot::new();
    for (kind, defs) in fetched {
        snapshot.set_kind(kind, defs);
    }
    log::info!("Fetched {} objects from {}", snapshot.len(), catalog.describe());
    Ok(snapshot)
}

/// Fetch desired and actual snapshots together (up to ten concurrent
/// fetches). The first failure is returned.
pub async fn fetch_pair(
    desired: &dyn ObjectCatalog,
    actual: &dyn ObjectCatalog,
) -> CatalogResult<(CatalogSnapshot, CatalogSnapshot)> {
    futures::try_join!(fetch_snapshot(desired), fetch_snapshot(actual))
}
