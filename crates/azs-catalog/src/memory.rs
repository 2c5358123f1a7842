//! In-memory catalog

use crate::error::CatalogResult;
use crate::snapshot::CatalogSnapshot;
use crate::traits::{KindDefinitions, ObjectCatalog};
use async_trait::async_trait;
use azs_core::{ObjectKind, SchemaObject};

/// Catalog serving a fixed set of objects, for tests and for callers that
/// already hold definitions.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    label: String,
    snapshot: CatalogSnapshot,
}

impl MemoryCatalog {
    /// Catalog over `objects`
    pub fn new(label: impl Into<String>, objects: impl IntoIterator<Item = SchemaObject>) -> Self {
        Self {
            label: label.into(),
            snapshot: CatalogSnapshot::from_objects(objects),
        }
    }

    /// Add one object
    pub fn with_object(mut self, object: SchemaObject) -> Self {
        self.snapshot
            .insert(object.kind, object.identity, object.definition);
        self
    }
}

#[async_trait]
impl ObjectCatalog for MemoryCatalog {
    async fn fetch(&self, kind: ObjectKind) -> CatalogResult<KindDefinitions> {
        Ok(self
            .snapshot
            .kind(kind)
            .map(|(identity, definition)| (identity.clone(), definition.clone()))
            .collect())
    }

    fn describe(&self) -> String {
        format!("in-memory catalog {}", self.label)
    }
}
