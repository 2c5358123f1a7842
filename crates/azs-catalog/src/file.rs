//! Exported schema tree on disk
//!
//! Layout: one folder per kind under the root (`Tables`, `Views`,
//! `Functions`, `Stored Procedures`, `Triggers`), one `schema.object.sql`
//! file per object. Files are read verbatim.

use crate::error::{CatalogError, CatalogResult};
use crate::traits::{KindDefinitions, ObjectCatalog};
use async_trait::async_trait;
use azs_core::{ObjectIdentity, ObjectKind};
use std::path::{Path, PathBuf};

/// Catalog backed by an exported schema directory
#[derive(Debug, Clone)]
pub struct FileCatalog {
    root: PathBuf,
    default_schema: String,
}

impl FileCatalog {
    /// Create a catalog rooted at `root`; `object.sql` files without a schema
    /// prefix are assigned `default_schema`.
    pub fn new(root: impl Into<PathBuf>, default_schema: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_schema: default_schema.into(),
        }
    }

    /// Schema root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Existing folders holding `kind`, canonical name first
    fn kind_dirs(&self, kind: ObjectKind) -> Vec<PathBuf> {
        std::iter::once(kind.folder_name())
            .chain(kind.folder_aliases().iter().copied())
            .map(|folder| self.root.join(folder))
            .filter(|dir| dir.is_dir())
            .collect()
    }

    fn identity_for(&self, path: &Path) -> CatalogResult<ObjectIdentity> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| ObjectIdentity::parse(stem, &self.default_schema))
            .ok_or_else(|| CatalogError::InvalidFileName {
                path: path.display().to_string(),
            })
    }
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
}

async fn sql_files(dir: &Path) -> CatalogResult<Vec<PathBuf>> {
    let io_err = |source| CatalogError::IoWithPath {
        path: dir.display().to_string(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        if path.is_file() && is_sql_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn read_definition(path: &Path) -> CatalogResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::IoWithPath {
            path: path.display().to_string(),
            source,
        })
}

#[async_trait]
impl ObjectCatalog for FileCatalog {
    async fn fetch(&self, kind: ObjectKind) -> CatalogResult<KindDefinitions> {
        let mut objects = KindDefinitions::new();

        for dir in self.kind_dirs(kind) {
            for path in sql_files(&dir).await? {
                let identity = self.identity_for(&path)?;
                if objects.contains_key(&identity) {
                    return Err(CatalogError::DuplicateObject {
                        kind,
                        name: identity.to_string(),
                        source_name: self.describe(),
                    });
                }
                let definition = read_definition(&path).await?;
                objects.insert(identity, Some(definition));
            }
        }

        log::debug!(
            "Read {} {} from {}",
            objects.len(),
            kind.plural().to_lowercase(),
            self.root.display()
        );
        Ok(objects)
    }

    fn describe(&self) -> String {
        format!("schema tree {}", self.root.display())
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
