//! Live database catalog
//!
//! The catalog owns the `sys.*` queries; connecting to and querying the
//! server is delegated to a caller-supplied [`DefinitionQuery`].

use crate::error::CatalogResult;
use crate::table_ddl::{table_definition, TableColumnRow, TABLE_COLUMNS_QUERY};
use crate::traits::{KindDefinitions, ObjectCatalog};
use async_trait::async_trait;
use azs_core::{ObjectIdentity, ObjectKind};
use std::collections::BTreeMap;

/// One row returned by a definition query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRow {
    /// Object name (without schema)
    pub name: String,
    /// `OBJECT_DEFINITION` result; NULL for encrypted objects
    pub definition: Option<String>,
}

impl DefinitionRow {
    /// Build a row
    pub fn new(name: impl Into<String>, definition: Option<String>) -> Self {
        Self {
            name: name.into(),
            definition,
        }
    }
}

/// Executes a catalog query on behalf of [`QueryCatalog`].
///
/// `sql` takes a single parameter, `@schema`, bound to `schema`.
#[async_trait]
pub trait DefinitionQuery: Send + Sync {
    /// Run `sql` and return `(name, definition)` rows
    async fn query(&self, kind: ObjectKind, sql: &str, schema: &str)
        -> CatalogResult<Vec<DefinitionRow>>;

    /// Run the table column query (`sql`) and return one row per column
    async fn columns(&self, sql: &str, schema: &str) -> CatalogResult<Vec<TableColumnRow>>;

    /// Server or connection label for logging
    fn target(&self) -> String;
}

/// Catalog query listing the objects of `kind` in the schema bound to
/// `@schema`.
///
/// Tables have no stored definition; their query returns column rows
/// instead (see [`TableColumnRow`]).
pub fn object_query(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Table => TABLE_COLUMNS_QUERY,
        ObjectKind::View => {
            "SELECT v.name, OBJECT_DEFINITION(v.object_id) AS definition \
             FROM sys.views v \
             JOIN sys.schemas s ON v.schema_id = s.schema_id \
             WHERE s.name = @schema"
        }
        ObjectKind::Procedure => {
            "SELECT p.name, OBJECT_DEFINITION(p.object_id) AS definition \
             FROM sys.procedures p \
             JOIN sys.schemas s ON p.schema_id = s.schema_id \
             WHERE s.name = @schema"
        }
        ObjectKind::Function => {
            "SELECT f.name, OBJECT_DEFINITION(f.object_id) AS definition \
             FROM sys.objects f \
             JOIN sys.schemas s ON f.schema_id = s.schema_id \
             WHERE s.name = @schema AND f.type IN ('FN', 'TF', 'IF')"
        }
        // Triggers have no schema of their own; use the parent's.
        ObjectKind::Trigger => {
            "SELECT tr.name, OBJECT_DEFINITION(tr.object_id) AS definition \
             FROM sys.triggers tr \
             JOIN sys.objects o ON tr.parent_id = o.object_id \
             JOIN sys.schemas s ON o.schema_id = s.schema_id \
             WHERE s.name = @schema"
        }
    }
}

/// Catalog reading one schema of a live database
pub struct QueryCatalog<Q> {
    executor: Q,
    schema: String,
}

impl<Q: DefinitionQuery> QueryCatalog<Q> {
    /// Create a catalog for `schema` using `executor`
    pub fn new(executor: Q, schema: impl Into<String>) -> Self {
        Self {
            executor,
            schema: schema.into(),
        }
    }

    /// Schema being read
    pub fn schema(&self) -> &str {
        &self.schema
    }

    async fn fetch_tables(&self) -> CatalogResult<KindDefinitions> {
        let rows = self
            .executor
            .columns(object_query(ObjectKind::Table), &self.schema)
            .await?;

        let mut tables: BTreeMap<ObjectIdentity, Vec<TableColumnRow>> = BTreeMap::new();
        for row in rows {
            tables
                .entry(ObjectIdentity::new(&self.schema, &row.table))
                .or_default()
                .push(row);
        }
        Ok(tables
            .into_iter()
            .map(|(identity, columns)| {
                let ddl = table_definition(identity.schema(), identity.name(), &columns);
                (identity, Some(ddl))
            })
            .collect())
    }
}

#[async_trait]
impl<Q: DefinitionQuery> ObjectCatalog for QueryCatalog<Q> {
    async fn fetch(&self, kind: ObjectKind) -> CatalogResult<KindDefinitions> {
        if kind == ObjectKind::Table {
            return self.fetch_tables().await;
        }
        let rows = self
            .executor
            .query(kind, object_query(kind), &self.schema)
            .await?;

        let mut objects = KindDefinitions::new();
        for row in rows {
            if row.definition.is_none() {
                log::debug!("{} {}.{} has no readable definition", kind, self.schema, row.name);
            }
            objects.insert(ObjectIdentity::new(&self.schema, &row.name), row.definition);
        }
        Ok(objects)
    }

    fn describe(&self) -> String {
        format!("{} schema {}", self.executor.target(), self.schema)
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
