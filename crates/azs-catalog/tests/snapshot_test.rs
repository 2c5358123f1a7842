//! Snapshot fetching across catalog implementations

use azs_catalog::{
    fetch_pair, fetch_snapshot, CatalogError, CatalogResult, CatalogSnapshot, FileCatalog,
    KindDefinitions, MemoryCatalog, ObjectCatalog,
};
use azs_core::{ObjectIdentity, ObjectKind, SchemaObject};
use std::fs;
use tempfile::TempDir;

fn export_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    for (folder, file, body) in [
        ("Tables", "dbo.Orders.sql", "CREATE TABLE [dbo].[Orders] (\n    [id] int NOT NULL\n);\n"),
        ("Views", "dbo.v_orders.sql", "CREATE VIEW dbo.v_orders AS SELECT id FROM dbo.Orders"),
        ("Stored Procedures", "dbo.usp_load.sql", "CREATE PROCEDURE dbo.usp_load AS SELECT 1"),
        ("Functions", "dbo.fn_one.sql", "CREATE FUNCTION dbo.fn_one() RETURNS int AS BEGIN RETURN 1 END"),
        ("Triggers", "dbo.trg_orders.sql", "CREATE TRIGGER dbo.trg_orders ON dbo.Orders AFTER INSERT AS SELECT 1"),
    ] {
        fs::create_dir_all(root.join(folder)).unwrap();
        fs::write(root.join(folder).join(file), body).unwrap();
    }
    temp
}

struct FailingCatalog;

#[async_trait::async_trait]
impl ObjectCatalog for FailingCatalog {
    async fn fetch(&self, kind: ObjectKind) -> CatalogResult<KindDefinitions> {
        if kind == ObjectKind::Trigger {
            return Err(CatalogError::QueryFailed {
                kind,
                message: "permission denied".to_string(),
            });
        }
        Ok(KindDefinitions::new())
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

#[tokio::test]
async fn test_file_snapshot_has_every_kind() {
    let temp = export_tree();
    let snapshot = fetch_snapshot(&FileCatalog::new(temp.path(), "dbo"))
        .await
        .unwrap();

    assert_eq!(snapshot.len(), 5);
    for kind in ObjectKind::ALL {
        assert_eq!(snapshot.kind(kind).count(), 1, "{kind}");
    }
    let kinds: Vec<ObjectKind> = snapshot.iter().map(|(kind, _, _)| kind).collect();
    assert_eq!(kinds, ObjectKind::ALL.to_vec());
}

#[tokio::test]
async fn test_fetch_pair_reads_both_sides() {
    let temp = export_tree();
    let desired = FileCatalog::new(temp.path(), "dbo");
    let actual = MemoryCatalog::new(
        "actual",
        [SchemaObject::new(
            ObjectKind::View,
            ObjectIdentity::new("dbo", "v_orders"),
            "CREATE VIEW dbo.v_orders AS SELECT 1",
        )],
    );

    let (desired_snapshot, actual_snapshot) = fetch_pair(&desired, &actual).await.unwrap();
    assert_eq!(desired_snapshot.len(), 5);
    assert_eq!(actual_snapshot.len(), 1);
    assert!(actual_snapshot
        .entry(ObjectKind::View, &ObjectIdentity::new("DBO", "V_ORDERS"))
        .is_some());
    assert!(actual_snapshot
        .entry(ObjectKind::Table, &ObjectIdentity::new("dbo", "Orders"))
        .is_none());
}

#[tokio::test]
async fn test_any_kind_failure_fails_the_snapshot() {
    let result = fetch_snapshot(&FailingCatalog).await;
    assert!(matches!(result, Err(CatalogError::QueryFailed { .. })));

    let memory = MemoryCatalog::default();
    assert!(fetch_pair(&memory, &FailingCatalog).await.is_err());
}

#[tokio::test]
async fn test_memory_catalog_unavailable_definition() {
    let identity = ObjectIdentity::new("dbo", "usp_secret");
    let catalog = MemoryCatalog::default()
        .with_object(SchemaObject::unavailable(ObjectKind::Procedure, identity.clone()));

    let snapshot = fetch_snapshot(&catalog).await.unwrap();
    assert_eq!(snapshot.entry(ObjectKind::Procedure, &identity), Some(&None));
}

#[test]
fn test_snapshot_from_objects_last_wins() {
    let id = ObjectIdentity::new("dbo", "v");
    let snapshot = CatalogSnapshot::from_objects([
        SchemaObject::new(ObjectKind::View, id.clone(), "CREATE VIEW dbo.v AS SELECT 1"),
        SchemaObject::new(ObjectKind::View, id.clone(), "CREATE VIEW dbo.v AS SELECT 2"),
    ]);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(
        snapshot.entry(ObjectKind::View, &id),
        Some(&Some("CREATE VIEW dbo.v AS SELECT 2".to_string()))
    );
    assert!(CatalogSnapshot::new().is_empty());
}
