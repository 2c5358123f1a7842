//! End-to-end planning properties over exported schema trees

use azs_catalog::{fetch_snapshot, FileCatalog, MemoryCatalog};
use azs_core::{ChangeKind, ObjectIdentity, ObjectKind, SchemaObject};
use azs_migrate::{render_script, write_migration, MigrationPlan, MigrationPlanner};
use chrono::{TimeZone, Utc};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, folder: &str, file: &str, content: &str) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

fn id(name: &str) -> ObjectIdentity {
    ObjectIdentity::new("dbo", name)
}

fn sales_tree(root: &Path) {
    write(root, "Tables", "dbo.Customers.sql", "CREATE TABLE [dbo].[Customers] (\r\n    [id] int NOT NULL\r\n);\r\n");
    write(root, "Tables", "dbo.Orders.sql", "CREATE TABLE [dbo].[Orders] (\r\n    [id] int NOT NULL,\r\n    [customer_id] int REFERENCES dbo.Customers(id)\r\n);\r\n");
    write(root, "Views", "dbo.v_orders.sql", "CREATE VIEW dbo.v_orders AS\r\nSELECT o.id FROM dbo.Orders o JOIN dbo.Customers c ON c.id = o.customer_id\r\n");
    write(root, "Functions", "dbo.fn_total.sql", "CREATE FUNCTION dbo.fn_total() RETURNS int AS BEGIN RETURN (SELECT COUNT(*) FROM dbo.v_orders) END\r\n");
    write(root, "Stored Procedures", "dbo.usp_report.sql", "CREATE PROCEDURE dbo.usp_report AS\r\nSELECT dbo.fn_total()\r\n");
    write(root, "Triggers", "dbo.trg_orders.sql", "CREATE TRIGGER dbo.trg_orders ON dbo.Orders AFTER INSERT AS\r\nEXEC dbo.usp_report\r\n");
}

async fn plan_trees(desired: &Path, actual: &Path) -> MigrationPlan {
    MigrationPlanner::new()
        .plan_catalogs(
            &FileCatalog::new(desired, "dbo"),
            &FileCatalog::new(actual, "dbo"),
        )
        .await
        .unwrap()
}

fn position(plan: &MigrationPlan, name: &str) -> usize {
    plan.position(&id(name))
        .unwrap_or_else(|| panic!("{name} missing from plan"))
}

#[tokio::test]
async fn test_plan_against_itself_is_empty() {
    let temp = TempDir::new().unwrap();
    sales_tree(temp.path());

    let plan = plan_trees(temp.path(), temp.path()).await;
    assert!(plan.is_empty());
    assert_eq!(plan.unchanged.len(), 6);
    assert_eq!(plan.summary.total().changes(), 0);
}

#[tokio::test]
async fn test_headers_and_line_endings_are_not_changes() {
    let desired = TempDir::new().unwrap();
    let actual = TempDir::new().unwrap();
    sales_tree(desired.path());
    sales_tree(actual.path());
    write(
        actual.path(),
        "Views",
        "dbo.v_orders.sql",
        "/****** Object:  View [dbo].[v_orders]    Script Date: 1/1/2024 ******/\nSET ANSI_NULLS ON\nGO\nSET QUOTED_IDENTIFIER ON\nGO\nCREATE VIEW dbo.v_orders AS\nSELECT o.id FROM dbo.Orders o JOIN dbo.Customers c ON c.id = o.customer_id\n",
    );

    let plan = plan_trees(desired.path(), actual.path()).await;
    assert!(plan.is_empty(), "unexpected entries: {:?}", plan.entries);
}

#[tokio::test]
async fn test_creation_order_respects_every_edge() {
    let desired = TempDir::new().unwrap();
    let actual = TempDir::new().unwrap();
    sales_tree(desired.path());

    let plan = plan_trees(desired.path(), actual.path()).await;
    assert_eq!(plan.entries.len(), 6);
    assert!(plan.entries.iter().all(|e| e.change() == ChangeKind::Created));

    let snapshot = fetch_snapshot(&FileCatalog::new(desired.path(), "dbo"))
        .await
        .unwrap();
    let graph = MigrationPlanner::new().build_graph(&snapshot);
    let mut edges = 0;
    for entry in &plan.entries {
        for dependency in graph.dependencies(entry.identity()) {
            if let Some(dep_pos) = plan.position(&dependency) {
                assert!(dep_pos < position(&plan, entry.identity().name()));
                edges += 1;
            }
        }
    }
    assert!(edges >= 6);
    assert!(position(&plan, "Customers") < position(&plan, "Orders"));
    assert!(position(&plan, "fn_total") < position(&plan, "usp_report"));
    assert!(position(&plan, "usp_report") < position(&plan, "trg_orders"));
}

#[tokio::test]
async fn test_plans_are_deterministic() {
    let desired = TempDir::new().unwrap();
    let actual = TempDir::new().unwrap();
    sales_tree(desired.path());

    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let first = render_script(&plan_trees(desired.path(), actual.path()).await, Some("dbo"), at);
    for _ in 0..5 {
        let again = render_script(&plan_trees(desired.path(), actual.path()).await, Some("dbo"), at);
        assert_eq!(first, again);
    }
}

#[tokio::test]
async fn test_drop_order_removes_dependents_first() {
    let desired = TempDir::new().unwrap();
    let actual = TempDir::new().unwrap();
    sales_tree(actual.path());

    let plan = plan_trees(desired.path(), actual.path()).await;
    assert_eq!(plan.dropped().count(), 6);
    assert!(position(&plan, "v_orders") < position(&plan, "Orders"));
    assert!(position(&plan, "Orders") < position(&plan, "Customers"));
    assert!(position(&plan, "trg_orders") < position(&plan, "Orders"));
    assert!(position(&plan, "usp_report") < position(&plan, "fn_total"));
}

#[tokio::test]
async fn test_cycle_still_plans_every_object() {
    let catalog = MemoryCatalog::new(
        "cycle",
        [
            SchemaObject::new(ObjectKind::View, id("A"), "CREATE VIEW dbo.A AS SELECT * FROM dbo.B"),
            SchemaObject::new(ObjectKind::View, id("B"), "CREATE VIEW dbo.B AS SELECT * FROM dbo.C"),
            SchemaObject::new(ObjectKind::View, id("C"), "CREATE VIEW dbo.C AS SELECT * FROM dbo.A"),
        ],
    );
    let plan = MigrationPlanner::new()
        .plan_catalogs(&catalog, &MemoryCatalog::default())
        .await
        .unwrap();

    assert_eq!(plan.entries.len(), 3);
    let warning = &plan.diagnostics.cycle_warnings[0];
    assert_eq!(warning.unresolved, vec![id("A"), id("B"), id("C")]);
}

#[tokio::test]
async fn test_written_migration_matches_rendered_script() {
    let desired = TempDir::new().unwrap();
    let actual = TempDir::new().unwrap();
    let migrations = TempDir::new().unwrap();
    sales_tree(desired.path());

    let plan = plan_trees(desired.path(), actual.path()).await;
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let script = render_script(&plan, Some("dbo"), at);
    let path = write_migration(migrations.path(), &script).unwrap();

    assert!(path.ends_with("update0001.sql"));
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, script);
    assert!(written.contains("-- Create Trigger: dbo.trg_orders\nCREATE TRIGGER dbo.trg_orders ON dbo.Orders"));
}
