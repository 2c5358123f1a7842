//! Machine-readable plan report

use crate::error::MigrateResult;
use crate::plan::{KindCounts, MigrationPlan, PlanEntry};
use azs_core::{ChangeKind, Ddl, ObjectKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// JSON view of a [`MigrationPlan`]
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub schema: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub summary: BTreeMap<ObjectKind, KindCounts>,
    pub total: KindCounts,
    pub entries: Vec<ReportEntry>,
    pub diagnostics: ReportDiagnostics,
}

/// One changed (or, on request, unchanged) object
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub change: ChangeKind,
    pub kind: ObjectKind,
    pub object: String,
    /// SHA-256 of the normalized desired definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub ddl: DdlStatus,
}

/// What the script carries for an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DdlStatus {
    Statement,
    Drop,
    Unavailable,
    PendingTableAlter,
    None,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportDiagnostics {
    pub cycles: Vec<Vec<String>>,
    pub unordered: Vec<String>,
    pub missing_definitions: Vec<String>,
    pub pending_table_alters: Vec<String>,
}

impl ReportEntry {
    fn from_entry(entry: &PlanEntry) -> Self {
        let ddl = match (entry.change(), &entry.verdict.ddl) {
            (ChangeKind::Dropped, _) => DdlStatus::Drop,
            (_, Ddl::Batch(_)) => DdlStatus::Statement,
            (_, Ddl::Unavailable) => DdlStatus::Unavailable,
            (_, Ddl::TableAlter) => DdlStatus::PendingTableAlter,
            (_, Ddl::None) => DdlStatus::None,
        };
        Self {
            change: entry.change(),
            kind: entry.kind(),
            object: entry.identity().to_string(),
            checksum: entry.checksum.clone(),
            ddl,
        }
    }
}

impl PlanReport {
    /// Build a report; unchanged objects are listed only when
    /// `include_unchanged` is set.
    pub fn from_plan(
        plan: &MigrationPlan,
        schema: Option<&str>,
        generated_at: DateTime<Utc>,
        include_unchanged: bool,
    ) -> Self {
        let mut entries: Vec<ReportEntry> = plan.entries.iter().map(ReportEntry::from_entry).collect();
        if include_unchanged {
            entries.extend(plan.unchanged.iter().map(ReportEntry::from_entry));
        }

        let diagnostics = &plan.diagnostics;
        Self {
            schema: schema.map(str::to_string),
            generated_at,
            summary: plan.summary.rows().collect(),
            total: plan.summary.total(),
            entries,
            diagnostics: ReportDiagnostics {
                cycles: diagnostics
                    .cycle_warnings
                    .iter()
                    .flat_map(|w| w.cycles.iter())
                    .map(|cycle| cycle.iter().map(ToString::to_string).collect())
                    .collect(),
                unordered: diagnostics
                    .cycle_warnings
                    .iter()
                    .flat_map(|w| w.unresolved.iter())
                    .map(ToString::to_string)
                    .collect(),
                missing_definitions: diagnostics
                    .missing_definitions
                    .iter()
                    .map(|(kind, identity)| format!("{} {}", kind, identity))
                    .collect(),
                pending_table_alters: diagnostics
                    .pending_table_alters
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            },
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> MigrateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::MigrationPlanner;
    use azs_catalog::CatalogSnapshot;
    use azs_core::{compute_checksum, ObjectIdentity, SchemaObject};
    use chrono::TimeZone;

    fn plan() -> MigrationPlan {
        let desired = CatalogSnapshot::from_objects([
            SchemaObject::new(ObjectKind::View, ObjectIdentity::new("dbo", "V"), "CREATE VIEW dbo.V AS SELECT 2"),
            SchemaObject::new(ObjectKind::View, ObjectIdentity::new("dbo", "Same"), "CREATE VIEW dbo.Same AS SELECT 1"),
        ]);
        let actual = CatalogSnapshot::from_objects([
            SchemaObject::new(ObjectKind::View, ObjectIdentity::new("dbo", "V"), "CREATE VIEW dbo.V AS SELECT 1"),
            SchemaObject::new(ObjectKind::View, ObjectIdentity::new("dbo", "Same"), "CREATE VIEW dbo.Same AS SELECT 1"),
            SchemaObject::new(ObjectKind::Table, ObjectIdentity::new("dbo", "Old"), "CREATE TABLE dbo.Old (id int)"),
        ]);
        MigrationPlanner::new().plan(&desired, &actual).unwrap()
    }

    #[test]
    fn test_report_json_shape() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let report = PlanReport::from_plan(&plan(), Some("dbo"), at, false);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["schema"], "dbo");
        assert_eq!(json["summary"]["view"]["updated"], 1);
        assert_eq!(json["summary"]["view"]["unchanged"], 1);
        assert_eq!(json["summary"]["table"]["dropped"], 1);
        assert_eq!(json["total"]["dropped"], 1);

        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["change"], "updated");
        assert_eq!(entries[0]["kind"], "view");
        assert_eq!(entries[0]["object"], "dbo.V");
        assert_eq!(entries[0]["ddl"], "statement");
        assert_eq!(
            entries[0]["checksum"],
            compute_checksum("CREATE VIEW dbo.V AS SELECT 2").as_str()
        );
        assert_eq!(entries[1]["ddl"], "drop");
        assert!(entries[1].get("checksum").is_none());
    }

    #[test]
    fn test_report_includes_unchanged_on_request() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let report = PlanReport::from_plan(&plan(), None, at, true);
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.entries[2].change, ChangeKind::Unchanged);
        assert_eq!(report.entries[2].ddl, DdlStatus::None);
        assert!(report.entries[2].checksum.is_some());
    }
}
