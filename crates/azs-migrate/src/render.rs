//! Migration script rendering
//!
//! The script opens with a comment header (per-kind summary, one row per
//! changed object, diagnostics, generation time), followed by one block per
//! created or updated object separated by `GO`, and the `DROP` statements.

use crate::plan::{MigrationPlan, PlanEntry};
use azs_core::{ChangeKind, Ddl};
use chrono::{DateTime, Utc};
use std::fmt::Write;

const UNAVAILABLE_MARKER: &str = "-- (definition unavailable)";
const PENDING_ALTER_MARKER: &str = "-- (table changed; ALTER TABLE statements required)";

/// Render `plan` as a SQL script.
///
/// `generated_at` is supplied by the caller so that rendering stays
/// deterministic.
pub fn render_script(
    plan: &MigrationPlan,
    schema_label: Option<&str>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    render_header(&mut out, plan, schema_label, generated_at);

    let blocks: Vec<String> = plan.entries.iter().map(render_entry).collect();
    out.push_str(&blocks.join("\n"));
    out
}

fn render_header(
    out: &mut String,
    plan: &MigrationPlan,
    schema_label: Option<&str>,
    generated_at: DateTime<Utc>,
) {
    out.push_str("-- Summary\n");
    let _ = writeln!(out, "-- Schema: {}", schema_label.unwrap_or("(all)"));
    out.push_str("-- | Type | Created | Updated | Dropped | Unchanged |\n");
    out.push_str("-- |------|--------:|--------:|--------:|----------:|\n");
    for (kind, counts) in plan.summary.rows() {
        let _ = writeln!(
            out,
            "-- | {} | {} | {} | {} | {} |",
            kind.plural(),
            counts.created,
            counts.updated,
            counts.dropped,
            counts.unchanged
        );
    }
    out.push_str("--\n");

    out.push_str("-- Details\n");
    out.push_str("-- | Change | Type | Object |\n");
    out.push_str("-- |--------|------|--------|\n");
    let mut details: Vec<&PlanEntry> = plan.entries.iter().collect();
    details.sort_by(|a, b| {
        a.kind()
            .cmp(&b.kind())
            .then_with(|| a.change().cmp(&b.change()))
            .then_with(|| a.identity().cmp(b.identity()))
    });
    for entry in details {
        let _ = writeln!(
            out,
            "-- | {} | {} | {} |",
            entry.change(),
            entry.kind().plural(),
            entry.identity()
        );
    }

    for warning in &plan.diagnostics.cycle_warnings {
        let _ = writeln!(out, "-- Warning: {}", warning);
    }
    for (kind, identity) in &plan.diagnostics.missing_definitions {
        let _ = writeln!(out, "-- Warning: {} {} has no available definition", kind, identity);
    }

    let _ = writeln!(
        out,
        "-- Generated at {}Z\n",
        generated_at.format("%Y-%m-%dT%H:%M:%S%.6f")
    );
}

fn render_entry(entry: &PlanEntry) -> String {
    let verdict = &entry.verdict;
    let action = match verdict.change {
        ChangeKind::Dropped => {
            return format!("{}\n", verdict.kind.drop_statement(&verdict.identity));
        }
        ChangeKind::Created => "Create",
        ChangeKind::Updated => "Update",
        ChangeKind::Unchanged => return String::new(),
    };

    let title = format!("-- {} {}: {}", action, verdict.kind.label(), verdict.identity);
    match &verdict.ddl {
        Ddl::Batch(sql) => format!("{}\n{}\nGO\n", title, sql.trim_end()),
        Ddl::Unavailable => format!("{}\n{}\n", title, UNAVAILABLE_MARKER),
        Ddl::TableAlter => format!("{}\n{}\n", title, PENDING_ALTER_MARKER),
        Ddl::None => format!("{}\n", title),
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
