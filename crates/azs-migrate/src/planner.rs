//! Migration planner
//!
//! Diffs every object of two catalog snapshots, orders the changes by
//! dependency, and records what could not be emitted.

use crate::error::MigrateResult;
use crate::plan::{MigrationPlan, PlanDiagnostics, PlanEntry, PlanSummary};
use azs_catalog::{fetch_pair, CatalogSnapshot, ObjectCatalog};
use azs_core::{
    compute_checksum, ChangeKind, CoreError, CoreResult, CyclicDependencyWarning, Ddl,
    DependencyGraph, DiffVerdict, ObjectIdentity, ObjectKind, TopologicalOrder,
};
use azs_sql::{
    normalize_definition, Definition, DependencyExtractor, PatternExtractor, SchemaDiffer,
    TableAlterGenerator,
};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Builds [`MigrationPlan`]s from desired and actual catalogs.
pub struct MigrationPlanner {
    extractor: Box<dyn DependencyExtractor>,
    table_alter: Option<Box<dyn TableAlterGenerator>>,
    differ: SchemaDiffer,
    fail_on_cycle: bool,
}

impl Default for MigrationPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationPlanner {
    /// Planner with pattern-based extraction and no table ALTER generator
    pub fn new() -> Self {
        Self {
            extractor: Box::new(PatternExtractor),
            table_alter: None,
            differ: SchemaDiffer::new(),
            fail_on_cycle: false,
        }
    }

    /// Replace the dependency extractor
    pub fn with_extractor(mut self, extractor: impl DependencyExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Resolve updated tables through `generator`
    pub fn with_table_alter(mut self, generator: impl TableAlterGenerator + 'static) -> Self {
        self.table_alter = Some(Box::new(generator));
        self
    }

    /// Fail instead of warning when changed objects form a cycle
    pub fn fail_on_cycle(mut self, fail: bool) -> Self {
        self.fail_on_cycle = fail;
        self
    }

    /// Fetch both catalogs concurrently and plan.
    pub async fn plan_catalogs(
        &self,
        desired: &dyn ObjectCatalog,
        actual: &dyn ObjectCatalog,
    ) -> MigrateResult<MigrationPlan> {
        let (desired, actual) = fetch_pair(desired, actual).await?;
        Ok(self.plan(&desired, &actual)?)
    }

    /// Compare `desired` against `actual`.
    ///
    /// Never fails on malformed definitions; an error is only returned for a
    /// cycle when [`fail_on_cycle`](Self::fail_on_cycle) is set.
    pub fn plan(
        &self,
        desired: &CatalogSnapshot,
        actual: &CatalogSnapshot,
    ) -> CoreResult<MigrationPlan> {
        let mut summary = PlanSummary::default();
        let mut diagnostics = PlanDiagnostics::default();
        let mut applied: HashMap<ObjectIdentity, Vec<PlanEntry>> = HashMap::new();
        let mut dropped: HashMap<ObjectIdentity, Vec<PlanEntry>> = HashMap::new();
        let mut unchanged = Vec::new();

        for kind in ObjectKind::ALL {
            let identities: BTreeSet<&ObjectIdentity> = desired
                .kind(kind)
                .chain(actual.kind(kind))
                .map(|(identity, _)| identity)
                .collect();

            for identity in identities {
                let desired_def = Definition::from_entry(desired.entry(kind, identity));
                let actual_def = Definition::from_entry(actual.entry(kind, identity));
                let verdict = self.differ.diff(desired_def, actual_def, identity, kind);
                let verdict = self.resolve_table_alter(verdict, desired_def, actual_def);
                log::debug!("{} {}: {}", kind, identity, verdict.change);

                summary.record(kind, verdict.change);
                match verdict.ddl {
                    Ddl::Unavailable => {
                        log::warn!("{} {}: definition unavailable, no DDL emitted", kind, identity);
                        diagnostics
                            .missing_definitions
                            .push((kind, identity.clone()));
                    }
                    Ddl::TableAlter => diagnostics.pending_table_alters.push(identity.clone()),
                    _ => {}
                }

                let entry = PlanEntry {
                    checksum: desired_def
                        .text()
                        .map(|text| compute_checksum(&normalize_definition(text))),
                    verdict,
                };
                let bucket = match entry.change() {
                    ChangeKind::Unchanged => {
                        unchanged.push(entry);
                        continue;
                    }
                    ChangeKind::Dropped => &mut dropped,
                    ChangeKind::Created | ChangeKind::Updated => &mut applied,
                };
                bucket.entry(identity.clone()).or_default().push(entry);
            }
        }

        let desired_graph = self.build_graph(desired);
        let apply_order = self.restricted_order(
            desired_graph.topological_order(),
            &applied,
            &mut diagnostics,
        )?;

        let actual_graph = self.build_graph(actual);
        let drop_order = self.restricted_order(
            actual_graph.reverse_topological_order(),
            &dropped,
            &mut diagnostics,
        )?;

        let mut entries = Vec::with_capacity(apply_order.len() + drop_order.len());
        for identity in &apply_order {
            entries.extend(applied.remove(identity).unwrap_or_default());
        }
        for identity in &drop_order {
            entries.extend(dropped.remove(identity).unwrap_or_default());
        }

        let total = summary.total();
        log::info!(
            "Plan: {} created, {} updated, {} dropped, {} unchanged",
            total.created,
            total.updated,
            total.dropped,
            total.unchanged
        );

        Ok(MigrationPlan {
            entries,
            unchanged,
            summary,
            diagnostics,
        })
    }

    /// Dependency graph over every object in `snapshot`. Unavailable
    /// definitions contribute nodes but no edges.
    pub fn build_graph(&self, snapshot: &CatalogSnapshot) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (kind, identity, _) in snapshot.iter() {
            graph.add_node(identity.clone(), kind);
        }
        for (_, identity, definition) in snapshot.iter() {
            let Some(text) = definition else {
                continue;
            };
            for dependency in self.extractor.extract(text) {
                graph.add_edge(identity, &dependency);
            }
        }
        graph
    }

    /// Filter a full-graph order to the identities in `selected`, recording
    /// any cycle among them.
    fn restricted_order(
        &self,
        order: TopologicalOrder,
        selected: &HashMap<ObjectIdentity, Vec<PlanEntry>>,
        diagnostics: &mut PlanDiagnostics,
    ) -> CoreResult<Vec<ObjectIdentity>> {
        let warning: Option<CyclicDependencyWarning> = order
            .warning
            .as_ref()
            .and_then(|w| w.restricted_to(|identity| selected.contains_key(identity)));

        if let Some(warning) = warning {
            if self.fail_on_cycle {
                return Err(CoreError::CyclicDependency {
                    members: warning
                        .unresolved
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
            log::warn!("{}", warning);
            diagnostics.cycle_warnings.push(warning);
        }

        let mut seen = HashSet::new();
        Ok(order
            .order
            .into_iter()
            .filter(|identity| selected.contains_key(identity))
            .filter(|identity| seen.insert(identity.clone()))
            .collect())
    }

    fn resolve_table_alter(
        &self,
        verdict: DiffVerdict,
        desired: Definition<'_>,
        actual: Definition<'_>,
    ) -> DiffVerdict {
        if verdict.ddl != Ddl::TableAlter {
            return verdict;
        }
        let (Some(generator), Some(desired_text), Some(actual_text)) =
            (self.table_alter.as_deref(), desired.text(), actual.text())
        else {
            return verdict;
        };

        let statements = generator.alter_statements(
            desired_text,
            actual_text,
            verdict.identity.schema(),
            verdict.identity.name(),
        );
        if statements.is_empty() {
            return verdict;
        }
        DiffVerdict {
            ddl: Ddl::Batch(statements.join("\n")),
            ..verdict
        }
    }
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
