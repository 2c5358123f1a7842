//! Migration plan model

use azs_core::{ChangeKind, CyclicDependencyWarning, Ddl, DiffVerdict, ObjectIdentity, ObjectKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// One classified object in a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// Differ verdict, with table ALTERs already resolved where possible
    pub verdict: DiffVerdict,
    /// SHA-256 of the normalized desired definition
    pub checksum: Option<String>,
}

impl PlanEntry {
    /// Entry identity
    pub fn identity(&self) -> &ObjectIdentity {
        &self.verdict.identity
    }

    /// Entry kind
    pub fn kind(&self) -> ObjectKind {
        self.verdict.kind
    }

    /// Entry classification
    pub fn change(&self) -> ChangeKind {
        self.verdict.change
    }

    /// Statement this entry contributes to the script, if any
    pub fn statement(&self) -> Option<String> {
        match (self.verdict.change, &self.verdict.ddl) {
            (ChangeKind::Dropped, _) => Some(self.verdict.kind.drop_statement(&self.verdict.identity)),
            (_, Ddl::Batch(sql)) => Some(sql.clone()),
            _ => None,
        }
    }
}

/// Per-kind counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub created: usize,
    pub updated: usize,
    pub dropped: usize,
    pub unchanged: usize,
}

impl KindCounts {
    fn record(&mut self, change: ChangeKind) {
        match change {
            ChangeKind::Created => self.created += 1,
            ChangeKind::Updated => self.updated += 1,
            ChangeKind::Dropped => self.dropped += 1,
            ChangeKind::Unchanged => self.unchanged += 1,
        }
    }

    /// Created + updated + dropped
    pub fn changes(&self) -> usize {
        self.created + self.updated + self.dropped
    }
}

/// Counts per kind per verdict
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlanSummary {
    kinds: BTreeMap<ObjectKind, KindCounts>,
}

impl PlanSummary {
    /// Count one verdict
    pub fn record(&mut self, kind: ObjectKind, change: ChangeKind) {
        self.kinds.entry(kind).or_default().record(change);
    }

    /// Counts for `kind` (zero when nothing of that kind was seen)
    pub fn counts(&self, kind: ObjectKind) -> KindCounts {
        self.kinds.get(&kind).copied().unwrap_or_default()
    }

    /// Every kind in kind order, including kinds with zero counts
    pub fn rows(&self) -> impl Iterator<Item = (ObjectKind, KindCounts)> + '_ {
        ObjectKind::ALL.into_iter().map(|kind| (kind, self.counts(kind)))
    }

    /// Totals across kinds
    pub fn total(&self) -> KindCounts {
        self.kinds.values().fold(KindCounts::default(), |acc, c| KindCounts {
            created: acc.created + c.created,
            updated: acc.updated + c.updated,
            dropped: acc.dropped + c.dropped,
            unchanged: acc.unchanged + c.unchanged,
        })
    }
}

/// Non-fatal findings attached to a plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanDiagnostics {
    /// Cycles among the objects being applied or dropped
    pub cycle_warnings: Vec<CyclicDependencyWarning>,
    /// Created/updated objects whose definition text was unavailable
    pub missing_definitions: Vec<(ObjectKind, ObjectIdentity)>,
    /// Updated tables for which no ALTER statements were produced
    pub pending_table_alters: Vec<ObjectIdentity>,
}

impl PlanDiagnostics {
    /// Whether anything was reported
    pub fn is_empty(&self) -> bool {
        self.cycle_warnings.is_empty()
            && self.missing_definitions.is_empty()
            && self.pending_table_alters.is_empty()
    }
}

/// Ordered result of comparing two catalogs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Created/updated entries in dependency order, then dropped entries in
    /// reverse dependency order
    pub entries: Vec<PlanEntry>,
    /// Unchanged objects, by kind then identity
    pub unchanged: Vec<PlanEntry>,
    /// Counts per kind per verdict
    pub summary: PlanSummary,
    /// Cycles, unavailable definitions and pending table ALTERs
    pub diagnostics: PlanDiagnostics,
}

impl MigrationPlan {
    /// True when there is nothing to create, update or drop
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Created and updated entries, in application order
    pub fn applied(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(|e| e.verdict.is_apply())
    }

    /// Dropped entries, in drop order
    pub fn dropped(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries
            .iter()
            .filter(|e| e.change() == ChangeKind::Dropped)
    }

    /// Executable statements in order; unavailable definitions and pending
    /// table ALTERs contribute nothing.
    pub fn statements(&self) -> Vec<String> {
        self.entries.iter().filter_map(PlanEntry::statement).collect()
    }

    /// Position of `identity` in the entry sequence
    pub fn position(&self, identity: &ObjectIdentity) -> Option<usize> {
        self.entries.iter().position(|e| e.identity() == identity)
    }
}
