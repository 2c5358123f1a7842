//! Diff verdicts produced when a desired definition is compared with the
//! actual one.

use crate::object::{ObjectIdentity, ObjectKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a single object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Present in desired only
    Created,
    /// Present in both, different after normalization
    Updated,
    /// Present in actual only
    Dropped,
    /// Present in both, equal after normalization
    Unchanged,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Created => write!(f, "Created"),
            ChangeKind::Updated => write!(f, "Updated"),
            ChangeKind::Dropped => write!(f, "Dropped"),
            ChangeKind::Unchanged => write!(f, "Unchanged"),
        }
    }
}

/// DDL attached to a verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ddl {
    /// Nothing to emit (dropped and unchanged objects)
    None,
    /// One batch of SQL to apply
    Batch(String),
    /// Table changed; statements must come from a table ALTER generator
    TableAlter,
    /// The definition text is not available, so nothing can be emitted
    Unavailable,
}

/// Result of diffing one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffVerdict {
    /// Object identity
    pub identity: ObjectIdentity,
    /// Object kind
    pub kind: ObjectKind,
    /// Classification
    pub change: ChangeKind,
    /// DDL to apply for created and updated objects
    pub ddl: Ddl,
}

impl DiffVerdict {
    /// Build a verdict
    pub fn new(identity: ObjectIdentity, kind: ObjectKind, change: ChangeKind, ddl: Ddl) -> Self {
        Self {
            identity,
            kind,
            change,
            ddl,
        }
    }

    /// Dropped verdict (no DDL; the drop statement is rendered from the kind)
    pub fn dropped(identity: ObjectIdentity, kind: ObjectKind) -> Self {
        Self::new(identity, kind, ChangeKind::Dropped, Ddl::None)
    }

    /// Unchanged verdict
    pub fn unchanged(identity: ObjectIdentity, kind: ObjectKind) -> Self {
        Self::new(identity, kind, ChangeKind::Unchanged, Ddl::None)
    }

    /// Whether the verdict represents a change that belongs in a plan
    pub fn is_change(&self) -> bool {
        self.change != ChangeKind::Unchanged
    }

    /// Whether the verdict creates or updates the object
    pub fn is_apply(&self) -> bool {
        matches!(self.change, ChangeKind::Created | ChangeKind::Updated)
    }

    /// The batch text, when the verdict carries executable DDL
    pub fn batch(&self) -> Option<&str> {
        match &self.ddl {
            Ddl::Batch(sql) => Some(sql),
            _ => None,
        }
    }

    /// Whether the object was reported without a usable definition
    pub fn definition_unavailable(&self) -> bool {
        self.ddl == Ddl::Unavailable
    }
}
