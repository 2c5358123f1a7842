//! Desired-versus-actual classification of a single object.

use crate::normalize::{definitions_equivalent, without_bom};
use azs_core::{ChangeKind, Ddl, DiffVerdict, ObjectIdentity, ObjectKind};
use regex::Regex;
use std::sync::OnceLock;

/// State of one side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Definition<'a> {
    /// The catalog does not list the object
    Missing,
    /// The catalog lists the object but its text could not be read
    Unavailable,
    /// The object's definition text
    Text(&'a str),
}

impl<'a> Definition<'a> {
    /// Lift a catalog lookup (`None` = not listed, `Some(None)` = listed
    /// without text) into a definition state.
    pub fn from_entry(entry: Option<&'a Option<String>>) -> Self {
        match entry {
            None => Definition::Missing,
            Some(None) => Definition::Unavailable,
            Some(Some(text)) => Definition::Text(text.as_str()),
        }
    }

    /// Whether the catalog lists the object at all
    pub fn is_present(&self) -> bool {
        !matches!(self, Definition::Missing)
    }

    /// Definition text, if readable
    pub fn text(&self) -> Option<&'a str> {
        match self {
            Definition::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Classifies objects as created, updated, dropped or unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaDiffer;

impl SchemaDiffer {
    /// Create a differ
    pub fn new() -> Self {
        Self
    }

    /// Compare `desired` with `actual` for one object.
    pub fn diff(
        &self,
        desired: Definition<'_>,
        actual: Definition<'_>,
        identity: &ObjectIdentity,
        kind: ObjectKind,
    ) -> DiffVerdict {
        let verdict = |change, ddl| DiffVerdict::new(identity.clone(), kind, change, ddl);

        match (desired, actual) {
            (Definition::Missing, Definition::Missing) => {
                DiffVerdict::unchanged(identity.clone(), kind)
            }
            (Definition::Missing, _) => DiffVerdict::dropped(identity.clone(), kind),
            (Definition::Text(text), Definition::Missing) => {
                verdict(ChangeKind::Created, Ddl::Batch(without_bom(text).to_string()))
            }
            (Definition::Unavailable, Definition::Missing) => {
                verdict(ChangeKind::Created, Ddl::Unavailable)
            }
            (Definition::Unavailable, Definition::Unavailable) => {
                DiffVerdict::unchanged(identity.clone(), kind)
            }
            (Definition::Unavailable, Definition::Text(_)) => {
                verdict(ChangeKind::Updated, Ddl::Unavailable)
            }
            (Definition::Text(text), Definition::Unavailable) => {
                // Nothing to compare against; assume drift.
                verdict(ChangeKind::Updated, update_ddl(text, kind))
            }
            (Definition::Text(desired), Definition::Text(actual)) => {
                if definitions_equivalent(desired, actual) {
                    DiffVerdict::unchanged(identity.clone(), kind)
                } else {
                    verdict(ChangeKind::Updated, update_ddl(desired, kind))
                }
            }
        }
    }
}

fn update_ddl(desired: &str, kind: ObjectKind) -> Ddl {
    match kind {
        ObjectKind::Table => Ddl::TableAlter,
        _ => Ddl::Batch(rewrite_create_to_alter(without_bom(desired))),
    }
}

fn create_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?im)^([ \t]*)CREATE(?:\s+OR\s+ALTER)?(\s+(?:VIEW|PROC(?:EDURE)?|FUNCTION|TRIGGER)\b)",
        )
        .expect("valid regex")
    })
}

/// Rewrite the first `CREATE [OR ALTER] VIEW|PROCEDURE|FUNCTION|TRIGGER`
/// header to `ALTER`. Text without such a header is returned unchanged.
pub fn rewrite_create_to_alter(definition: &str) -> String {
    create_header_re()
        .replacen(definition, 1, "${1}ALTER${2}")
        .into_owned()
}

#[cfg(test)]
#[path = "differ_test.rs"]
mod tests;
