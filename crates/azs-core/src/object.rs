//! Schema object model: kinds, case-insensitive identities, and definitions.

use crate::sql_utils::{quote_qualified, split_name_parts, unquote_ident};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Kind of schema object managed by azsync.
///
/// The declaration order is the ordering used for deterministic tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Base table
    Table,
    /// View
    View,
    /// Scalar, inline or multi-statement table-valued function
    Function,
    /// Stored procedure
    Procedure,
    /// DML trigger
    Trigger,
}

impl ObjectKind {
    /// Every kind, in ordering order.
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Table,
        ObjectKind::View,
        ObjectKind::Function,
        ObjectKind::Procedure,
        ObjectKind::Trigger,
    ];

    /// Singular display label
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Table => "Table",
            ObjectKind::View => "View",
            ObjectKind::Function => "Function",
            ObjectKind::Procedure => "Procedure",
            ObjectKind::Trigger => "Trigger",
        }
    }

    /// Plural label used in summaries
    pub fn plural(&self) -> &'static str {
        match self {
            ObjectKind::Table => "Tables",
            ObjectKind::View => "Views",
            ObjectKind::Function => "Functions",
            ObjectKind::Procedure => "Procedures",
            ObjectKind::Trigger => "Triggers",
        }
    }

    /// Keyword used in `CREATE`/`ALTER`/`DROP` statements
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            ObjectKind::Table => "TABLE",
            ObjectKind::View => "VIEW",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Procedure => "PROCEDURE",
            ObjectKind::Trigger => "TRIGGER",
        }
    }

    /// Folder holding this kind in an exported schema tree.
    pub fn folder_name(&self) -> &'static str {
        match self {
            ObjectKind::Table => "Tables",
            ObjectKind::View => "Views",
            ObjectKind::Function => "Functions",
            ObjectKind::Procedure => "Stored Procedures",
            ObjectKind::Trigger => "Triggers",
        }
    }

    /// Alternative folder spellings accepted when reading a schema tree.
    pub fn folder_aliases(&self) -> &'static [&'static str] {
        match self {
            ObjectKind::Procedure => &["StoredProcedures", "Procedures"],
            _ => &[],
        }
    }

    /// `DROP <KIND> [schema].[name];`
    pub fn drop_statement(&self, identity: &ObjectIdentity) -> String {
        format!("DROP {} {};", self.sql_keyword(), identity.quoted())
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `(schema, name)` pair identifying one schema object.
///
/// Equality, hashing and ordering ignore case, so `dbo.Orders` and
/// `DBO.orders` are the same object. The original spelling is kept for
/// display and generated DDL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectIdentity {
    schema: String,
    name: String,
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

impl ObjectIdentity {
    /// Create an identity; bracket or double-quote delimiters are stripped.
    pub fn new(schema: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self {
            schema: unquote_ident(schema.as_ref()),
            name: unquote_ident(name.as_ref()),
        }
    }

    /// Parse a one-, two- or three-part name. A missing schema falls back to
    /// `default_schema`; a leading database part is ignored.
    ///
    /// Returns `None` when a part is empty.
    pub fn parse(qualified: &str, default_schema: &str) -> Option<Self> {
        let parts = split_name_parts(qualified);
        let (schema, name) = match parts.as_slice() {
            [name] => (default_schema.to_string(), name.clone()),
            [.., schema, name] => (schema.clone(), name.clone()),
            [] => return None,
        };
        if schema.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self { schema, name })
    }

    /// Schema part, as originally spelled
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Object name part, as originally spelled
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `[schema].[name]`
    pub fn quoted(&self) -> String {
        quote_qualified(&self.schema, &self.name)
    }
}

impl PartialEq for ObjectIdentity {
    fn eq(&self, other: &Self) -> bool {
        folded(&self.schema).eq(folded(&other.schema)) && folded(&self.name).eq(folded(&other.name))
    }
}

impl Eq for ObjectIdentity {}

impl Hash for ObjectIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for ch in folded(&self.schema) {
            ch.hash(state);
        }
        // Separator so ("ab", "c") and ("a", "bc") hash apart.
        '\u{0}'.hash(state);
        for ch in folded(&self.name) {
            ch.hash(state);
        }
    }
}

impl Ord for ObjectIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        folded(&self.schema)
            .cmp(folded(&other.schema))
            .then_with(|| folded(&self.name).cmp(folded(&other.name)))
    }
}

impl PartialOrd for ObjectIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// One schema object as read from a catalog.
///
/// `definition` is `None` when the text is unavailable (encrypted module,
/// missing permission).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaObject {
    /// Object kind
    pub kind: ObjectKind,
    /// Case-insensitive identity
    pub identity: ObjectIdentity,
    /// Full DDL or module body
    pub definition: Option<String>,
}

impl SchemaObject {
    /// Object with a known definition
    pub fn new(kind: ObjectKind, identity: ObjectIdentity, definition: impl Into<String>) -> Self {
        Self {
            kind,
            identity,
            definition: Some(definition.into()),
        }
    }

    /// Object whose definition could not be read
    pub fn unavailable(kind: ObjectKind, identity: ObjectIdentity) -> Self {
        Self {
            kind,
            identity,
            definition: None,
        }
    }

    /// Definition text, if available
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }
}

#[cfg(test)]
#[path = "object_test.rs"]
mod tests;
