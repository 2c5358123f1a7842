//! Column-level `ALTER TABLE` synthesis.
//!
//! Tables cannot be re-created in place, so an updated table is migrated
//! with a sequence of `ALTER TABLE` statements derived from the desired and
//! actual `CREATE TABLE` texts. The parser understands the exporter layout:
//! one column or constraint per comma-separated element of the table body.

use crate::extractor::IDENT;
use azs_core::sql_utils::{quote_bracket, quote_qualified, unquote_ident};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Produces the statements that turn `actual` into `desired` for one table.
pub trait TableAlterGenerator: Send + Sync {
    /// Zero or more statements; an empty result means the generator could
    /// not express the change.
    fn alter_statements(&self, desired: &str, actual: &str, schema: &str, table: &str)
        -> Vec<String>;
}

/// Column and constraint diff over `CREATE TABLE` texts.
///
/// Statements are emitted in a fixed order: dropped constraints, dropped
/// columns, added columns, altered columns, added constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnAlterGenerator;

impl TableAlterGenerator for ColumnAlterGenerator {
    fn alter_statements(
        &self,
        desired: &str,
        actual: &str,
        schema: &str,
        table: &str,
    ) -> Vec<String> {
        let (Some(desired_shape), Some(actual_shape)) =
            (TableShape::parse(desired), TableShape::parse(actual))
        else {
            log::warn!(
                "Cannot parse CREATE TABLE for {}.{}; no ALTER statements generated",
                schema,
                table
            );
            return Vec::new();
        };

        let target = quote_qualified(schema, table);
        let mut statements = Vec::new();

        let desired_constraints: HashSet<String> = desired_shape
            .constraints
            .iter()
            .map(|c| comparable(&c.definition))
            .collect();
        let actual_constraints: HashSet<String> = actual_shape
            .constraints
            .iter()
            .map(|c| comparable(&c.definition))
            .collect();

        for constraint in &actual_shape.constraints {
            if desired_constraints.contains(&comparable(&constraint.definition)) {
                continue;
            }
            match &constraint.name {
                Some(name) => statements.push(format!(
                    "ALTER TABLE {} DROP CONSTRAINT {};",
                    target,
                    quote_bracket(name)
                )),
                None => log::warn!(
                    "Unnamed constraint on {} cannot be dropped: {}",
                    target,
                    constraint.definition
                ),
            }
        }

        for column in &actual_shape.columns {
            if desired_shape.column(&column.key).is_none() {
                statements.push(format!(
                    "ALTER TABLE {} DROP COLUMN {};",
                    target,
                    quote_bracket(&column.name)
                ));
            }
        }

        for column in &desired_shape.columns {
            if actual_shape.column(&column.key).is_none() {
                statements.push(format!("ALTER TABLE {} ADD {};", target, column.definition));
            }
        }

        for column in &desired_shape.columns {
            let Some(existing) = actual_shape.column(&column.key) else {
                continue;
            };
            if comparable(&column.definition) == comparable(&existing.definition) {
                continue;
            }
            let altered = strip_default_and_identity(&column.definition);
            if comparable(&altered) == comparable(&strip_default_and_identity(&existing.definition)) {
                log::warn!(
                    "Column {} on {} differs only in DEFAULT or IDENTITY; not altered",
                    column.name,
                    target
                );
                continue;
            }
            statements.push(format!("ALTER TABLE {} ALTER COLUMN {};", target, altered));
        }

        for constraint in &desired_shape.constraints {
            if !actual_constraints.contains(&comparable(&constraint.definition)) {
                statements.push(format!("ALTER TABLE {} ADD {};", target, constraint.definition));
            }
        }

        statements
    }
}

#[derive(Debug, Clone)]
struct Column {
    /// Case-folded unquoted name
    key: String,
    name: String,
    definition: String,
}

#[derive(Debug, Clone)]
struct Constraint {
    name: Option<String>,
    definition: String,
}

#[derive(Debug, Default)]
struct TableShape {
    columns: Vec<Column>,
    constraints: Vec<Constraint>,
}

impl TableShape {
    fn parse(ddl: &str) -> Option<Self> {
        let body = table_body(ddl)?;
        let mut shape = TableShape::default();

        for element in split_top_level(body, ',') {
            let definition = element.split_whitespace().collect::<Vec<_>>().join(" ");
            if definition.is_empty() {
                continue;
            }
            if let Some(caps) = constraint_re().captures(&definition) {
                let name = caps.name("name").map(|m| unquote_ident(m.as_str()));
                shape.constraints.push(Constraint { name, definition });
                continue;
            }
            let name = leading_identifier(&definition)?;
            shape.columns.push(Column {
                key: name.to_lowercase(),
                name,
                definition,
            });
        }

        Some(shape)
    }

    fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }
}

fn constraint_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)^(?:CONSTRAINT\s+(?P<name>{IDENT})\s+)?(?:PRIMARY\s+KEY|UNIQUE|FOREIGN\s+KEY|CHECK|INDEX)\b"
        ))
        .expect("valid regex")
    })
}

fn default_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?i)\s+(?:CONSTRAINT\s+{IDENT}\s+)?DEFAULT\s+"))
            .expect("valid regex")
    })
}

fn identity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\s+IDENTITY(?:\s*\(\s*-?\d+\s*,\s*-?\d+\s*\))?").expect("valid regex")
    })
}

/// Whitespace- and case-insensitive comparison key
fn comparable(definition: &str) -> String {
    definition
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Text between the first top-level `(` and its matching `)`.
fn table_body(ddl: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start = None;
    let mut closing: Option<char> = None;

    for (idx, ch) in ddl.char_indices() {
        match closing {
            Some(end) if ch == end => closing = None,
            Some(_) => {}
            None => match ch {
                '[' => closing = Some(']'),
                '\'' => closing = Some('\''),
                '"' => closing = Some('"'),
                '(' => {
                    if depth == 0 && start.is_none() {
                        start = Some(idx + 1);
                    }
                    depth += 1;
                }
                ')' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        return start.map(|s| &ddl[s..idx]);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// Split on `separator` outside parentheses, brackets and literals.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut closing: Option<char> = None;
    let mut last = 0;

    for (idx, ch) in text.char_indices() {
        match closing {
            Some(end) if ch == end => closing = None,
            Some(_) => {}
            None => match ch {
                '[' => closing = Some(']'),
                '\'' => closing = Some('\''),
                '"' => closing = Some('"'),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if c == separator && depth == 0 => {
                    parts.push(&text[last..idx]);
                    last = idx + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    parts.push(&text[last..]);
    parts
}

fn leading_identifier(definition: &str) -> Option<String> {
    let end = if definition.starts_with('[') {
        definition.find(']').map(|i| i + 1)?
    } else if let Some(rest) = definition.strip_prefix('"') {
        rest.find('"').map(|i| i + 2)?
    } else {
        definition
            .find(char::is_whitespace)
            .unwrap_or(definition.len())
    };
    let name = unquote_ident(&definition[..end]);
    (!name.is_empty()).then_some(name)
}

/// Remove `DEFAULT` and `IDENTITY` clauses, which `ALTER COLUMN` rejects.
fn strip_default_and_identity(definition: &str) -> String {
    let mut text = identity_re().replace_all(definition, "").into_owned();

    while let Some(range) = default_re()
        .find(&text)
        .map(|found| found.start()..default_expression_end(&text, found.end()))
    {
        text.replace_range(range, "");
    }
    text
}

/// End offset of the default expression starting at `start`: a balanced
/// parenthesized group, a string literal, or a single token.
fn default_expression_end(text: &str, start: usize) -> usize {
    let rest = &text[start..];
    let mut depth = 0usize;
    let mut in_string = false;
    let literal_start = rest.starts_with('\'') || rest.starts_with("N'");

    let mut chars = rest.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if in_string {
            if ch == '\'' {
                if chars.peek().is_some_and(|&(_, next)| next == '\'') {
                    chars.next();
                    continue;
                }
                in_string = false;
                if depth == 0 && literal_start {
                    return start + idx + 1;
                }
            }
            continue;
        }
        match ch {
            '\'' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return start + idx + 1;
                }
            }
            c if c.is_whitespace() && depth == 0 => return start + idx,
            _ => {}
        }
    }
    text.len()
}

#[cfg(test)]
#[path = "alter_test.rs"]
mod tests;
