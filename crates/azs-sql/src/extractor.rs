//! Object dependency extraction from definition text
//!
//! Extraction is pattern based and approximate: aliases, CTE names and temp
//! tables are never resolved. It never fails; malformed SQL yields a partial
//! or empty set.

use azs_core::config::DEFAULT_SCHEMA;
use azs_core::ObjectIdentity;
use regex::Regex;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Source of "depends on" edges for one object definition.
pub trait DependencyExtractor: Send + Sync {
    /// Identities referenced by `definition`
    fn extract(&self, definition: &str) -> HashSet<ObjectIdentity>;
}

/// Regex battery over comment- and literal-free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl DependencyExtractor for PatternExtractor {
    fn extract(&self, definition: &str) -> HashSet<ObjectIdentity> {
        extract_dependencies(definition)
    }
}

/// A single identifier part: bracketed, double-quoted, or plain.
pub(crate) const IDENT: &str = r#"(?:\[(?:[^\]]|\]\])+\]|"[^"]+"|[A-Za-z_][A-Za-z0-9_@$#]*)"#;

fn dependency_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        // At least two parts; the last two are schema and object.
        let reference = format!(r"(?P<ref>{IDENT}(?:\s*\.\s*{IDENT})+)");
        [
            format!(r"(?i)\bFROM\s+{reference}"),
            format!(r"(?i)\bJOIN\s+{reference}"),
            format!(r"(?i)\bEXEC(?:UTE)?\s+(?:@[A-Za-z0-9_]+\s*=\s*)?{reference}"),
            format!(r"(?i)\bINTO\s+{reference}"),
            format!(r"(?i)\bUPDATE\s+{reference}"),
            format!(r"(?i)\bMERGE\s+{reference}"),
            format!(r"(?i)\bUSING\s+{reference}"),
            format!(r"(?i)\bTRIGGER\s+{IDENT}(?:\s*\.\s*{IDENT})*\s+ON\s+{reference}"),
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid regex"))
        .collect()
    })
}

/// `schema.object(` call form. Matches must not continue a longer name;
/// that check happens on the haystack since the regex has no lookbehind.
fn call_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(r"(?P<ref>{IDENT}(?:\s*\.\s*{IDENT})+)\s*\("))
            .expect("valid regex")
    })
}

/// Whether `before` ends inside a longer name (`@v.f(`, `#t.f(`, `x.y.f(`)
fn continues_name(before: &str) -> bool {
    before.chars().next_back().is_some_and(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '#' | '$' | '.' | '[' | '"')
    })
}

/// Extract every `schema.object` reference from a definition.
///
/// Matches `FROM`, `JOIN`, `EXEC[UTE]`, function-call (`schema.object(`),
/// `INTO`, `UPDATE`, `MERGE ... USING` and trigger `ON` forms, case-insensitively.
/// Bracketed and plain identifiers produce the same identity.
pub fn extract_dependencies(definition: &str) -> HashSet<ObjectIdentity> {
    let scrubbed = scrub_comments_and_literals(definition);
    let mut deps = HashSet::new();

    let mut insert = |reference: &str| {
        if let Some(identity) = ObjectIdentity::parse(reference, DEFAULT_SCHEMA) {
            deps.insert(identity);
        }
    };

    for pattern in dependency_patterns() {
        for caps in pattern.captures_iter(&scrubbed) {
            if let Some(reference) = caps.name("ref") {
                insert(reference.as_str());
            }
        }
    }

    // Only the name and its `(` are consumed, so calls nested in an
    // argument list are still found.
    for caps in call_pattern().captures_iter(&scrubbed) {
        let Some(reference) = caps.name("ref") else {
            continue;
        };
        if !continues_name(&scrubbed[..reference.start()]) {
            insert(reference.as_str());
        }
    }

    deps
}

/// Replace comments with a space and string literals with `''` so that
/// neither can produce references. Falls back to the raw text when the
/// tokenizer rejects the input (e.g. an unterminated literal).
pub fn scrub_comments_and_literals(sql: &str) -> String {
    let dialect = MsSqlDialect {};
    let tokens = match Tokenizer::new(&dialect, sql).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            log::debug!("Tokenizer fallback to raw text: {e}");
            return sql.to_string();
        }
    };

    let mut out = String::with_capacity(sql.len());
    for token in &tokens {
        match token {
            Token::Whitespace(Whitespace::SingleLineComment { .. }) => out.push('\n'),
            Token::Whitespace(Whitespace::MultiLineComment(_)) => out.push(' '),
            Token::SingleQuotedString(_) | Token::NationalStringLiteral(_) => out.push_str("''"),
            other => out.push_str(&other.to_string()),
        }
    }
    out
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
