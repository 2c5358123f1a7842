//! Comparison-only normalization of object definitions.
//!
//! Generated scripts carry cosmetic noise (SSMS headers, `SET` preambles,
//! batch separators, timestamps) that must not register as a change. The
//! stored definition is never modified; only the comparison key is.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Keywords marking a comment as generator metadata
const TIMESTAMP_MARKERS: &[&str] = &[
    "script date",
    "generated on",
    "generated at",
    "generated by",
    "generation date",
    "created on",
    "created at",
    "timestamp",
    "date:",
];

fn block_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"))
}

fn set_option_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^SET\s+(?:ANSI_NULLS|QUOTED_IDENTIFIER)\s+(?:ON|OFF)\s*;?$")
            .expect("valid regex")
    })
}

fn batch_separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^GO(?:\s+\d+)?\s*;?$").expect("valid regex"))
}

fn has_timestamp_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    TIMESTAMP_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Build the comparison key for a definition.
///
/// Removes a leading byte order mark, generator header blocks, `SET ANSI_NULLS`/`SET QUOTED_IDENTIFIER`
/// lines, `GO` separators, blank lines and timestamped `--` comment lines,
/// then collapses whitespace runs within each line to a single space.
pub fn normalize_definition(text: &str) -> String {
    let unified = without_bom(text).replace("\r\n", "\n").replace('\r', "\n");
    let without_headers = block_comment_re().replace_all(&unified, |caps: &Captures| {
        if has_timestamp_marker(&caps[0]) {
            String::new()
        } else {
            caps[0].to_string()
        }
    });

    without_headers
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !set_option_re().is_match(line))
        .filter(|line| !batch_separator_re().is_match(line))
        .filter(|line| !(line.starts_with("--") && has_timestamp_marker(line)))
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `text` without a leading UTF-8 byte order mark
pub fn without_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Whether two definitions differ only cosmetically.
pub fn definitions_equivalent(a: &str, b: &str) -> bool {
    normalize_definition(a) == normalize_definition(b)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
