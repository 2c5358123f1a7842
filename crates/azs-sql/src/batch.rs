//! `GO` batch separation for migration scripts.

use regex::Regex;
use std::sync::OnceLock;

fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?mi)^[ \t]*GO[ \t]*;?[ \t]*\r?$").expect("valid regex"))
}

/// Split a script into batches on lines consisting solely of `GO`.
///
/// Batches are trimmed; blank batches are dropped.
pub fn split_batches(script: &str) -> Vec<String> {
    separator_re()
        .split(script)
        .map(str::trim)
        .filter(|batch| !batch.is_empty())
        .map(str::to_string)
        .collect()
}
