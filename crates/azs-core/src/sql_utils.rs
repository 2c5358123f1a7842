//! SQL Server identifier quoting utilities
//!
//! Bracket quoting for identifiers and multi-part names, plus the inverse
//! operation used when identities are recovered from SQL text or file names.

/// Quote a SQL Server identifier with square brackets.
///
/// Embedded closing brackets are escaped by doubling them.
///
/// # Examples
/// ```
/// use azs_core::sql_utils::quote_bracket;
/// assert_eq!(quote_bracket("Orders"), "[Orders]");
/// assert_eq!(quote_bracket("odd]name"), "[odd]]name]");
/// ```
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

/// Quote a schema-qualified name as `[schema].[name]`.
///
/// # Examples
/// ```
/// use azs_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("dbo", "Orders"), "[dbo].[Orders]");
/// ```
pub fn quote_qualified(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_bracket(schema), quote_bracket(name))
}

/// Remove bracket or double-quote delimiters from a single identifier part.
///
/// # Examples
/// ```
/// use azs_core::sql_utils::unquote_ident;
/// assert_eq!(unquote_ident("[Order Lines]"), "Order Lines");
/// assert_eq!(unquote_ident("\"Orders\""), "Orders");
/// assert_eq!(unquote_ident(" Orders "), "Orders");
/// ```
pub fn unquote_ident(ident: &str) -> String {
    let trimmed = ident.trim();
    if let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    {
        inner.replace("]]", "]")
    } else if let Some(inner) = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        inner.replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}

/// Split a possibly bracket-quoted multi-part name on the dots that are not
/// inside brackets or double quotes. Each part is returned unquoted.
///
/// # Examples
/// ```
/// use azs_core::sql_utils::split_name_parts;
/// assert_eq!(split_name_parts("[my.db].dbo.Orders"), vec!["my.db", "dbo", "Orders"]);
/// ```
pub fn split_name_parts(name: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut closing: Option<char> = None;

    for ch in name.chars() {
        match closing {
            Some(end) if ch == end => {
                closing = None;
                current.push(ch);
            }
            Some(_) => current.push(ch),
            None if ch == '[' => {
                closing = Some(']');
                current.push(ch);
            }
            None if ch == '"' => {
                closing = Some('"');
                current.push(ch);
            }
            None if ch == '.' => {
                parts.push(unquote_ident(&current));
                current.clear();
            }
            None => current.push(ch),
        }
    }
    parts.push(unquote_ident(&current));
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_bracket_simple() {
        assert_eq!(quote_bracket("Orders"), "[Orders]");
    }

    #[test]
    fn test_quote_bracket_escapes_closing() {
        assert_eq!(quote_bracket("a]b"), "[a]]b]");
    }

    #[test]
    fn test_unquote_round_trips_escaped_bracket() {
        assert_eq!(unquote_ident(&quote_bracket("a]b")), "a]b");
    }

    #[test]
    fn test_unquote_plain_identifier() {
        assert_eq!(unquote_ident("Orders"), "Orders");
    }

    #[test]
    fn test_split_two_parts() {
        assert_eq!(split_name_parts("dbo.Orders"), vec!["dbo", "Orders"]);
    }

    #[test]
    fn test_split_keeps_dots_inside_brackets() {
        assert_eq!(
            split_name_parts("[sales.eu].[Order.Lines]"),
            vec!["sales.eu", "Order.Lines"]
        );
    }

    #[test]
    fn test_split_single_part() {
        assert_eq!(split_name_parts("Orders"), vec!["Orders"]);
    }
}
