//! SQL identifier and literal quoting

use std::sync::OnceLock;

use regex::Regex;

static PLAIN_IDENTIFIER: OnceLock<Option<Regex>> = OnceLock::new();

/// Names made only of lower-case letters, digits, `_` and `$`
fn plain_identifier() -> Option<&'static Regex> {
    PLAIN_IDENTIFIER
        .get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_$]*$").ok())
        .as_ref()
}

/// Words that can't be used unquoted as a table name
const RESERVED: &[&str] = &[
    "all", "and", "any", "array", "as", "asc", "both", "case", "cast", "check", "column",
    "constraint", "create", "default", "desc", "distinct", "do", "else", "end", "except",
    "false", "for", "foreign", "from", "grant", "group", "having", "in", "into", "join",
    "leading", "limit", "not", "null", "offset", "on", "only", "or", "order", "primary",
    "references", "select", "table", "then", "to", "true", "union", "unique", "user", "using",
    "when", "where", "window", "with",
];

/// Quotes one identifier if it would not survive unquoted
pub fn quote_identifier(ident: &str) -> String {
    let plain = plain_identifier().map_or(false, |re| re.is_match(ident));
    if plain && !RESERVED.contains(&ident) {
        return ident.to_string();
    }
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quotes a possibly schema-qualified name part by part
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

/// Quotes a string literal; backslashes switch to the escape string form
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 3);
    if value.contains('\\') {
        out.push('E');
    }
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
