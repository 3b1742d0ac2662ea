//! Escape normalization for patterns typed into single-line fields.

/// Two-character escapes and the control characters they stand for.
const ESCAPES: [(&str, &str); 4] = [
    ("\\n", "\n"),
    ("\\t", "\t"),
    ("\\f", "\x0C"),
    ("\\b", "\x08"),
];

/// Rewrites `\n`, `\t`, `\f` and `\b` into their literal control characters.
///
/// The rewrite is purely textual: a preceding backslash is not treated as
/// escaping the sequence, and `\b` becomes a backspace rather than a word
/// boundary.
pub fn normalize_escapes(raw: &str) -> String {
    ESCAPES
        .iter()
        .fold(raw.to_string(), |acc, (from, to)| acc.replace(from, to))
}
