//! Pattern compilation for the find field.
//!
//! A raw pattern string is normalized (see [`escape`]) and compiled with
//! multi-line anchors enabled. Anchors and `.` treat `\r\n` as a line
//! terminator, so notes saved with CRLF endings match like LF ones.
//! Compilation fails soft: an empty or invalid pattern yields no matcher
//! instead of an error.

pub mod escape;

pub use escape::normalize_escapes;

use regex::{Regex, RegexBuilder};
use tracing::debug;

/// A compiled, executable find pattern.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// Returns true if the text contains at least one match.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Returns the compiled source, after escape normalization.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Compiles a raw pattern string into a matcher.
///
/// Returns `None` for an empty pattern or one that fails to compile.
pub fn compile(raw: &str) -> Option<Matcher> {
    if raw.is_empty() {
        return None;
    }

    let source = normalize_escapes(raw);
    match RegexBuilder::new(&source)
        .multi_line(true)
        .crlf(true)
        .build() {
        Ok(regex) => Some(Matcher { regex }),
        Err(err) => {
            debug!(pattern = raw, error = %err, "pattern failed to compile");
            None
        }
    }
}

/// A user-entered pattern: the raw source and its compiled form, if any.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    source: String,
    matcher: Option<Matcher>,
}

impl Pattern {
    /// Creates a pattern by compiling the raw source.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let matcher = compile(&source);
        Self { source, matcher }
    }

    /// Returns the raw source as entered.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the compiled matcher, or `None` when the pattern is unusable.
    pub fn matcher(&self) -> Option<&Matcher> {
        self.matcher.as_ref()
    }

    /// Returns true if the pattern compiled.
    pub fn is_valid(&self) -> bool {
        self.matcher.is_some()
    }
}
