//! Pattern/replacement pairs applied to whole documents.

use crate::matcher::Matcher;

/// A compiled matcher paired with its replacement template.
///
/// The template uses the `regex` crate's native syntax: `$1`, `${1}`,
/// `${name}` for groups, `$0` for the whole match, `$$` for a literal `$`.
/// Every match in the text is substituted, not just the first.
#[derive(Debug, Clone)]
pub struct Rewrite {
    matcher: Matcher,
    template: String,
}

impl Rewrite {
    /// Creates a rewrite from a matcher and a replacement template.
    pub fn new(matcher: Matcher, template: impl Into<String>) -> Self {
        Self {
            matcher,
            template: template.into(),
        }
    }

    /// Returns true if the text contains a match.
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// Substitutes every match in the text with the template.
    pub fn replace_all(&self, text: &str) -> String {
        self.matcher
            .regex()
            .replace_all(text, self.template.as_str())
            .into_owned()
    }

    /// Returns a description of the rewrite.
    pub fn describe(&self) -> String {
        format!(
            "Replace pattern '{}' with '{}'",
            self.matcher.as_str(),
            self.template
        )
    }
}
