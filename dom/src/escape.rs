use std::fmt;

/// Escapes the five HTML-significant characters.
///
/// Replacement happens in a fixed order, `&` first, so entities produced for
/// the later characters are never escaped a second time within one call.
/// Escaping is not idempotent: `escape_html(escape_html(x))` re-escapes the
/// ampersands produced by the first pass.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A fragment of HTML that is safe to emit verbatim.
///
/// The only way to build one from arbitrary input is [`Markup::escape`], so a
/// node carrying `Markup` can never inject elements into the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markup(String);

impl Markup {
    /// Escapes `input` and wraps the result.
    pub fn escape(input: &str) -> Self {
        Self(escape_html(input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
