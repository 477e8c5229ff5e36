// ABOUTME: Configuration options for CDOM parsing including Options and ParserBuilder.
// ABOUTME: ParserBuilder provides a fluent API for constructing Parser instances with custom settings.

use encoding_rs::Encoding;
use tracing::warn;

use crate::parser::Parser;

/// Configuration options for the CDOM parser.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// CSS selector choosing the root element; `None` uses the document node.
    pub root_selector: Option<String>,
    /// Text encoding forced on byte input; `None` sniffs and detects it.
    pub encoding: Option<&'static Encoding>,
}

/// Builder for constructing Parser instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    opts: Options,
}

impl ParserBuilder {
    /// Create a new ParserBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the root element with a CSS selector.
    pub fn root_selector(mut self, selector: impl Into<String>) -> Self {
        self.opts.root_selector = Some(selector.into());
        self
    }

    /// Force the encoding used to decode byte input.
    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.opts.encoding = Some(encoding);
        self
    }

    /// Force the encoding by WHATWG label (e.g. `windows-1251`).
    ///
    /// Unknown labels are ignored and the encoding is detected instead.
    pub fn encoding_label(mut self, label: &str) -> Self {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) => self.opts.encoding = Some(encoding),
            None => warn!(label, "unknown encoding label, falling back to detection"),
        }
        self
    }

    /// Build the Parser with the configured options.
    pub fn build(self) -> Parser {
        Parser::new(self.opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert!(opts.root_selector.is_none());
        assert!(opts.encoding.is_none());
    }

    #[test]
    fn test_builder_sets_fields() {
        let parser = ParserBuilder::new()
            .root_selector("main")
            .encoding_label(" Windows-1251 ")
            .build();
        assert_eq!(parser.options().root_selector.as_deref(), Some("main"));
        assert_eq!(parser.options().encoding, Some(encoding_rs::WINDOWS_1251));
    }

    #[test]
    fn test_unknown_label_keeps_detection() {
        let parser = ParserBuilder::new().encoding_label("no-such-charset").build();
        assert!(parser.options().encoding.is_none());
    }
}
