// ABOUTME: The Parser entry points turning HTML strings, bytes or readers into a collapsed CDOM Document.
// ABOUTME: Runs root resolution, expansion and chain collapsing in one call.

use std::io::Read;

use scraper::Html;
use tracing::debug;

use crate::document::Document;
use crate::dom::{build_document, collapse};
use crate::error::Result;
use crate::options::{Options, ParserBuilder};
use crate::source::{decode_bytes, read_to_string};

/// Parses HTML into a [`Document`] holding the collapsed CDOM.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    opts: Options,
}

impl Parser {
    /// Create a new ParserBuilder.
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Create a Parser with the given options.
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    /// The options this Parser runs with.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Parses an HTML string.
    pub fn parse_str(&self, html: &str) -> Result<Document> {
        self.parse_html(Html::parse_document(html))
    }

    /// Parses raw bytes, decoding them with the configured or detected encoding.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Document> {
        let text = decode_bytes(bytes, self.opts.encoding);
        self.parse_str(&text)
    }

    /// Reads the whole of `reader` and parses it like [`Parser::parse_bytes`].
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Document> {
        let text = read_to_string(reader, self.opts.encoding)?;
        self.parse_str(&text)
    }

    /// Builds and collapses the CDOM of an already parsed document.
    ///
    /// Fails with `NodeNotFound` or `MultipleRootsFound` when the root
    /// selector does not match exactly one element.
    pub fn parse_html(&self, html: Html) -> Result<Document> {
        let mut cdom = build_document(&html, self.opts.root_selector.as_deref())?;
        let root = collapse(&mut cdom);
        debug!(
            root = cdom[root].name(),
            nodes = cdom.len(),
            "parsed cdom"
        );
        Ok(Document::new(html, cdom))
    }
}

/// Parses `html` with default options.
pub fn parse(html: &str) -> Result<Document> {
    Parser::default().parse_str(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_collapses_document_chain() {
        let doc = parse("<div>1<a>2</a>3<span>4</span></div>").unwrap();
        let root = doc.cdom().root();
        assert_eq!(doc.cdom()[root].name(), "#document/html/body/div");
        assert_eq!(doc.cdom()[root].children().len(), 4);
    }

    #[test]
    fn test_parse_with_selector() {
        let parser = Parser::builder().root_selector("#content").build();
        let doc = parser
            .parse_str(r#"<nav><a>menu</a></nav><div id="content"><p>a</p><p>b</p></div>"#)
            .unwrap();
        let cdom = doc.cdom();
        assert_eq!(cdom[cdom.root()].name(), "div");
        let texts: Vec<&str> = cdom.text_elements().filter_map(|id| cdom[id].text()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_selector_errors_propagate() {
        let parser = Parser::builder().root_selector("p").build();
        let err = parser.parse_str("<p>a</p><p>b</p>").unwrap_err();
        assert!(err.is_multiple_roots());

        let parser = Parser::builder().root_selector("article").build();
        let err = parser.parse_str("<p>a</p>").unwrap_err();
        assert!(err.is_node_not_found());
    }

    #[test]
    fn test_parse_bytes_with_forced_encoding() {
        let parser = Parser::builder().encoding(encoding_rs::WINDOWS_1252).build();
        let doc = parser.parse_bytes(b"<p>na\xefve</p><p>x</p>").unwrap();
        let cdom = doc.cdom();
        let texts: Vec<&str> = cdom.text_elements().filter_map(|id| cdom[id].text()).collect();
        assert_eq!(texts, vec!["naïve", "x"]);
    }

    #[test]
    fn test_parse_reader() {
        let reader = std::io::Cursor::new(b"<p>one</p><p>two</p>".to_vec());
        let doc = Parser::default().parse_reader(reader).unwrap();
        assert_eq!(doc.text_elements().count(), 2);
    }
}
