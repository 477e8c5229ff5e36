// ABOUTME: Static tag tables and Unicode-category patterns used while expanding HTML into a CDOM.
// ABOUTME: Normalizes line separators to CRLF and decides when a text node is empty.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical line break stored for `br` tags and Unicode line/paragraph separators.
pub const LINE_BREAK: &str = "\r\n";

/// Non-content and void tags that never contribute to the CDOM.
pub const IGNORED_TAGS: &[&str] = &[
    "area", "base", "col", "colgroup", "embed", "hr", "iframe", "img", "input", "link", "meta",
    "source", "track", "wbr",
];

/// Name html5ever gives the line break element.
pub const BR_TAG: &str = "br";

// Line separator (Zl) and paragraph separator (Zp).
static LINE_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Zl}\p{Zp}]").unwrap());

// Separators, control, format, private-use and unassigned code points only.
static BLANK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{Z}\p{Cc}\p{Cf}\p{Co}\p{Cn}]*$").unwrap());

/// Returns true if elements with this tag name are skipped entirely.
pub fn is_ignored_tag(name: &str) -> bool {
    IGNORED_TAGS.contains(&name)
}

/// Replaces Unicode line and paragraph separators with [`LINE_BREAK`].
pub fn normalize_line_separators(text: &str) -> Cow<'_, str> {
    LINE_SEPARATOR_RE.replace_all(text, LINE_BREAK)
}

/// Returns true if nothing but invisible code points remain in `text`.
pub fn is_blank(text: &str) -> bool {
    BLANK_RE.is_match(text)
}

/// Normalizes decoded source text for a text leaf.
///
/// Returns `None` when the text is blank and must not produce a leaf. The
/// returned text keeps its original spacing.
pub fn normalize_text(decoded: &str) -> Option<String> {
    let normalized = normalize_line_separators(decoded);
    if is_blank(&normalized) {
        None
    } else {
        Some(normalized.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_tags() {
        for tag in ["img", "hr", "wbr", "iframe", "colgroup", "meta"] {
            assert!(is_ignored_tag(tag), "{tag} should be ignored");
        }
        for tag in ["div", "br", "p", "script", "span"] {
            assert!(!is_ignored_tag(tag), "{tag} should not be ignored");
        }
    }

    #[test]
    fn test_line_separators_become_crlf() {
        assert_eq!(normalize_line_separators("a\u{2028}b\u{2029}c"), "a\r\nb\r\nc");
        assert_eq!(normalize_line_separators("plain\ntext"), "plain\ntext");
    }

    #[test]
    fn test_blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank(" \r\n\t "));
        assert!(is_blank("\u{00A0}\u{200B}\u{FEFF}"));
        assert!(is_blank("\u{2028}"));
        assert!(is_blank("\u{E000}"));
        assert!(!is_blank(" x "));
        assert!(!is_blank("."));
    }

    #[test]
    fn test_normalize_text_keeps_spacing() {
        assert_eq!(normalize_text("  hello  world "), Some("  hello  world ".to_string()));
        assert_eq!(normalize_text("one\u{2029}two"), Some("one\r\ntwo".to_string()));
        assert_eq!(normalize_text(" \n "), None);
        assert_eq!(normalize_text("\u{2028}"), None);
    }
}
