// ABOUTME: Source document acquisition: byte decoding with charset detection and root resolution.
// ABOUTME: Resolves the CDOM root from an optional CSS selector, failing on zero or multiple matches.

use std::io::Read;

use encoding_rs::Encoding;
use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use scraper::{Html, Node, Selector};
use tracing::debug;

use crate::error::{CdomError, Result};

/// How many leading bytes are scanned for a `<meta>` charset declaration.
const META_PRESCAN_LIMIT: usize = 1024;

static META_CHARSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).unwrap()
});

/// Resolves the node the CDOM is built from.
///
/// With no selector (or a blank one) this is the document node. Otherwise the
/// selector must match exactly one element: zero matches yield
/// `NodeNotFound`, more than one `MultipleRootsFound`.
pub fn resolve_root<'a>(html: &'a Html, selector: Option<&str>) -> Result<NodeRef<'a, Node>> {
    let css = match selector.map(str::trim) {
        Some(css) if !css.is_empty() => css,
        _ => return Ok(html.tree.root()),
    };

    let parsed = Selector::parse(css).map_err(|e| {
        CdomError::invalid_selector(
            "ResolveRoot",
            Some(anyhow::anyhow!("cannot parse `{}`: {}", css, e)),
        )
    })?;

    let mut matches = html.select(&parsed);
    let first = matches.next().ok_or_else(|| {
        CdomError::node_not_found(
            "ResolveRoot",
            Some(anyhow::anyhow!("selector `{}` matched nothing", css)),
        )
    })?;

    let extra = matches.count();
    if extra > 0 {
        return Err(CdomError::multiple_roots(
            "ResolveRoot",
            Some(anyhow::anyhow!(
                "selector `{}` matched {} elements",
                css,
                extra + 1
            )),
        ));
    }

    debug!(selector = css, "resolved root element");
    Ok(*first)
}

/// Decodes raw document bytes to a string.
///
/// Uses `encoding` when given, then a byte order mark, then a `<meta>`
/// charset declaration near the start, and finally chardetng's guess.
pub fn decode_bytes(body: &[u8], encoding: Option<&'static Encoding>) -> String {
    if let Some(encoding) = encoding {
        let (decoded, _) = encoding.decode_with_bom_removal(body);
        return decoded.into_owned();
    }

    if let Some((encoding, _)) = Encoding::for_bom(body) {
        debug!(encoding = encoding.name(), "decoding by byte order mark");
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    if let Some(encoding) = sniff_meta_charset(body) {
        debug!(encoding = encoding.name(), "decoding by meta charset");
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    debug!(encoding = encoding.name(), "decoding by detection");
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Reads a whole document from `reader` and decodes it like [`decode_bytes`].
pub fn read_to_string<R: Read>(
    mut reader: R,
    encoding: Option<&'static Encoding>,
) -> Result<String> {
    let mut body = Vec::new();
    reader
        .read_to_end(&mut body)
        .map_err(|e| CdomError::io("ReadSource", Some(e.into())))?;
    Ok(decode_bytes(&body, encoding))
}

/// Looks for `<meta charset=...>` or an `http-equiv` content type in the document head.
fn sniff_meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_PRESCAN_LIMIT)];
    let caps = META_CHARSET_RE.captures(head)?;
    let label = caps.get(1)?.as_bytes();
    let encoding = Encoding::for_label(label)?;
    // A meta tag read as ASCII cannot truthfully declare a UTF-16 encoding.
    if encoding == encoding_rs::UTF_16LE || encoding == encoding_rs::UTF_16BE {
        Some(encoding_rs::UTF_8)
    } else {
        Some(encoding)
    }
}
