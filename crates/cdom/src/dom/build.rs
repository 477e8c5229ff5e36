// ABOUTME: Expands a parsed HTML tree into CDOM nodes, depth-first in source order.
// ABOUTME: Skips ignorable tags, turns br into CRLF leaves, drops blank text and empty branches.

use ego_tree::NodeRef;
use scraper::{Html, Node};
use tracing::debug;

use super::text::{is_ignored_tag, normalize_text, BR_TAG, LINE_BREAK};
use crate::error::Result;
use crate::source::resolve_root;
use crate::tree::{Cdom, NodeId, TreeNode};

/// Name used for source nodes that are not elements.
fn source_name(node: &Node) -> &str {
    match node {
        Node::Document => "#document",
        Node::Fragment => "#document-fragment",
        Node::Element(el) => el.name(),
        Node::Text(_) => "#text",
        Node::Comment(_) => "#comment",
        Node::Doctype(_) => "#doctype",
        Node::ProcessingInstruction(_) => "#processing-instruction",
    }
}

fn source_classes(node: &Node) -> Option<&str> {
    match node {
        Node::Element(el) => el.attr("class"),
        _ => None,
    }
}

/// Resolves the root of `html` (see [`resolve_root`]) and expands it.
///
/// The result is not collapsed yet.
pub fn build_document(html: &Html, selector: Option<&str>) -> Result<Cdom> {
    let root = resolve_root(html, selector)?;
    Ok(build(root))
}

/// Expands the source subtree rooted at `root` into a new CDOM.
///
/// Every Node-kind element below the root has at least one child; the root
/// itself is kept even when nothing under it survives.
pub fn build(root: NodeRef<'_, Node>) -> Cdom {
    let value = root.value();
    let root_node = match value {
        Node::Text(text) => TreeNode::text_leaf(source_name(value), None, &**text),
        _ => TreeNode::node(source_name(value), source_classes(value)),
    };

    let mut cdom = Cdom::from_root(root_node.with_source(root.id()));
    let root_id = cdom.root();
    if !cdom[root_id].is_text() {
        expand(&mut cdom, root_id, root);
    }

    debug!(
        root = source_name(value),
        nodes = cdom.len(),
        "expanded source tree"
    );
    cdom
}

/// A branch whose source children are still being visited.
struct Frame<'a> {
    id: NodeId,
    next: Option<NodeRef<'a, Node>>,
}

/// Expands the children of `source` under `parent`, depth-first in source order.
///
/// Walks with an explicit stack so nesting depth is bounded by memory, not by
/// the call stack. A branch is attached to its parent when its frame is popped,
/// or discarded with everything allocated after it if nothing survived below.
fn expand(cdom: &mut Cdom, parent: NodeId, source: NodeRef<'_, Node>) {
    let mut stack = vec![Frame {
        id: parent,
        next: source.first_child(),
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(child) = frame.next else {
            let done = stack.pop().map(|f| f.id);
            if let (Some(done), Some(owner)) = (done, stack.last()) {
                if cdom[done].children().is_empty() {
                    cdom.discard_from(done);
                } else {
                    cdom.attach(owner.id, done);
                }
            }
            continue;
        };
        frame.next = child.next_sibling();
        let parent = frame.id;

        let value = child.value();
        match value {
            Node::Text(text) => {
                if let Some(normalized) = normalize_text(text) {
                    let leaf = TreeNode::text_leaf(source_name(value), None, normalized)
                        .with_source(child.id());
                    let id = cdom.alloc(leaf);
                    cdom.attach(parent, id);
                }
            }
            Node::Element(el) if is_ignored_tag(el.name()) => {}
            Node::Element(el) if el.name() == BR_TAG => {
                let leaf = TreeNode::text_leaf(BR_TAG, el.attr("class"), LINE_BREAK)
                    .with_source(child.id());
                let id = cdom.alloc(leaf);
                cdom.attach(parent, id);
            }
            _ => {
                let branch = TreeNode::node(source_name(value), source_classes(value))
                    .with_source(child.id());
                let id = cdom.alloc(branch);
                stack.push(Frame {
                    id,
                    next: child.first_child(),
                });
            }
        }
    }
}
