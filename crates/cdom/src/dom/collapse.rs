// ABOUTME: Collapses single-child chains of a CDOM into one node with a slash-joined name.
// ABOUTME: Relinks the surviving child into its grandparent and keeps the elided classpath labels.

use tracing::debug;

use crate::tree::{Cdom, NodeId};

/// Collapses every single-child chain of `cdom` and returns the (possibly new) root.
///
/// Nodes with zero or several children are never merged. Document order is
/// preserved and `name_with_classes` is left untouched; the labels of elided
/// elements move to the survivor's `collapsed_labels`. The arena is compacted
/// afterwards, so previously obtained [`NodeId`]s are invalidated.
pub fn collapse(cdom: &mut Cdom) -> NodeId {
    let mut elided = 0usize;
    let root = collapse_chain(cdom, cdom.root(), &mut elided);
    cdom.set_root(root);

    let mut pending: Vec<NodeId> = cdom[root].children().to_vec();
    while let Some(id) = pending.pop() {
        let survivor = collapse_chain(cdom, id, &mut elided);
        pending.extend_from_slice(cdom[survivor].children());
    }

    cdom.compact();
    debug!(elided, nodes = cdom.len(), "collapsed single-child chains");
    cdom.root()
}

/// Walks down from `start` while the current node has exactly one child,
/// splicing each such node out. Returns the first node with zero or several
/// children.
fn collapse_chain(cdom: &mut Cdom, start: NodeId, elided: &mut usize) -> NodeId {
    let mut current = start;
    while let [child] = cdom[current].children() {
        let child = *child;
        match cdom[current].parent() {
            Some(parent) => cdom.replace_child(parent, current, child),
            None => cdom.node_mut(child).parent = None,
        }

        let gone = cdom.node_mut(current);
        gone.children.clear();
        let prefix = gone.name.clone();
        let mut labels = std::mem::take(&mut gone.collapsed_labels);
        labels.push(gone.name_with_classes.clone());

        let survivor = cdom.node_mut(child);
        survivor.name = format!("{}/{}", prefix, survivor.name);
        labels.append(&mut survivor.collapsed_labels);
        survivor.collapsed_labels = labels;

        *elided += 1;
        current = child;
    }
    current
}
