// ABOUTME: Arena-backed Collapsed DOM (CDOM) tree: nodes, handles, classpaths and text enumeration.
// ABOUTME: Children own their slots through indices; parent links are plain non-owning indices.

//! The CDOM tree.
//!
//! Every [`TreeNode`] lives in a single arena owned by [`Cdom`] and is
//! addressed by a [`NodeId`]. A node's child list holds the ids it owns, while
//! its `parent` field is a back-reference that never owns anything. Upward
//! traversal (classpaths) is O(depth) without reference cycles.

use std::ops::Index;

use serde::Serialize;

/// Stable handle to a node inside a [`Cdom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of a CDOM element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// An element that owns children.
    Node,
    /// A leaf carrying normalized text.
    Text,
}

/// Reference back to the node of the source HTML tree a CDOM node came from.
pub type SourceRef = ego_tree::NodeId;

/// A single CDOM element.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) kind: NodeKind,
    pub(crate) name: String,
    pub(crate) name_with_classes: String,
    pub(crate) collapsed_labels: Vec<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) text: Option<String>,
    pub(crate) source_ref: Option<SourceRef>,
    pub(crate) features: Option<Vec<f32>>,
}

impl TreeNode {
    pub(crate) fn node(name: impl Into<String>, classes: Option<&str>) -> Self {
        let name = name.into();
        Self {
            kind: NodeKind::Node,
            name_with_classes: name_with_classes(&name, classes),
            name,
            collapsed_labels: Vec::new(),
            parent: None,
            children: Vec::new(),
            text: None,
            source_ref: None,
            features: None,
        }
    }

    pub(crate) fn text_leaf(
        name: impl Into<String>,
        classes: Option<&str>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: NodeKind::Text,
            text: Some(text.into()),
            ..Self::node(name, classes)
        }
    }

    pub(crate) fn with_source(mut self, source: SourceRef) -> Self {
        self.source_ref = Some(source);
        self
    }

    /// Whether this is a Node-kind element or a text leaf.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// True for text leaves.
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Tag name, or the `/`-joined chain of tag names elided by collapsing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element's own tag name followed by its sorted classes, e.g. `div.aaa.rrr.www`.
    pub fn name_with_classes(&self) -> &str {
        &self.name_with_classes
    }

    /// `name_with_classes` labels of the ancestors elided above this node, outermost first.
    pub fn collapsed_labels(&self) -> &[String] {
        &self.collapsed_labels
    }

    /// The elided labels and the node's own label joined with `>`.
    pub fn collapsed_name_with_classes(&self) -> String {
        let mut parts: Vec<&str> = self.collapsed_labels.iter().map(String::as_str).collect();
        parts.push(&self.name_with_classes);
        parts.join(">")
    }

    /// Enclosing element; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Normalized text; only present on text leaves.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Originating node of the source HTML tree, if any.
    pub fn source_ref(&self) -> Option<SourceRef> {
        self.source_ref
    }

    /// Feature vector; `None` marks a non-significant element.
    pub fn features(&self) -> Option<&[f32]> {
        self.features.as_deref()
    }
}

/// Builds a `name.class1.class2` label with classes sorted lexicographically.
pub fn name_with_classes(name: &str, classes: Option<&str>) -> String {
    let mut tokens: Vec<&str> = classes
        .map(|c| c.split_whitespace().collect())
        .unwrap_or_default();
    if tokens.is_empty() {
        return name.to_string();
    }
    tokens.sort_unstable();
    tokens.dedup();
    let mut label = String::from(name);
    for token in tokens {
        label.push('.');
        label.push_str(token);
    }
    label
}

/// A Collapsed DOM: an arena of [`TreeNode`]s with a single root.
///
/// # Handles
///
/// A [`NodeId`] is only meaningful for the tree that issued it, and only until
/// the next [`crate::dom::collapse`], which renumbers the arena. Handles that do
/// not resolve are treated uniformly:
///
/// - indexing (`cdom[id]`), [`Cdom::append_node`] and [`Cdom::append_text`]
///   panic, like slice indexing;
/// - [`Cdom::get`] returns `None`, [`Cdom::classpath`] returns an empty string
///   and [`Cdom::text_elements_from`] yields nothing;
/// - featurization reports them as `NullPair` errors.
#[derive(Debug, Clone)]
pub struct Cdom {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl Cdom {
    /// Creates a tree holding a single Node-kind root.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self::from_root(TreeNode::node(root_name, None))
    }

    pub(crate) fn from_root(root: TreeNode) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Handle of the root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Checked lookup; `None` if `id` is not in this arena.
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false, since a tree holds at least its root. Provided alongside
    /// [`Cdom::len`] as collections conventionally are.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a Node-kind child under `parent` and returns its handle.
    ///
    /// # Panics
    ///
    /// If `parent` is not a handle of this tree.
    pub fn append_node(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        classes: Option<&str>,
    ) -> NodeId {
        let id = self.alloc(TreeNode::node(name, classes));
        self.attach(parent, id);
        id
    }

    /// Appends a text leaf under `parent` and returns its handle.
    ///
    /// # Panics
    ///
    /// If `parent` is not a handle of this tree.
    pub fn append_text(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> NodeId {
        let id = self.alloc(TreeNode::text_leaf(name, None, text));
        self.attach(parent, id);
        id
    }

    /// Root-to-node path of `name_with_classes` labels separated by `>`.
    ///
    /// Labels of elements elided by collapsing are kept on the surviving
    /// node, so the path reconstructs the full ancestor chain.
    pub fn classpath(&self, id: NodeId) -> String {
        let mut chain = Vec::new();
        let mut cursor = self.get(id);
        while let Some(node) = cursor {
            chain.push(node);
            cursor = node.parent.and_then(|p| self.get(p));
        }

        let mut parts: Vec<&str> = Vec::new();
        for node in chain.iter().rev() {
            parts.extend(node.collapsed_labels.iter().map(String::as_str));
            parts.push(&node.name_with_classes);
        }
        parts.join(">")
    }

    /// Lazily enumerates all text leaves under the root in document order.
    pub fn text_elements(&self) -> TextElements<'_> {
        self.text_elements_from(self.root)
    }

    /// Lazily enumerates all text leaves under `id` (inclusive) in document order.
    pub fn text_elements_from(&self, id: NodeId) -> TextElements<'_> {
        TextElements {
            cdom: self,
            stack: vec![id],
        }
    }

    /// All node handles reachable from the root, in pre-order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    pub(crate) fn alloc(&mut self, node: TreeNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Discards `id` and everything allocated after it.
    ///
    /// Only valid while building depth-first, when the tail of the arena is
    /// exactly the subtree of the most recently allocated, still unattached node.
    pub(crate) fn discard_from(&mut self, id: NodeId) {
        self.nodes.truncate(id.0);
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.root = id;
    }

    pub(crate) fn set_features(&mut self, id: NodeId, features: Option<Vec<f32>>) {
        self.nodes[id.0].features = features;
    }

    /// Replaces `old` with `new` in `parent`'s child list, keeping its position.
    pub(crate) fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if let Some(slot) = self.nodes[parent.0]
            .children
            .iter_mut()
            .find(|c| **c == old)
        {
            *slot = new;
        }
        self.nodes[new.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
    }

    /// Rebuilds the arena with only the nodes reachable from the root, in pre-order.
    pub(crate) fn compact(&mut self) {
        let order = self.descendants();
        if order.len() == self.nodes.len() && order.iter().enumerate().all(|(i, id)| id.0 == i) {
            return;
        }

        let mut remap = vec![usize::MAX; self.nodes.len()];
        for (new, old) in order.iter().enumerate() {
            remap[old.0] = new;
        }

        let mut old_nodes: Vec<Option<TreeNode>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for old in &order {
            if let Some(mut node) = old_nodes[old.0].take() {
                node.parent = node.parent.map(|p| NodeId(remap[p.0]));
                for child in node.children.iter_mut() {
                    *child = NodeId(remap[child.0]);
                }
                nodes.push(node);
            }
        }

        tracing::trace!(
            before = remap.len(),
            after = nodes.len(),
            "compacted cdom arena"
        );
        self.nodes = nodes;
        self.root = NodeId(0);
    }
}

/// Unchecked lookup; panics if `id` is not in this arena (see [`Cdom::get`]).
impl Index<NodeId> for Cdom {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }
}

/// Depth-first, left-to-right iterator over the text leaves of a subtree.
///
/// Holds only a traversal stack and a shared borrow of the tree, so any
/// number of independent enumerations can run side by side.
#[derive(Debug, Clone)]
pub struct TextElements<'a> {
    cdom: &'a Cdom,
    stack: Vec<NodeId>,
}

impl Iterator for TextElements<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.cdom.get(id) else {
                continue;
            };
            self.stack.extend(node.children.iter().rev().copied());
            if node.is_text() {
                return Some(id);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(cdom: &Cdom, ids: impl IntoIterator<Item = NodeId>) -> Vec<String> {
        ids.into_iter()
            .filter_map(|id| cdom[id].text().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_name_with_classes_sorted() {
        assert_eq!(name_with_classes("div", Some("www rrr aaa")), "div.aaa.rrr.www");
        assert_eq!(name_with_classes("div", Some("  b\ta  ")), "div.a.b");
        assert_eq!(name_with_classes("div", Some("B a")), "div.B.a");
        assert_eq!(name_with_classes("p", Some("x x")), "p.x");
        assert_eq!(name_with_classes("p", Some("   ")), "p");
        assert_eq!(name_with_classes("#text", None), "#text");
    }

    #[test]
    fn test_text_elements_document_order() {
        let mut cdom = Cdom::new("div");
        let root = cdom.root();
        cdom.append_text(root, "#text", "1");
        let a = cdom.append_node(root, "a", None);
        cdom.append_text(a, "#text", "2");
        cdom.append_text(root, "#text", "3");
        let span = cdom.append_node(root, "span", None);
        let em = cdom.append_node(span, "em", None);
        cdom.append_text(em, "#text", "4");
        cdom.append_text(span, "#text", "5");

        let order = texts(&cdom, cdom.text_elements());
        assert_eq!(order, vec!["1", "2", "3", "4", "5"]);

        let again = texts(&cdom, cdom.text_elements());
        assert_eq!(order, again);

        let sub = texts(&cdom, cdom.text_elements_from(span));
        assert_eq!(sub, vec!["4", "5"]);
    }

    #[test]
    fn test_unknown_handles_are_absent() {
        let mut big = Cdom::new("div");
        let big_root = big.root();
        let far = (0..4)
            .map(|i| big.append_text(big_root, "#text", i.to_string()))
            .last()
            .unwrap();

        let mut cdom = Cdom::new("div");
        let root = cdom.root();
        cdom.append_text(root, "#text", "only");
        assert!(far.index() >= cdom.len());

        assert!(cdom.get(far).is_none());
        assert_eq!(cdom.classpath(far), "");
        assert_eq!(cdom.text_elements_from(far).count(), 0);
        assert!(!cdom.is_empty());
    }

    #[test]
    fn test_text_elements_includes_text_root() {
        let cdom = Cdom::from_root(TreeNode::text_leaf("#text", None, "only"));
        let found: Vec<NodeId> = cdom.text_elements().collect();
        assert_eq!(found, vec![cdom.root()]);
    }

    #[test]
    fn test_classpath_walks_ancestors() {
        let mut cdom = Cdom::new("#document");
        let root = cdom.root();
        let div = cdom.append_node(root, "div", Some("c4"));
        let p = cdom.append_node(div, "p", Some("c2 c1"));
        let text = cdom.append_text(p, "#text", "hello");

        assert_eq!(cdom.classpath(root), "#document");
        assert_eq!(cdom.classpath(text), "#document>div.c4>p.c1.c2>#text");
    }

    #[test]
    fn test_discard_from_drops_subtree_tail() {
        let mut cdom = Cdom::new("div");
        let root = cdom.root();
        cdom.append_text(root, "#text", "keep");
        let empty = cdom.alloc(TreeNode::node("span", None));
        cdom.alloc(TreeNode::node("a", None));
        cdom.discard_from(empty);

        assert_eq!(cdom.len(), 2);
        assert_eq!(cdom[root].children().len(), 1);
    }

    #[test]
    fn test_compact_renumbers_in_preorder() {
        let mut cdom = Cdom::new("div");
        let root = cdom.root();
        let p = cdom.append_node(root, "p", None);
        let t = cdom.append_text(p, "#text", "x");
        cdom.replace_child(root, p, t);

        cdom.compact();
        assert_eq!(cdom.len(), 2);
        assert_eq!(cdom.root().index(), 0);
        let only = cdom[cdom.root()].children()[0];
        assert_eq!(only.index(), 1);
        assert_eq!(cdom[only].parent(), Some(cdom.root()));
        assert_eq!(cdom[only].text(), Some("x"));
    }
}
