// ABOUTME: Document pairs the parsed source HTML with its collapsed CDOM.
// ABOUTME: Resolves source references and produces serializable snapshots of nodes and pairs.

use ego_tree::NodeRef;
use scraper::{Html, Node};
use serde::Serialize;

use crate::error::Result;
use crate::featurize::{ElementPair, FeatureModel, Featurizer};
use crate::tree::{Cdom, NodeId, NodeKind, TextElements};

/// A parsed HTML document together with its CDOM.
///
/// Keeps the source tree alive so that [`crate::TreeNode::source_ref`]
/// handles can be resolved for later feature extraction.
#[derive(Debug, Clone)]
pub struct Document {
    source: Html,
    cdom: Cdom,
}

impl Document {
    /// Pairs a source tree with the CDOM built from it.
    pub fn new(source: Html, cdom: Cdom) -> Self {
        Self { source, cdom }
    }

    /// The parsed source HTML.
    pub fn source(&self) -> &Html {
        &self.source
    }

    /// The collapsed tree.
    pub fn cdom(&self) -> &Cdom {
        &self.cdom
    }

    /// Drops the source tree and keeps the CDOM; source refs no longer resolve.
    pub fn into_cdom(self) -> Cdom {
        self.cdom
    }

    /// The source HTML node a CDOM node was built from.
    pub fn source_node(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        let source_ref = self.cdom.get(id)?.source_ref()?;
        self.source.tree.get(source_ref)
    }

    /// See [`Cdom::text_elements`].
    pub fn text_elements(&self) -> TextElements<'_> {
        self.cdom.text_elements()
    }

    /// See [`Cdom::classpath`].
    pub fn classpath(&self, id: NodeId) -> String {
        self.cdom.classpath(id)
    }

    /// Featurizes all text elements of the CDOM in document order.
    pub fn featurize<M: FeatureModel>(
        &mut self,
        featurizer: &Featurizer<M>,
    ) -> Result<Vec<ElementPair>> {
        featurizer.featurize_tree(&mut self.cdom)
    }

    /// Serializable view of the whole tree.
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::from_cdom(&self.cdom)
    }

    /// Serializable view of a pair list produced from this document.
    pub fn pair_snapshots(&self, pairs: &[ElementPair]) -> Vec<PairSnapshot> {
        pairs
            .iter()
            .map(|pair| PairSnapshot {
                leading: self.element_snapshot(pair.leading),
                closing: self.element_snapshot(pair.closing),
                features: pair.features.clone(),
            })
            .collect()
    }

    fn element_snapshot(&self, id: NodeId) -> PairElement {
        let node = self.cdom.get(id);
        PairElement {
            text: node.and_then(|n| n.text()).unwrap_or_default().to_string(),
            classpath: self.cdom.classpath(id),
        }
    }
}

/// JSON-friendly copy of a CDOM.
///
/// Nodes are listed flat in pre-order and refer to each other by id, so
/// arbitrarily deep trees serialize without nesting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSnapshot {
    pub root: NodeId,
    pub nodes: Vec<NodeSnapshot>,
}

impl TreeSnapshot {
    /// Copies every node reachable from the root of `cdom`.
    pub fn from_cdom(cdom: &Cdom) -> Self {
        let nodes = cdom
            .descendants()
            .into_iter()
            .map(|id| NodeSnapshot::from_cdom(cdom, id))
            .collect();
        Self {
            root: cdom.root(),
            nodes,
        }
    }
}

/// One node of a [`TreeSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
    pub name: String,
    pub name_with_classes: String,
    pub classpath: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
}

impl NodeSnapshot {
    /// Copies a single node; children are referenced by id.
    ///
    /// # Panics
    ///
    /// If `id` is not a handle of `cdom`.
    pub fn from_cdom(cdom: &Cdom, id: NodeId) -> Self {
        let node = &cdom[id];
        Self {
            id,
            parent: node.parent(),
            kind: node.kind(),
            name: node.name().to_string(),
            name_with_classes: node.name_with_classes().to_string(),
            classpath: cdom.classpath(id),
            text: node.text().map(str::to_string),
            features: node.features().map(<[f32]>::to_vec),
            children: node.children().to_vec(),
        }
    }
}

/// Text and classpath of one member of a pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairElement {
    pub text: String,
    pub classpath: String,
}

/// JSON-friendly copy of an [`ElementPair`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSnapshot {
    pub leading: PairElement,
    pub closing: PairElement,
    pub features: Option<Vec<f32>>,
}
