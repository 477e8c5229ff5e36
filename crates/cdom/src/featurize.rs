// ABOUTME: Per-element and pairwise featurization of CDOM text elements.
// ABOUTME: Pairs consecutive significant elements and delegates vector computation to a FeatureModel.

//! Featurization of text elements.
//!
//! [`Featurizer::featurize`] scans the text elements of a CDOM once, left to
//! right. Every element whose text is not blank is handed to a
//! [`FeatureModel`]; elements that end up with a vector are *significant*.
//! Each significant element is paired with the previous significant one, so
//! `n` significant elements produce `n - 1` pairs regardless of the blank
//! elements between them.

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{CdomError, Result};
use crate::tree::{Cdom, NodeId};

/// Two consecutive significant text elements, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementPair {
    pub leading: NodeId,
    pub closing: NodeId,
    pub features: Option<Vec<f32>>,
}

impl ElementPair {
    /// Creates a pair with no vector yet.
    pub fn new(leading: NodeId, closing: NodeId) -> Self {
        Self {
            leading,
            closing,
            features: None,
        }
    }
}

/// Computes feature vectors for text elements and element pairs.
///
/// `context` is always the full ordered sequence of text elements being
/// featurized. Implementations must not depend on call order beyond what the
/// pairing scan guarantees: every element is featurized before any pair it
/// belongs to.
pub trait FeatureModel {
    /// Returns the vector for a non-blank text element, or `None` to mark it
    /// non-significant.
    fn element_features(&self, cdom: &Cdom, element: NodeId, context: &[NodeId])
        -> Option<Vec<f32>>;

    /// Returns the vector for a pair whose members both carry vectors.
    fn pair_features(&self, cdom: &Cdom, pair: &ElementPair, context: &[NodeId]) -> Vec<f32>;
}

/// Placeholder model: every non-blank element and every pair gets an empty vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubModel;

impl FeatureModel for StubModel {
    fn element_features(&self, _: &Cdom, _: NodeId, _: &[NodeId]) -> Option<Vec<f32>> {
        Some(Vec::new())
    }

    fn pair_features(&self, _: &Cdom, _: &ElementPair, _: &[NodeId]) -> Vec<f32> {
        Vec::new()
    }
}

impl<F, G> FeatureModel for (F, G)
where
    F: Fn(&Cdom, NodeId, &[NodeId]) -> Option<Vec<f32>>,
    G: Fn(&Cdom, &ElementPair, &[NodeId]) -> Vec<f32>,
{
    fn element_features(
        &self,
        cdom: &Cdom,
        element: NodeId,
        context: &[NodeId],
    ) -> Option<Vec<f32>> {
        (self.0)(cdom, element, context)
    }

    fn pair_features(&self, cdom: &Cdom, pair: &ElementPair, context: &[NodeId]) -> Vec<f32> {
        (self.1)(cdom, pair, context)
    }
}

/// Returns true if `text` is absent, empty or made only of whitespace.
pub fn is_blank_text(text: Option<&str>) -> bool {
    text.map_or(true, |t| t.chars().all(char::is_whitespace))
}

/// Drives a [`FeatureModel`] over a sequence of text elements.
#[derive(Debug, Clone, Default)]
pub struct Featurizer<M = StubModel> {
    model: M,
}

impl Featurizer<StubModel> {
    /// Featurizer backed by [`StubModel`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: FeatureModel> Featurizer<M> {
    /// Featurizer backed by `model`.
    pub fn with_model(model: M) -> Self {
        Self { model }
    }

    /// The model in use.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Featurizes every text element of the tree, in document order.
    pub fn featurize_tree(&self, cdom: &mut Cdom) -> Result<Vec<ElementPair>> {
        let elements: Vec<NodeId> = cdom.text_elements().collect();
        self.featurize(cdom, &elements)
    }

    /// Assigns element vectors and returns the pairs of consecutive significant elements.
    ///
    /// Vectors are written into `cdom`; elements judged non-significant have
    /// their vector cleared.
    pub fn featurize(&self, cdom: &mut Cdom, elements: &[NodeId]) -> Result<Vec<ElementPair>> {
        let mut pairs = Vec::new();
        let mut leading: Option<NodeId> = None;

        for &element in elements {
            self.featurize_element(cdom, element, elements)?;
            let significant = cdom.get(element).and_then(|n| n.features()).is_some();

            if let (Some(lead), true) = (leading, significant) {
                let mut pair = ElementPair::new(lead, element);
                self.featurize_pair(cdom, &mut pair, elements)?;
                pairs.push(pair);
            }

            if significant {
                leading = Some(element);
            }
        }

        debug!(
            elements = elements.len(),
            pairs = pairs.len(),
            "featurized text elements"
        );
        Ok(pairs)
    }

    /// Computes and stores the vector of a single element.
    ///
    /// Fails with `NullPair` if `element` is not a text element of `cdom`.
    pub fn featurize_element(
        &self,
        cdom: &mut Cdom,
        element: NodeId,
        context: &[NodeId],
    ) -> Result<()> {
        let node = match cdom.get(element) {
            Some(node) if node.is_text() => node,
            _ => {
                return Err(CdomError::null_pair(
                    "FeaturizeElement",
                    Some(anyhow::anyhow!(
                        "element {} is not a text element",
                        element.index()
                    )),
                ))
            }
        };

        let features = if is_blank_text(node.text()) {
            None
        } else {
            self.model.element_features(cdom, element, context)
        };
        trace!(
            element = element.index(),
            significant = features.is_some(),
            "featurized element"
        );
        cdom.set_features(element, features);
        Ok(())
    }

    /// Computes the vector of a pair whose members were already featurized.
    ///
    /// Fails with `NullPair` if a member is not a text element of `cdom` and
    /// with `InvalidPairArgument` if a member has no vector.
    pub fn featurize_pair(
        &self,
        cdom: &Cdom,
        pair: &mut ElementPair,
        context: &[NodeId],
    ) -> Result<()> {
        let members = [pair.leading, pair.closing];
        for id in members {
            match cdom.get(id) {
                Some(node) if node.is_text() => {
                    if node.features().is_none() {
                        return Err(CdomError::invalid_pair_argument(
                            "FeaturizePair",
                            Some(anyhow::anyhow!(
                                "element {} of the pair is not significant",
                                id.index()
                            )),
                        ));
                    }
                }
                _ => {
                    return Err(CdomError::null_pair(
                        "FeaturizePair",
                        Some(anyhow::anyhow!(
                            "element {} of the pair is not a text element",
                            id.index()
                        )),
                    ));
                }
            }
        }

        pair.features = Some(self.model.pair_features(cdom, pair, context));
        Ok(())
    }
}
