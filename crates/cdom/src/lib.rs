// ABOUTME: Main library entry point for the Collapsed DOM (CDOM) builder and text-element featurizer.
// ABOUTME: Re-exports the public API: Parser, ParserBuilder, Document, Cdom, TreeNode, Featurizer, CdomError.

//! Collapsed DOM construction for main-content classification.
//!
//! This crate turns an HTML document into a simplified tree (the CDOM):
//! ignorable tags and blank text are dropped, `br` becomes a CRLF text leaf and
//! every single-child chain is folded into one node named after the whole
//! chain (`div/p/span`). The text leaves of the tree are then featurized and
//! paired for a downstream classifier.
//!
//! # Example
//!
//! ```
//! use web2text_cdom::{Featurizer, Parser, CdomError};
//!
//! fn main() -> Result<(), CdomError> {
//!     let parser = Parser::builder().root_selector("article").build();
//!     let mut doc = parser.parse_str("<article><p>One.</p><p>Two.</p></article>")?;
//!
//!     for id in doc.text_elements() {
//!         println!("{}: {:?}", doc.classpath(id), doc.cdom()[id].text());
//!     }
//!
//!     let pairs = doc.featurize(&Featurizer::new())?;
//!     assert_eq!(pairs.len(), 1);
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod dom;
pub mod error;
pub mod featurize;
pub mod options;
pub mod parser;
pub mod source;
pub mod tree;

pub use crate::document::{Document, NodeSnapshot, PairElement, PairSnapshot, TreeSnapshot};
pub use crate::error::{CdomError, ErrorCode, Result};
pub use crate::featurize::{ElementPair, FeatureModel, Featurizer, StubModel};
pub use crate::options::{Options, ParserBuilder};
pub use crate::parser::{parse, Parser};
pub use crate::tree::{Cdom, NodeId, NodeKind, SourceRef, TextElements, TreeNode};
