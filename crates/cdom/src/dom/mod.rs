// ABOUTME: Transformation of a parsed HTML tree into a Collapsed DOM.
// ABOUTME: Groups text normalization, tree expansion and single-child chain collapsing.

//! HTML to CDOM transformation.
//!
//! [`build::build`] expands the source tree into an arena, dropping ignorable
//! tags, whitespace-only text and empty branches. [`collapse::collapse`] then
//! folds every single-child chain into one node with a `/`-joined name.

pub mod build;
pub mod collapse;
pub mod text;

pub use build::{build, build_document};
pub use collapse::collapse;
