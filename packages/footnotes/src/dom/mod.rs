//! Document tree access.
//!
//! The annotator works against the [`DocumentTree`] trait. [`Document`] is
//! a ready-made implementation that parses well-formed (X)HTML markup.

mod document;
mod position;
mod tree;

pub use document::{Document, Element, NodeId, NodeKind};
pub use position::DocumentPosition;
pub use tree::DocumentTree;
