//! adoc2json-ast - Document graph definitions
//!
//! This crate provides the node types produced by the adoc2json loader and
//! read by the tree serializer and the DocBook renderer.

pub mod block;
pub mod document;
pub mod inline;

pub use block::{
    Admonition, AdmonitionType, Block, BreakType, Example, List, ListItem, ListType,
    LiteralBlock, LiteralKind, Paragraph, Section,
};
pub use document::{Document, DocumentMeta};
pub use inline::{plain_text, FormatType, Inline, Link};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
