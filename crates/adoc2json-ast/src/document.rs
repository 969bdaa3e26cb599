//! Document root and metadata definitions
//!
//! This module defines the top-level document structure and the header
//! metadata collected by the loader.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// Doctype reported when the document does not set one
pub const DEFAULT_DOCTYPE: &str = "article";

/// A complete document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, authors, attributes)
    pub metadata: DocumentMeta,
    /// Document content blocks
    pub blocks: Vec<Block>,
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Document title
    pub title: Option<String>,
    /// Document authors
    pub authors: Vec<String>,
    /// Revision/version string
    pub revision: Option<String>,
    /// Document attributes, sorted by name
    pub attributes: BTreeMap<String, String>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            metadata: DocumentMeta::default(),
            blocks: Vec::new(),
        }
    }

    /// Create a document with a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            metadata: DocumentMeta::with_title(title),
            blocks: Vec::new(),
        }
    }

    /// Add a block to the document
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the document is empty (no blocks)
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// The `doctype` attribute, or `article`
    pub fn doctype(&self) -> &str {
        self.metadata
            .get_attribute("doctype")
            .unwrap_or(DEFAULT_DOCTYPE)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentMeta {
    /// Create metadata with just a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Add an author
    pub fn add_author(&mut self, author: impl Into<String>) {
        self.authors.push(author.into());
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute, returning its previous value
    pub fn unset_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    /// Get an attribute
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }
}
