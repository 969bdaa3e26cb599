//! Error types for loading, rendering and serializing documents

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while turning an AsciiDoc file into JSON
#[derive(Error, Debug)]
pub enum AdocError {
    /// The input file is missing or unreadable
    #[error("cannot read input file {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed AsciiDoc
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A field expected to hold nodes does not
    #[error("reflection error: {0}")]
    Reflection(String),

    /// A required field is absent from a node
    #[error("missing field: {0}")]
    MissingField(String),

    /// Markup rendering failed for a node
    #[error("render error: {0}")]
    Render(String),

    /// Rendered markup is not well-formed XML
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for AdocError {
    fn from(err: quick_xml::Error) -> Self {
        AdocError::XmlParse(err.to_string())
    }
}

impl From<std::fmt::Error> for AdocError {
    fn from(err: std::fmt::Error) -> Self {
        AdocError::Render(err.to_string())
    }
}

/// Result type for adoc2json operations
pub type Result<T> = std::result::Result<T, AdocError>;
