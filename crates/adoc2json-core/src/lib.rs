//! adoc2json-core - AsciiDoc documents as JSON
//!
//! Core library for adoc2json: loads AsciiDoc into a document graph, renders
//! nodes as DocBook 5 and serializes the graph into JSON-ready maps.
//!
//! # Example
//!
//! ```
//! use adoc2json_core::{load, LoadOptions, SerializeOptions, SourceNode, TreeSerializer};
//!
//! let doc = load("= Guide\n\n* one\n* two", &LoadOptions::default())?;
//! let serializer = TreeSerializer::new().with_options(SerializeOptions {
//!     analyze: true,
//!     ..Default::default()
//! });
//! let envelope = serializer.serialize_document_root(&SourceNode::Document(&doc))?;
//!
//! assert_eq!(envelope["title"], "Guide");
//! assert_eq!(envelope["docbook_analyzed"]["$name"], "article");
//! assert_eq!(envelope["blocks"][0]["list_content"].as_array().unwrap().len(), 2);
//! # Ok::<(), adoc2json_core::AdocError>(())
//! ```

pub mod docbook;
pub mod error;
pub mod node;
pub mod parser;
pub mod serializer;
pub mod xml_tree;

// Re-export main types and functions
pub use docbook::{DocBookRenderer, Render, RenderOptions};
pub use error::{AdocError, Result};
pub use node::{block_nodes, FieldMap, FieldValue, SourceNode};
pub use parser::{load, load_file, parse, LoadOptions};
pub use serializer::{SerializeOptions, SerializedNode, TreeSerializer};
pub use xml_tree::xml_to_tree;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
