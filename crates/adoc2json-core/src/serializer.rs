//! Tree Serializer
//!
//! Converts nodes of the document graph into JSON objects. Each node's public
//! fields are copied into a map; nested nodes are written as `$ref` markers
//! (or expanded in deep mode), and container-aware keys are merged in:
//!
//! | node        | added key(s)                           |
//! |-------------|----------------------------------------|
//! | list        | `list_content`                         |
//! | list item   | `list_item_content`                    |
//! | array       | `array_content`                        |
//! | anything else | `docbook`, plus `docbook_analyzed` when analyzing |
//!
//! # Example
//!
//! ```
//! use adoc2json_core::{parser, SourceNode, TreeSerializer};
//!
//! let doc = parser::parse("Hello world.")?;
//! let envelope = TreeSerializer::new().serialize_document_root(&SourceNode::Document(&doc))?;
//!
//! let blocks = envelope["blocks"].as_array().unwrap();
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0]["docbook"], "<simpara>Hello world.</simpara>");
//! # Ok::<(), adoc2json_core::AdocError>(())
//! ```

use serde_json::{Map, Value};
use tracing::{debug, trace};

use adoc2json_ast::Block;

use crate::docbook::{DocBookRenderer, Render};
use crate::error::{AdocError, Result};
use crate::node::{block_nodes, FieldMap, FieldValue, SourceNode};
use crate::xml_tree::xml_to_tree;

/// A serialized node: field names mapped to JSON values
pub type SerializedNode = Map<String, Value>;

/// Serializer configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Add `docbook_analyzed`, the rendered markup as a generic XML tree
    pub analyze: bool,
    /// Serialize nested node fields instead of writing `$ref` markers
    pub deep: bool,
}

/// Converts document graph nodes into JSON maps
#[derive(Debug, Clone)]
pub struct TreeSerializer<R = DocBookRenderer> {
    renderer: R,
    options: SerializeOptions,
}

impl TreeSerializer<DocBookRenderer> {
    /// Create a serializer rendering DocBook with default options
    pub fn new() -> Self {
        Self::with_renderer(DocBookRenderer::new())
    }
}

impl Default for TreeSerializer<DocBookRenderer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Render> TreeSerializer<R> {
    /// Create a serializer around a custom renderer
    pub fn with_renderer(renderer: R) -> Self {
        Self {
            renderer,
            options: SerializeOptions::default(),
        }
    }

    /// Replace the serializer options
    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    /// The serializer's options
    pub fn options(&self) -> SerializeOptions {
        self.options
    }

    /// Serialize one node.
    ///
    /// Fields holding nodes are not expanded unless the serializer is deep;
    /// only the container keys (`list_content`, `list_item_content`,
    /// `array_content`) recurse. Lists and list items keep `$ref` markers
    /// in `items` and `blocks` even when deep, since their container key
    /// already holds those nodes.
    ///
    /// # Errors
    ///
    /// Propagates [`AdocError::Render`] from the renderer and
    /// [`AdocError::XmlParse`] from analysis.
    pub fn serialize(&self, node: &SourceNode<'_>) -> Result<SerializedNode> {
        let expand = self.options.deep
            && !matches!(
                node,
                SourceNode::List(_) | SourceNode::ListItem(_) | SourceNode::Block(Block::List(_))
            );
        self.serialize_node(node, expand)
    }

    fn serialize_node(&self, node: &SourceNode<'_>, expand: bool) -> Result<SerializedNode> {
        if let SourceNode::Block(Block::List(list)) = node {
            return self.serialize_node(&SourceNode::List(list), expand);
        }

        trace!(context = node.context(), "serializing node");
        let mut map = self.flatten_fields(&node.fields(), expand)?;

        match node {
            SourceNode::List(list) => {
                let items: Vec<_> = list.items.iter().map(SourceNode::ListItem).collect();
                map.insert(
                    "list_content".to_string(),
                    Value::Array(self.serialize_all(&items)?),
                );
            }
            SourceNode::ListItem(item) => {
                map.insert(
                    "list_item_content".to_string(),
                    Value::Array(self.serialize_all(&block_nodes(&item.blocks))?),
                );
            }
            SourceNode::Array(nodes) => {
                map.insert(
                    "array_content".to_string(),
                    Value::Array(self.serialize_all(nodes)?),
                );
            }
            SourceNode::Document(_) | SourceNode::Block(_) => {
                let docbook = self.renderer.render(node)?;
                if self.options.analyze {
                    map.insert("docbook_analyzed".to_string(), xml_to_tree(&docbook)?);
                }
                map.insert("docbook".to_string(), Value::String(docbook));
            }
        }

        Ok(map)
    }

    /// Serialize a root node, then replace its `blocks` field with the
    /// serialized blocks.
    ///
    /// # Errors
    ///
    /// Returns [`AdocError::MissingField`] when the root has no `blocks`
    /// field, [`AdocError::Reflection`] when `blocks` does not hold nodes, or
    /// any error from [`TreeSerializer::serialize`].
    pub fn serialize_document_root(&self, root: &SourceNode<'_>) -> Result<SerializedNode> {
        let fields = root.fields();
        let blocks = match fields.get("blocks") {
            Some(FieldValue::Nodes(nodes)) => nodes,
            Some(FieldValue::Scalar(_)) => {
                return Err(AdocError::Reflection(format!(
                    "`blocks` of {} node does not hold nodes",
                    root.context()
                )))
            }
            None => {
                return Err(AdocError::MissingField(format!(
                    "`blocks` on {} node",
                    root.context()
                )))
            }
        };

        // `blocks` is replaced below, so it is never expanded here
        let mut map = self.serialize_node(root, false)?;
        map.insert(
            "blocks".to_string(),
            Value::Array(self.serialize_all(blocks)?),
        );

        debug!(
            context = root.context(),
            blocks = blocks.len(),
            analyze = self.options.analyze,
            deep = self.options.deep,
            "serialized document root"
        );
        Ok(map)
    }

    fn serialize_all(&self, nodes: &[SourceNode<'_>]) -> Result<Vec<Value>> {
        nodes
            .iter()
            .map(|node| self.serialize(node).map(Value::Object))
            .collect()
    }

    fn flatten_fields(&self, fields: &FieldMap<'_>, expand: bool) -> Result<SerializedNode> {
        let mut map = Map::new();
        for (name, value) in fields.iter() {
            let value = match value {
                FieldValue::Scalar(value) => value.clone(),
                FieldValue::Nodes(nodes) if expand => {
                    Value::Array(self.serialize_all(nodes)?)
                }
                FieldValue::Nodes(nodes) => {
                    Value::Array(nodes.iter().map(SourceNode::reference).collect())
                }
            };
            map.insert(name.to_string(), value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use serde_json::json;

    /// Renders every node as its context name
    struct ContextRenderer;

    impl Render for ContextRenderer {
        fn render(&self, node: &SourceNode<'_>) -> Result<String> {
            Ok(format!("<{}/>", node.context()))
        }
    }

    #[test]
    fn test_paragraph_gets_docbook() {
        let doc = parse("Hello world.").unwrap();
        let map = TreeSerializer::new()
            .serialize(&SourceNode::from_block(&doc.blocks[0]))
            .unwrap();
        assert_eq!(map["context"], json!("paragraph"));
        assert_eq!(map["lines"], json!(["Hello world."]));
        assert_eq!(map["docbook"], json!("<simpara>Hello world.</simpara>"));
        assert!(!map.contains_key("docbook_analyzed"));
    }

    #[test]
    fn test_nested_fields_are_references_by_default() {
        let doc = parse("== Intro\n\nText\n\n* item").unwrap();
        let map = TreeSerializer::with_renderer(ContextRenderer)
            .serialize(&SourceNode::from_block(&doc.blocks[0]))
            .unwrap();
        assert_eq!(
            map["blocks"],
            json!([{ "$ref": "paragraph" }, { "$ref": "ulist" }])
        );
    }

    #[test]
    fn test_deep_expands_nested_fields() {
        let doc = parse("== Intro\n\nText").unwrap();
        let map = TreeSerializer::with_renderer(ContextRenderer)
            .with_options(SerializeOptions {
                deep: true,
                ..Default::default()
            })
            .serialize(&SourceNode::from_block(&doc.blocks[0]))
            .unwrap();
        assert_eq!(map["blocks"][0]["context"], json!("paragraph"));
        assert_eq!(map["blocks"][0]["docbook"], json!("<paragraph/>"));
    }

    #[test]
    fn test_list_block_is_routed_to_list_variant() {
        let doc = parse("* one\n* two").unwrap();
        let map = TreeSerializer::with_renderer(ContextRenderer)
            .serialize(&SourceNode::Block(&doc.blocks[0]))
            .unwrap();
        assert_eq!(map["list_content"].as_array().map(Vec::len), Some(2));
        assert!(!map.contains_key("docbook"));
    }

    #[test]
    fn test_analyze_adds_generic_tree() {
        let doc = parse("Hello world.").unwrap();
        let map = TreeSerializer::new()
            .with_options(SerializeOptions {
                analyze: true,
                ..Default::default()
            })
            .serialize(&SourceNode::from_block(&doc.blocks[0]))
            .unwrap();
        assert_eq!(map["docbook_analyzed"]["$name"], json!("simpara"));
        assert_eq!(map["docbook_analyzed"]["$text"], json!("Hello world."));
    }

    #[test]
    fn test_root_without_blocks_is_missing_field() {
        let doc = parse("Just text.").unwrap();
        let err = TreeSerializer::new()
            .serialize_document_root(&SourceNode::from_block(&doc.blocks[0]))
            .unwrap_err();
        assert!(matches!(err, AdocError::MissingField(_)));
    }

    #[test]
    fn test_empty_document_has_empty_blocks() {
        let doc = parse("").unwrap();
        let map = TreeSerializer::new()
            .serialize_document_root(&SourceNode::Document(&doc))
            .unwrap();
        assert_eq!(map["blocks"], json!([]));
        assert!(map["docbook"].is_string());
    }
}
