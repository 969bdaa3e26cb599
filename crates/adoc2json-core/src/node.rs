//! Borrowed views over the document graph and their public field tables
//!
//! Every node variant exposes a fixed set of named fields. Scalar fields are
//! copied as JSON values; fields holding other nodes are kept as borrowed
//! [`SourceNode`]s so the serializer decides whether to expand them.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use adoc2json_ast::{plain_text, Block, Document, List, ListItem};

/// A node of the document graph, as seen by the serializer and renderer
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNode<'a> {
    /// The document root
    Document(&'a Document),
    /// Any block other than a list
    Block(&'a Block),
    /// An ordered or unordered list
    List(&'a List),
    /// A single list item
    ListItem(&'a ListItem),
    /// A raw sequence of nodes
    Array(Vec<SourceNode<'a>>),
}

/// Value of a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// A JSON scalar, string list or string map
    Scalar(Value),
    /// A sequence of nodes, not yet serialized
    Nodes(Vec<SourceNode<'a>>),
}

/// Public fields of one node, keyed by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap<'a> {
    fields: BTreeMap<&'static str, FieldValue<'a>>,
}

impl<'a> FieldMap<'a> {
    /// Create an empty field map
    pub fn new() -> Self {
        Self::default()
    }

    fn scalar(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.fields.insert(name, FieldValue::Scalar(value.into()));
        self
    }

    fn nodes(mut self, name: &'static str, nodes: Vec<SourceNode<'a>>) -> Self {
        self.fields.insert(name, FieldValue::Nodes(nodes));
        self
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldValue<'a>> {
        self.fields.get(name)
    }

    /// Iterate over fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue<'a>)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the node exposes no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> SourceNode<'a> {
    /// View a block, routing lists to [`SourceNode::List`]
    pub fn from_block(block: &'a Block) -> Self {
        match block {
            Block::List(list) => SourceNode::List(list),
            other => SourceNode::Block(other),
        }
    }

    /// View a slice of blocks as an [`SourceNode::Array`]
    pub fn array(blocks: &'a [Block]) -> Self {
        SourceNode::Array(block_nodes(blocks))
    }

    /// Context name (`document`, `paragraph`, `ulist`, `list_item`, `array`, ...)
    pub fn context(&self) -> &'static str {
        match self {
            SourceNode::Document(_) => "document",
            SourceNode::Block(block) => block.context(),
            SourceNode::List(list) => list.list_type.context(),
            SourceNode::ListItem(_) => "list_item",
            SourceNode::Array(_) => "array",
        }
    }

    /// Marker written in place of a node that is not expanded
    pub fn reference(&self) -> Value {
        json!({ "$ref": self.context() })
    }

    /// Extract the node's public fields
    pub fn fields(&self) -> FieldMap<'a> {
        match self {
            SourceNode::Document(doc) => document_fields(*doc),
            SourceNode::Block(block) => block_fields(*block),
            SourceNode::List(list) => list_fields(*list),
            SourceNode::ListItem(item) => list_item_fields(*item),
            SourceNode::Array(_) => FieldMap::new(),
        }
    }
}

/// View each block as a node
pub fn block_nodes(blocks: &[Block]) -> Vec<SourceNode<'_>> {
    blocks.iter().map(SourceNode::from_block).collect()
}

fn string_map(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), Value::from(value.as_str())))
            .collect::<Map<_, _>>(),
    )
}

fn document_fields(doc: &Document) -> FieldMap<'_> {
    let meta = &doc.metadata;
    FieldMap::new()
        .scalar("context", "document")
        .scalar("doctype", doc.doctype())
        .scalar("title", meta.title.clone())
        .scalar("authors", meta.authors.clone())
        .scalar("revision", meta.revision.clone())
        .scalar("attributes", string_map(&meta.attributes))
        .nodes("blocks", block_nodes(&doc.blocks))
}

fn block_fields(block: &Block) -> FieldMap<'_> {
    let fields = FieldMap::new().scalar("context", block.context());

    match block {
        Block::Paragraph(para) => fields
            .scalar("id", para.id.clone())
            .scalar("title", para.title.clone())
            .scalar("role", para.role.clone())
            .scalar("lines", para.lines.clone())
            .scalar("attributes", string_map(&para.attributes)),
        Block::Section(section) => fields
            .scalar("id", section.id.clone())
            .scalar("title", plain_text(&section.title))
            .scalar("level", section.level)
            .nodes("blocks", block_nodes(&section.blocks)),
        Block::List(list) => list_fields(list),
        Block::Literal(literal) => fields
            .scalar("id", literal.id.clone())
            .scalar("title", literal.title.clone())
            .scalar("style", literal.style.clone())
            .scalar("language", literal.language.clone())
            .scalar(
                "lines",
                literal.content.lines().map(str::to_string).collect::<Vec<_>>(),
            ),
        Block::Admonition(admonition) => fields
            .scalar("id", admonition.id.clone())
            .scalar("title", admonition.title.clone())
            .scalar("name", admonition.admonition_type.name())
            .scalar("caption", admonition.admonition_type.caption())
            .nodes("blocks", block_nodes(&admonition.content)),
        Block::Example(example) => fields
            .scalar("id", example.id.clone())
            .scalar("title", example.title.clone())
            .nodes("blocks", block_nodes(&example.content)),
        Block::Break(_) => fields,
    }
}

fn list_fields(list: &List) -> FieldMap<'_> {
    FieldMap::new()
        .scalar("context", list.list_type.context())
        .scalar("id", list.id.clone())
        .scalar("title", list.title.clone())
        .scalar("style", list.style.clone())
        .nodes("items", list.items.iter().map(SourceNode::ListItem).collect())
}

fn list_item_fields(item: &ListItem) -> FieldMap<'_> {
    FieldMap::new()
        .scalar("context", "list_item")
        .scalar("marker", item.marker.as_str())
        .scalar("level", item.level)
        .scalar("text", item.text.as_str())
        .nodes("blocks", block_nodes(&item.blocks))
}
