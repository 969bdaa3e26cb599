//! Block-level elements for document structure
//!
//! This module defines block-level elements that form the document structure,
//! such as paragraphs, sections, lists, literal blocks and admonitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::inline::Inline;

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),
    /// A section with its title and nested blocks
    Section(Section),
    /// An ordered or unordered list
    List(List),
    /// A listing or literal block
    Literal(LiteralBlock),
    /// An admonition (note, warning, etc.)
    Admonition(Admonition),
    /// An example block
    Example(Example),
    /// A thematic or page break
    Break(BreakType),
}

impl Block {
    /// Context name of the block (`paragraph`, `ulist`, `listing`, ...)
    pub fn context(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Section(_) => "section",
            Block::List(list) => list.list_type.context(),
            Block::Literal(literal) => literal.kind.context(),
            Block::Admonition(_) => "admonition",
            Block::Example(_) => "example",
            Block::Break(BreakType::Thematic) => "thematic_break",
            Block::Break(BreakType::Page) => "page_break",
        }
    }
}

/// A paragraph block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Source lines, as written
    pub lines: Vec<String>,
    /// Inline content parsed from the joined lines
    pub inlines: Vec<Inline>,
    /// Anchor/ID for cross-references
    pub id: Option<String>,
    /// Block title (`.Title` line)
    pub title: Option<String>,
    /// Role (`[.role]`)
    pub role: Option<String>,
    /// Named block attributes (`[key=value]`)
    pub attributes: BTreeMap<String, String>,
}

impl Paragraph {
    /// Build a single-line paragraph of plain text
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            inlines: vec![Inline::Text(text.clone())],
            lines: vec![text],
            ..Default::default()
        }
    }
}

/// A section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section level (1 for `==`, 2 for `===`, ...)
    pub level: u8,
    /// Section title
    pub title: Vec<Inline>,
    /// Anchor/ID, explicit or generated from the title
    pub id: String,
    /// Nested content
    pub blocks: Vec<Block>,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    /// Type of list
    pub list_type: ListType,
    /// List items
    pub items: Vec<ListItem>,
    /// Anchor/ID
    pub id: Option<String>,
    /// Block title
    pub title: Option<String>,
    /// Block style (e.g. `arabic` for ordered lists)
    pub style: Option<String>,
}

/// List type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListType {
    /// Unordered/bullet list
    Unordered,
    /// Ordered/numbered list
    Ordered,
}

impl ListType {
    /// Context name of a list of this type
    pub fn context(self) -> &'static str {
        match self {
            ListType::Unordered => "ulist",
            ListType::Ordered => "olist",
        }
    }
}

/// A single list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Marker as written (`*`, `**`, `.`, `-`)
    pub marker: String,
    /// Nesting depth (1-based)
    pub level: u8,
    /// Principal text as written
    pub text: String,
    /// Principal text parsed into inlines
    pub principal: Vec<Inline>,
    /// Attached blocks, such as nested lists
    pub blocks: Vec<Block>,
}

/// Kind of verbatim block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralKind {
    /// `----` delimited listing
    Listing,
    /// `....` delimited literal
    Literal,
}

impl LiteralKind {
    /// Context name of a block of this kind
    pub fn context(self) -> &'static str {
        match self {
            LiteralKind::Listing => "listing",
            LiteralKind::Literal => "literal",
        }
    }
}

/// A listing/literal block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralBlock {
    /// Listing or literal
    pub kind: LiteralKind,
    /// The verbatim content
    pub content: String,
    /// Block style (`source` when a language is given)
    pub style: Option<String>,
    /// Language for syntax highlighting
    pub language: Option<String>,
    /// Optional title/caption
    pub title: Option<String>,
    /// Anchor/ID
    pub id: Option<String>,
}

/// An admonition block (note, warning, tip, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admonition {
    /// Type of admonition
    pub admonition_type: AdmonitionType,
    /// Admonition content
    pub content: Vec<Block>,
    /// Optional title
    pub title: Option<String>,
    /// Anchor/ID
    pub id: Option<String>,
}

/// Admonition type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmonitionType {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AdmonitionType {
    /// Parse an admonition label (`NOTE`, `TIP`, ...)
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "NOTE" => Some(Self::Note),
            "TIP" => Some(Self::Tip),
            "IMPORTANT" => Some(Self::Important),
            "WARNING" => Some(Self::Warning),
            "CAUTION" => Some(Self::Caution),
            _ => None,
        }
    }

    /// Lowercase name, also the DocBook element name
    pub fn name(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    /// Default caption
    pub fn caption(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Important => "Important",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
        }
    }
}

/// An example block (`====`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// Example content
    pub content: Vec<Block>,
    /// Optional title
    pub title: Option<String>,
    /// Anchor/ID
    pub id: Option<String>,
}

/// Break type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakType {
    /// Thematic break (`'''`)
    Thematic,
    /// Page break (`<<<`)
    Page,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_default() {
        let para = Paragraph::default();
        assert!(para.inlines.is_empty());
        assert!(para.id.is_none());
    }

    #[test]
    fn test_paragraph_from_text() {
        let para = Paragraph::from_text("Hello");
        assert_eq!(para.lines, vec!["Hello".to_string()]);
        assert_eq!(para.inlines, vec![Inline::Text("Hello".to_string())]);
    }

    #[test]
    fn test_block_contexts() {
        let list = Block::List(List {
            list_type: ListType::Ordered,
            items: vec![],
            id: None,
            title: None,
            style: Some("arabic".to_string()),
        });
        assert_eq!(list.context(), "olist");
        assert_eq!(Block::Break(BreakType::Page).context(), "page_break");
        assert_eq!(
            Block::Literal(LiteralBlock {
                kind: LiteralKind::Listing,
                content: String::new(),
                style: None,
                language: None,
                title: None,
                id: None,
            })
            .context(),
            "listing"
        );
    }

    #[test]
    fn test_admonition_labels() {
        assert_eq!(AdmonitionType::from_label("TIP"), Some(AdmonitionType::Tip));
        assert_eq!(AdmonitionType::from_label("tip"), None);
        assert_eq!(AdmonitionType::Warning.name(), "warning");
        assert_eq!(AdmonitionType::Caution.caption(), "Caution");
    }
}
