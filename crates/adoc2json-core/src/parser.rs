//! AsciiDoc loader
//!
//! This module parses AsciiDoc text into an `adoc2json_ast::Document`.
//!
//! # Supported Syntax
//!
//! - Document header: `= Title`, author line, revision line, `:key: value`
//! - Sections: `== Level 1`, `=== Level 2`, etc.
//! - Paragraphs: text separated by blank lines, `NOTE:` style admonitions
//! - Lists: `* unordered`, `- unordered`, `. ordered`, nested by marker
//! - Delimited blocks: `----` listing, `....` literal, `====` example,
//!   `////` comment
//! - Block metadata: `.Title`, `[[id]]`, `[style#id.role,positional,key=value]`
//! - Breaks: `'''` and `<<<`
//! - Formatting: `*bold*`, `_italic_`, `` `mono` ``, `https://url[text]`
//!
//! # Example
//!
//! ```
//! use adoc2json_core::parser;
//!
//! let input = r#"= My Document
//!
//! == Introduction
//!
//! Hello *world*.
//! "#;
//!
//! let doc = parser::parse(input)?;
//! assert_eq!(doc.metadata.title, Some("My Document".to_string()));
//! # Ok::<(), adoc2json_core::AdocError>(())
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace};

use adoc2json_ast::{
    plain_text, Admonition, AdmonitionType, Block, BreakType, Document, DocumentMeta, Example,
    FormatType, Inline, Link, List, ListItem, ListType, LiteralBlock, LiteralKind, Paragraph,
    Section,
};

use crate::error::{AdocError, Result};

// Compiled once, on first use
fn attribute_entry() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^:(!?)([A-Za-z0-9_][A-Za-z0-9_-]*)(!?):(?:[ \t]+(.*))?$")
            .expect("valid attribute entry pattern")
    })
}

fn block_anchor() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\[\[([A-Za-z_:][\w:.-]*)(?:,[^\]]*)?\]\]$")
            .expect("valid block anchor pattern")
    })
}

fn block_attributes() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([^\[\]]*)\]$").expect("valid block attribute pattern"))
}

fn block_title() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\.([^.\s].*)$").expect("valid title pattern"))
}

fn list_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\*{1,5}|-|\.{1,5})[ \t]+(.*)$").expect("valid list item pattern")
    })
}

fn admonition_paragraph() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(NOTE|TIP|IMPORTANT|WARNING|CAUTION):[ \t]+(.*)$")
            .expect("valid admonition pattern")
    })
}

fn revision_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^v?(\d[^,:]*?)\s*(?:,.*)?$").expect("valid revision pattern"))
}

fn inline_markup() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"\*([^*\s](?:[^*]*[^*\s])?)\*",
            r"|_([^_\s](?:[^_]*[^_\s])?)_",
            r"|`([^`]+)`",
            r"|(https?://[^\s\[\]]*[^\s\[\].,;:!?)])(?:\[([^\]]*)\])?",
        ))
        .expect("valid inline markup pattern")
    })
}

/// Numbering styles used by ordered lists, by nesting depth
const ORDERED_STYLES: [&str; 5] = ["arabic", "loweralpha", "lowerroman", "upperalpha", "upperroman"];

/// Options applied when loading a document
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Attributes that override the document's own attribute entries.
    /// A key ending in `!` unsets the attribute instead.
    pub attributes: BTreeMap<String, String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert("backend".to_string(), "docbook5".to_string());
        Self { attributes }
    }
}

impl LoadOptions {
    /// Options with no API attributes at all
    pub fn empty() -> Self {
        Self {
            attributes: BTreeMap::new(),
        }
    }

    /// Add or replace an API attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Block metadata collected from the lines preceding a block
#[derive(Debug, Clone, Default, PartialEq)]
struct BlockAttrs {
    id: Option<String>,
    title: Option<String>,
    style: Option<String>,
    role: Option<String>,
    language: Option<String>,
    named: BTreeMap<String, String>,
}

impl BlockAttrs {
    /// Merge the content of a `[...]` attribute line
    fn merge_line(&mut self, content: &str) {
        let mut positional = 0;
        for part in content.split(',').map(str::trim) {
            if let Some((key, value)) = part.split_once('=') {
                self.named.insert(
                    key.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                );
                continue;
            }
            positional += 1;
            match positional {
                1 => self.apply_shorthand(part),
                2 if !part.is_empty() => self.language = Some(part.to_string()),
                _ => {}
            }
        }
    }

    /// Apply `style#id.role` shorthand
    fn apply_shorthand(&mut self, spec: &str) {
        let end = spec.find(['#', '.']).unwrap_or(spec.len());
        if end > 0 {
            self.style = Some(spec[..end].to_string());
        }

        let mut rest = &spec[end..];
        while let Some(sigil) = rest.chars().next() {
            let body = &rest[sigil.len_utf8()..];
            let next = body.find(['#', '.']).unwrap_or(body.len());
            let value = &body[..next];
            if !value.is_empty() {
                match sigil {
                    '#' => self.id = Some(value.to_string()),
                    _ => {
                        self.role = Some(match self.role.take() {
                            Some(existing) => format!("{} {}", existing, value),
                            None => value.to_string(),
                        })
                    }
                }
            }
            rest = &body[next..];
        }
    }

    fn admonition_type(&self) -> Option<AdmonitionType> {
        self.style.as_deref().and_then(AdmonitionType::from_label)
    }
}

/// Delimited block kinds
#[derive(Debug, Clone, Copy, PartialEq)]
enum Delimiter {
    Listing,
    Literal,
    Example,
    Comment,
}

impl Delimiter {
    fn from_fence(line: &str) -> Option<Self> {
        match line {
            "----" => Some(Self::Listing),
            "...." => Some(Self::Literal),
            "====" => Some(Self::Example),
            "////" => Some(Self::Comment),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Literal => "literal",
            Self::Example => "example",
            Self::Comment => "comment",
        }
    }
}

/// A list item before nesting is resolved
#[derive(Debug, Clone, PartialEq)]
struct PendingItem {
    marker: String,
    level: u8,
    text: String,
}

/// Parser state for tracking what kind of block we're currently building
#[derive(Debug, Clone, PartialEq)]
enum ParserState {
    /// At the root level, not in any block
    Root,
    /// Building a paragraph with accumulated lines
    Paragraph { attrs: BlockAttrs, lines: Vec<String> },
    /// Building a list; `markers` holds the marker of each open depth
    List {
        attrs: BlockAttrs,
        markers: Vec<String>,
        items: Vec<PendingItem>,
    },
    /// Inside a delimited block, collecting raw lines until the closing fence
    Delimited {
        delimiter: Delimiter,
        fence: String,
        attrs: BlockAttrs,
        start_line: usize,
        lines: Vec<String>,
    },
}

/// Where we are within the document header
#[derive(Debug, Clone, Copy, PartialEq)]
enum HeaderState {
    /// Nothing seen yet; a `= Title` line is still allowed
    Start,
    /// Title seen; the next line may be the author line
    AfterTitle,
    /// Author line seen; the next line may be the revision line
    AfterAuthor,
    /// Only attribute entries remain
    Attributes,
    /// Header finished
    Done,
}

/// AsciiDoc parser using a state machine approach
struct Parser {
    /// Document metadata
    metadata: DocumentMeta,
    /// Top-level blocks
    blocks: Vec<Block>,
    /// Open sections, outermost first
    sections: Vec<Section>,
    /// Current parser state
    state: ParserState,
    /// Metadata waiting for the next block
    pending: BlockAttrs,
    /// Header progress
    header: HeaderState,
    /// Line number of the first line handed to this parser, minus one
    line_offset: usize,
    /// Section ids handed out so far
    used_ids: HashSet<String>,
    /// A blank line followed the last list item
    list_gap: bool,
}

impl Parser {
    fn new() -> Self {
        Self::with_offset(0, HeaderState::Start)
    }

    /// Parser for the content of a compound block starting after `line_offset`
    fn nested(line_offset: usize) -> Self {
        Self::with_offset(line_offset, HeaderState::Done)
    }

    fn with_offset(line_offset: usize, header: HeaderState) -> Self {
        Self {
            metadata: DocumentMeta::default(),
            blocks: Vec::new(),
            sections: Vec::new(),
            state: ParserState::Root,
            pending: BlockAttrs::default(),
            header,
            line_offset,
            used_ids: HashSet::new(),
            list_gap: false,
        }
    }

    /// Parse the entire document
    fn parse(mut self, text: &str) -> Result<Document> {
        // Normalize line endings
        let text = text.replace("\r\n", "\n");

        for (index, line) in text.lines().enumerate() {
            self.process_line(line, self.line_offset + index + 1)?;
        }

        self.finish()?;

        Ok(Document {
            metadata: self.metadata,
            blocks: self.blocks,
        })
    }

    /// Parse the content of a compound block into blocks
    fn parse_blocks(self, lines: &[String]) -> Result<Vec<Block>> {
        Ok(self.parse(&lines.join("\n"))?.blocks)
    }

    /// Flush pending state and close every open section
    fn finish(&mut self) -> Result<()> {
        if let ParserState::Delimited {
            delimiter,
            start_line,
            ..
        } = &self.state
        {
            return Err(AdocError::Parse {
                line: *start_line,
                message: format!("unterminated {} block", delimiter.name()),
            });
        }

        self.flush_state()?;
        while let Some(section) = self.sections.pop() {
            self.push_block(Block::Section(section));
        }
        Ok(())
    }

    /// Process a single line
    fn process_line(&mut self, line: &str, line_number: usize) -> Result<()> {
        let line = line.trim_end();

        if let ParserState::Delimited { fence, lines, .. } = &mut self.state {
            if line == fence.as_str() {
                return self.flush_state();
            }
            lines.push(line.to_string());
            return Ok(());
        }

        // Single-line comments
        if line.starts_with("//") && !line.starts_with("///") {
            return Ok(());
        }

        if self.header != HeaderState::Done && self.process_header_line(line) {
            return Ok(());
        }

        // Empty line handling; lists stay open across blank lines
        if line.is_empty() {
            if matches!(self.state, ParserState::List { .. }) {
                self.list_gap = true;
            } else {
                self.flush_state()?;
            }
            if self.header != HeaderState::Start {
                self.header = HeaderState::Done;
            }
            return Ok(());
        }

        // Once we see a non-header element, header is done
        self.header = HeaderState::Done;

        if let ParserState::Paragraph { lines, .. } = &mut self.state {
            if Delimiter::from_fence(line).is_none() && !is_list_item(line) {
                lines.push(line.to_string());
                return Ok(());
            }
        }

        if let Some(delimiter) = Delimiter::from_fence(line) {
            self.flush_state()?;
            self.state = ParserState::Delimited {
                delimiter,
                fence: line.to_string(),
                attrs: std::mem::take(&mut self.pending),
                start_line: line_number,
                lines: Vec::new(),
            };
            return Ok(());
        }

        if let Some(caps) = list_item().captures(line) {
            self.list_gap = false;
            return self.handle_list_item(&caps[1], &caps[2]);
        }

        if !self.list_gap {
            if let ParserState::List { items, .. } = &mut self.state {
                // Continuation of the last item's principal text
                if let Some(last) = items.last_mut() {
                    last.text.push(' ');
                    last.text.push_str(line.trim_start());
                    return Ok(());
                }
            }
        }

        self.flush_state()?;

        if self.try_block_metadata(line) {
            return Ok(());
        }

        if let Some(kind) = match line {
            "'''" => Some(BreakType::Thematic),
            "<<<" => Some(BreakType::Page),
            _ => None,
        } {
            self.pending = BlockAttrs::default();
            self.push_block(Block::Break(kind));
            return Ok(());
        }

        if let Some(attribute) = attribute_entry().captures(line) {
            self.apply_attribute_entry(&attribute);
            return Ok(());
        }

        if let Some((level, title)) = try_parse_heading(line) {
            self.open_section(level, title);
            return Ok(());
        }

        self.start_paragraph(line);
        Ok(())
    }

    /// Handle header lines; returns true when the line was consumed
    fn process_header_line(&mut self, line: &str) -> bool {
        if let Some(attribute) = attribute_entry().captures(line) {
            self.apply_attribute_entry(&attribute);
            self.header = HeaderState::Attributes;
            return true;
        }

        match self.header {
            HeaderState::Start => {
                if let Some(title) = line.strip_prefix("= ") {
                    let title = title.trim().to_string();
                    self.metadata.set_attribute("doctitle", title.clone());
                    self.metadata.title = Some(title);
                    self.header = HeaderState::AfterTitle;
                    return true;
                }
            }
            HeaderState::AfterTitle if !line.is_empty() => {
                self.parse_author_line(line);
                self.header = HeaderState::AfterAuthor;
                return true;
            }
            HeaderState::AfterAuthor => {
                if let Some(caps) = revision_line().captures(line) {
                    let revision = caps[1].trim().to_string();
                    self.metadata.set_attribute("revnumber", revision.clone());
                    self.metadata.revision = Some(revision);
                    self.header = HeaderState::Attributes;
                    return true;
                }
            }
            _ => {}
        }
        false
    }

    /// Parse an author line like `Jane Doe <jane@example.com>; John Roe`
    fn parse_author_line(&mut self, line: &str) {
        for entry in line.split(';') {
            let name = entry.split('<').next().unwrap_or_default().trim();
            if !name.is_empty() {
                self.metadata.add_author(name);
            }
        }
        if let Some(first) = self.metadata.authors.first().cloned() {
            self.metadata.set_attribute("author", first);
        }
        let joined = self.metadata.authors.join(", ");
        self.metadata.set_attribute("authors", joined);
    }

    /// Apply `:key: value`, `:key!:` or `:!key:`
    fn apply_attribute_entry(&mut self, caps: &regex::Captures<'_>) {
        let key = &caps[2];
        let unset = !caps[1].is_empty() || !caps[3].is_empty();
        if unset {
            self.metadata.unset_attribute(key);
        } else {
            let value = caps.get(4).map(|m| m.as_str().trim()).unwrap_or_default();
            self.metadata.set_attribute(key, value);
        }
    }

    /// Consume `.Title`, `[[id]]` and `[...]` lines into pending metadata
    fn try_block_metadata(&mut self, line: &str) -> bool {
        if let Some(caps) = block_anchor().captures(line) {
            self.pending.id = Some(caps[1].to_string());
            return true;
        }
        if let Some(caps) = block_attributes().captures(line) {
            self.pending.merge_line(&caps[1]);
            return true;
        }
        if let Some(caps) = block_title().captures(line) {
            self.pending.title = Some(caps[1].trim().to_string());
            return true;
        }
        false
    }

    fn start_paragraph(&mut self, line: &str) {
        let mut attrs = std::mem::take(&mut self.pending);
        let text = match admonition_paragraph().captures(line) {
            Some(caps) => {
                attrs.style = Some(caps[1].to_string());
                caps[2].to_string()
            }
            None => line.to_string(),
        };
        self.state = ParserState::Paragraph {
            attrs,
            lines: vec![text],
        };
    }

    /// Handle a list item, nesting it by marker
    fn handle_list_item(&mut self, marker: &str, text: &str) -> Result<()> {
        if !matches!(self.state, ParserState::List { .. }) {
            self.flush_state()?;
            self.state = ParserState::List {
                attrs: std::mem::take(&mut self.pending),
                markers: Vec::new(),
                items: Vec::new(),
            };
        }

        if let ParserState::List { markers, items, .. } = &mut self.state {
            let level = match markers.iter().position(|m| m == marker) {
                Some(index) => {
                    markers.truncate(index + 1);
                    index + 1
                }
                None => {
                    markers.push(marker.to_string());
                    markers.len()
                }
            };
            items.push(PendingItem {
                marker: marker.to_string(),
                level: level as u8,
                text: text.trim().to_string(),
            });
        }
        Ok(())
    }

    /// Open a section, closing any open sections at the same or deeper level
    fn open_section(&mut self, level: u8, title: &str) {
        while self.sections.last().is_some_and(|s| s.level >= level) {
            if let Some(section) = self.sections.pop() {
                self.push_block(Block::Section(section));
            }
        }

        let attrs = std::mem::take(&mut self.pending);
        let title = parse_inlines(title);
        let id = match attrs.id {
            Some(id) => id,
            None => self.generate_id(&plain_text(&title)),
        };
        self.used_ids.insert(id.clone());
        trace!(level, id = %id, "opened section");
        self.sections.push(Section {
            level,
            title,
            id,
            blocks: Vec::new(),
        });
    }

    /// Generate a unique `_lower_snake` id from a section title
    fn generate_id(&self, title: &str) -> String {
        let mut id = String::from("_");
        for ch in title.chars().flat_map(char::to_lowercase) {
            if ch.is_alphanumeric() {
                id.push(ch);
            } else if !id.ends_with('_') {
                id.push('_');
            }
        }
        while id.len() > 1 && id.ends_with('_') {
            id.pop();
        }

        if !self.used_ids.contains(&id) {
            return id;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", id, n);
            if !self.used_ids.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn push_block(&mut self, block: Block) {
        match self.sections.last_mut() {
            Some(section) => section.blocks.push(block),
            None => self.blocks.push(block),
        }
    }

    /// Flush the current state to blocks
    fn flush_state(&mut self) -> Result<()> {
        let state = std::mem::replace(&mut self.state, ParserState::Root);
        self.list_gap = false;

        match state {
            ParserState::Root => {}
            ParserState::Paragraph { attrs, lines } => {
                let block = build_paragraph(attrs, lines);
                self.push_block(block);
            }
            ParserState::List { attrs, items, .. } => {
                if let Some(list) = build_list(attrs, items) {
                    self.push_block(Block::List(list));
                }
            }
            ParserState::Delimited {
                delimiter,
                attrs,
                start_line,
                lines,
                ..
            } => {
                if let Some(block) = build_delimited(delimiter, attrs, start_line, lines)? {
                    self.push_block(block);
                }
            }
        }
        Ok(())
    }
}

fn is_list_item(line: &str) -> bool {
    list_item().is_match(line)
}

/// Try to parse a section title line (`==` through `======`)
fn try_parse_heading(line: &str) -> Option<(u8, &str)> {
    let level = line.chars().take_while(|&ch| ch == '=').count();
    if !(2..=6).contains(&level) {
        return None;
    }
    let title = line[level..].strip_prefix(' ')?.trim();
    if title.is_empty() {
        return None;
    }
    Some(((level - 1) as u8, title))
}

fn build_paragraph(attrs: BlockAttrs, lines: Vec<String>) -> Block {
    let inlines = parse_inlines(&lines.join("\n"));

    match attrs.admonition_type() {
        Some(admonition_type) => Block::Admonition(Admonition {
            admonition_type,
            content: vec![Block::Paragraph(Paragraph {
                lines,
                inlines,
                ..Default::default()
            })],
            title: attrs.title,
            id: attrs.id,
        }),
        None => Block::Paragraph(Paragraph {
            lines,
            inlines,
            id: attrs.id,
            title: attrs.title,
            role: attrs.role,
            attributes: attrs.named,
        }),
    }
}

/// Build a list, nesting items by depth
fn build_list(attrs: BlockAttrs, items: Vec<PendingItem>) -> Option<List> {
    let first = items.first()?;
    let list_type = list_type_of(&first.marker);
    let root_level = first.level;

    let mut iter = items.into_iter().peekable();
    let items = nest_items(&mut iter, root_level);

    Some(List {
        list_type,
        items,
        id: attrs.id,
        title: attrs.title,
        style: attrs
            .style
            .or_else(|| list_style(list_type, root_level).map(str::to_string)),
    })
}

fn nest_items(
    iter: &mut std::iter::Peekable<std::vec::IntoIter<PendingItem>>,
    level: u8,
) -> Vec<ListItem> {
    let mut out: Vec<ListItem> = Vec::new();

    while let Some(next) = iter.peek() {
        if next.level < level {
            break;
        }
        if next.level == level || out.is_empty() {
            if let Some(item) = iter.next() {
                out.push(ListItem {
                    principal: parse_inlines(&item.text),
                    marker: item.marker,
                    level: item.level,
                    text: item.text,
                    blocks: Vec::new(),
                });
            }
            continue;
        }

        let child_level = next.level;
        let list_type = list_type_of(&next.marker);
        let children = nest_items(iter, child_level);
        if let Some(parent) = out.last_mut() {
            parent.blocks.push(Block::List(List {
                list_type,
                items: children,
                id: None,
                title: None,
                style: list_style(list_type, child_level).map(str::to_string),
            }));
        }
    }

    out
}

fn list_type_of(marker: &str) -> ListType {
    if marker.starts_with('.') {
        ListType::Ordered
    } else {
        ListType::Unordered
    }
}

fn list_style(list_type: ListType, level: u8) -> Option<&'static str> {
    match list_type {
        ListType::Ordered => {
            Some(ORDERED_STYLES[(level.max(1) as usize - 1) % ORDERED_STYLES.len()])
        }
        ListType::Unordered => None,
    }
}

fn build_delimited(
    delimiter: Delimiter,
    attrs: BlockAttrs,
    start_line: usize,
    lines: Vec<String>,
) -> Result<Option<Block>> {
    let block = match delimiter {
        Delimiter::Comment => return Ok(None),
        Delimiter::Listing | Delimiter::Literal => {
            let kind = if delimiter == Delimiter::Listing {
                LiteralKind::Listing
            } else {
                LiteralKind::Literal
            };
            let language = match attrs.style.as_deref() {
                Some("source") => attrs.language,
                _ => None,
            };
            Block::Literal(LiteralBlock {
                kind,
                content: lines.join("\n"),
                style: attrs.style,
                language,
                title: attrs.title,
                id: attrs.id,
            })
        }
        Delimiter::Example => {
            let content = Parser::nested(start_line).parse_blocks(&lines)?;
            match attrs.admonition_type() {
                Some(admonition_type) => Block::Admonition(Admonition {
                    admonition_type,
                    content,
                    title: attrs.title,
                    id: attrs.id,
                }),
                None => Block::Example(Example {
                    content,
                    title: attrs.title,
                    id: attrs.id,
                }),
            }
        }
    };
    Ok(Some(block))
}

/// Parse inline formatting in text
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut result = Vec::new();
    let mut last = 0;

    for caps in inline_markup().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        // Add any text before the match
        if whole.start() > last {
            result.push(Inline::Text(text[last..whole.start()].to_string()));
        }

        let formatted = |format_type: FormatType, index: usize| {
            Inline::Format(
                format_type,
                Box::new(Inline::Text(caps[index].to_string())),
            )
        };

        let inline = if caps.get(1).is_some() {
            formatted(FormatType::Bold, 1)
        } else if caps.get(2).is_some() {
            formatted(FormatType::Italic, 2)
        } else if caps.get(3).is_some() {
            formatted(FormatType::Monospace, 3)
        } else {
            Inline::Link(Link {
                url: caps[4].to_string(),
                text: caps
                    .get(5)
                    .map(|m| m.as_str())
                    .filter(|t| !t.is_empty())
                    .map(parse_inlines)
                    .unwrap_or_default(),
            })
        };
        result.push(inline);
        last = whole.end();
    }

    if last < text.len() || result.is_empty() {
        result.push(Inline::Text(text[last..].to_string()));
    }

    result
}

/// Parse AsciiDoc text into a document, without API attributes.
///
/// # Errors
///
/// Returns [`AdocError::Parse`] when a delimited block is never closed.
/// Unknown constructs are treated as plain paragraph text.
pub fn parse(text: &str) -> Result<Document> {
    Parser::new().parse(text)
}

/// Parse AsciiDoc text and apply the API attributes from `options`
pub fn load(text: &str, options: &LoadOptions) -> Result<Document> {
    let mut doc = parse(text)?;

    for (key, value) in &options.attributes {
        match key.strip_suffix('!') {
            Some(key) => {
                doc.metadata.unset_attribute(key);
            }
            None => doc.metadata.set_attribute(key.as_str(), value.as_str()),
        }
    }

    debug!(
        blocks = doc.len(),
        attributes = doc.metadata.attributes.len(),
        "loaded document"
    );
    Ok(doc)
}

/// Read and load an AsciiDoc file
///
/// # Errors
///
/// Returns [`AdocError::Input`] when the file cannot be read, or any error
/// from [`load`].
pub fn load_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Document> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| AdocError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read input file");
    load(&text, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title_only_document() {
        let doc = parse("= Test").unwrap();
        assert_eq!(doc.metadata.title.as_deref(), Some("Test"));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parse_inlines_simple() {
        let inlines = parse_inlines("Hello world");
        assert_eq!(inlines, vec![Inline::Text("Hello world".to_string())]);
    }

    #[test]
    fn test_parse_inlines_bold() {
        let inlines = parse_inlines("Hello *world*");
        assert_eq!(inlines.len(), 2);
        assert_eq!(inlines[0], Inline::Text("Hello ".to_string()));
        assert!(matches!(inlines[1], Inline::Format(FormatType::Bold, _)));
    }

    #[test]
    fn test_parse_inlines_unconstrained_asterisks_stay_text() {
        let inlines = parse_inlines("2 * 3 * 4");
        assert_eq!(inlines, vec![Inline::Text("2 * 3 * 4".to_string())]);
    }

    #[test]
    fn test_parse_inlines_link() {
        let inlines = parse_inlines("See https://example.com[the site].");
        assert_eq!(inlines.len(), 3);
        match &inlines[1] {
            Inline::Link(link) => {
                assert_eq!(link.url, "https://example.com");
                assert_eq!(link.text, vec![Inline::Text("the site".to_string())]);
            }
            other => panic!("Expected link, got {:?}", other),
        }
        assert_eq!(inlines[2], Inline::Text(".".to_string()));
    }

    #[test]
    fn test_parse_inlines_empty() {
        assert_eq!(parse_inlines(""), vec![Inline::Text(String::new())]);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(try_parse_heading("== One"), Some((1, "One")));
        assert_eq!(try_parse_heading("====== Five"), Some((5, "Five")));
        assert_eq!(try_parse_heading("======= Six"), None);
        assert_eq!(try_parse_heading("==NoSpace"), None);
        assert_eq!(try_parse_heading("= Title"), None);
    }

    #[test]
    fn test_block_attrs_shorthand() {
        let mut attrs = BlockAttrs::default();
        attrs.merge_line("source#hello.lead.wide,rust,linenums=true");
        assert_eq!(attrs.style.as_deref(), Some("source"));
        assert_eq!(attrs.id.as_deref(), Some("hello"));
        assert_eq!(attrs.role.as_deref(), Some("lead wide"));
        assert_eq!(attrs.language.as_deref(), Some("rust"));
        assert_eq!(attrs.named.get("linenums").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let doc = parse("== Intro\n\n== Intro\n\n== Getting Started!").unwrap();
        let ids: Vec<_> = doc
            .blocks
            .iter()
            .map(|b| match b {
                Block::Section(s) => s.id.clone(),
                other => panic!("Expected section, got {:?}", other),
            })
            .collect();
        assert_eq!(ids, vec!["_intro", "_intro_2", "_getting_started"]);
    }

    #[test]
    fn test_load_applies_api_attributes() {
        let options = LoadOptions::default()
            .with_attribute("lang", "de")
            .with_attribute("toc!", "");
        let doc = load(":lang: en\n:toc: left\n\nText", &options).unwrap();
        assert_eq!(doc.metadata.get_attribute("lang"), Some("de"));
        assert_eq!(doc.metadata.get_attribute("backend"), Some("docbook5"));
        assert_eq!(doc.metadata.get_attribute("toc"), None);
    }

    #[test]
    fn test_unterminated_block_is_parse_error() {
        let err = parse("Intro\n\n----\nfn main() {}\n").unwrap_err();
        match err {
            AdocError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("listing"));
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }
}
