//! DocBook 5 Renderer
//!
//! This module renders nodes of the document graph as DocBook 5 markup.
//!
//! # Example
//!
//! ```
//! use adoc2json_ast::{Block, Paragraph};
//! use adoc2json_core::{DocBookRenderer, Render, SourceNode};
//!
//! let block = Block::Paragraph(Paragraph::from_text("Hello world."));
//! let markup = DocBookRenderer::new().render(&SourceNode::from_block(&block))?;
//! assert_eq!(markup, "<simpara>Hello world.</simpara>");
//! # Ok::<(), adoc2json_core::AdocError>(())
//! ```

use std::fmt::Write;

use quick_xml::escape::{escape, partial_escape};

use adoc2json_ast::{
    Admonition, Block, BreakType, Document, Example, FormatType, Inline, List, ListItem,
    ListType, LiteralBlock, LiteralKind, Paragraph, Section,
};

use crate::error::Result;
use crate::node::SourceNode;

const DOCBOOK_NS: &str = "http://docbook.org/ns/docbook";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Renders a node into markup text
pub trait Render {
    /// Render `node`, returning the markup
    fn render(&self, node: &SourceNode<'_>) -> Result<String>;
}

/// DocBook renderer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Wrap the document in an `<article>` (or `<book>`) root with an `<info>` header
    pub standalone: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { standalone: true }
    }
}

/// DocBook 5 renderer
#[derive(Debug, Clone, Default)]
pub struct DocBookRenderer {
    options: RenderOptions,
}

impl DocBookRenderer {
    /// Create a renderer with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with custom options
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// The renderer's options
    pub fn options(&self) -> RenderOptions {
        self.options
    }
}

impl Render for DocBookRenderer {
    fn render(&self, node: &SourceNode<'_>) -> Result<String> {
        let mut writer = DocBookWriter {
            options: self.options,
            output: String::new(),
        };
        writer.write_node(node)?;
        Ok(writer.output)
    }
}

/// Accumulates markup for one render call
struct DocBookWriter {
    options: RenderOptions,
    output: String,
}

impl DocBookWriter {
    fn write_node(&mut self, node: &SourceNode<'_>) -> std::fmt::Result {
        match node {
            SourceNode::Document(doc) => self.write_document(doc),
            SourceNode::Block(block) => self.write_block(block),
            SourceNode::List(list) => self.write_list(list),
            SourceNode::ListItem(item) => self.write_list_item(item),
            SourceNode::Array(nodes) => {
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        self.output.push('\n');
                    }
                    self.write_node(node)?;
                }
                Ok(())
            }
        }
    }

    fn write_document(&mut self, doc: &Document) -> std::fmt::Result {
        if !self.options.standalone {
            return self.write_blocks(&doc.blocks);
        }

        let root = match doc.doctype() {
            "book" => "book",
            _ => "article",
        };
        let lang = doc.metadata.get_attribute("lang").unwrap_or("en");

        writeln!(self.output, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            self.output,
            r#"<{} xmlns="{}" xmlns:xl="{}" version="5.0" xml:lang="{}">"#,
            root,
            DOCBOOK_NS,
            XLINK_NS,
            escape(lang)
        )?;

        let meta = &doc.metadata;
        if meta.title.is_some() || !meta.authors.is_empty() || meta.revision.is_some() {
            writeln!(self.output, "<info>")?;
            if let Some(ref title) = meta.title {
                writeln!(self.output, "<title>{}</title>", partial_escape(title))?;
            }
            for author in &meta.authors {
                writeln!(
                    self.output,
                    "<author><personname>{}</personname></author>",
                    partial_escape(author)
                )?;
            }
            if let Some(ref revision) = meta.revision {
                writeln!(
                    self.output,
                    "<revhistory><revision><revnumber>{}</revnumber></revision></revhistory>",
                    partial_escape(revision)
                )?;
            }
            writeln!(self.output, "</info>")?;
        }

        if !doc.blocks.is_empty() {
            self.write_blocks(&doc.blocks)?;
            self.output.push('\n');
        }
        write!(self.output, "</{}>", root)
    }

    /// Write blocks separated by newlines
    fn write_blocks(&mut self, blocks: &[Block]) -> std::fmt::Result {
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            self.write_block(block)?;
        }
        Ok(())
    }

    fn write_block(&mut self, block: &Block) -> std::fmt::Result {
        match block {
            Block::Paragraph(p) => self.write_paragraph(p),
            Block::Section(s) => self.write_section(s),
            Block::List(l) => self.write_list(l),
            Block::Literal(l) => self.write_literal(l),
            Block::Admonition(a) => self.write_admonition(a),
            Block::Example(e) => self.write_example(e),
            Block::Break(BreakType::Thematic) => {
                write!(self.output, "<simpara><?asciidoc-hr?></simpara>")
            }
            Block::Break(BreakType::Page) => {
                write!(self.output, "<simpara><?asciidoc-pagebreak?></simpara>")
            }
        }
    }

    /// ` xml:id="..."` when an id is set
    fn id_attr(id: Option<&str>) -> String {
        id.map(|id| format!(r#" xml:id="{}""#, escape(id)))
            .unwrap_or_default()
    }

    fn write_paragraph(&mut self, para: &Paragraph) -> std::fmt::Result {
        let id = Self::id_attr(para.id.as_deref());
        let role = para
            .role
            .as_deref()
            .map(|role| format!(r#" role="{}""#, escape(role)))
            .unwrap_or_default();

        match para.title {
            Some(ref title) => {
                write!(
                    self.output,
                    "<formalpara{}{}>\n<title>{}</title>\n<para>",
                    id,
                    role,
                    partial_escape(title)
                )?;
                self.write_inlines(&para.inlines)?;
                write!(self.output, "</para>\n</formalpara>")
            }
            None => {
                write!(self.output, "<simpara{}{}>", id, role)?;
                self.write_inlines(&para.inlines)?;
                write!(self.output, "</simpara>")
            }
        }
    }

    fn write_section(&mut self, section: &Section) -> std::fmt::Result {
        writeln!(
            self.output,
            "<section{}>",
            Self::id_attr(Some(section.id.as_str()))
        )?;
        write!(self.output, "<title>")?;
        self.write_inlines(&section.title)?;
        writeln!(self.output, "</title>")?;
        if !section.blocks.is_empty() {
            self.write_blocks(&section.blocks)?;
            self.output.push('\n');
        }
        write!(self.output, "</section>")
    }

    fn write_list(&mut self, list: &List) -> std::fmt::Result {
        let id = Self::id_attr(list.id.as_deref());
        let element = match list.list_type {
            ListType::Unordered => {
                writeln!(self.output, "<itemizedlist{}>", id)?;
                "itemizedlist"
            }
            ListType::Ordered => {
                let numeration = list.style.as_deref().unwrap_or("arabic");
                writeln!(
                    self.output,
                    r#"<orderedlist{} numeration="{}">"#,
                    id,
                    escape(numeration)
                )?;
                "orderedlist"
            }
        };
        if let Some(ref title) = list.title {
            writeln!(self.output, "<title>{}</title>", partial_escape(title))?;
        }
        for item in &list.items {
            self.write_list_item(item)?;
            self.output.push('\n');
        }
        write!(self.output, "</{}>", element)
    }

    fn write_list_item(&mut self, item: &ListItem) -> std::fmt::Result {
        writeln!(self.output, "<listitem>")?;
        write!(self.output, "<simpara>")?;
        self.write_inlines(&item.principal)?;
        writeln!(self.output, "</simpara>")?;
        if !item.blocks.is_empty() {
            self.write_blocks(&item.blocks)?;
            self.output.push('\n');
        }
        write!(self.output, "</listitem>")
    }

    fn write_literal(&mut self, literal: &LiteralBlock) -> std::fmt::Result {
        let body = partial_escape(&literal.content);
        let id = Self::id_attr(literal.id.as_deref());

        let (open, close) = match (literal.kind, literal.language.as_deref()) {
            (LiteralKind::Listing, Some(language)) => (
                format!(
                    r#"<programlisting language="{}" linenumbering="unnumbered">"#,
                    escape(language)
                ),
                "</programlisting>",
            ),
            (LiteralKind::Listing, None) => ("<screen>".to_string(), "</screen>"),
            (LiteralKind::Literal, _) => (
                r#"<literallayout class="monospaced">"#.to_string(),
                "</literallayout>",
            ),
        };

        match literal.title {
            Some(ref title) => write!(
                self.output,
                "<formalpara{}>\n<title>{}</title>\n<para>\n{}{}{}\n</para>\n</formalpara>",
                id,
                partial_escape(title),
                open,
                body,
                close
            ),
            None if id.is_empty() => write!(self.output, "{}{}{}", open, body, close),
            None => write!(
                self.output,
                "<informalexample{}>\n{}{}{}\n</informalexample>",
                id, open, body, close
            ),
        }
    }

    fn write_admonition(&mut self, admonition: &Admonition) -> std::fmt::Result {
        let element = admonition.admonition_type.name();
        writeln!(
            self.output,
            "<{}{}>",
            element,
            Self::id_attr(admonition.id.as_deref())
        )?;
        if let Some(ref title) = admonition.title {
            writeln!(self.output, "<title>{}</title>", partial_escape(title))?;
        }
        if !admonition.content.is_empty() {
            self.write_blocks(&admonition.content)?;
            self.output.push('\n');
        }
        write!(self.output, "</{}>", element)
    }

    fn write_example(&mut self, example: &Example) -> std::fmt::Result {
        let id = Self::id_attr(example.id.as_deref());
        let element = match example.title {
            Some(ref title) => {
                writeln!(self.output, "<example{}>", id)?;
                writeln!(self.output, "<title>{}</title>", partial_escape(title))?;
                "example"
            }
            None => {
                writeln!(self.output, "<informalexample{}>", id)?;
                "informalexample"
            }
        };
        if !example.content.is_empty() {
            self.write_blocks(&example.content)?;
            self.output.push('\n');
        }
        write!(self.output, "</{}>", element)
    }

    fn write_inlines(&mut self, inlines: &[Inline]) -> std::fmt::Result {
        for inline in inlines {
            self.write_inline(inline)?;
        }
        Ok(())
    }

    fn write_inline(&mut self, inline: &Inline) -> std::fmt::Result {
        match inline {
            Inline::Text(text) => write!(self.output, "{}", partial_escape(text)),
            Inline::Format(format_type, inner) => {
                let (open, close) = match format_type {
                    FormatType::Bold => (r#"<emphasis role="strong">"#, "</emphasis>"),
                    FormatType::Italic => ("<emphasis>", "</emphasis>"),
                    FormatType::Monospace => ("<literal>", "</literal>"),
                };
                write!(self.output, "{}", open)?;
                self.write_inline(inner)?;
                write!(self.output, "{}", close)
            }
            Inline::Link(link) => {
                write!(self.output, r#"<link xl:href="{}">"#, escape(&link.url))?;
                if link.text.is_empty() {
                    write!(self.output, "{}", partial_escape(&link.url))?;
                } else {
                    self.write_inlines(&link.text)?;
                }
                write!(self.output, "</link>")
            }
        }
    }
}
