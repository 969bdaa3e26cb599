//! TDD tests for the AsciiDoc loader
//!
//! These tests define the document graph expected for each supported
//! construct, from the header down to inline formatting.

use std::collections::BTreeMap;
use std::io::Write;

use adoc2json_ast::{
    AdmonitionType, Block, Document, DocumentMeta, FormatType, Inline, ListType, LiteralKind,
    Paragraph,
};
use adoc2json_core::{load_file, parser, AdocError, LoadOptions};

fn section_titles(blocks: &[Block]) -> Vec<String> {
    blocks
        .iter()
        .filter_map(|b| match b {
            Block::Section(s) => Some(adoc2json_ast::plain_text(&s.title)),
            _ => None,
        })
        .collect()
}

/// Input:
/// ```asciidoc
/// = Test Document
/// :version: 1.0
///
/// Hello *world*.
/// ```
#[test]
fn test_parse_basic_flow() {
    let input = r#"= Test Document
:version: 1.0

Hello *world*."#;

    let mut expected_attrs = BTreeMap::new();
    expected_attrs.insert("doctitle".to_string(), "Test Document".to_string());
    expected_attrs.insert("version".to_string(), "1.0".to_string());

    let expected = Document {
        metadata: DocumentMeta {
            title: Some("Test Document".to_string()),
            authors: vec![],
            revision: None,
            attributes: expected_attrs,
        },
        blocks: vec![Block::Paragraph(Paragraph {
            lines: vec!["Hello *world*.".to_string()],
            inlines: vec![
                Inline::Text("Hello ".to_string()),
                Inline::Format(
                    FormatType::Bold,
                    Box::new(Inline::Text("world".to_string())),
                ),
                Inline::Text(".".to_string()),
            ],
            ..Default::default()
        })],
    };

    let result = parser::parse(input).expect("Parse should succeed");
    assert_eq!(result, expected);
}

/// Input:
/// ```asciidoc
/// = Guide
/// Jane Doe <jane@example.com>; John Roe
/// v2.1, 2024-01-01
/// ```
#[test]
fn test_parse_header_author_and_revision() {
    let doc = parser::parse("= Guide\nJane Doe <jane@example.com>; John Roe\nv2.1, 2024-01-01\n\nBody.")
        .unwrap();

    assert_eq!(doc.metadata.authors, vec!["Jane Doe", "John Roe"]);
    assert_eq!(doc.metadata.revision.as_deref(), Some("2.1"));
    assert_eq!(doc.metadata.get_attribute("author"), Some("Jane Doe"));
    assert_eq!(doc.metadata.get_attribute("authors"), Some("Jane Doe, John Roe"));
    assert_eq!(doc.metadata.get_attribute("revnumber"), Some("2.1"));
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_parse_without_header_keeps_title_empty() {
    let doc = parser::parse("Just a paragraph.").unwrap();
    assert_eq!(doc.metadata.title, None);
    assert_eq!(doc.doctype(), "article");
}

#[test]
fn test_doctype_attribute() {
    let doc = parser::parse("= Manual\n:doctype: book\n\nText").unwrap();
    assert_eq!(doc.doctype(), "book");
}

/// Input:
/// ```asciidoc
/// == One
///
/// === One A
///
/// == Two
/// ```
#[test]
fn test_parse_nested_sections() {
    let doc = parser::parse("== One\n\n=== One A\n\nText\n\n== Two").unwrap();

    assert_eq!(section_titles(&doc.blocks), vec!["One", "Two"]);
    match &doc.blocks[0] {
        Block::Section(one) => {
            assert_eq!(one.level, 1);
            assert_eq!(section_titles(&one.blocks), vec!["One A"]);
            match &one.blocks[0] {
                Block::Section(one_a) => {
                    assert_eq!(one_a.level, 2);
                    assert_eq!(one_a.id, "_one_a");
                    assert_eq!(one_a.blocks.len(), 1);
                }
                other => panic!("Expected section, got {:?}", other),
            }
        }
        other => panic!("Expected section, got {:?}", other),
    }
}

#[test]
fn test_explicit_section_id() {
    let doc = parser::parse("[[custom]]\n== Titled").unwrap();
    match &doc.blocks[0] {
        Block::Section(s) => assert_eq!(s.id, "custom"),
        other => panic!("Expected section, got {:?}", other),
    }
}

/// Input:
/// ```asciidoc
/// * one
/// ** one.a
/// * two
///
/// . first
/// ```
#[test]
fn test_parse_nested_lists() {
    let doc = parser::parse("* one\n** one.a\n* two").unwrap();

    let list = match &doc.blocks[0] {
        Block::List(list) => list,
        other => panic!("Expected list, got {:?}", other),
    };
    assert_eq!(list.list_type, ListType::Unordered);
    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[0].text, "one");
    assert_eq!(list.items[0].level, 1);

    match &list.items[0].blocks[0] {
        Block::List(nested) => {
            assert_eq!(nested.items[0].text, "one.a");
            assert_eq!(nested.items[0].level, 2);
            assert_eq!(nested.items[0].marker, "**");
        }
        other => panic!("Expected nested list, got {:?}", other),
    }
}

#[test]
fn test_list_survives_blank_lines() {
    let doc = parser::parse("* one\n\n* two").unwrap();
    assert_eq!(doc.len(), 1);
    match &doc.blocks[0] {
        Block::List(list) => assert_eq!(list.items.len(), 2),
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_ordered_list_style() {
    let doc = parser::parse(". first\n.. inner").unwrap();
    match &doc.blocks[0] {
        Block::List(list) => {
            assert_eq!(list.list_type, ListType::Ordered);
            assert_eq!(list.style.as_deref(), Some("arabic"));
            match &list.items[0].blocks[0] {
                Block::List(inner) => assert_eq!(inner.style.as_deref(), Some("loweralpha")),
                other => panic!("Expected nested list, got {:?}", other),
            }
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

/// Input:
/// ```asciidoc
/// .Example
/// [source,rust]
/// ----
/// fn main() {}
/// ----
/// ```
#[test]
fn test_parse_source_block() {
    let doc = parser::parse(".Example\n[source,rust]\n----\nfn main() {}\n----").unwrap();
    match &doc.blocks[0] {
        Block::Literal(literal) => {
            assert_eq!(literal.kind, LiteralKind::Listing);
            assert_eq!(literal.language.as_deref(), Some("rust"));
            assert_eq!(literal.title.as_deref(), Some("Example"));
            assert_eq!(literal.content, "fn main() {}");
        }
        other => panic!("Expected listing, got {:?}", other),
    }
}

#[test]
fn test_literal_block_keeps_content_verbatim() {
    let doc = parser::parse("....\n  *not bold*\n\nstill literal\n....").unwrap();
    match &doc.blocks[0] {
        Block::Literal(literal) => {
            assert_eq!(literal.kind, LiteralKind::Literal);
            assert_eq!(literal.content, "  *not bold*\n\nstill literal");
        }
        other => panic!("Expected literal, got {:?}", other),
    }
}

#[test]
fn test_admonition_block_parses_content() {
    let doc = parser::parse("[WARNING]\n====\nFirst.\n\nSecond.\n====").unwrap();
    match &doc.blocks[0] {
        Block::Admonition(admonition) => {
            assert_eq!(admonition.admonition_type, AdmonitionType::Warning);
            assert_eq!(admonition.content.len(), 2);
        }
        other => panic!("Expected admonition, got {:?}", other),
    }
}

#[test]
fn test_example_block() {
    let doc = parser::parse(".Sample\n====\n* inside\n====").unwrap();
    match &doc.blocks[0] {
        Block::Example(example) => {
            assert_eq!(example.title.as_deref(), Some("Sample"));
            assert!(matches!(example.content[0], Block::List(_)));
        }
        other => panic!("Expected example, got {:?}", other),
    }
}

#[test]
fn test_comments_are_dropped() {
    let doc = parser::parse("// note to self\nVisible.\n\n////\nhidden\n////").unwrap();
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_unterminated_nested_block_reports_line() {
    let err = parser::parse("====\nok\n\n----\nnever closed\n====").unwrap_err();
    match err {
        AdocError::Parse { line, .. } => assert_eq!(line, 4),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_load_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "= From Disk\n\nContent.").unwrap();

    let doc = load_file(file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(doc.metadata.title.as_deref(), Some("From Disk"));
    assert_eq!(doc.metadata.get_attribute("backend"), Some("docbook5"));
}

#[test]
fn test_load_missing_file_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.adoc");

    match load_file(&path, &LoadOptions::empty()) {
        Err(AdocError::Input { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected input error, got {:?}", other),
    }
}
