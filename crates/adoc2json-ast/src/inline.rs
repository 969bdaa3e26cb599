//! Inline elements for document content
//!
//! This module defines inline-level elements that appear within paragraphs,
//! section titles and list item text.

use serde::{Deserialize, Serialize};

/// Inline-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    /// Plain text content
    Text(String),
    /// Formatted content (bold, italic, monospace)
    Format(FormatType, Box<Inline>),
    /// A hyperlink
    Link(Link),
}

/// Text formatting types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatType {
    /// Bold text (`*strong*`)
    Bold,
    /// Italic text (`_emphasis_`)
    Italic,
    /// Monospace/code text (`` `literal` ``)
    Monospace,
}

/// A hyperlink element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The URL target
    pub url: String,
    /// The link text; empty when the URL is shown as-is
    pub text: Vec<Inline>,
}

impl Inline {
    /// Append the unformatted text of this inline to `out`
    pub fn write_plain(&self, out: &mut String) {
        match self {
            Inline::Text(text) => out.push_str(text),
            Inline::Format(_, inner) => inner.write_plain(out),
            Inline::Link(link) if link.text.is_empty() => out.push_str(&link.url),
            Inline::Link(link) => {
                for inner in &link.text {
                    inner.write_plain(out);
                }
            }
        }
    }
}

/// Flatten a run of inlines into plain text, dropping all formatting
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        inline.write_plain(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_inline() {
        let inline = Inline::Text("Hello".to_string());
        assert_eq!(inline, Inline::Text("Hello".to_string()));
    }

    #[test]
    fn test_formatted_text() {
        let bold = Inline::Format(
            FormatType::Bold,
            Box::new(Inline::Text("important".to_string())),
        );
        if let Inline::Format(FormatType::Bold, inner) = bold {
            assert_eq!(*inner, Inline::Text("important".to_string()));
        } else {
            panic!("Expected Bold format");
        }
    }

    #[test]
    fn test_plain_text_strips_formatting() {
        let inlines = vec![
            Inline::Text("Read ".to_string()),
            Inline::Format(FormatType::Italic, Box::new(Inline::Text("the".to_string()))),
            Inline::Text(" ".to_string()),
            Inline::Link(Link {
                url: "https://example.com".to_string(),
                text: vec![Inline::Text("docs".to_string())],
            }),
        ];
        assert_eq!(plain_text(&inlines), "Read the docs");
    }

    #[test]
    fn test_bare_link_uses_url() {
        let link = Inline::Link(Link {
            url: "https://example.com".to_string(),
            text: vec![],
        });
        assert_eq!(plain_text(&[link]), "https://example.com");
    }
}
