//! Generic XML-to-tree conversion
//!
//! Turns any well-formed XML fragment with a single root element into a JSON
//! tree. Each element becomes an object holding its name under `$name`, its
//! attributes as plain keys, its concatenated descendant text under `$text`
//! and its children under `$kids`. Text children are kept as raw strings.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::{AdocError, Result};

/// Key holding the element name
pub const NAME_KEY: &str = "$name";
/// Key holding the concatenated descendant text
pub const TEXT_KEY: &str = "$text";
/// Key holding the child nodes
pub const KIDS_KEY: &str = "$kids";

/// A child collected while its parent is still open
enum Kid {
    Text(String),
    Element { node: Value, text: String },
}

impl Kid {
    fn is_blank_text(&self) -> bool {
        matches!(self, Kid::Text(text) if text.trim().is_empty())
    }
}

/// An element whose end tag has not been read yet
struct OpenElement {
    node: Map<String, Value>,
    kids: Vec<Kid>,
}

impl OpenElement {
    fn start(element: &BytesStart<'_>) -> Result<Self> {
        let mut node = Map::new();
        node.insert(
            NAME_KEY.to_string(),
            Value::String(decode_lossy(element.name().as_ref())),
        );

        for attr in element.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let value = attr.unescape_value()?;
            node.insert(decode_lossy(key), Value::String(value.into_owned()));
        }

        Ok(Self {
            node,
            kids: Vec::new(),
        })
    }

    /// Close the element, returning its node and its descendant text.
    ///
    /// Whitespace-only text is formatting when the element holds no other
    /// text of its own, and is dropped; in mixed content it is kept.
    fn finish(self) -> (Value, String) {
        let Self { mut node, mut kids } = self;
        let mixed = kids
            .iter()
            .any(|kid| matches!(kid, Kid::Text(_)) && !kid.is_blank_text());
        if !mixed {
            kids.retain(|kid| !kid.is_blank_text());
        }

        let mut text = String::new();
        let kids: Vec<Value> = kids
            .into_iter()
            .map(|kid| match kid {
                Kid::Text(t) => {
                    text.push_str(&t);
                    Value::String(t)
                }
                Kid::Element { node, text: inner } => {
                    text.push_str(&inner);
                    node
                }
            })
            .collect();

        if !text.is_empty() {
            node.insert(TEXT_KEY.to_string(), Value::String(text.clone()));
        }
        if !kids.is_empty() {
            node.insert(KIDS_KEY.to_string(), Value::Array(kids));
        }
        (Value::Object(node), text)
    }
}

fn decode_lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Builds the tree while events are read
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<OpenElement>,
    root: Option<Value>,
}

impl TreeBuilder {
    fn open(&mut self, element: &BytesStart<'_>) -> Result<()> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(AdocError::XmlParse(
                "multiple root elements".to_string(),
            ));
        }
        self.stack.push(OpenElement::start(element)?);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let element = self.stack.pop().ok_or_else(|| {
            AdocError::XmlParse("end tag without a matching start tag".to_string())
        })?;
        let (value, text) = element.finish();

        match self.stack.last_mut() {
            Some(parent) => parent.kids.push(Kid::Element { node: value, text }),
            None => self.root = Some(value),
        }
        Ok(())
    }

    fn text(&mut self, text: String) -> Result<()> {
        match self.stack.last_mut() {
            Some(element) => {
                element.kids.push(Kid::Text(text));
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(AdocError::XmlParse(
                "text outside the root element".to_string(),
            )),
        }
    }

    fn finish(self) -> Result<Value> {
        if let Some(open) = self.stack.last() {
            let name = open
                .node
                .get(NAME_KEY)
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Err(AdocError::XmlParse(format!("unclosed element <{}>", name)));
        }
        self.root
            .ok_or_else(|| AdocError::XmlParse("no root element".to_string()))
    }
}

/// Convert XML markup into a generic JSON tree.
///
/// Whitespace-only text between child elements is dropped unless the
/// element also holds other text (mixed content); comments, processing instructions,
/// the XML declaration and DOCTYPE are skipped. Namespace declarations are
/// not reported as attributes.
///
/// # Errors
///
/// Returns [`AdocError::XmlParse`] when the markup is not well-formed or does
/// not have exactly one root element.
///
/// # Example
///
/// ```
/// use adoc2json_core::xml_to_tree;
/// use serde_json::json;
///
/// let tree = xml_to_tree(r#"<simpara role="lead">Hi <emphasis>there</emphasis></simpara>"#)?;
/// assert_eq!(
///     tree,
///     json!({
///         "$name": "simpara",
///         "role": "lead",
///         "$text": "Hi there",
///         "$kids": ["Hi ", { "$name": "emphasis", "$text": "there", "$kids": ["there"] }]
///     })
/// );
/// # Ok::<(), adoc2json_core::AdocError>(())
/// ```
pub fn xml_to_tree(markup: &str) -> Result<Value> {
    let mut reader = Reader::from_str(markup);
    let mut builder = TreeBuilder::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => builder.open(e)?,
            Event::Empty(ref e) => {
                builder.open(e)?;
                builder.close()?;
            }
            Event::End(_) => builder.close()?,
            Event::Text(ref e) => builder.text(e.unescape()?.into_owned())?,
            Event::CData(e) => builder.text(decode_lossy(&e.into_inner()))?,
            Event::Eof => break,
            // Comments, processing instructions, declarations and DOCTYPE
            _ => {}
        }
    }

    builder.finish()
}
