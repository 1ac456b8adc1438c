//! XML parsing and tree flattening
//!
//! Uploaded XML is parsed into a parser-independent [`Element`] tree and then
//! flattened into a nested key-value mapping: leaf elements become strings,
//! elements with children become nested mappings.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Maximum element nesting the parser accepts before rejecting the document
pub const MAX_DEPTH: usize = 128;

/// A parsed XML element: tag name, leading text, ordered child elements
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name as written, including any namespace prefix
    pub tag: String,
    /// Text between the start tag and the first child element, verbatim
    pub text: Option<String>,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with no text and no children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// An element with no child elements is a leaf
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Parse an XML document into its root [`Element`].
///
/// Attributes, namespace declarations, comments and processing instructions
/// are dropped. Text is kept verbatim (no trimming) and only the text before
/// the first child element is attached to an element. Malformed XML and
/// nesting deeper than [`MAX_DEPTH`] fail with [`Error::Xml`].
pub fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(Error::Xml("Document has multiple root elements".to_string()));
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::Xml(format!(
                        "Element nesting exceeds {} levels",
                        MAX_DEPTH
                    )));
                }
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push(Element::new(tag));
            }
            Ok(Event::Empty(e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(Error::Xml("Document has multiple root elements".to_string()));
                }
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let element = Element::new(tag);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(current) = stack.last_mut() {
                    // Text after a child element is tail text, not element text
                    if current.children.is_empty() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Invalid text content: {}", e)))?;
                        current.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    if current.children.is_empty() {
                        let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                        current.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::Xml("Unexpected closing tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::Xml(format!("Malformed XML: {}", e))),
        }
    }

    root.ok_or_else(|| Error::Xml("Document has no root element".to_string()))
}

/// Flatten an element tree into a mapping from tag name to value.
///
/// Each direct child contributes one entry: leaves map to their text (or null
/// when they have none), non-leaves map to their own flattened mapping. A
/// later sibling with the same tag overwrites the earlier one while keeping
/// its position in the mapping. The root's own tag and text do not appear.
pub fn flatten(element: &Element) -> Map<String, Value> {
    let mut data = Map::new();
    for child in &element.children {
        let value = if child.is_leaf() {
            match &child.text {
                Some(text) => Value::String(text.clone()),
                None => Value::Null,
            }
        } else {
            Value::Object(flatten(child))
        };
        data.insert(child.tag.clone(), value);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten_str(xml: &str) -> Map<String, Value> {
        flatten(&parse_document(xml).unwrap())
    }

    #[test]
    fn test_leaf_children_map_to_text() {
        let data = flatten_str("<Doc><Id>1</Id><Name>alpha</Name></Doc>");
        assert_eq!(data.len(), 2);
        assert_eq!(data["Id"], Value::String("1".to_string()));
        assert_eq!(data["Name"], Value::String("alpha".to_string()));
    }

    #[test]
    fn test_nested_child_becomes_nested_mapping() {
        let data = flatten_str("<Doc><Meta><Type>report</Type><Lang>en</Lang></Meta></Doc>");
        let meta = data["Meta"].as_object().unwrap();
        assert_eq!(meta["Type"], Value::String("report".to_string()));
        assert_eq!(meta["Lang"], Value::String("en".to_string()));
    }

    #[test]
    fn test_report_document_mapping() {
        let data = flatten_str("<Doc><Id>1</Id><Meta><Type>report</Type></Meta></Doc>");
        assert_eq!(
            serde_json::to_string(&data).unwrap(),
            r#"{"Id":"1","Meta":{"Type":"report"}}"#
        );
    }

    #[test]
    fn test_duplicate_sibling_last_wins_first_position() {
        let data = flatten_str("<Doc><B>1</B><A>2</A><B>3</B></Doc>");
        assert_eq!(data["B"], Value::String("3".to_string()));
        let keys: Vec<&String> = data.keys().collect();
        assert_eq!(keys, ["B", "A"]);
    }

    #[test]
    fn test_empty_and_self_closing_leaves_are_null() {
        let data = flatten_str("<Doc><A></A><B/></Doc>");
        assert_eq!(data["A"], Value::Null);
        assert_eq!(data["B"], Value::Null);
    }

    #[test]
    fn test_text_kept_verbatim() {
        let data = flatten_str("<Doc><A>  padded  </A></Doc>");
        assert_eq!(data["A"], Value::String("  padded  ".to_string()));
    }

    #[test]
    fn test_root_text_and_layout_whitespace_ignored() {
        let data = flatten_str("<Doc>\n  <Id>1</Id>\n  <Meta>\n    <Type>x</Type>\n  </Meta>\n</Doc>");
        assert_eq!(data.len(), 2);
        assert_eq!(data["Id"], Value::String("1".to_string()));
        assert!(data["Meta"].is_object());
    }

    #[test]
    fn test_attributes_are_dropped() {
        let data = flatten_str(r#"<Doc version="2"><Id lang="en">1</Id></Doc>"#);
        assert_eq!(data.len(), 1);
        assert_eq!(data["Id"], Value::String("1".to_string()));
    }

    #[test]
    fn test_namespace_prefix_kept_in_tag() {
        let data = flatten_str(r#"<Doc xmlns:ns="urn:x"><ns:Id>1</ns:Id></Doc>"#);
        assert_eq!(data["ns:Id"], Value::String("1".to_string()));
    }

    #[test]
    fn test_entities_are_unescaped() {
        let data = flatten_str("<Doc><A>a &amp; b &lt;c&gt;</A></Doc>");
        assert_eq!(data["A"], Value::String("a & b <c>".to_string()));
    }

    #[test]
    fn test_cdata_contributes_to_text() {
        let data = flatten_str("<Doc><A><![CDATA[<raw> & text]]></A></Doc>");
        assert_eq!(data["A"], Value::String("<raw> & text".to_string()));
    }

    #[test]
    fn test_text_before_first_child_only() {
        let root = parse_document("<Doc>head<A>1</A>tail</Doc>").unwrap();
        assert_eq!(root.text, Some("head".to_string()));
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_malformed_xml_fails() {
        assert!(matches!(
            parse_document("<Doc><A></Doc>"),
            Err(Error::Xml(_))
        ));
        assert!(matches!(parse_document(""), Err(Error::Xml(_))));
    }

    #[test]
    fn test_multiple_roots_fail() {
        assert!(matches!(
            parse_document("<A>1</A><B>2</B>"),
            Err(Error::Xml(_))
        ));
    }

    #[test]
    fn test_depth_guard_rejects_deep_nesting() {
        let mut xml = String::new();
        for i in 0..=MAX_DEPTH {
            xml.push_str(&format!("<e{}>", i));
        }
        for i in (0..=MAX_DEPTH).rev() {
            xml.push_str(&format!("</e{}>", i));
        }
        assert!(matches!(parse_document(&xml), Err(Error::Xml(_))));
    }

    #[test]
    fn test_depth_at_limit_is_accepted() {
        let mut xml = String::new();
        for i in 0..MAX_DEPTH {
            xml.push_str(&format!("<e{}>", i));
        }
        for i in (0..MAX_DEPTH).rev() {
            xml.push_str(&format!("</e{}>", i));
        }
        assert!(parse_document(&xml).is_ok());
    }
}
