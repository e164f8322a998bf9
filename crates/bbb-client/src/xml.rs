//! Owned XML element tree for API responses.
//!
//! Responses are small documents such as:
//!
//! ```xml
//! <response>
//!   <returncode>SUCCESS</returncode>
//!   <meetingID>standup</meetingID>
//! </response>
//! ```
//!
//! They are parsed with `roxmltree` and copied into [`XmlElement`] so the
//! result does not borrow the response body.

use crate::errors::BbbError;
use serde::Serialize;

/// An element with its text, attributes and child elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlElement {
    /// Local tag name (namespace prefix dropped).
    pub name: String,

    /// Text directly inside the element, before its first child element.
    /// Whitespace-only text (indentation) is dropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Attributes in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,

    /// Child elements in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse a document and return its root element.
    ///
    /// # Errors
    ///
    /// Returns `BbbError::Parse` if the text is not well-formed XML.
    pub fn parse(text: &str) -> Result<Self, BbbError> {
        let document =
            roxmltree::Document::parse(text).map_err(|e| BbbError::Parse(e.to_string()))?;
        Ok(Self::from_node(document.root_element()))
    }

    /// Parse a UTF-8 encoded document and return its root element.
    ///
    /// # Errors
    ///
    /// Returns `BbbError::Parse` if the bytes are not UTF-8 or not well-formed XML.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, BbbError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| BbbError::Parse(format!("Response body is not UTF-8: {e}")))?;
        Self::parse(text)
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        Self {
            name: node.tag_name().name().to_string(),
            text: node
                .text()
                .filter(|text| !text.trim().is_empty())
                .map(str::to_string),
            attributes: node
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect(),
            children: node
                .children()
                .filter(roxmltree::Node::is_element)
                .map(Self::from_node)
                .collect(),
        }
    }

    /// First direct child with the given tag name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Text of the first direct child with the given tag name.
    ///
    /// Returns `Some("")` for a child that exists but has no text.
    #[must_use]
    pub fn find_text(&self, name: &str) -> Option<&str> {
        self.find(name)
            .map(|child| child.text.as_deref().unwrap_or_default())
    }

    /// Value of an attribute on this element.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The `returncode` child most API responses carry (`SUCCESS` or `FAILED`).
    #[must_use]
    pub fn return_code(&self) -> Option<&str> {
        self.find_text("returncode")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const CREATE_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <returncode>SUCCESS</returncode>
  <meetingID>standup</meetingID>
  <attendeePW>att-pw</attendeePW>
  <moderatorPW>mod-pw</moderatorPW>
  <hasBeenForciblyEnded>false</hasBeenForciblyEnded>
  <messageKey/>
  <message></message>
</response>"#;

    #[test]
    fn test_parse_root_and_children() {
        let root = XmlElement::parse(CREATE_RESPONSE).unwrap();

        assert_eq!(root.name, "response");
        assert_eq!(root.text, None, "indentation is not text");
        assert_eq!(root.children.len(), 7);
        assert_eq!(root.return_code(), Some("SUCCESS"));
        assert_eq!(root.find_text("meetingID"), Some("standup"));
    }

    #[test]
    fn test_find_text_empty_and_missing() {
        let root = XmlElement::parse(CREATE_RESPONSE).unwrap();

        assert_eq!(root.find_text("messageKey"), Some(""));
        assert_eq!(root.find_text("message"), Some(""));
        assert_eq!(root.find_text("url"), None);
    }

    #[test]
    fn test_find_only_looks_at_direct_children() {
        let root =
            XmlElement::parse("<response><meeting><url>https://x/y</url></meeting></response>")
                .unwrap();

        assert_eq!(root.find_text("url"), None);
        assert_eq!(
            root.find("meeting").and_then(|m| m.find_text("url")),
            Some("https://x/y")
        );
    }

    #[test]
    fn test_attributes() {
        let root = XmlElement::parse(r#"<response version="2.0"><url secure="true">u</url></response>"#)
            .unwrap();

        assert_eq!(root.attribute("version"), Some("2.0"));
        assert_eq!(root.attribute("missing"), None);
        assert_eq!(root.find("url").unwrap().attribute("secure"), Some("true"));
    }

    #[test]
    fn test_parse_rejects_malformed_xml() {
        let result = XmlElement::parse("<response><url>https://x/y</response>");
        assert!(matches!(result, Err(BbbError::Parse(_))));

        let result = XmlElement::parse("not xml at all");
        assert!(matches!(result, Err(BbbError::Parse(_))));
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let result = XmlElement::parse_bytes(&[b'<', b'a', b'>', 0xff, b'<', b'/', b'a', b'>']);
        assert!(matches!(result, Err(BbbError::Parse(msg)) if msg.contains("UTF-8")));
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let root = XmlElement::parse("<response><returncode>SUCCESS</returncode></response>")
            .unwrap();

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "response",
                "children": [{"name": "returncode", "text": "SUCCESS"}]
            })
        );
    }
}
