//! Canonical in-memory representation of an HTML tag.
//!
//! Generated tags are kept as structured values until the last moment so
//! pipeline listeners can rewrite them before serialization.

use serde::{Deserialize, Serialize};

/// An attribute value: text, or a boolean flag.
///
/// `Flag(true)` renders as the bare attribute name; `Flag(false)` suppresses
/// the attribute entirely, which lets configuration selectively disable a
/// generated attribute without rewriting the whole tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Boolean flag attribute.
    Flag(bool),
    /// Text attribute value.
    Text(String),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// A single HTML tag with ordered attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlTag {
    /// Element name, e.g. `script` or `link`.
    pub name: String,

    /// Whether the element is a void element without a closing construct.
    pub void_tag: bool,

    /// Attributes in insertion order.
    pub attributes: Vec<(String, AttrValue)>,

    /// Name of the entry point this tag originated from, if any.
    #[serde(default)]
    pub source_entry: Option<String>,

    /// Raw content between the opening and closing tag. Void tags never
    /// carry content.
    #[serde(default)]
    pub inner_html: Option<String>,
}

impl HtmlTag {
    /// Create a non-void tag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            void_tag: false,
            attributes: Vec::new(),
            source_entry: None,
            inner_html: None,
        }
    }

    /// Create a void tag (no closing construct, no content).
    #[must_use]
    pub fn void(name: impl Into<String>) -> Self {
        Self {
            void_tag: true,
            ..Self::new(name)
        }
    }

    /// Append an attribute, preserving insertion order.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Tag the origin entry point.
    #[must_use]
    pub fn with_source_entry(mut self, entry: impl Into<String>) -> Self {
        self.source_entry = Some(entry.into());
        self
    }

    /// Set the inner content of a non-void tag.
    #[must_use]
    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = Some(html.into());
        self
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value)
    }

    /// Serialize the tag to its HTML string form.
    ///
    /// Void tags self-close with ` />` under XHTML mode and close with a
    /// plain `>` otherwise; they never emit content or a closing tag.
    #[must_use]
    pub fn render(&self, xhtml: bool) -> String {
        let mut out = String::from("<");
        out.push_str(&self.name);

        for (name, value) in &self.attributes {
            match value {
                AttrValue::Flag(false) => {}
                AttrValue::Flag(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                AttrValue::Text(text) => {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(text);
                    out.push('"');
                }
            }
        }

        if self.void_tag {
            out.push_str(if xhtml { " />" } else { ">" });
        } else {
            out.push('>');
            if let Some(inner) = &self.inner_html {
                out.push_str(inner);
            }
            out.push_str("</");
            out.push_str(&self.name);
            out.push('>');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_script_tag() {
        let tag = HtmlTag::new("script").with_attribute("src", "/assets/main.js");
        assert_eq!(tag.render(false), r#"<script src="/assets/main.js"></script>"#);
    }

    #[test]
    fn test_render_void_tag() {
        let tag = HtmlTag::void("link")
            .with_attribute("href", "style.css")
            .with_attribute("rel", "stylesheet");
        assert_eq!(tag.render(false), r#"<link href="style.css" rel="stylesheet">"#);
    }

    #[test]
    fn test_render_void_tag_xhtml() {
        let tag = HtmlTag::void("link")
            .with_attribute("href", "style.css")
            .with_attribute("rel", "stylesheet");
        assert_eq!(
            tag.render(true),
            r#"<link href="style.css" rel="stylesheet" />"#
        );
    }

    #[test]
    fn test_non_void_tag_ignores_xhtml_mode() {
        let tag = HtmlTag::new("script").with_attribute("src", "a.js");
        assert_eq!(tag.render(true), r#"<script src="a.js"></script>"#);
    }

    #[test]
    fn test_flag_attributes() {
        let tag = HtmlTag::new("script")
            .with_attribute("src", "a.js")
            .with_attribute("defer", true)
            .with_attribute("async", false);
        assert_eq!(tag.render(false), r#"<script src="a.js" defer></script>"#);
    }

    #[test]
    fn test_attribute_order_preserved() {
        let tag = HtmlTag::void("meta")
            .with_attribute("name", "viewport")
            .with_attribute("content", "width=device-width");
        assert_eq!(
            tag.render(false),
            r#"<meta name="viewport" content="width=device-width">"#
        );
    }

    #[test]
    fn test_inner_html() {
        let tag = HtmlTag::new("script").with_inner_html("console.log(1)");
        assert_eq!(tag.render(false), "<script>console.log(1)</script>");
    }

    #[test]
    fn test_attribute_lookup() {
        let tag = HtmlTag::new("script").with_attribute("src", "a.js");
        assert_eq!(tag.attribute("src"), Some(&AttrValue::Text("a.js".to_string())));
        assert!(tag.attribute("defer").is_none());
    }
}
