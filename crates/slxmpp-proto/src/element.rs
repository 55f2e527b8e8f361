//! Immutable XML element values.
//!
//! Stanzas are exchanged with the transport as already-parsed [`Element`]
//! trees. Documents are built with consuming builder methods, so every
//! value is immutable once handed off; there is no shared mutable builder.
//!
//! Parsing raw XML text belongs to the transport and is not provided here.

use std::fmt::{self, Write};

/// An XML element with ordered attributes, child elements and text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create an element carrying an `xmlns` attribute.
    pub fn with_ns(name: impl Into<String>, ns: &str) -> Self {
        Self::new(name).with_attr("xmlns", ns)
    }

    /// Set an attribute, replacing any previous value.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
        self
    }

    /// Set an attribute only when a value is present.
    pub fn with_opt_attr<V: Into<String>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with_attr(key, value),
            None => self,
        }
    }

    /// Remove an attribute if present.
    pub fn without_attr(mut self, key: &str) -> Self {
        self.attrs.retain(|(k, _)| k != key);
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child elements.
    pub fn with_children<I: IntoIterator<Item = Element>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over attributes in insertion order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The namespace declared on this element, if any.
    pub fn ns(&self) -> Option<&str> {
        self.attr("xmlns")
    }

    /// Returns `true` if this element has the given name and namespace.
    pub fn is(&self, name: &str, ns: &str) -> bool {
        self.name == name && self.ns() == Some(ns)
    }

    /// All child elements.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Child elements with the given name, in any namespace.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Child elements with the given name in the given namespace.
    ///
    /// A child without its own `xmlns` inherits the namespace of its parent
    /// and therefore matches.
    pub fn children_ns<'a>(
        &'a self,
        name: &'a str,
        ns: &'a str,
    ) -> impl Iterator<Item = &'a Element> {
        self.children_named(name)
            .filter(move |c| c.ns().map_or(true, |child_ns| child_ns == ns))
    }

    /// Text content, or the empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

fn escape(out: &mut fmt::Formatter<'_>, s: &str, attr: bool) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' if attr => out.write_str("&quot;")?,
            '\'' if attr => out.write_str("&apos;")?,
            _ => out.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (k, v) in &self.attrs {
            write!(f, " {k}=\"")?;
            escape(f, v, true)?;
            f.write_char('"')?;
        }

        if self.children.is_empty() && self.text.is_none() {
            return f.write_str("/>");
        }

        f.write_char('>')?;
        if let Some(text) = &self.text {
            escape(f, text, false)?;
        }
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        let el = Element::new("iq").with_attr("id", "1").with_attr("type", "get");
        assert_eq!(el.to_string(), r#"<iq id="1" type="get"/>"#);
    }

    #[test]
    fn test_render_nested_with_text() {
        let el = Element::with_ns("query", "jabber:iq:roster")
            .with_child(Element::new("group").with_text("Friends & Co"));
        assert_eq!(
            el.to_string(),
            r#"<query xmlns="jabber:iq:roster"><group>Friends &amp; Co</group></query>"#
        );
    }

    #[test]
    fn test_attr_escaping() {
        let el = Element::new("item").with_attr("name", "\"Mad\" <Hatter>");
        assert_eq!(
            el.to_string(),
            r#"<item name="&quot;Mad&quot; &lt;Hatter&gt;"/>"#
        );
    }

    #[test]
    fn test_with_attr_replaces() {
        let el = Element::new("iq").with_attr("id", "1").with_attr("id", "2");
        assert_eq!(el.attr("id"), Some("2"));
        assert_eq!(el.attrs().count(), 1);
        assert_eq!(el.without_attr("id").attr("id"), None);
    }

    #[test]
    fn test_children_ns_inherits() {
        let query = Element::with_ns("query", "jabber:iq:roster")
            .with_child(Element::new("item"))
            .with_child(Element::with_ns("item", "urn:other"))
            .with_child(Element::with_ns("item", "jabber:iq:roster"));
        assert_eq!(query.children_named("item").count(), 3);
        assert_eq!(query.children_ns("item", "jabber:iq:roster").count(), 2);
    }
}
