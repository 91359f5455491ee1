//! Component trees for the reactive UI framework
//!
//! A [`Component`] mirrors the framework's HTML component layout: an element
//! type, a namespace and a props object whose `children` hold nested
//! components or text. Serialising a component yields the JSON the
//! framework's renderer consumes; [`Component::to_html`] gives the equivalent
//! markup for server-rendered pages.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt::Write as _;

/// Namespace of the framework's plain HTML components
pub const HTML_NAMESPACE: &str = "dash_html_components";

/// Child of a component: nested element or text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Nested element
    Element(Component),
    /// Text content
    Text(String),
}

impl From<Component> for Node {
    fn from(c: Component) -> Self {
        Self::Element(c)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// HTML element in a component tree
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    kind: String,
    children: Vec<Node>,
    props: IndexMap<String, String>,
}

impl Component {
    /// Create element of the given type (`"Header"`, `"Ul"`, `"A"`, ...)
    #[inline]
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            children: Vec::new(),
            props: IndexMap::new(),
        }
    }

    /// With one more child
    #[inline]
    #[must_use]
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// With all of `children` appended
    #[inline]
    #[must_use]
    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// With `className`
    #[inline]
    #[must_use]
    pub fn class_name(self, class: impl Into<String>) -> Self {
        self.prop("className", class)
    }

    /// With `href`
    #[inline]
    #[must_use]
    pub fn href(self, href: impl Into<String>) -> Self {
        self.prop("href", href)
    }

    /// With an arbitrary string prop
    #[inline]
    #[must_use]
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    /// Element type
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Child nodes
    #[inline]
    #[must_use]
    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Prop value by name
    #[inline]
    #[must_use]
    pub fn get_prop(&self, name: &str) -> Option<&str> {
        self.props.get(name).map(String::as_str)
    }

    /// Depth-first iterator over this element and all nested elements
    #[must_use]
    pub fn descendants(&self) -> Vec<&Component> {
        let mut out = vec![self];
        for node in &self.children {
            if let Node::Element(c) = node {
                out.extend(c.descendants());
            }
        }
        out
    }

    /// Render as HTML markup
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let tag = self.kind.to_ascii_lowercase();
        out.push('<');
        out.push_str(&tag);
        for (name, value) in &self.props {
            let attr = if name == "className" { "class" } else { name.as_str() };
            let _ = write!(out, " {}=\"{}\"", attr, escape_html(value));
        }
        out.push('>');
        for node in &self.children {
            match node {
                Node::Element(c) => c.write_html(out),
                Node::Text(t) => out.push_str(&escape_html(t)),
            }
        }
        let _ = write!(out, "</{tag}>");
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Props<'a>(&'a Component);

        impl Serialize for Props<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.props.len() + 1))?;
                map.serialize_entry("children", &self.0.children)?;
                for (k, v) in &self.0.props {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("props", &Props(self))?;
        map.serialize_entry("type", &self.kind)?;
        map.serialize_entry("namespace", HTML_NAMESPACE)?;
        map.end()
    }
}

/// Escape text for HTML content and attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Component {
        Component::new("Ul").class_name("nav").child(
            Component::new("Li").child(Component::new("A").href("/x").class_name("link").child("X")),
        )
    }

    #[test]
    fn serialises_to_framework_layout() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "props": {
                    "children": [{
                        "props": {
                            "children": [{
                                "props": {"children": ["X"], "href": "/x", "className": "link"},
                                "type": "A",
                                "namespace": "dash_html_components"
                            }]
                        },
                        "type": "Li",
                        "namespace": "dash_html_components"
                    }],
                    "className": "nav"
                },
                "type": "Ul",
                "namespace": "dash_html_components"
            })
        );
    }

    #[test]
    fn renders_markup() {
        assert_eq!(
            sample().to_html(),
            r#"<ul class="nav"><li><a href="/x" class="link">X</a></li></ul>"#
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let c = Component::new("A").href("/q?a=1&b=2").child("<b>");
        assert_eq!(c.to_html(), r#"<a href="/q?a=1&amp;b=2">&lt;b&gt;</a>"#);
    }

    #[test]
    fn descendants_are_depth_first() {
        let kinds: Vec<_> = sample().descendants().iter().map(|c| c.kind().to_string()).collect();
        assert_eq!(kinds, vec!["Ul", "Li", "A"]);
    }
}
