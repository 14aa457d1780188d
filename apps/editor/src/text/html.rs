//! Owned HTML node tree for rich text and rendered previews.
//!
//! Parsing goes through html5ever (via `scraper`), so stored résumés with
//! sloppy markup get the same recovery a browser applies. The tree is then
//! copied into plain [`Node`]s that templates and the PDF layout can build
//! and mutate freely.

use std::fmt::Write as _;

use scraper::{ElementRef, Html};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Element {
            name: name.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: String) {
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn is_void(&self) -> bool {
        is_void(&self.name)
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Parses a fragment into a forest of nodes, in a `<body>` context.
pub fn parse_fragment(input: &str) -> Vec<Node> {
    let document = Html::parse_fragment(input);
    convert_children(document.root_element())
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    let mut out = Vec::new();
    for child in parent.children() {
        match child.value() {
            scraper::Node::Text(text) => push_text(&mut out, text),
            scraper::Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    out.push(Node::Element(convert_element(element)));
                }
            }
            _ => {}
        }
    }
    out
}

fn convert_element(source: ElementRef<'_>) -> Element {
    let mut element = Element::new(source.value().name());
    element.attrs = source
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    element.children = convert_children(source);
    element
}

fn push_text(out: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(Node::Text(prev)) => prev.push_str(text),
        _ => out.push(Node::Text(text.to_string())),
    }
}

/// Serializes nodes back to markup, escaping text and attribute values.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

pub fn element_to_html(element: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, element);
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(t) => out.push_str(&escape_text(t)),
        Node::Element(e) => write_element(out, e),
    }
}

fn write_element(out: &mut String, element: &Element) {
    let _ = write!(out, "<{}", element.name);
    for (k, v) in &element.attrs {
        let _ = write!(out, " {}=\"{}\"", k, escape_attr(v));
    }
    out.push('>');
    if element.is_void() {
        return;
    }
    for child in &element.children {
        write_node(out, child);
    }
    let _ = write!(out, "</{}>", element.name);
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;").replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(nodes: &[Node]) -> &Element {
        match &nodes[0] {
            Node::Element(e) => e,
            Node::Text(t) => panic!("expected element, got text {t:?}"),
        }
    }

    #[test]
    fn test_parse_nested_elements() {
        let nodes = parse_fragment("<p>Hello <strong>world</strong></p>");
        let p = first_element(&nodes);
        assert_eq!(p.name, "p");
        assert_eq!(p.children.len(), 2);
        assert_eq!(p.children[0], Node::Text("Hello ".into()));
    }

    #[test]
    fn test_parse_attributes_quoted_and_bare() {
        let nodes = parse_fragment(r#"<a href="https://x.dev" target=_blank data-x='1'>x</a>"#);
        let a = first_element(&nodes);
        assert_eq!(a.attr("href"), Some("https://x.dev"));
        assert_eq!(a.attr("target"), Some("_blank"));
        assert_eq!(a.attr("data-x"), Some("1"));
    }

    #[test]
    fn test_parse_void_and_self_closing() {
        let nodes = parse_fragment("a<br>b<hr/>c");
        assert_eq!(nodes.len(), 5);
    }

    #[test]
    fn test_unclosed_elements_are_closed() {
        let nodes = parse_fragment("<ul><li>one<li>two");
        let ul = first_element(&nodes);
        assert_eq!(ul.name, "ul");
        assert!(!ul.children.is_empty());
    }

    #[test]
    fn test_stray_close_tag_ignored() {
        let nodes = parse_fragment("a</div>b");
        assert_eq!(nodes, vec![Node::Text("ab".into())]);
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let nodes = parse_fragment("1 < 2 and 3 > 2");
        assert_eq!(nodes, vec![Node::Text("1 < 2 and 3 > 2".into())]);
    }

    #[test]
    fn test_script_content_is_raw() {
        let nodes = parse_fragment("<script>if (a < b) { x('</p>') }</script><p>ok</p>");
        let script = first_element(&nodes);
        assert_eq!(script.name, "script");
        assert_eq!(script.children.len(), 1);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_comments_dropped() {
        assert_eq!(
            parse_fragment("a<!-- hidden -->b"),
            vec![Node::Text("ab".into())]
        );
    }

    #[test]
    fn test_entities_decoded_into_text() {
        assert_eq!(
            parse_fragment("a &amp; b &lt;c&gt; &#39;q&#x27;"),
            vec![Node::Text("a & b <c> 'q'".into())]
        );
        assert_eq!(
            parse_fragment("AT&T &unknown;"),
            vec![Node::Text("AT&T &unknown;".into())]
        );
    }

    #[test]
    fn test_misnested_inline_is_repaired() {
        let nodes = parse_fragment("<p><b>bold <i>both</b> italic</i></p>");
        let p = first_element(&nodes);
        assert_eq!(to_html(&nodes), "<p><b>bold <i>both</i></b><i> italic</i></p>");
        assert_eq!(p.children.len(), 2);
    }

    #[test]
    fn test_serialize_escapes() {
        let html = to_html(&parse_fragment(r#"<p title="a&quot;b">1 &lt; 2</p>"#));
        assert_eq!(html, r#"<p title="a&quot;b">1 &lt; 2</p>"#);
    }
}
