//! Small element builder used by the templates.

use crate::text::html::{parse_fragment, Element, Node};
use crate::text::sanitize::{is_safe_url, sanitize_rich_text};

pub struct El(Element);

impl El {
    pub fn new(tag: &str) -> Self {
        El(Element::new(tag))
    }

    pub fn class(mut self, class: &str) -> Self {
        let joined = match self.0.attr("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.0.set_attr("class", joined);
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.0.set_attr("id", id.to_string());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.0.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, child: El) -> Self {
        self.0.children.push(Node::Element(child.0));
        self
    }

    pub fn maybe(self, child: Option<El>) -> Self {
        match child {
            Some(c) => self.child(c),
            None => self,
        }
    }

    pub fn children(mut self, children: impl IntoIterator<Item = El>) -> Self {
        self.0
            .children
            .extend(children.into_iter().map(|c| Node::Element(c.0)));
        self
    }

    /// User-authored rich text, sanitized before it joins the tree.
    pub fn rich(mut self, markup: &str) -> Self {
        self.0
            .children
            .extend(parse_fragment(&sanitize_rich_text(markup)));
        self
    }

    /// External link; an unsafe target renders as plain text.
    pub fn link(href: &str, label: &str) -> Self {
        let mut a = El::new("a").text(label);
        if is_safe_url(href) {
            a.0.set_attr("href", href.to_string());
            a.0.set_attr("target", "_blank".to_string());
            a.0.set_attr("rel", "noopener noreferrer".to_string());
        }
        a
    }

    pub fn build(self) -> Element {
        self.0
    }
}

/// `<p class=..>text</p>`, the most common leaf.
pub fn p(class: &str, text: impl Into<String>) -> El {
    El::new("p").class(class).text(text)
}

pub fn hr(class: &str) -> El {
    El::new("hr").class(class)
}
