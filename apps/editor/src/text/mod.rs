//! Rich-text helpers: plain-text extraction and markup sanitization.

pub mod html;
pub mod sanitize;

use html::{parse_fragment, Element, Node};

/// The markup the rich-text editor produces for an empty document.
pub const EMPTY_PARAGRAPH: &str = "<p></p>";

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tr", "ul",
];

const DROPPED_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// Converts rich text to plain text for search and storage.
///
/// Block elements become line breaks, inline formatting collapses into the
/// surrounding text, whitespace runs collapse to one space and blank lines are
/// dropped.
///
/// Input without block structure (no line break, paragraph or list) is plain
/// text already and is returned unchanged. Inline-only markup counts as plain,
/// so escaped tags decoded into the output stay put when extracted again.
pub fn extract_plain_text(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    let nodes = parse_fragment(input);
    if !has_block_structure(&nodes) {
        return input.to_string();
    }

    let mut lines = LineCollector::default();
    for node in &nodes {
        lines.walk(node);
    }
    lines.finish()
}

/// True for `""`, the empty-paragraph sentinel and any markup without text.
pub fn is_semantically_empty(rich_text: &str) -> bool {
    let trimmed = rich_text.trim();
    trimmed.is_empty() || trimmed == EMPTY_PARAGRAPH || extract_plain_text(trimmed).is_empty()
}

fn has_block_structure(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| match node {
        Node::Element(e) => {
            let name = e.name.as_str();
            name == "br"
                || BLOCK_ELEMENTS.contains(&name)
                || DROPPED_ELEMENTS.contains(&name)
                || has_block_structure(&e.children)
        }
        Node::Text(_) => false,
    })
}

#[derive(Default)]
struct LineCollector {
    lines: Vec<String>,
    current: String,
}

impl LineCollector {
    fn walk(&mut self, node: &Node) {
        match node {
            Node::Text(t) => self.push_inline(t),
            Node::Element(e) => self.walk_element(e),
        }
    }

    fn walk_element(&mut self, element: &Element) {
        let name = element.name.as_str();
        if DROPPED_ELEMENTS.contains(&name) {
            return;
        }
        if name == "br" {
            self.break_line();
            return;
        }
        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            self.break_line();
        }
        for child in &element.children {
            self.walk(child);
        }
        if block {
            self.break_line();
        }
    }

    fn push_inline(&mut self, text: &str) {
        for (i, word) in text.split(|c: char| c.is_whitespace()).enumerate() {
            if i > 0 && !self.current.ends_with(' ') {
                self.current.push(' ');
            }
            self.current.push_str(word);
        }
    }

    fn break_line(&mut self) {
        let line = self.current.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs() {
        assert_eq!(extract_plain_text(""), "");
        assert_eq!(extract_plain_text("   "), "");
        assert_eq!(extract_plain_text(EMPTY_PARAGRAPH), "");
    }

    #[test]
    fn test_paragraphs_become_lines() {
        assert_eq!(
            extract_plain_text("<p>First line</p><p>Second line</p>"),
            "First line\nSecond line"
        );
    }

    #[test]
    fn test_inline_formatting_collapses() {
        assert_eq!(
            extract_plain_text("<p>Led <strong>12</strong> <em>engineers</em> across <a href=\"#\">3 teams</a></p>"),
            "Led 12 engineers across 3 teams"
        );
    }

    #[test]
    fn test_lists_one_item_per_line() {
        assert_eq!(
            extract_plain_text("<ul><li><p>Rust</p></li><li><p>Go</p></li></ul>"),
            "Rust\nGo"
        );
    }

    #[test]
    fn test_empty_paragraphs_dropped() {
        assert_eq!(
            extract_plain_text("<p>a</p><p></p><p> </p><p><br></p><p>b</p>"),
            "a\nb"
        );
    }

    #[test]
    fn test_br_breaks_line() {
        assert_eq!(extract_plain_text("<p>a<br>b</p>"), "a\nb");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(extract_plain_text("<p>R&amp;D &lt;lead&gt;</p>"), "R&D <lead>");
    }

    #[test]
    fn test_scripts_dropped() {
        assert_eq!(
            extract_plain_text("<p>safe</p><script>alert(1)</script>"),
            "safe"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        let plain = "Managed budget of $2M\nShipped v2 in 3 months";
        assert_eq!(extract_plain_text(plain), plain);
    }

    #[test]
    fn test_idempotent() {
        let rich = "<h2>Title</h2><p>Body with <b>bold</b></p><ol><li>one</li><li>two</li></ol>";
        let once = extract_plain_text(rich);
        assert_eq!(extract_plain_text(&once), once);
        assert_eq!(once, "Title\nBody with bold\none\ntwo");
    }

    #[test]
    fn test_escaped_inline_tags_survive_reextraction() {
        let once = extract_plain_text("<p>&lt;b&gt;x&lt;/b&gt; and &lt;i&gt;y&lt;/i&gt;</p>");
        assert_eq!(once, "<b>x</b> and <i>y</i>");
        assert_eq!(extract_plain_text(&once), once);
    }

    #[test]
    fn test_inline_only_markup_is_plain() {
        assert_eq!(extract_plain_text("use <em>Vec</em>"), "use <em>Vec</em>");
    }

    #[test]
    fn test_no_markup_in_output() {
        let out = extract_plain_text("<div><p class=\"x\">a <span style=\"color:red\">b</span></p></div>");
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
        assert_eq!(out, "a b");
    }

    #[test]
    fn test_semantically_empty() {
        assert!(is_semantically_empty(""));
        assert!(is_semantically_empty("<p></p>"));
        assert!(is_semantically_empty("<p><br></p>"));
        assert!(!is_semantically_empty("<p>x</p>"));
    }
}
