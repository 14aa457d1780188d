//! Clones the preview root and inlines every class rule as a `style`
//! attribute, so the layout never needs the stylesheet.

use crate::export::ExportError;
use crate::render::style::Stylesheet;
use crate::render::{RenderedPreview, PREVIEW_ROOT_ID};
use crate::text::html::{parse_fragment, Element, Node};

pub fn find_by_id<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Element> {
    nodes.iter().find_map(|node| match node {
        Node::Element(el) if el.attr("id") == Some(id) => Some(el),
        Node::Element(el) => find_by_id(&el.children, id),
        Node::Text(_) => None,
    })
}

/// The preview root with resolved class declarations prepended to any
/// existing inline style, so inline declarations still win.
pub fn inline_styles(preview: &RenderedPreview) -> Result<Element, ExportError> {
    let nodes = parse_fragment(&preview.html);
    let mut root = find_by_id(&nodes, PREVIEW_ROOT_ID)
        .cloned()
        .ok_or(ExportError::EmptyPreview)?;
    inline_element(&mut root, &preview.stylesheet);
    Ok(root)
}

fn inline_element(el: &mut Element, sheet: &Stylesheet) {
    let resolved = sheet.resolve(el.classes());
    let style = match (resolved.is_empty(), el.attr("style")) {
        (_, None) => resolved,
        (true, Some(own)) => own.to_string(),
        (false, Some(own)) => format!("{resolved};{own}"),
    };
    if !style.is_empty() {
        el.set_attr("style", style);
    }
    for child in &mut el.children {
        if let Node::Element(c) = child {
            inline_element(c, sheet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::style::stylesheet;

    const SHEET: Stylesheet = stylesheet! {
        "page" => "font-size:10pt",
        "name" => "font-size:20pt;font-weight:bold",
    };

    fn preview(html: &str) -> RenderedPreview {
        RenderedPreview {
            html: html.to_string(),
            stylesheet: SHEET,
        }
    }

    #[test]
    fn test_inlines_class_rules() {
        let root = inline_styles(&preview(
            r#"<div id="resumePreviewContent" class="page"><p class="name" style="color:#ff0000">Ada</p></div>"#,
        ))
        .unwrap();
        assert_eq!(root.attr("style"), Some("font-size:10pt"));
        let Node::Element(name) = &root.children[0] else {
            panic!("expected element");
        };
        assert_eq!(
            name.attr("style"),
            Some("font-size:20pt;font-weight:bold;color:#ff0000")
        );
    }

    #[test]
    fn test_finds_nested_root() {
        let root = inline_styles(&preview(
            r#"<main><section><div id="resumePreviewContent">x</div></section></main>"#,
        ))
        .unwrap();
        assert_eq!(root.name, "div");
        assert!(root.attr("style").is_none());
    }

    #[test]
    fn test_missing_root() {
        let err = inline_styles(&preview("<div>nothing</div>")).unwrap_err();
        assert!(matches!(err, ExportError::EmptyPreview));
    }
}
