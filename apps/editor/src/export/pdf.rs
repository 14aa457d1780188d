//! Writes laid-out pages as a PDF with lopdf.
//!
//! Text uses the twelve standard Type1 fonts with WinAnsiEncoding, so no
//! font program is embedded and characters outside that code page are
//! replaced with `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use crate::export::computed::Rgb;
use crate::export::font_metrics::Face;
use crate::export::layout::{Draw, Page, Rect, TextItem, PAGE_HEIGHT, PAGE_WIDTH};
use crate::export::ExportError;

/// Baseline position inside the line box, as a fraction of the font size.
const ASCENT: f32 = 0.8;

pub fn write_pdf(pages: &[Page]) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for face in Face::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(page);
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        PAGE_WIDTH.into(),
        PAGE_HEIGHT.into(),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(out)
}

fn page_content(page: &Page) -> Content {
    let mut ops = Vec::new();
    for rect in page.backgrounds() {
        fill(&mut ops, &rect);
    }
    for draw in &page.draws {
        match draw {
            Draw::Rule {
                x1,
                x2,
                y,
                width,
                color,
            } => {
                let y = PAGE_HEIGHT - y;
                ops.push(Operation::new("w", vec![(*width).into()]));
                ops.push(color_op("RG", *color));
                ops.push(Operation::new("m", vec![(*x1).into(), y.into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), y.into()]));
                ops.push(Operation::new("S", vec![]));
            }
            Draw::Text(item) => text(&mut ops, item),
        }
    }
    Content { operations: ops }
}

fn fill(ops: &mut Vec<Operation>, rect: &Rect) {
    ops.push(color_op("rg", rect.color));
    ops.push(Operation::new(
        "re",
        vec![
            rect.x.into(),
            (PAGE_HEIGHT - rect.top - rect.height).into(),
            rect.width.into(),
            rect.height.into(),
        ],
    ));
    ops.push(Operation::new("f", vec![]));
}

fn text(ops: &mut Vec<Operation>, item: &TextItem) {
    let baseline = item.top + (item.line_height - item.size) / 2.0 + ASCENT * item.size;
    ops.push(color_op("rg", item.color));
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![
            Object::Name(item.face.resource_name().into_bytes()),
            item.size.into(),
        ],
    ));
    ops.push(Operation::new(
        "Td",
        vec![item.x.into(), (PAGE_HEIGHT - baseline).into()],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(&item.text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn color_op(operator: &str, color: Rgb) -> Operation {
    Operation::new(operator, vec![color.0.into(), color.1.into(), color.2.into()])
}

/// Encodes text in the WinAnsi (CP1252) code page.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            'Œ' => 0x8c,
            'œ' => 0x9c,
            'Š' => 0x8a,
            'š' => 0x9a,
            'Ž' => 0x8e,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            '\t' | '\n' | '\r' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::layout::layout;
    use crate::text::html::{parse_fragment, Node};

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("Ada"), b"Ada".to_vec());
        assert_eq!(win_ansi("é•–"), vec![0xe9, 0x95, 0x96]);
        assert_eq!(win_ansi("中"), b"?".to_vec());
    }

    #[test]
    fn test_writes_loadable_document() {
        let Some(Node::Element(root)) = parse_fragment(
            r#"<div><p style="background-color:#1d4ed8;color:#ffffff">Ada Lovelace</p><hr></div>"#,
        )
        .into_iter()
        .next() else {
            panic!("no root");
        };
        let bytes = write_pdf(&layout(&root)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("Ada Lovelace"));
    }

    #[test]
    fn test_page_content_operators() {
        let Some(Node::Element(root)) =
            parse_fragment(r#"<div style="background-color:#000"><p>x</p><hr></div>"#)
                .into_iter()
                .next()
        else {
            panic!("no root");
        };
        let pages = layout(&root);
        let ops: Vec<String> = page_content(&pages[0])
            .operations
            .into_iter()
            .map(|op| op.operator)
            .collect();
        let fill_at = ops.iter().position(|o| o == "f").unwrap();
        let text_at = ops.iter().position(|o| o == "Tj").unwrap();
        assert!(fill_at < text_at);
        assert!(ops.iter().any(|o| o == "S"));
    }
}
