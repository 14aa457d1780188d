//! Block and inline layout of an inlined preview tree onto letter pages.
//!
//! Blocks stack vertically and break across pages line by line. Flex rows
//! lay their children side by side from the same cursor and end at the
//! lowest child. Inline content is greedily wrapped word by word with the
//! standard font width tables; words wider than the column are split.

use crate::export::computed::{Align, ComputedStyle, Display, Rgb, LIST_INDENT};
use crate::export::font_metrics::Face;
use crate::text::html::{Element, Node};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 72.0;

const CONTENT_TOP: f32 = MARGIN;
const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - MARGIN;
const LINE_HEIGHT: f32 = 1.25;
const COLUMN_GAP: f32 = 6.0;
const MARKER_GAP: f32 = 4.0;
const EPSILON: f32 = 0.01;

/// One run of text on a line. `top` and `line_height` describe the line box
/// in top-down page coordinates; the writer places the baseline inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub x: f32,
    pub top: f32,
    pub line_height: f32,
    pub size: f32,
    pub face: Face,
    pub color: Rgb,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    Text(TextItem),
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Background fills tagged with their nesting depth.
    backgrounds: Vec<(usize, Rect)>,
    pub draws: Vec<Draw>,
}

impl Page {
    /// Fills outermost first so nested backgrounds paint on top.
    pub fn backgrounds(&self) -> Vec<Rect> {
        let mut fills = self.backgrounds.clone();
        fills.sort_by_key(|(depth, _)| *depth);
        fills.into_iter().map(|(_, rect)| rect).collect()
    }

    pub fn text(&self) -> impl Iterator<Item = &TextItem> {
        self.draws.iter().filter_map(|d| match d {
            Draw::Text(t) => Some(t),
            Draw::Rule { .. } => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
struct Cursor {
    page: usize,
    y: f32,
}

/// Lays out `root` (already style-inlined) and returns at least one page.
pub fn layout(root: &Element) -> Vec<Page> {
    let mut engine = Layout {
        pages: vec![Page::default()],
    };
    let style = ComputedStyle::root().for_child(root);
    let start = Cursor {
        page: 0,
        y: CONTENT_TOP,
    };
    engine.block(root, &style, MARGIN, PAGE_WIDTH - 2.0 * MARGIN, start, 0);
    engine.pages
}

struct Layout {
    pages: Vec<Page>,
}

impl Layout {
    fn page(&mut self, index: usize) -> &mut Page {
        if self.pages.len() <= index {
            self.pages.resize_with(index + 1, Page::default);
        }
        &mut self.pages[index]
    }

    /// Moves to the next page when `need` more points do not fit.
    fn fit(&mut self, at: Cursor, need: f32) -> Cursor {
        if at.y + need > CONTENT_BOTTOM + EPSILON && at.y > CONTENT_TOP + EPSILON {
            let next = Cursor {
                page: at.page + 1,
                y: CONTENT_TOP,
            };
            self.page(next.page);
            next
        } else {
            at
        }
    }

    fn block(
        &mut self,
        el: &Element,
        style: &ComputedStyle,
        x: f32,
        width: f32,
        mut at: Cursor,
        depth: usize,
    ) -> Cursor {
        let x = x + style.margin.left;
        let width = (width - style.margin.left - style.margin.right).max(1.0);

        at.y += style.margin.top;
        at = self.fit(at, 0.0);
        let start = at;

        let inner_x = x + style.padding.left;
        let inner_width = (width - style.padding.left - style.padding.right).max(1.0);
        at.y += style.padding.top;
        at = match style.display {
            Display::Flex => self.flex(el, style, inner_x, inner_width, at, depth + 1),
            _ => self.flow(el, style, inner_x, inner_width, at, depth + 1),
        };
        at.y += style.padding.bottom;

        if let Some(color) = style.background {
            self.paint(start, at, x, width, color, depth);
        }
        if let Some(border) = style.border_bottom {
            at = self.fit(at, border.width);
            let y = at.y + border.width / 2.0;
            self.page(at.page).draws.push(Draw::Rule {
                x1: x,
                x2: x + width,
                y,
                width: border.width,
                color: border.color,
            });
            at.y += border.width;
        }
        at.y += style.margin.bottom;
        at
    }

    /// Normal flow: block children stack, inline children gather into
    /// paragraphs between them.
    fn flow(
        &mut self,
        el: &Element,
        style: &ComputedStyle,
        x: f32,
        width: f32,
        mut at: Cursor,
        depth: usize,
    ) -> Cursor {
        let mut tokens = Vec::new();
        let mut ordinal = 0;
        for child in &el.children {
            match child {
                Node::Text(text) => push_text(text, style, &mut tokens),
                Node::Element(c) => {
                    let cs = style.for_child(c);
                    match cs.display {
                        Display::None => {}
                        Display::Inline => collect_inline(c, &cs, &mut tokens),
                        Display::Block | Display::Flex => {
                            at = self.paragraph(&mut tokens, style, x, width, at);
                            if c.name == "li" {
                                ordinal += 1;
                                let marker = match el.name.as_str() {
                                    "ol" => format!("{ordinal}."),
                                    _ => "•".to_string(),
                                };
                                at = self.marker(marker, &cs, x, at);
                            }
                            at = self.block(c, &cs, x, width, at, depth);
                        }
                    }
                }
            }
        }
        self.paragraph(&mut tokens, style, x, width, at)
    }

    fn flex(
        &mut self,
        el: &Element,
        style: &ComputedStyle,
        x: f32,
        width: f32,
        at: Cursor,
        depth: usize,
    ) -> Cursor {
        let items: Vec<(&Element, ComputedStyle)> = el
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Element(c) => Some((c, style.for_child(c))),
                Node::Text(_) => None,
            })
            .filter(|(_, cs)| cs.display != Display::None)
            .collect();

        let slots = columns(&items, style.space_between, width);
        let mut end = at;
        for ((child, cs), (offset, slot_width)) in items.iter().zip(slots) {
            let done = self.block(child, cs, x + offset, slot_width, at, depth);
            if done > end {
                end = done;
            }
        }
        end
    }

    fn marker(&mut self, marker: String, style: &ComputedStyle, x: f32, at: Cursor) -> Cursor {
        let line_height = style.font_size * LINE_HEIGHT;
        let at = self.fit(at, line_height);
        let face = style.face;
        let marker_x = x - face.measure(&marker, style.font_size) - MARKER_GAP;
        self.page(at.page).draws.push(Draw::Text(TextItem {
            x: marker_x.max(x - LIST_INDENT),
            top: at.y,
            line_height,
            size: style.font_size,
            face,
            color: style.color,
            text: marker,
        }));
        at
    }

    /// Wraps and emits the gathered inline tokens, then clears them.
    fn paragraph(
        &mut self,
        tokens: &mut Vec<Token>,
        style: &ComputedStyle,
        x: f32,
        width: f32,
        mut at: Cursor,
    ) -> Cursor {
        if !tokens.iter().any(|t| !matches!(t, Token::Space(_))) {
            tokens.clear();
            return at;
        }
        let lines = break_lines(tokens, width, style.font_size);
        tokens.clear();

        for line in lines {
            at = self.fit(at, line.height);
            let offset = match style.align {
                Align::Left => 0.0,
                Align::Center => (width - line.width) / 2.0,
                Align::Right => width - line.width,
            }
            .max(0.0);
            let page = self.page(at.page);
            for piece in line.pieces {
                page.draws.push(Draw::Text(TextItem {
                    x: x + offset + piece.x,
                    top: at.y,
                    line_height: line.height,
                    size: piece.run.size,
                    face: piece.run.face,
                    color: piece.run.color,
                    text: piece.text,
                }));
            }
            at.y += line.height;
        }
        at
    }

    fn paint(&mut self, start: Cursor, end: Cursor, x: f32, width: f32, color: Rgb, depth: usize) {
        for index in start.page..=end.page {
            let top = if index == start.page { start.y } else { CONTENT_TOP };
            let bottom = if index == end.page {
                end.y.min(CONTENT_BOTTOM)
            } else {
                CONTENT_BOTTOM
            };
            if bottom > top {
                self.page(index).backgrounds.push((
                    depth,
                    Rect {
                        x,
                        top,
                        width,
                        height: bottom - top,
                        color,
                    },
                ));
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flex columns
// ────────────────────────────────────────────────────────────────────────────

/// `(offset, width)` per flex child.
///
/// Percentage widths are honoured and the remainder is shared. With
/// `space-between`, children keep their natural widths spread across the
/// row; when they do not fit, the last child keeps its natural width up to
/// half the row and the others share what is left.
fn columns(items: &[(&Element, ComputedStyle)], space_between: bool, width: f32) -> Vec<(f32, f32)> {
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }
    let fixed: Vec<Option<f32>> = items
        .iter()
        .map(|(_, cs)| cs.width_pct.map(|p| width * p / 100.0))
        .collect();

    if space_between && n > 1 {
        let natural: Vec<f32> = items
            .iter()
            .zip(&fixed)
            .map(|((el, cs), f)| f.unwrap_or_else(|| natural_width(el, cs)))
            .collect();
        let total: f32 = natural.iter().sum();
        let gaps = (n - 1) as f32;
        if total + COLUMN_GAP * gaps <= width {
            let gap = (width - total) / gaps;
            let mut offset = 0.0;
            return natural
                .iter()
                .map(|w| {
                    let slot = (offset, *w);
                    offset += w + gap;
                    slot
                })
                .collect();
        }
        let last = natural[n - 1].min(width / 2.0);
        let each = ((width - last - COLUMN_GAP * gaps) / gaps).max(1.0);
        return (0..n)
            .map(|i| {
                if i == n - 1 {
                    (width - last, last)
                } else {
                    (i as f32 * (each + COLUMN_GAP), each)
                }
            })
            .collect();
    }

    let used: f32 = fixed.iter().flatten().sum();
    let flexible = fixed.iter().filter(|f| f.is_none()).count();
    let share = if flexible > 0 {
        (width - used).max(0.0) / flexible as f32
    } else {
        0.0
    };
    let mut offset = 0.0;
    fixed
        .iter()
        .map(|f| {
            let w = f.unwrap_or(share);
            let slot = (offset, w);
            offset += w;
            slot
        })
        .collect()
}

/// Width of the element's content set on a single line, plus its box.
fn natural_width(el: &Element, style: &ComputedStyle) -> f32 {
    let mut tokens = Vec::new();
    collect_children(el, style, &mut tokens);
    let content = break_lines(&tokens, f32::INFINITY, style.font_size)
        .iter()
        .map(|l| l.width)
        .fold(0.0, f32::max);
    content + style.padding.left + style.padding.right + style.margin.left + style.margin.right
}

// ────────────────────────────────────────────────────────────────────────────
// Inline tokens and line breaking
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    face: Face,
    size: f32,
    color: Rgb,
}

impl Run {
    fn of(style: &ComputedStyle) -> Self {
        Run {
            face: style.face,
            size: style.font_size,
            color: style.color,
        }
    }

    fn measure(&self, text: &str) -> f32 {
        self.face.measure(text, self.size)
    }

    fn space(&self) -> f32 {
        self.face.metrics().space_width * self.size
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String, Run),
    Space(Run),
    Break,
}

fn push_text(text: &str, style: &ComputedStyle, tokens: &mut Vec<Token>) {
    let run = Run::of(style);
    let text = if style.uppercase {
        text.to_uppercase()
    } else {
        text.to_string()
    };
    let mut word = String::new();
    for c in text.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word), run));
            }
            if !matches!(tokens.last(), Some(Token::Space(_))) {
                tokens.push(Token::Space(run));
            }
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word, run));
    }
}

fn collect_inline(el: &Element, style: &ComputedStyle, tokens: &mut Vec<Token>) {
    if el.name == "br" {
        tokens.push(Token::Break);
        return;
    }
    collect_children(el, style, tokens);
}

fn collect_children(el: &Element, style: &ComputedStyle, tokens: &mut Vec<Token>) {
    for child in &el.children {
        match child {
            Node::Text(text) => push_text(text, style, tokens),
            Node::Element(c) => {
                let cs = style.for_child(c);
                if cs.display != Display::None {
                    collect_inline(c, &cs, tokens);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Piece {
    x: f32,
    text: String,
    run: Run,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Line {
    pieces: Vec<Piece>,
    width: f32,
    height: f32,
}

impl Line {
    fn place(&mut self, text: &str, run: Run, gap: f32, width: f32) {
        self.height = self.height.max(run.size * LINE_HEIGHT);
        match self.pieces.last_mut() {
            Some(last) if last.run == run => {
                if gap > 0.0 {
                    last.text.push(' ');
                }
                last.text.push_str(text);
            }
            _ => self.pieces.push(Piece {
                x: self.width + gap,
                text: text.to_string(),
                run,
            }),
        }
        self.width += gap + width;
    }

    fn finish(&mut self, fallback_size: f32) -> Line {
        if self.height == 0.0 {
            self.height = fallback_size * LINE_HEIGHT;
        }
        std::mem::take(self)
    }
}

/// Greedy wrapping: a word goes on the current line when it fits after the
/// pending space, otherwise it starts a new line.
fn break_lines(tokens: &[Token], width: f32, fallback_size: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();
    let mut space: Option<Run> = None;

    for token in tokens {
        match token {
            Token::Space(run) => {
                if !line.pieces.is_empty() {
                    space = Some(*run);
                }
            }
            Token::Break => {
                lines.push(line.finish(fallback_size));
                space = None;
            }
            Token::Word(text, run) => {
                let gap = space.take().map(|r| r.space()).unwrap_or(0.0);
                let w = run.measure(text);
                if line.pieces.is_empty() || line.width + gap + w <= width + EPSILON {
                    if w <= width + EPSILON {
                        line.place(text, *run, gap, w);
                        continue;
                    }
                } else {
                    lines.push(line.finish(fallback_size));
                    if w <= width + EPSILON {
                        line.place(text, *run, 0.0, w);
                        continue;
                    }
                }
                // Wider than the column: split into chunks that fit.
                if !line.pieces.is_empty() {
                    lines.push(line.finish(fallback_size));
                }
                let mut chunk = String::new();
                for c in text.chars() {
                    let mut candidate = chunk.clone();
                    candidate.push(c);
                    if !chunk.is_empty() && run.measure(&candidate) > width + EPSILON {
                        let w = run.measure(&chunk);
                        line.place(&chunk, *run, 0.0, w);
                        lines.push(line.finish(fallback_size));
                        chunk.clear();
                        chunk.push(c);
                    } else {
                        chunk = candidate;
                    }
                }
                if !chunk.is_empty() {
                    let w = run.measure(&chunk);
                    line.place(&chunk, *run, 0.0, w);
                }
            }
        }
    }
    if !line.pieces.is_empty() {
        lines.push(line.finish(fallback_size));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::html::parse_fragment;

    fn root(html: &str) -> Element {
        match parse_fragment(html).into_iter().next() {
            Some(Node::Element(el)) => el,
            _ => panic!("no element"),
        }
    }

    fn all_text(pages: &[Page]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.text().map(|t| t.text.clone()))
            .collect()
    }

    fn words(text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        push_text(text, &ComputedStyle::root(), &mut tokens);
        tokens
    }

    #[test]
    fn test_short_text_single_line() {
        let lines = break_lines(&words("Built  the analytical engine"), 400.0, 10.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].pieces.len(), 1);
        assert_eq!(lines[0].pieces[0].text, "Built the analytical engine");
        assert!((lines[0].height - 12.5).abs() < 1e-4);
    }

    #[test]
    fn test_wraps_at_width() {
        let text = "word ".repeat(40);
        let lines = break_lines(&words(&text), 100.0, 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.width <= 100.0 + EPSILON));
        let count: usize = lines
            .iter()
            .map(|l| l.pieces[0].text.split(' ').count())
            .sum();
        assert_eq!(count, 40);
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = break_lines(&words(&"x".repeat(200)), 50.0, 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.width <= 50.0 + EPSILON));
        let joined: String = lines.iter().map(|l| l.pieces[0].text.as_str()).collect();
        assert_eq!(joined.len(), 200);
    }

    #[test]
    fn test_style_runs_stay_separate() {
        let el = root("<p>Built <b>things</b> well</p>");
        let mut tokens = Vec::new();
        collect_children(&el, &ComputedStyle::root(), &mut tokens);
        let lines = break_lines(&tokens, 400.0, 10.0);
        let texts: Vec<&str> = lines[0].pieces.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["Built", "things", "well"]);
        assert!(lines[0].pieces[1].run.face.bold);
        assert!(lines[0].pieces[1].x > lines[0].pieces[0].x);
    }

    #[test]
    fn test_blocks_stack() {
        let pages = layout(&root("<div><p>First</p><p>Second</p></div>"));
        assert_eq!(pages.len(), 1);
        let items: Vec<&TextItem> = pages[0].text().collect();
        assert_eq!(items.len(), 2);
        assert!(items[1].top > items[0].top);
        assert_eq!(items[0].x, MARGIN);
    }

    #[test]
    fn test_long_content_breaks_pages() {
        let body = "<p>Line of text</p>".repeat(120);
        let pages = layout(&root(&format!("<div>{body}</div>")));
        assert!(pages.len() >= 2);
        for page in &pages {
            for item in page.text() {
                assert!(item.top + item.line_height <= CONTENT_BOTTOM + EPSILON);
            }
        }
        assert_eq!(all_text(&pages).len(), 120);
    }

    #[test]
    fn test_flex_columns_share_cursor() {
        let pages = layout(&root(
            r#"<div style="display:flex"><div style="width:40%"><p>Left</p></div><div style="width:60%"><p>Right</p></div></div>"#,
        ));
        let items: Vec<&TextItem> = pages[0].text().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].top, items[1].top);
        let content = PAGE_WIDTH - 2.0 * MARGIN;
        assert!((items[1].x - (MARGIN + content * 0.4)).abs() < 1e-3);
    }

    #[test]
    fn test_space_between_pushes_last_child_right() {
        let pages = layout(&root(
            r#"<div style="display:flex;justify-content:space-between"><p>Acme</p><p>01/2020 - Present</p></div>"#,
        ));
        let items: Vec<&TextItem> = pages[0].text().collect();
        let right_edge = MARGIN + PAGE_WIDTH - 2.0 * MARGIN;
        let dates = items[1];
        let end = dates.x + dates.face.measure(&dates.text, dates.size);
        assert!((end - right_edge).abs() < 0.5);
    }

    #[test]
    fn test_background_and_rule() {
        let pages = layout(&root(
            r#"<div><div style="background-color:#000000;padding:4pt"><p>Band</p></div><hr style="border-bottom:1pt solid #000000"></div>"#,
        ));
        let fills = pages[0].backgrounds();
        assert_eq!(fills.len(), 1);
        assert!((fills[0].height - (8.0 + 12.5)).abs() < 1e-3);
        assert!(pages[0]
            .draws
            .iter()
            .any(|d| matches!(d, Draw::Rule { width, .. } if *width == 1.0)));
    }

    #[test]
    fn test_list_markers() {
        let pages = layout(&root("<div><ul><li>One</li><li>Two</li></ul><ol><li>Three</li></ol></div>"));
        let text = all_text(&pages);
        assert_eq!(text, vec!["•", "One", "•", "Two", "1.", "Three"]);
    }

    #[test]
    fn test_center_alignment() {
        let pages = layout(&root(r#"<div style="text-align:center"><p>Ada</p></div>"#));
        let item = pages[0].text().next().unwrap();
        let w = item.face.measure("Ada", item.size);
        let expected = MARGIN + (PAGE_WIDTH - 2.0 * MARGIN - w) / 2.0;
        assert!((item.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_uppercase_transform() {
        let pages = layout(&root(r#"<div style="text-transform:uppercase"><p>skills</p></div>"#));
        assert_eq!(all_text(&pages), vec!["SKILLS"]);
    }

    #[test]
    fn test_empty_root_has_one_page() {
        let pages = layout(&Element::new("div"));
        assert_eq!(pages.len(), 1);
        assert!(pages[0].draws.is_empty());
    }
}
