//! Computed styles for the export layout.
//!
//! Reads the inlined `style` attribute of each element on top of tag
//! defaults and the inherited text properties of its parent. Only the
//! declarations the templates use are understood; anything else is ignored.

use crate::export::font_metrics::{Face, FontFamily};
use crate::text::html::Element;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const GRAY: Rgb = Rgb(0.82, 0.84, 0.86);

    /// `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a handful of names.
    pub fn parse(value: &str) -> Option<Rgb> {
        let v = value.trim().to_ascii_lowercase();
        if let Some(hex) = v.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = v.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            let parts: Vec<f32> = args
                .split(',')
                .filter_map(|p| p.trim().parse::<f32>().ok())
                .collect();
            return match parts.as_slice() {
                [r, g, b] => Some(Rgb(r / 255.0, g / 255.0, b / 255.0)),
                _ => None,
            };
        }
        match v.as_str() {
            "black" => Some(Rgb::BLACK),
            "white" => Some(Rgb(1.0, 1.0, 1.0)),
            "gray" | "grey" => Some(Rgb(0.5, 0.5, 0.5)),
            "red" => Some(Rgb(1.0, 0.0, 0.0)),
            "blue" => Some(Rgb(0.0, 0.0, 1.0)),
            _ => None,
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|c| c as f32 / 255.0);
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| channel(&format!("{c}{c}")));
            Some(Rgb(it.next()??, it.next()??, it.next()??))
        }
        6 => Some(Rgb(
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    Inline,
    Flex,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    // Inherited.
    pub font_size: f32,
    pub face: Face,
    pub color: Rgb,
    pub align: Align,
    pub uppercase: bool,
    // Box.
    pub display: Display,
    pub margin: Edges,
    pub padding: Edges,
    pub background: Option<Rgb>,
    pub width_pct: Option<f32>,
    pub space_between: bool,
    pub border_bottom: Option<Border>,
}

const BLOCK_TAGS: &[&str] = &[
    "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "hr", "section", "header",
    "footer", "article", "main", "aside", "nav", "blockquote", "pre",
];

const HIDDEN_TAGS: &[&str] = &["script", "style", "head", "title", "template"];

pub const DEFAULT_FONT_SIZE: f32 = 10.0;
pub const LIST_INDENT: f32 = 12.0;

impl ComputedStyle {
    /// Style of the page itself, before the root element applies its own.
    pub fn root() -> Self {
        ComputedStyle {
            font_size: DEFAULT_FONT_SIZE,
            face: Face::default(),
            color: Rgb::BLACK,
            align: Align::Left,
            uppercase: false,
            display: Display::Block,
            margin: Edges::default(),
            padding: Edges::default(),
            background: None,
            width_pct: None,
            space_between: false,
            border_bottom: None,
        }
    }

    pub fn for_child(&self, el: &Element) -> Self {
        let name = el.name.as_str();
        let display = if HIDDEN_TAGS.contains(&name) {
            Display::None
        } else if BLOCK_TAGS.contains(&name) {
            Display::Block
        } else {
            Display::Inline
        };
        let mut style = ComputedStyle {
            display,
            margin: Edges::default(),
            padding: Edges::default(),
            background: None,
            width_pct: None,
            space_between: false,
            border_bottom: None,
            ..self.clone()
        };
        style.apply_tag_defaults(name);
        if let Some(decls) = el.attr("style") {
            for decl in decls.split(';') {
                if let Some((property, value)) = decl.split_once(':') {
                    style.apply(&property.trim().to_ascii_lowercase(), value.trim());
                }
            }
        }
        style
    }

    pub fn is_block(&self) -> bool {
        matches!(self.display, Display::Block | Display::Flex)
    }

    fn apply_tag_defaults(&mut self, name: &str) {
        match name {
            "h1" => self.heading(20.0, 4.0),
            "h2" => self.heading(16.0, 3.0),
            "h3" => self.heading(13.0, 2.0),
            "h4" | "h5" | "h6" => self.face.bold = true,
            "strong" | "b" => self.face.bold = true,
            "em" | "i" => self.face.italic = true,
            "code" | "pre" => self.face.family = FontFamily::Courier,
            "ul" | "ol" => self.padding.left = LIST_INDENT,
            "hr" => {
                self.border_bottom = Some(Border {
                    width: 0.5,
                    color: Rgb::GRAY,
                })
            }
            _ => {}
        }
    }

    fn heading(&mut self, size: f32, bottom: f32) {
        self.font_size = size;
        self.face.bold = true;
        self.margin.bottom = bottom;
    }

    fn apply(&mut self, property: &str, value: &str) {
        let size = self.font_size;
        match property {
            "font-size" => {
                if let Some(v) = length(value, size) {
                    self.font_size = v;
                }
            }
            "font-weight" => {
                self.face.bold = match value {
                    "bold" | "bolder" => true,
                    "normal" | "lighter" => false,
                    n => n.parse::<u16>().map(|w| w >= 600).unwrap_or(self.face.bold),
                }
            }
            "font-style" => self.face.italic = matches!(value, "italic" | "oblique"),
            "font-family" => self.face.family = FontFamily::from_css(value),
            "color" => {
                if let Some(c) = Rgb::parse(value) {
                    self.color = c;
                }
            }
            "background-color" | "background" => self.background = Rgb::parse(value),
            "text-align" => {
                self.align = match value {
                    "center" => Align::Center,
                    "right" | "end" => Align::Right,
                    _ => Align::Left,
                }
            }
            "text-transform" => self.uppercase = value == "uppercase",
            "display" => {
                self.display = match value {
                    "flex" => Display::Flex,
                    "none" => Display::None,
                    "inline" | "inline-block" => Display::Inline,
                    _ => Display::Block,
                }
            }
            "justify-content" => self.space_between = value == "space-between",
            "width" => {
                self.width_pct = value
                    .strip_suffix('%')
                    .and_then(|p| p.trim().parse::<f32>().ok())
                    .map(|p| p.clamp(0.0, 100.0))
            }
            "margin" => self.margin = edges(value, size),
            "margin-top" => set_length(&mut self.margin.top, value, size),
            "margin-right" => set_length(&mut self.margin.right, value, size),
            "margin-bottom" => set_length(&mut self.margin.bottom, value, size),
            "margin-left" => set_length(&mut self.margin.left, value, size),
            "padding" => self.padding = edges(value, size),
            "padding-top" => set_length(&mut self.padding.top, value, size),
            "padding-right" => set_length(&mut self.padding.right, value, size),
            "padding-bottom" => set_length(&mut self.padding.bottom, value, size),
            "padding-left" => set_length(&mut self.padding.left, value, size),
            "border-bottom" => self.border_bottom = border(value, size),
            _ => {}
        }
    }
}

/// A CSS length in points. `px` converts at 96 dpi, `em` against `em`.
pub fn length(value: &str, em: f32) -> Option<f32> {
    let v = value.trim();
    let (number, factor) = if let Some(n) = v.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = v.strip_suffix("px") {
        (n, 0.75)
    } else if let Some(n) = v.strip_suffix("rem") {
        (n, DEFAULT_FONT_SIZE)
    } else if let Some(n) = v.strip_suffix("em") {
        (n, em)
    } else {
        (v, 0.75)
    };
    number.trim().parse::<f32>().ok().map(|n| n * factor)
}

fn set_length(slot: &mut f32, value: &str, em: f32) {
    if let Some(v) = length(value, em) {
        *slot = v;
    }
}

/// One to four lengths in CSS shorthand order.
fn edges(value: &str, em: f32) -> Edges {
    let v: Vec<f32> = value
        .split_whitespace()
        .map(|p| length(p, em).unwrap_or(0.0))
        .collect();
    match v.as_slice() {
        [all] => Edges {
            top: *all,
            right: *all,
            bottom: *all,
            left: *all,
        },
        [vertical, horizontal] => Edges {
            top: *vertical,
            right: *horizontal,
            bottom: *vertical,
            left: *horizontal,
        },
        [top, horizontal, bottom] => Edges {
            top: *top,
            right: *horizontal,
            bottom: *bottom,
            left: *horizontal,
        },
        [top, right, bottom, left, ..] => Edges {
            top: *top,
            right: *right,
            bottom: *bottom,
            left: *left,
        },
        [] => Edges::default(),
    }
}

/// `<width> <style> <color>` in any order; `none` removes the border.
fn border(value: &str, em: f32) -> Option<Border> {
    if value.trim() == "none" {
        return None;
    }
    let mut width = 1.0;
    let mut color = Rgb::BLACK;
    for part in value.split_whitespace() {
        if let Some(c) = Rgb::parse(part) {
            color = c;
        } else if let Some(w) = length(part, em) {
            width = w;
        }
    }
    Some(Border { width, color })
}
