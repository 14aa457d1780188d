//! Template Renderer: pure functions from a document to a preview tree.
//!
//! Every template consumes the same [`ResumeView`] and differs only in layout
//! and stylesheet. Templates are unit structs behind [`Renderable`], chosen
//! by [`TemplateKind`]; adding one never touches the document schema.

pub mod markup;
pub mod style;
pub mod templates;
pub mod view;

use serde::{Deserialize, Serialize};

use crate::models::document::{CoverLetterDocument, ResumeDocument};
use crate::text::html::{element_to_html, Element};

use self::style::Stylesheet;
use self::templates::{
    colored::ColoredTemplate, cover_letter::CoverLetterTemplate, double::DoubleColumnTemplate,
    minimalist::MinimalistTemplate, modern::ModernTemplate, single::SingleColumnTemplate,
    single_colored::SingleColoredTemplate,
};

/// `id` of the root element every template renders; export starts here.
pub const PREVIEW_ROOT_ID: &str = "resumePreviewContent";

/// A layout for documents of type `D`. Must not panic on sparse input.
pub trait Renderable<D>: Send + Sync {
    fn render(&self, doc: &D) -> Element;

    fn stylesheet(&self) -> Stylesheet;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateKind {
    #[default]
    Single,
    Double,
    Colored,
    SingleColored,
    Minimalist,
    Modern,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::Single,
        TemplateKind::Double,
        TemplateKind::Colored,
        TemplateKind::SingleColored,
        TemplateKind::Minimalist,
        TemplateKind::Modern,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            TemplateKind::Single => "Single Column",
            TemplateKind::Double => "Double Column",
            TemplateKind::Colored => "Colored Two Column",
            TemplateKind::SingleColored => "Single Column Colored",
            TemplateKind::Minimalist => "Minimalist",
            TemplateKind::Modern => "Modern",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TemplateKind::Single => "Classic single-column layout perfect for traditional resumes",
            TemplateKind::Double => "Modern two-column layout with better space utilization",
            TemplateKind::Colored => {
                "Modern design with colored sidebar and enhanced visual hierarchy"
            }
            TemplateKind::SingleColored => "Single-column layout with a vibrant colored theme",
            TemplateKind::Minimalist => "A clean, minimalist design",
            TemplateKind::Modern => "A modern design with visual elements",
        }
    }

    /// Wire name (`"singleColored"` etc.).
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Single => "single",
            TemplateKind::Double => "double",
            TemplateKind::Colored => "colored",
            TemplateKind::SingleColored => "singleColored",
            TemplateKind::Minimalist => "minimalist",
            TemplateKind::Modern => "modern",
        }
    }

    /// Lenient lookup for stored template names; unknown names fall back to
    /// the single-column layout.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == name)
            .unwrap_or_default()
    }

    pub fn renderer(&self) -> &'static dyn Renderable<ResumeDocument> {
        match self {
            TemplateKind::Single => &SingleColumnTemplate,
            TemplateKind::Double => &DoubleColumnTemplate,
            TemplateKind::Colored => &ColoredTemplate,
            TemplateKind::SingleColored => &SingleColoredTemplate,
            TemplateKind::Minimalist => &MinimalistTemplate,
            TemplateKind::Modern => &ModernTemplate,
        }
    }
}

/// A rendered preview: markup rooted at [`PREVIEW_ROOT_ID`] plus the class
/// rules it was styled with. The export pipeline needs both.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPreview {
    pub html: String,
    pub stylesheet: Stylesheet,
}

impl RenderedPreview {
    fn new<D>(template: &dyn Renderable<D>, doc: &D) -> Self {
        RenderedPreview {
            html: element_to_html(&template.render(doc)),
            stylesheet: template.stylesheet(),
        }
    }

    /// Standalone HTML page for the live preview pane.
    pub fn to_page(&self) -> String {
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>\n{}\n</style></head><body>{}</body></html>",
            self.stylesheet.to_css(),
            self.html
        )
    }
}

pub fn render_resume(template: TemplateKind, doc: &ResumeDocument) -> RenderedPreview {
    RenderedPreview::new(template.renderer(), doc)
}

pub fn render_cover_letter(doc: &CoverLetterDocument) -> RenderedPreview {
    RenderedPreview::new(&CoverLetterTemplate, doc)
}
