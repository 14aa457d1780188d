use crate::models::document::CoverLetterDocument;
use crate::render::markup::El;
use crate::render::style::{stylesheet, Stylesheet};
use crate::render::templates::{root, section};
use crate::render::Renderable;
use crate::text::html::Element;
use crate::text::is_semantically_empty;

pub struct CoverLetterTemplate;

const TITLE: &str = "Cover Letter";

const STYLESHEET: Stylesheet = stylesheet! {
    "page" => "font-family:sans-serif;font-size:10.5pt;color:#000000",
    "heading" => "font-size:13pt;font-weight:bold",
    "rule" => "border-bottom:1pt solid #000000;margin-bottom:6pt",
    "body" => "font-size:10pt;margin-top:4pt",
};

impl Renderable<CoverLetterDocument> for CoverLetterTemplate {
    fn render(&self, doc: &CoverLetterDocument) -> Element {
        let body = doc
            .description
            .as_deref()
            .filter(|d| !is_semantically_empty(d));
        root("page")
            .maybe(body.map(|b| {
                section(TITLE, "heading", Some("rule"), El::new("div").class("body").rich(b))
            }))
            .build()
    }

    fn stylesheet(&self) -> Stylesheet {
        STYLESHEET
    }
}
