//! Two columns: identity and short sections on the left, experience on the right.

use crate::models::document::{ResumeDocument, SectionKind};
use crate::render::markup::{p, El};
use crate::render::style::{stylesheet, Stylesheet};
use crate::render::templates::{
    contact_list, description_section, entries_section, root, summary_section, EntryStyle,
    EDUCATION_TITLE, PROJECTS_TITLE, WORK_TITLE,
};
use crate::render::view::ResumeView;
use crate::render::Renderable;
use crate::text::html::Element;

pub struct DoubleColumnTemplate;

const STYLESHEET: Stylesheet = stylesheet! {
    "page" => "font-family:sans-serif;font-size:10pt;color:#111827",
    "columns" => "display:flex",
    "left" => "width:38%",
    "right" => "width:62%;padding-left:14pt",
    "name" => "font-size:20pt;font-weight:bold",
    "contacts" => "font-size:8.5pt;margin-top:6pt",
    "contact-label" => "font-weight:bold",
    "contact-value" => "color:#4b5563",
    "section" => "margin-top:12pt",
    "heading" => "font-size:12pt;font-weight:bold",
    "rule" => "border-bottom:0.75pt solid #111827;margin-bottom:4pt",
    "entry" => "margin-bottom:7pt",
    "row" => "margin-top:2pt",
    "title" => "font-weight:bold;font-size:10.5pt",
    "dates" => "font-size:8.5pt;color:#4b5563",
    "sub-row" => "font-size:9pt;color:#4b5563",
    "aside" => "font-size:9pt",
    "note" => "font-size:9pt",
    "link" => "font-size:9pt;color:#2563eb",
    "body" => "font-size:9pt;margin-top:2pt",
};

const ENTRY: EntryStyle = EntryStyle {
    entry: "entry",
    row: "row",
    title: "title",
    dates: "dates",
    sub_row: "sub-row",
    subtitle: "subtitle",
    aside: "aside",
    note: "note",
    link: "link",
    body: "body",
};

const RULE: Option<&str> = Some("rule");

const LEFT_SECTIONS: [SectionKind; 4] = [
    SectionKind::Skills,
    SectionKind::Languages,
    SectionKind::Volunteer,
    SectionKind::Interests,
];

const RIGHT_SECTIONS: [SectionKind; 2] = [SectionKind::Awards, SectionKind::References];

impl Renderable<ResumeDocument> for DoubleColumnTemplate {
    fn render(&self, doc: &ResumeDocument) -> Element {
        let view = ResumeView::new(doc);
        let short = |kinds: &[SectionKind]| -> Vec<El> {
            kinds
                .iter()
                .filter_map(|&kind| description_section(&view, kind, "heading", RULE, "body"))
                .collect()
        };

        let left = El::new("div")
            .class("left")
            .maybe(view.name.as_deref().map(|n| p("name", n)))
            .maybe(contact_list(&view.contacts, "contacts", "contact-label", "contact-value"))
            .maybe(summary_section(&view, "heading", RULE, "body"))
            .children(short(&LEFT_SECTIONS));

        let right = El::new("div")
            .class("right")
            .maybe(entries_section(WORK_TITLE, &view.work, "heading", RULE, &ENTRY))
            .maybe(entries_section(EDUCATION_TITLE, &view.education, "heading", RULE, &ENTRY))
            .maybe(entries_section(PROJECTS_TITLE, &view.projects, "heading", RULE, &ENTRY))
            .children(short(&RIGHT_SECTIONS));

        root("page")
            .child(El::new("div").class("columns").child(left).child(right))
            .build()
    }

    fn stylesheet(&self) -> Stylesheet {
        STYLESHEET
    }
}
