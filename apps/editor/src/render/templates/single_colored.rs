//! Single column under a coloured header band, with accent headings.

use crate::models::document::{ResumeDocument, SectionKind};
use crate::render::markup::{p, El};
use crate::render::style::{stylesheet, Stylesheet};
use crate::render::templates::{
    contact_line, description_section, entries_section, multiline, root, EntryStyle,
    EDUCATION_TITLE, PROJECTS_TITLE, WORK_TITLE,
};
use crate::render::view::ResumeView;
use crate::render::Renderable;
use crate::text::html::Element;

pub struct SingleColoredTemplate;

const STYLESHEET: Stylesheet = stylesheet! {
    "page" => "font-family:sans-serif;font-size:10pt;color:#1f2937",
    "band" => "background-color:#6d28d9;color:#ffffff;padding:14pt",
    "name" => "font-size:22pt;font-weight:bold",
    "contacts" => "font-size:9pt;color:#ede9fe;margin-top:4pt",
    "summary" => "font-size:9pt;color:#f5f3ff;margin-top:6pt",
    "section" => "margin-top:12pt",
    "heading" => "font-size:13pt;font-weight:bold;color:#6d28d9",
    "rule" => "border-bottom:1pt solid #c4b5fd;margin-bottom:4pt",
    "entry" => "margin-bottom:6pt",
    "row" => "display:flex;justify-content:space-between;margin-top:3pt",
    "title" => "font-weight:bold;font-size:11pt",
    "dates" => "font-size:9pt;color:#6d28d9",
    "sub-row" => "display:flex;justify-content:space-between;font-size:9pt;color:#4b5563",
    "aside" => "text-align:right",
    "note" => "font-size:9pt",
    "link" => "font-size:9pt;color:#6d28d9",
    "body" => "font-size:9pt;margin-top:3pt",
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

impl Renderable<ResumeDocument> for SingleColoredTemplate {
    fn render(&self, doc: &ResumeDocument) -> Element {
        let view = ResumeView::new(doc);

        let band = El::new("div")
            .class("band")
            .maybe(view.name.as_deref().map(|n| p("name", n)))
            .maybe(contact_line(&view.contacts, "contacts", "  •  "))
            .maybe(view.summary.map(|s| multiline("summary", s)));

        root("page")
            .child(band)
            .maybe(entries_section(WORK_TITLE, &view.work, "heading", RULE, &ENTRY))
            .maybe(entries_section(EDUCATION_TITLE, &view.education, "heading", RULE, &ENTRY))
            .maybe(entries_section(PROJECTS_TITLE, &view.projects, "heading", RULE, &ENTRY))
            .children(
                SectionKind::ALL
                    .into_iter()
                    .filter_map(|kind| description_section(&view, kind, "heading", RULE, "body")),
            )
            .build()
    }

    fn stylesheet(&self) -> Stylesheet {
        STYLESHEET
    }
}
