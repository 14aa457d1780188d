//! Two columns with a dark sidebar carrying identity, education and skills.

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

pub struct ColoredTemplate;

const STYLESHEET: Stylesheet = stylesheet! {
    "page" => "font-family:sans-serif;font-size:10pt;color:#27272a",
    "columns" => "display:flex",
    "sidebar" => "width:34%;background-color:#27272a;color:#ffffff;padding:12pt",
    "main" => "width:66%;padding-left:16pt",
    "name" => "font-size:20pt;font-weight:bold",
    "contacts" => "font-size:8.5pt;margin-top:8pt",
    "contact-label" => "color:#a1a1aa",
    "contact-value" => "color:#ffffff",
    "section" => "margin-top:12pt",
    "side-heading" => "font-size:12pt;font-weight:bold",
    "side-rule" => "border-bottom:0.75pt solid #52525b;margin-bottom:4pt",
    "side-body" => "font-size:9pt;color:#d4d4d8",
    "heading" => "font-size:14pt;font-weight:bold;color:#27272a;margin-bottom:4pt",
    "entry" => "margin-bottom:8pt",
    "row" => "margin-top:2pt",
    "title" => "font-weight:bold;font-size:10.5pt",
    "dates" => "font-size:8.5pt;color:#71717a",
    "sub-row" => "font-size:9pt;color:#52525b",
    "aside" => "font-size:9pt",
    "note" => "font-size:9pt;color:#71717a",
    "link" => "font-size:9pt;color:#2563eb",
    "body" => "font-size:9pt;color:#52525b;margin-top:2pt",
    "side-entry" => "margin-bottom:6pt",
    "side-title" => "font-weight:bold;font-size:10pt",
    "side-dates" => "font-size:8.5pt;color:#a1a1aa",
    "side-sub" => "font-size:9pt;color:#d4d4d8",
};

const MAIN_ENTRY: EntryStyle = EntryStyle {
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

const SIDE_ENTRY: EntryStyle = EntryStyle {
    entry: "side-entry",
    row: "row",
    title: "side-title",
    dates: "side-dates",
    sub_row: "side-sub",
    subtitle: "subtitle",
    aside: "aside",
    note: "side-sub",
    link: "link",
    body: "side-body",
};

const SIDE_RULE: Option<&str> = Some("side-rule");

impl Renderable<ResumeDocument> for ColoredTemplate {
    fn render(&self, doc: &ResumeDocument) -> Element {
        let view = ResumeView::new(doc);

        let sidebar = El::new("div")
            .class("sidebar")
            .maybe(view.name.as_deref().map(|n| p("name", n)))
            .maybe(contact_list(&view.contacts, "contacts", "contact-label", "contact-value"))
            .maybe(summary_section(&view, "side-heading", SIDE_RULE, "side-body"))
            .maybe(entries_section(EDUCATION_TITLE, &view.education, "side-heading", SIDE_RULE, &SIDE_ENTRY))
            .maybe(description_section(&view, SectionKind::Skills, "side-heading", SIDE_RULE, "side-body"))
            .maybe(description_section(&view, SectionKind::Languages, "side-heading", SIDE_RULE, "side-body"));

        let main = El::new("div")
            .class("main")
            .maybe(entries_section(WORK_TITLE, &view.work, "heading", None, &MAIN_ENTRY))
            .maybe(entries_section(PROJECTS_TITLE, &view.projects, "heading", None, &MAIN_ENTRY))
            .children(
                [
                    SectionKind::Volunteer,
                    SectionKind::Interests,
                    SectionKind::Awards,
                    SectionKind::References,
                ]
                .into_iter()
                .filter_map(|kind| description_section(&view, kind, "heading", None, "body")),
            );

        root("page")
            .child(El::new("div").class("columns").child(sidebar).child(main))
            .build()
    }

    fn stylesheet(&self) -> Stylesheet {
        STYLESHEET
    }
}
