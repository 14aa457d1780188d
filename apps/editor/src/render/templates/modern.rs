//! Blue header band, full-width experience, remaining sections in two columns.

use crate::models::document::{ResumeDocument, SectionKind};
use crate::render::markup::{p, El};
use crate::render::style::{stylesheet, Stylesheet};
use crate::render::templates::{
    contact_line, description_section, entries_section, multiline, root, EntryStyle,
    EDUCATION_TITLE, PROJECTS_TITLE, WORK_TITLE,
};
use crate::render::view::{Entry, ResumeView};
use crate::render::Renderable;
use crate::text::html::Element;

pub struct ModernTemplate;

const STYLESHEET: Stylesheet = stylesheet! {
    "page" => "font-family:sans-serif;font-size:10pt;color:#111827",
    "band" => "background-color:#1d4ed8;color:#ffffff;padding:14pt",
    "name" => "font-size:24pt;font-weight:bold",
    "contacts" => "font-size:9pt;margin-top:4pt",
    "summary" => "font-size:9pt;color:#dbeafe;margin-top:6pt",
    "content" => "padding:10pt",
    "columns" => "display:flex",
    "col-left" => "width:50%;padding-right:8pt",
    "col-right" => "width:50%;padding-left:8pt",
    "section" => "margin-top:12pt",
    "heading" => "font-size:12pt;font-weight:bold;color:#1d4ed8",
    "rule" => "border-bottom:0.75pt solid #bfdbfe;margin-bottom:5pt",
    "entry" => "margin-bottom:7pt",
    "row" => "display:flex;justify-content:space-between",
    "title" => "font-weight:bold;font-size:10.5pt",
    "dates" => "font-size:8pt;color:#6b7280",
    "sub-row" => "font-size:9pt;color:#4b5563",
    "aside" => "font-size:8pt;color:#6b7280",
    "note" => "font-size:9pt",
    "link" => "font-size:9pt;color:#1d4ed8",
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

impl Renderable<ResumeDocument> for ModernTemplate {
    fn render(&self, doc: &ResumeDocument) -> Element {
        let view = ResumeView::new(doc);

        // Role leads, company follows.
        let work: Vec<Entry<'_>> = view
            .work
            .iter()
            .map(|e| Entry {
                title: e.subtitle.or(e.title),
                subtitle: e.subtitle.and(e.title),
                ..e.clone()
            })
            .collect();

        let band = El::new("div")
            .class("band")
            .maybe(view.name.as_deref().map(|n| p("name", n)))
            .maybe(contact_line(&view.contacts, "contacts", "   "))
            .maybe(view.summary.map(|s| multiline("summary", s)));

        let generic = |kind| description_section(&view, kind, "heading", RULE, "body");
        let left = El::new("div")
            .class("col-left")
            .maybe(entries_section(EDUCATION_TITLE, &view.education, "heading", RULE, &ENTRY))
            .maybe(generic(SectionKind::Skills))
            .maybe(generic(SectionKind::Languages))
            .maybe(generic(SectionKind::Awards));
        let right = El::new("div")
            .class("col-right")
            .maybe(entries_section(PROJECTS_TITLE, &view.projects, "heading", RULE, &ENTRY))
            .maybe(generic(SectionKind::Volunteer))
            .maybe(generic(SectionKind::Interests))
            .maybe(generic(SectionKind::References));

        let content = El::new("div")
            .class("content")
            .maybe(entries_section(WORK_TITLE, &work, "heading", RULE, &ENTRY))
            .child(El::new("div").class("columns").child(left).child(right));

        root("page").child(band).child(content).build()
    }

    fn stylesheet(&self) -> Stylesheet {
        STYLESHEET
    }
}
