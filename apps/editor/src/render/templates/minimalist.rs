//! Quiet serif layout: uppercase headings without rules, "Role at Company" lines.

use crate::models::document::{ResumeDocument, SectionKind};
use crate::render::markup::{p, El};
use crate::render::style::{stylesheet, Stylesheet};
use crate::render::templates::{
    contact_line, description_section, multiline, root, section, EDUCATION_TITLE,
    PROJECTS_TITLE, PROJECT_LINK_LABEL,
};
use crate::render::view::{Entry, ResumeView};
use crate::render::Renderable;
use crate::text::html::Element;

pub struct MinimalistTemplate;

const EXPERIENCE_TITLE: &str = "Experience";

const STYLESHEET: Stylesheet = stylesheet! {
    "page" => "font-family:serif;font-size:10pt;color:#111827",
    "header" => "text-align:center;padding-bottom:8pt;border-bottom:0.5pt solid #e5e7eb",
    "name" => "font-size:20pt",
    "contacts" => "font-size:8.5pt;color:#4b5563;margin-top:4pt",
    "summary" => "font-size:9pt;margin-top:6pt",
    "section" => "margin-top:12pt",
    "heading" => "font-size:10.5pt;text-transform:uppercase;margin-bottom:4pt",
    "entry" => "margin-bottom:6pt;font-size:9pt",
    "row" => "display:flex;justify-content:space-between",
    "lead" => "font-weight:bold",
    "dates" => "font-size:8pt;color:#6b7280",
    "meta" => "font-size:8pt;color:#6b7280;margin-top:1pt",
    "link" => "font-size:8pt;color:#4b5563;margin-top:1pt",
    "body" => "font-size:8.5pt;margin-top:2pt",
    "plain" => "font-size:9pt",
};

/// `Role at Company`, `Degree - Institution` or just the title.
fn lead_line(e: &Entry<'_>, joiner: &str) -> String {
    match (e.subtitle, e.title) {
        (Some(sub), Some(title)) => format!("{sub}{joiner}{title}"),
        (Some(one), None) | (None, Some(one)) => one.to_string(),
        (None, None) => String::new(),
    }
}

fn entry(e: &Entry<'_>, joiner: &str) -> El {
    El::new("div")
        .class("entry")
        .child(
            El::new("div")
                .class("row")
                .child(p("lead", lead_line(e, joiner)))
                .maybe(e.dates.as_deref().map(|d| p("dates", d))),
        )
        .maybe(e.aside.as_deref().map(|a| p("meta", a)))
        .maybe(e.note.as_deref().map(|n| p("meta", n)))
        .maybe(e.link.map(|href| {
            El::new("p")
                .class("link")
                .child(El::link(href, PROJECT_LINK_LABEL))
        }))
        .maybe(e.body.map(|b| El::new("div").class("body").rich(b)))
}

fn entries(title: &str, list: &[Entry<'_>], joiner: &str) -> Option<El> {
    (!list.is_empty()).then(|| {
        section(
            title,
            "heading",
            None,
            El::new("div").children(list.iter().map(|e| entry(e, joiner))),
        )
    })
}

impl Renderable<ResumeDocument> for MinimalistTemplate {
    fn render(&self, doc: &ResumeDocument) -> Element {
        let view = ResumeView::new(doc);

        let header = El::new("div")
            .class("header")
            .maybe(view.name.as_deref().map(|n| p("name", n)))
            .maybe(contact_line(&view.contacts, "contacts", "  ·  "))
            .maybe(view.summary.map(|s| multiline("summary", s)));

        root("page")
            .child(header)
            .maybe(entries(EXPERIENCE_TITLE, &view.work, " at "))
            .maybe(entries(EDUCATION_TITLE, &view.education, " - "))
            .maybe(entries(PROJECTS_TITLE, &view.projects, ""))
            .children(
                SectionKind::ALL
                    .into_iter()
                    .filter_map(|kind| description_section(&view, kind, "heading", None, "plain")),
            )
            .build()
    }

    fn stylesheet(&self) -> Stylesheet {
        STYLESHEET
    }
}
