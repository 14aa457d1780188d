//! Classic single column: centred header, ruled section headings.

use crate::models::document::{ResumeDocument, SectionKind};
use crate::render::markup::{p, El};
use crate::render::style::{stylesheet, Stylesheet};
use crate::render::templates::{
    contact_line, description_section, entries_section, root, summary_section, EntryStyle,
    EDUCATION_TITLE, PROJECTS_TITLE, WORK_TITLE,
};
use crate::render::view::ResumeView;
use crate::render::Renderable;
use crate::text::html::Element;

pub struct SingleColumnTemplate;

const STYLESHEET: Stylesheet = stylesheet! {
    "page" => "font-family:sans-serif;font-size:10pt;color:#000000",
    "header" => "text-align:center;margin-bottom:6pt",
    "name" => "font-size:22pt;font-weight:bold",
    "contacts" => "font-size:9pt;color:#4b5563;margin-top:4pt",
    "section" => "margin-top:14pt",
    "heading" => "font-size:13pt;font-weight:bold",
    "rule" => "border-bottom:1pt solid #000000;margin-bottom:4pt",
    "entry" => "margin-bottom:6pt",
    "row" => "display:flex;justify-content:space-between;margin-top:3pt",
    "title" => "font-weight:bold;font-size:11pt",
    "dates" => "font-size:9pt",
    "sub-row" => "display:flex;justify-content:space-between;font-style:italic;font-size:9pt",
    "aside" => "text-align:right",
    "note" => "font-size:9pt",
    "link" => "font-size:9pt;color:#2563eb",
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

impl Renderable<ResumeDocument> for SingleColumnTemplate {
    fn render(&self, doc: &ResumeDocument) -> Element {
        let view = ResumeView::new(doc);

        let header = El::new("div")
            .class("header")
            .maybe(view.name.as_deref().map(|n| p("name", n)))
            .maybe(contact_line(&view.contacts, "contacts", "  |  "));

        root("page")
            .child(header)
            .maybe(summary_section(&view, "heading", RULE, "body"))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dates::EndDate;
    use crate::models::document::WorkExperience;
    use crate::text::html::element_to_html;
    use chrono::NaiveDate;

    #[test]
    fn test_single_work_experience_shows_present() {
        let doc = ResumeDocument {
            work_experiences: Some(vec![WorkExperience {
                name: Some("Acme".into()),
                position: Some("Engineer".into()),
                start_date: NaiveDate::from_ymd_opt(2020, 1, 1).map(Into::into),
                end_date: EndDate::Ongoing,
                ..Default::default()
            }]),
            ..Default::default()
        };
        let html = element_to_html(&SingleColumnTemplate.render(&doc));
        assert_eq!(html.matches(r#"class="entry""#).count(), 1);
        assert!(html.contains("01/2020 - Present"));
        assert!(html.contains("Work Experience"));
    }
}
