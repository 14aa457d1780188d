//! The résumé templates and the blocks they share.
//!
//! Shared builders take class names so that each template keeps full control
//! of its look through its own stylesheet.

pub mod colored;
pub mod cover_letter;
pub mod double;
pub mod minimalist;
pub mod modern;
pub mod single;
pub mod single_colored;

use crate::models::document::SectionKind;
use crate::render::markup::{hr, p, El};
use crate::render::view::{Contact, DescriptionBlock, Entry, ResumeView};
use crate::render::PREVIEW_ROOT_ID;

pub(crate) const WORK_TITLE: &str = "Work Experience";
pub(crate) const EDUCATION_TITLE: &str = "Education";
pub(crate) const PROJECTS_TITLE: &str = "Projects";
pub(crate) const SUMMARY_TITLE: &str = "Summary";
pub(crate) const PROJECT_LINK_LABEL: &str = "View Project";

pub(crate) fn root(class: &str) -> El {
    El::new("div").id(PREVIEW_ROOT_ID).class(class)
}

/// Class names for one entry block.
pub(crate) struct EntryStyle {
    pub entry: &'static str,
    pub row: &'static str,
    pub title: &'static str,
    pub dates: &'static str,
    pub sub_row: &'static str,
    pub subtitle: &'static str,
    pub aside: &'static str,
    pub note: &'static str,
    pub link: &'static str,
    pub body: &'static str,
}

/// Title and dates on one row, subtitle and aside on the next, then the
/// optional note, link and rich-text body.
pub(crate) fn entry(e: &Entry<'_>, s: &EntryStyle) -> El {
    let head = (e.title.is_some() || e.dates.is_some()).then(|| {
        El::new("div")
            .class(s.row)
            .child(p(s.title, e.title.unwrap_or_default()))
            .maybe(e.dates.as_deref().map(|d| p(s.dates, d)))
    });
    let sub = (e.subtitle.is_some() || e.aside.is_some()).then(|| {
        El::new("div")
            .class(s.sub_row)
            .child(p(s.subtitle, e.subtitle.unwrap_or_default()))
            .maybe(e.aside.as_deref().map(|a| p(s.aside, a)))
    });

    El::new("div")
        .class(s.entry)
        .maybe(head)
        .maybe(sub)
        .maybe(e.note.as_deref().map(|n| p(s.note, n)))
        .maybe(e.link.map(|href| {
            El::new("p")
                .class(s.link)
                .child(El::link(href, PROJECT_LINK_LABEL))
        }))
        .maybe(e.body.map(|body| El::new("div").class(s.body).rich(body)))
}

/// Heading, optional rule, then `content`.
pub(crate) fn section(title: &str, heading: &str, rule: Option<&str>, content: El) -> El {
    El::new("div")
        .class("section")
        .child(p(heading, title))
        .maybe(rule.map(hr))
        .child(content)
}

/// An entries section, or nothing when `entries` is empty.
pub(crate) fn entries_section(
    title: &str,
    entries: &[Entry<'_>],
    heading: &str,
    rule: Option<&str>,
    style: &EntryStyle,
) -> Option<El> {
    if entries.is_empty() {
        return None;
    }
    let list = El::new("div").children(entries.iter().map(|e| entry(e, style)));
    Some(section(title, heading, rule, list))
}

/// One of the six description sections, or nothing when it is empty.
pub(crate) fn description_section(
    view: &ResumeView<'_>,
    kind: SectionKind,
    heading: &str,
    rule: Option<&str>,
    body: &str,
) -> Option<El> {
    view.section(kind).map(|block: &DescriptionBlock<'_>| {
        section(kind.title(), heading, rule, El::new("div").class(body).rich(block.body))
    })
}

pub(crate) fn summary_section(view: &ResumeView<'_>, heading: &str, rule: Option<&str>, body: &str) -> Option<El> {
    view.summary
        .map(|s| section(SUMMARY_TITLE, heading, rule, multiline(body, s)))
}

/// Plain text that keeps its line breaks (one paragraph per line).
pub(crate) fn multiline(class: &str, text: &str) -> El {
    El::new("div")
        .class(class)
        .children(text.lines().filter(|l| !l.trim().is_empty()).map(|l| El::new("p").text(l)))
}

/// Contacts joined on one line, e.g. `London | 555 | ada@example.com`.
pub(crate) fn contact_line(contacts: &[Contact], class: &str, separator: &str) -> Option<El> {
    if contacts.is_empty() {
        return None;
    }
    let joined = contacts
        .iter()
        .map(|c| c.value.as_str())
        .collect::<Vec<_>>()
        .join(separator);
    Some(p(class, joined))
}

/// One contact per line, labelled.
pub(crate) fn contact_list(contacts: &[Contact], class: &str, label: &str, value: &str) -> Option<El> {
    if contacts.is_empty() {
        return None;
    }
    Some(El::new("div").class(class).children(contacts.iter().map(|c| {
        El::new("p")
            .child(El::new("span").class(label).text(format!("{}: ", c.kind.label())))
            .child(El::new("span").class(value).text(c.value.clone()))
    })))
}
