//! Display-ready projection of a résumé document.
//!
//! Templates only ever see this view: blank array entries (added then
//! abandoned) are gone, semantically empty rich text is gone, and dates are
//! already formatted. A template therefore cannot fail on sparse input.

use crate::models::dates::{date_range_label, EndDate, WireDate};
use crate::models::document::{
    non_empty, Education, PersonalInfo, Project, ResumeDocument, SectionKind, WorkExperience,
};
use crate::text::is_semantically_empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Location,
    Phone,
    Email,
    Linkedin,
    Github,
}

impl ContactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ContactKind::Location => "Location",
            ContactKind::Phone => "Phone",
            ContactKind::Email => "Email",
            ContactKind::Linkedin => "LinkedIn",
            ContactKind::Github => "GitHub",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub kind: ContactKind,
    pub value: String,
}

/// One work, education or project entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry<'a> {
    pub title: Option<&'a str>,
    pub dates: Option<String>,
    pub subtitle: Option<&'a str>,
    pub aside: Option<String>,
    /// Extra one-liner, e.g. "Score: 3.9".
    pub note: Option<String>,
    pub link: Option<&'a str>,
    pub body: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionBlock<'a> {
    pub kind: SectionKind,
    pub body: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeView<'a> {
    pub name: Option<String>,
    pub contacts: Vec<Contact>,
    pub summary: Option<&'a str>,
    pub work: Vec<Entry<'a>>,
    pub education: Vec<Entry<'a>>,
    pub projects: Vec<Entry<'a>>,
    pub sections: Vec<DescriptionBlock<'a>>,
}

impl<'a> ResumeView<'a> {
    pub fn new(doc: &'a ResumeDocument) -> Self {
        let info = doc.personal_info.as_ref();
        ResumeView {
            name: info.and_then(full_name),
            contacts: info.map(contacts).unwrap_or_default(),
            summary: info.and_then(|p| non_empty(&p.summary)),
            work: entries(&doc.work_experiences, work_entry),
            education: entries(&doc.education, education_entry),
            projects: entries(&doc.projects, project_entry),
            sections: SectionKind::ALL
                .into_iter()
                .filter_map(|kind| {
                    let body = doc.description_section(kind)?.description.as_deref()?;
                    (!is_semantically_empty(body)).then_some(DescriptionBlock { kind, body })
                })
                .collect(),
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&DescriptionBlock<'a>> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

fn full_name(info: &PersonalInfo) -> Option<String> {
    let parts: Vec<&str> = [non_empty(&info.firstname), non_empty(&info.lastname)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn place(city: &Option<String>, country: &Option<String>) -> Option<String> {
    match (non_empty(city), non_empty(country)) {
        (Some(c), Some(n)) => Some(format!("{c}, {n}")),
        (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
        (None, None) => None,
    }
}

fn contacts(info: &PersonalInfo) -> Vec<Contact> {
    let socials = info.socials.as_ref();
    [
        (ContactKind::Location, place(&info.city, &info.country)),
        (ContactKind::Phone, non_empty(&info.phone).map(str::to_string)),
        (ContactKind::Email, non_empty(&info.email).map(str::to_string)),
        (
            ContactKind::Linkedin,
            socials.and_then(|s| non_empty(&s.linkedin)).map(str::to_string),
        ),
        (
            ContactKind::Github,
            socials.and_then(|s| non_empty(&s.github)).map(str::to_string),
        ),
    ]
    .into_iter()
    .filter_map(|(kind, value)| value.map(|value| Contact { kind, value }))
    .collect()
}

fn entries<'a, T>(items: &'a Option<Vec<T>>, project: fn(&'a T) -> Entry<'a>) -> Vec<Entry<'a>> {
    items
        .iter()
        .flatten()
        .map(project)
        .filter(|e| *e != Entry::default())
        .collect()
}

fn rich(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !is_semantically_empty(s))
}

fn dates(start: Option<WireDate>, end: EndDate) -> Option<String> {
    date_range_label(start.map(|d| d.date()), end)
}

fn work_entry(item: &WorkExperience) -> Entry<'_> {
    Entry {
        title: non_empty(&item.name),
        dates: dates(item.start_date, item.end_date),
        subtitle: non_empty(&item.position),
        aside: place(&item.city, &item.country),
        note: None,
        link: None,
        body: rich(&item.description),
    }
}

fn education_entry(item: &Education) -> Entry<'_> {
    Entry {
        title: non_empty(&item.institution),
        dates: dates(item.start_date, item.end_date),
        subtitle: non_empty(&item.study_type),
        aside: non_empty(&item.area).map(str::to_string),
        note: non_empty(&item.score).map(|s| format!("Score: {s}")),
        link: None,
        body: rich(&item.courses),
    }
}

fn project_entry(item: &Project) -> Entry<'_> {
    Entry {
        title: non_empty(&item.title),
        dates: dates(item.start_date, item.end_date),
        subtitle: None,
        aside: None,
        note: None,
        link: non_empty(&item.link),
        body: rich(&item.description),
    }
}
