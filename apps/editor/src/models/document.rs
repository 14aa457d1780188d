//! The documents edited in one editor session.
//!
//! Wire format follows the stored résumé JSON: camelCase keys, except the
//! derived `description_text` projections which keep their snake_case name.

use serde::{Deserialize, Serialize};

use crate::models::dates::{EndDate, WireDate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_experiences: Option<Vec<WorkExperience>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<DescriptionSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<DescriptionSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer: Option<DescriptionSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<DescriptionSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awards: Option<DescriptionSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<DescriptionSection>,
}

impl ResumeDocument {
    /// The document a fresh editor starts from: empty personal info, nothing else.
    pub fn blank() -> Self {
        ResumeDocument {
            personal_info: Some(PersonalInfo::blank()),
            ..Default::default()
        }
    }

    pub fn description_section(&self, kind: SectionKind) -> Option<&DescriptionSection> {
        match kind {
            SectionKind::Skills => self.skills.as_ref(),
            SectionKind::Languages => self.languages.as_ref(),
            SectionKind::Volunteer => self.volunteer.as_ref(),
            SectionKind::Interests => self.interests.as_ref(),
            SectionKind::Awards => self.awards.as_ref(),
            SectionKind::References => self.references.as_ref(),
        }
    }

    pub fn description_section_mut(&mut self, kind: SectionKind) -> &mut Option<DescriptionSection> {
        match kind {
            SectionKind::Skills => &mut self.skills,
            SectionKind::Languages => &mut self.languages,
            SectionKind::Volunteer => &mut self.volunteer,
            SectionKind::Interests => &mut self.interests,
            SectionKind::Awards => &mut self.awards,
            SectionKind::References => &mut self.references,
        }
    }

    pub fn first_name(&self) -> Option<&str> {
        self.personal_info.as_ref().and_then(|p| non_empty(&p.firstname))
    }

    pub fn last_name(&self) -> Option<&str> {
        self.personal_info.as_ref().and_then(|p| non_empty(&p.lastname))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<Socials>,
}

impl PersonalInfo {
    pub fn blank() -> Self {
        let empty = || Some(String::new());
        PersonalInfo {
            firstname: empty(),
            lastname: empty(),
            email: empty(),
            phone: empty(),
            summary: empty(),
            city: empty(),
            country: empty(),
            socials: Some(Socials {
                linkedin: empty(),
                github: empty(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Socials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(
        default,
        with = "crate::models::dates::start_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<WireDate>,
    #[serde(default, skip_serializing_if = "EndDate::is_ongoing")]
    pub end_date: EndDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "description_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    /// Area / field of study.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_type: Option<String>,
    #[serde(
        default,
        with = "crate::models::dates::start_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<WireDate>,
    #[serde(default, skip_serializing_if = "EndDate::is_ongoing")]
    pub end_date: EndDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    /// Rich text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<String>,
    #[serde(
        default,
        rename = "description_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        with = "crate::models::dates::start_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<WireDate>,
    #[serde(default, skip_serializing_if = "EndDate::is_ongoing")]
    pub end_date: EndDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "description_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A single rich-text block with its derived plain-text projection.
///
/// Shared by the six generic résumé sections and by the cover letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_text: Option<String>,
}

/// The cover letter document is one description block.
pub type CoverLetterDocument = DescriptionSection;

/// The six structurally identical "description only" résumé sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Skills,
    Languages,
    Volunteer,
    Interests,
    Awards,
    References,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Skills,
        SectionKind::Languages,
        SectionKind::Volunteer,
        SectionKind::Interests,
        SectionKind::Awards,
        SectionKind::References,
    ];

    /// Heading printed by the templates.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Skills => "Skills",
            SectionKind::Languages => "Languages",
            SectionKind::Volunteer => "Volunteer Experience",
            SectionKind::Interests => "Interests",
            SectionKind::Awards => "Awards",
            SectionKind::References => "References",
        }
    }

    /// JSON key of the section inside the résumé document.
    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::Skills => "skills",
            SectionKind::Languages => "languages",
            SectionKind::Volunteer => "volunteer",
            SectionKind::Interests => "interests",
            SectionKind::Awards => "awards",
            SectionKind::References => "references",
        }
    }
}

/// Returns the string only when it is present and not blank.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
