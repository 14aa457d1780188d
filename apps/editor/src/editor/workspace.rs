//! The mounted Section Forms of one session, addressed by section name.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::forms::description::{CoverLetterSection, GenericSection};
use crate::forms::education::EducationSection;
use crate::forms::items::{ArrayItem, ItemId, ItemList};
use crate::forms::personal_info::PersonalInfoSection;
use crate::forms::projects::ProjectsSection;
use crate::forms::work_experience::WorkExperienceSection;
use crate::forms::{FieldError, Section, SectionForm};
use crate::models::document::{CoverLetterDocument, ResumeDocument, SectionKind};
use crate::render::{render_cover_letter, render_resume, RenderedPreview, TemplateKind};
use crate::store::FormStore;

/// Section path names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionName {
    PersonalInfo,
    WorkExperience,
    Education,
    Projects,
    Description(SectionKind),
    CoverLetter,
}

impl SectionName {
    pub fn parse(name: &str) -> Option<Self> {
        let section = match name {
            "personal-info" => SectionName::PersonalInfo,
            "work-experience" => SectionName::WorkExperience,
            "education" => SectionName::Education,
            "projects" => SectionName::Projects,
            "cover-letter" => SectionName::CoverLetter,
            other => SectionName::Description(SectionKind::ALL.into_iter().find(|k| k.key() == other)?),
        };
        Some(section)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::PersonalInfo => "personal-info",
            SectionName::WorkExperience => "work-experience",
            SectionName::Education => "education",
            SectionName::Projects => "projects",
            SectionName::Description(kind) => kind.key(),
            SectionName::CoverLetter => "cover-letter",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("section '{0}' is not part of the current document")]
    WrongMode(SectionName),

    #[error("section '{0}' has no items")]
    NotAnArray(SectionName),

    #[error("no item {0} in this section")]
    UnknownItem(ItemId),

    #[error("item {0} appears more than once")]
    DuplicateItem(ItemId),

    #[error("invalid section draft: {0}")]
    InvalidDraft(#[from] serde_json::Error),
}

/// A form's draft as the client sees it, plus its field errors.
#[derive(Debug, Clone, Serialize)]
pub struct SectionState {
    pub section: String,
    pub draft: Value,
    pub errors: Vec<FieldError>,
}

// ────────────────────────────────────────────────────────────────────────────
// Per-form helpers
// ────────────────────────────────────────────────────────────────────────────

fn state<S: Section>(name: SectionName, form: &SectionForm<S>) -> Result<SectionState, WorkspaceError> {
    Ok(SectionState {
        section: name.to_string(),
        draft: serde_json::to_value(form.draft())?,
        errors: form.errors().to_vec(),
    })
}

fn replace<S: Section>(form: &mut SectionForm<S>, value: Value) -> Result<Vec<FieldError>, WorkspaceError> {
    let draft: S::Draft = serde_json::from_value(value)?;
    form.replace(draft);
    Ok(form.errors().to_vec())
}

/// Array drafts may reorder or edit items but never mint identities: every
/// id must already belong to the form, and appear once.
fn replace_items<S, T>(form: &mut SectionForm<S>, value: Value) -> Result<Vec<FieldError>, WorkspaceError>
where
    S: Section<Draft = ItemList<T>>,
    T: ArrayItem,
{
    let mut draft: ItemList<T> = serde_json::from_value(value)?;
    let mut seen = HashSet::with_capacity(draft.items().len());
    for id in draft.items().iter().map(|item| item.id) {
        if form.draft().get(id).is_none() {
            return Err(WorkspaceError::UnknownItem(id));
        }
        if !seen.insert(id) {
            return Err(WorkspaceError::DuplicateItem(id));
        }
    }
    draft.set_expanded(form.draft().expanded());
    form.replace(draft);
    Ok(form.errors().to_vec())
}

/// Runs `$body` with `$form` bound to the named array form.
macro_rules! with_array_form {
    ($ws:expr, $name:expr, |$form:ident| $body:expr) => {
        match $name {
            SectionName::WorkExperience => {
                let $form = &mut $ws.work;
                $body
            }
            SectionName::Education => {
                let $form = &mut $ws.education;
                $body
            }
            SectionName::Projects => {
                let $form = &mut $ws.projects;
                $body
            }
            other => Err(WorkspaceError::NotAnArray(other)),
        }
    };
}

// ────────────────────────────────────────────────────────────────────────────
// Résumé workspace
// ────────────────────────────────────────────────────────────────────────────

pub struct ResumeWorkspace {
    store: FormStore<ResumeDocument>,
    personal_info: SectionForm<PersonalInfoSection>,
    work: SectionForm<WorkExperienceSection>,
    education: SectionForm<EducationSection>,
    projects: SectionForm<ProjectsSection>,
    /// One form per [`SectionKind`], in `SectionKind::ALL` order.
    descriptions: Vec<SectionForm<GenericSection>>,
}

impl ResumeWorkspace {
    pub fn mount(initial: ResumeDocument, debounce: Duration) -> Self {
        let store = FormStore::new(initial);
        ResumeWorkspace {
            personal_info: SectionForm::mount(PersonalInfoSection, store.clone(), debounce),
            work: SectionForm::mount(WorkExperienceSection, store.clone(), debounce),
            education: SectionForm::mount(EducationSection, store.clone(), debounce),
            projects: SectionForm::mount(ProjectsSection, store.clone(), debounce),
            descriptions: SectionKind::ALL
                .into_iter()
                .map(|kind| SectionForm::mount(GenericSection(kind), store.clone(), debounce))
                .collect(),
            store,
        }
    }

    pub fn store(&self) -> &FormStore<ResumeDocument> {
        &self.store
    }

    fn description(&mut self, kind: SectionKind) -> &mut SectionForm<GenericSection> {
        let index = SectionKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
        &mut self.descriptions[index]
    }

    pub fn section(&mut self, name: SectionName) -> Result<SectionState, WorkspaceError> {
        match name {
            SectionName::PersonalInfo => state(name, &self.personal_info),
            SectionName::WorkExperience => state(name, &self.work),
            SectionName::Education => state(name, &self.education),
            SectionName::Projects => state(name, &self.projects),
            SectionName::Description(kind) => state(name, self.description(kind)),
            SectionName::CoverLetter => Err(WorkspaceError::WrongMode(name)),
        }
    }

    pub fn replace(&mut self, name: SectionName, value: Value) -> Result<Vec<FieldError>, WorkspaceError> {
        match name {
            SectionName::PersonalInfo => replace(&mut self.personal_info, value),
            SectionName::Description(kind) => replace(self.description(kind), value),
            SectionName::CoverLetter => Err(WorkspaceError::WrongMode(name)),
            _ => with_array_form!(self, name, |form| replace_items(form, value)),
        }
    }

    pub fn append_item(&mut self, name: SectionName) -> Result<ItemId, WorkspaceError> {
        with_array_form!(self, name, |form| Ok(form.append_item()))
    }

    pub fn remove_item(&mut self, name: SectionName, id: ItemId) -> Result<(), WorkspaceError> {
        with_array_form!(self, name, |form| {
            if form.remove_item(id) {
                Ok(())
            } else {
                Err(WorkspaceError::UnknownItem(id))
            }
        })
    }

    pub fn set_current(&mut self, name: SectionName, id: ItemId, current: bool) -> Result<(), WorkspaceError> {
        with_array_form!(self, name, |form| {
            if form.set_current(id, current) {
                Ok(())
            } else {
                Err(WorkspaceError::UnknownItem(id))
            }
        })
    }

    pub fn set_expanded(&mut self, name: SectionName, id: Option<ItemId>) -> Result<(), WorkspaceError> {
        with_array_form!(self, name, |form| {
            if form.set_expanded(id) {
                Ok(())
            } else {
                Err(WorkspaceError::UnknownItem(id.unwrap_or_default()))
            }
        })
    }

    /// Commits every pending change now. Returns how many forms had one.
    pub fn flush(&mut self) -> usize {
        let fixed = [
            self.personal_info.flush(),
            self.work.flush(),
            self.education.flush(),
            self.projects.flush(),
        ];
        let descriptions: Vec<bool> = self.descriptions.iter_mut().map(|f| f.flush()).collect();
        fixed.into_iter().chain(descriptions).filter(|f| *f).count()
    }

    pub fn is_pending(&self) -> bool {
        self.personal_info.is_pending()
            || self.work.is_pending()
            || self.education.is_pending()
            || self.projects.is_pending()
            || self.descriptions.iter().any(|f| f.is_pending())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cover-letter workspace
// ────────────────────────────────────────────────────────────────────────────

pub struct CoverLetterWorkspace {
    store: FormStore<CoverLetterDocument>,
    letter: SectionForm<CoverLetterSection>,
}

impl CoverLetterWorkspace {
    pub fn mount(initial: CoverLetterDocument, debounce: Duration) -> Self {
        let store = FormStore::new(initial);
        CoverLetterWorkspace {
            letter: SectionForm::mount(CoverLetterSection, store.clone(), debounce),
            store,
        }
    }

    pub fn store(&self) -> &FormStore<CoverLetterDocument> {
        &self.store
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Either kind
// ────────────────────────────────────────────────────────────────────────────

/// Which document the session edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Resume,
    CoverLetter,
}

pub enum Workspace {
    Resume(ResumeWorkspace),
    CoverLetter(CoverLetterWorkspace),
}

impl Workspace {
    pub fn mode(&self) -> Mode {
        match self {
            Workspace::Resume(_) => Mode::Resume,
            Workspace::CoverLetter(_) => Mode::CoverLetter,
        }
    }

    pub fn document_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            Workspace::Resume(ws) => ws.store.read(|doc| serde_json::to_value(doc)),
            Workspace::CoverLetter(ws) => ws.store.read(|doc| serde_json::to_value(doc)),
        }
    }

    pub fn render(&self, template: TemplateKind) -> RenderedPreview {
        match self {
            Workspace::Resume(ws) => ws.store.read(|doc| render_resume(template, doc)),
            Workspace::CoverLetter(ws) => ws.store.read(|doc| render_cover_letter(doc)),
        }
    }

    pub fn section(&mut self, name: SectionName) -> Result<SectionState, WorkspaceError> {
        match (self, name) {
            (Workspace::Resume(ws), _) => ws.section(name),
            (Workspace::CoverLetter(ws), SectionName::CoverLetter) => state(name, &ws.letter),
            (Workspace::CoverLetter(_), _) => Err(WorkspaceError::WrongMode(name)),
        }
    }

    pub fn replace(&mut self, name: SectionName, value: Value) -> Result<Vec<FieldError>, WorkspaceError> {
        match (self, name) {
            (Workspace::Resume(ws), _) => ws.replace(name, value),
            (Workspace::CoverLetter(ws), SectionName::CoverLetter) => replace(&mut ws.letter, value),
            (Workspace::CoverLetter(_), _) => Err(WorkspaceError::WrongMode(name)),
        }
    }

    pub fn resume(&mut self, name: SectionName) -> Result<&mut ResumeWorkspace, WorkspaceError> {
        match self {
            Workspace::Resume(ws) => Ok(ws),
            Workspace::CoverLetter(_) => Err(WorkspaceError::WrongMode(name)),
        }
    }

    pub fn flush(&mut self) -> usize {
        match self {
            Workspace::Resume(ws) => ws.flush(),
            Workspace::CoverLetter(ws) => usize::from(ws.letter.flush()),
        }
    }

    pub fn is_pending(&self) -> bool {
        match self {
            Workspace::Resume(ws) => ws.is_pending(),
            Workspace::CoverLetter(ws) => ws.letter.is_pending(),
        }
    }
}
