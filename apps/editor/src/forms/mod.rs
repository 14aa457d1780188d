//! Section Forms: per-section edit state with validation and debounced commits.
//!
//! A form is seeded once from the store when it mounts and never re-reads it.
//! Each change revalidates the whole draft, reverts invalid fields to their
//! last valid value and schedules a commit of the settled slice. Commits go
//! through [`FormStore::update`], so a form only ever overwrites its own slice.

pub mod debounce;
pub mod description;
pub mod education;
pub mod items;
pub mod personal_info;
pub mod projects;
pub mod work_experience;

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::dates::{EndDate, WireDate};
use crate::store::FormStore;
use crate::text::extract_plain_text;

use self::debounce::Debouncer;
use self::items::{ArrayItem, ItemId, ItemList};

pub const END_BEFORE_START: &str = "End date cannot be before the start date";

/// A per-field validation failure. `item` is set for array-section entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemId>,
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            item: None,
            field,
            message: message.into(),
        }
    }

    pub fn for_item(item: ItemId, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            item: Some(item),
            ..Self::new(field, message)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section contract
// ────────────────────────────────────────────────────────────────────────────

/// One editable slice of a document.
pub trait Section: Send + Sync + 'static {
    type Doc: Clone + Send + Sync + 'static;
    type Draft: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Form title, used in logs.
    fn name(&self) -> &'static str;

    /// Initial draft, read from the document at mount.
    fn mount(&self, doc: &Self::Doc) -> Self::Draft;

    fn validate(&self, _draft: &Self::Draft) -> Vec<FieldError> {
        Vec::new()
    }

    /// The value to commit: `draft` with every field named in `errors` taken
    /// from `last_valid`, and derived plain-text projections recomputed.
    fn settle(&self, draft: &Self::Draft, last_valid: &Self::Draft, errors: &[FieldError]) -> Self::Draft;

    /// Writes the settled slice into the document, leaving other slices alone.
    fn commit(&self, doc: &mut Self::Doc, settled: Self::Draft);
}

// ────────────────────────────────────────────────────────────────────────────
// Mounted form
// ────────────────────────────────────────────────────────────────────────────

pub struct SectionForm<S: Section> {
    section: Arc<S>,
    store: FormStore<S::Doc>,
    draft: S::Draft,
    last_valid: S::Draft,
    errors: Vec<FieldError>,
    debouncer: Debouncer,
}

impl<S: Section> SectionForm<S> {
    pub fn mount(section: S, store: FormStore<S::Doc>, debounce: Duration) -> Self {
        let draft = store.read(|doc| section.mount(doc));
        let errors = section.validate(&draft);
        Self {
            section: Arc::new(section),
            store,
            last_valid: draft.clone(),
            draft,
            errors,
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn draft(&self) -> &S::Draft {
        &self.draft
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn edit<R>(&mut self, f: impl FnOnce(&mut S::Draft) -> R) -> R {
        let out = f(&mut self.draft);
        self.changed();
        out
    }

    pub fn replace(&mut self, draft: S::Draft) {
        self.draft = draft;
        self.changed();
    }

    /// Commits the pending change now instead of waiting for the window.
    pub fn flush(&mut self) -> bool {
        self.debouncer.flush()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn changed(&mut self) {
        self.errors = self.section.validate(&self.draft);
        let settled = self
            .section
            .settle(&self.draft, &self.last_valid, &self.errors);
        self.last_valid = settled.clone();

        let section = Arc::clone(&self.section);
        let store = self.store.clone();
        self.debouncer.schedule(move || {
            debug!(section = section.name(), "Committing settled section");
            store.update(|doc| section.commit(doc, settled));
        });
    }
}

impl<S, T> SectionForm<S>
where
    S: Section<Draft = ItemList<T>>,
    T: ArrayItem,
{
    pub fn append_item(&mut self) -> ItemId {
        self.edit(|list| list.append_blank())
    }

    pub fn remove_item(&mut self, id: ItemId) -> bool {
        if self.draft.get(id).is_none() {
            return false;
        }
        self.edit(|list| list.remove(id).is_some())
    }

    pub fn set_current(&mut self, id: ItemId, current: bool) -> bool {
        if self.draft.get(id).is_none() {
            return false;
        }
        self.edit(|list| list.set_current(id, current))
    }

    /// UI-only state; not committed.
    pub fn set_expanded(&mut self, id: Option<ItemId>) -> bool {
        self.draft.set_expanded(id)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared helpers for the array sections
// ────────────────────────────────────────────────────────────────────────────

/// Start ≤ end, checked only when both dates are present. Reported on `endDate`.
pub(crate) fn check_date_order(id: ItemId, start: Option<WireDate>, end: EndDate) -> Option<FieldError> {
    match (start.map(|d| d.date()), end.date()) {
        (Some(s), Some(e)) if s > e => Some(FieldError::for_item(id, "endDate", END_BEFORE_START)),
        _ => None,
    }
}

/// Rebuilds `draft` with each errored field copied from the item's last valid
/// state, or from the blank item when it has none yet.
pub(crate) fn settle_items<T: ArrayItem>(
    draft: &ItemList<T>,
    last_valid: &ItemList<T>,
    errors: &[FieldError],
    revert: impl Fn(&mut T, &T, &str),
    project: impl Fn(&mut T),
) -> ItemList<T> {
    let blank = T::blank();
    draft.map_values(|id, value| {
        let mut settled = value.clone();
        let fallback = last_valid.get(id).unwrap_or(&blank);
        for error in errors.iter().filter(|e| e.item == Some(id)) {
            revert(&mut settled, fallback, error.field);
        }
        project(&mut settled);
        settled
    })
}

/// `description_text` is derived from `description` and nothing else.
pub(crate) fn project_plain_text(rich: &Option<String>) -> Option<String> {
    rich.as_deref().map(extract_plain_text)
}
