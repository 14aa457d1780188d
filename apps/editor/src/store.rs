//! Form state store: the one mutable document of an editor session.
//!
//! Backed by a `tokio::sync::watch` channel: writers mutate through
//! [`FormStore::update`] (read-modify-write under the channel's lock, so
//! back-to-back commits from different section forms never lose each other's
//! slice) and every subscriber is woken on every change. A store is owned by
//! exactly one session; clones share that session's document.

use std::sync::Arc;

use tokio::sync::watch;

pub struct FormStore<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for FormStore<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> FormStore<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current document.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Reads the current document without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replaces the whole document.
    pub fn set(&self, next: T) {
        self.tx.send_replace(next);
    }

    /// Functional update: `f` receives the latest document, never a stale copy.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Receiver that observes every change (used by the preview).
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{DescriptionSection, PersonalInfo, ResumeDocument};

    #[test]
    fn test_get_returns_initial() {
        let store = FormStore::new(ResumeDocument::blank());
        assert_eq!(store.get(), ResumeDocument::blank());
    }

    #[test]
    fn test_set_replaces() {
        let store = FormStore::new(ResumeDocument::blank());
        store.set(ResumeDocument::default());
        assert!(store.get().personal_info.is_none());
    }

    #[test]
    fn test_updates_to_different_slices_are_not_lost() {
        let store = FormStore::new(ResumeDocument::default());
        let a = store.clone();
        let b = store.clone();

        a.update(|doc| {
            doc.skills = Some(DescriptionSection {
                description: Some("<p>Rust</p>".into()),
                description_text: Some("Rust".into()),
            })
        });
        b.update(|doc| {
            doc.personal_info = Some(PersonalInfo {
                firstname: Some("Ada".into()),
                ..Default::default()
            })
        });

        let doc = store.get();
        assert!(doc.skills.is_some());
        assert_eq!(doc.first_name(), Some("Ada"));
    }

    #[test]
    fn test_update_sequence_equals_left_fold() {
        let store = FormStore::new(0_u32);
        let edits: Vec<Box<dyn Fn(&mut u32)>> = vec![
            Box::new(|n| *n += 3),
            Box::new(|n| *n *= 4),
            Box::new(|n| *n -= 2),
        ];
        let expected = edits.iter().fold(0_u32, |mut acc, edit| {
            edit(&mut acc);
            acc
        });
        for edit in &edits {
            store.update(|n| edit(n));
        }
        assert_eq!(store.get(), expected);
    }

    #[tokio::test]
    async fn test_subscribers_see_every_change() {
        let store = FormStore::new(ResumeDocument::blank());
        let mut rx = store.subscribe();
        store.update(|doc| doc.id = Some("r1".into()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().id.as_deref(), Some("r1"));
    }
}
