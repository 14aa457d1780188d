//! Ordered, identity-keyed item lists for the array sections.
//!
//! Every item gets a stable id when the form mounts (or when it is appended),
//! and all per-item UI state (which card is expanded, which item an error
//! belongs to) refers to that id, never to a position.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::models::dates::EndDate;

pub type ItemId = Uuid;

/// An array-section entry as the form holds it.
pub trait ArrayItem: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The empty-but-typed value appended by "+ Add": empty strings, no start
    /// date, end date explicitly ended.
    fn blank() -> Self;

    fn end_date_mut(&mut self) -> &mut EndDate;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyed<T> {
    pub id: ItemId,
    #[serde(flatten)]
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemList<T> {
    items: Vec<Keyed<T>>,
    #[serde(default)]
    expanded: Option<ItemId>,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            expanded: None,
        }
    }
}

impl<T: ArrayItem> ItemList<T> {
    /// Keys the seed values; ids are assigned here and only here.
    pub fn mount(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: values
                .into_iter()
                .map(|value| Keyed {
                    id: Uuid::new_v4(),
                    value,
                })
                .collect(),
            expanded: None,
        }
    }

    pub fn items(&self) -> &[Keyed<T>] {
        &self.items
    }

    /// Plain values in order, as written into the document.
    pub fn values(&self) -> Vec<T> {
        self.items.iter().map(|k| k.value.clone()).collect()
    }

    pub fn get(&self, id: ItemId) -> Option<&T> {
        self.items.iter().find(|k| k.id == id).map(|k| &k.value)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut T> {
        self.items.iter_mut().find(|k| k.id == id).map(|k| &mut k.value)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|k| k.id == id)
    }

    pub fn append_blank(&mut self) -> ItemId {
        let id = Uuid::new_v4();
        self.items.push(Keyed {
            id,
            value: T::blank(),
        });
        id
    }

    pub fn remove(&mut self, id: ItemId) -> Option<T> {
        let index = self.position(id)?;
        Some(self.remove_at(index))
    }

    /// # Panics
    /// When `index` is out of bounds, like `Vec::remove`.
    pub fn remove_at(&mut self, index: usize) -> T {
        let removed = self.items.remove(index);
        if self.expanded == Some(removed.id) {
            self.expanded = None;
        }
        removed.value
    }

    /// "Currently working/studying" checkbox: checked → ongoing, unchecked →
    /// ended with no date (the end-date picker becomes editable again).
    pub fn set_current(&mut self, id: ItemId, current: bool) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                *item.end_date_mut() = EndDate::from_currently_active(current);
                true
            }
            None => false,
        }
    }

    pub fn expanded(&self) -> Option<ItemId> {
        self.expanded
    }

    /// Opens one card (closing any other) or closes all with `None`.
    pub fn set_expanded(&mut self, id: Option<ItemId>) -> bool {
        match id {
            Some(id) if self.position(id).is_none() => false,
            _ => {
                self.expanded = id;
                true
            }
        }
    }

    pub(crate) fn map_values(&self, mut f: impl FnMut(ItemId, &T) -> T) -> Self {
        Self {
            items: self
                .items
                .iter()
                .map(|k| Keyed {
                    id: k.id,
                    value: f(k.id, &k.value),
                })
                .collect(),
            expanded: self.expanded,
        }
    }
}
