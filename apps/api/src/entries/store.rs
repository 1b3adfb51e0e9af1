//! Ordered storage of the repeatable entries of every category.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::entries::allocator::EntryIdAllocator;
use crate::entries::fields::{Category, EntryField};
use crate::entries::EntryId;

/// One repeatable block (a job, a school). The id never changes once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub fields: BTreeMap<EntryField, String>,
}

impl Entry {
    fn empty(id: EntryId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Raw value of `field`, empty when it was never set.
    pub fn raw(&self, field: EntryField) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }
}

/// Holds every category's active entries in insertion order and owns the
/// allocator that numbers them.
///
/// This is the single source of truth for preview composition: whatever
/// `list_active` returns is exactly what gets collected.
#[derive(Debug, Clone)]
pub struct EntryStore {
    employment: Vec<Entry>,
    education: Vec<Entry>,
    allocator: EntryIdAllocator,
}

impl EntryStore {
    /// Opens a store with `initial` entries per category, numbered `1..=initial`.
    pub fn with_initial(initial: u32) -> Self {
        let seed = |n: u32| (1..=n).map(|i| Entry::empty(EntryId(i))).collect::<Vec<_>>();
        Self {
            employment: seed(initial),
            education: seed(initial),
            allocator: EntryIdAllocator::new(Category::ALL.map(|c| (c, initial))),
        }
    }

    fn entries(&self, category: Category) -> &Vec<Entry> {
        match category {
            Category::Employment => &self.employment,
            Category::Education => &self.education,
        }
    }

    fn entries_mut(&mut self, category: Category) -> &mut Vec<Entry> {
        match category {
            Category::Employment => &mut self.employment,
            Category::Education => &mut self.education,
        }
    }

    /// Appends a fresh, empty entry after the last one and returns it.
    /// `None` when the category has no ids left to hand out.
    pub fn add(&mut self, category: Category) -> Option<&Entry> {
        let Some(id) = self.allocator.next(category) else {
            warn!(%category, "entry ids exhausted, add refused");
            return None;
        };
        info!(%category, %id, "entry added");
        let entries = self.entries_mut(category);
        entries.push(Entry::empty(id));
        entries.last()
    }

    /// Removes the entry with `id`. Returns whether anything was removed;
    /// removing an absent entry is not an error.
    pub fn remove(&mut self, category: Category, id: EntryId) -> bool {
        let entries = self.entries_mut(category);
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if removed {
            info!(%category, %id, "entry removed");
        } else {
            debug!(%category, %id, "remove ignored, entry not present");
        }
        removed
    }

    /// Entries currently present, in insertion order.
    pub fn list_active(&self, category: Category) -> &[Entry] {
        self.entries(category)
    }

    pub fn get(&self, category: Category, id: EntryId) -> Option<&Entry> {
        self.entries(category).iter().find(|e| e.id == id)
    }

    /// Writes `value` into `field` of an active entry. Returns `false` when the
    /// entry is gone, in which case nothing is stored.
    pub fn set_field(&mut self, id: EntryId, field: EntryField, value: String) -> bool {
        let category = field.category();
        match self.entries_mut(category).iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.fields.insert(field, value);
                true
            }
            None => false,
        }
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::with_initial(1)
    }
}
