//! Per-session, per-category entry id allocation.

use std::collections::HashMap;

use crate::entries::fields::Category;
use crate::entries::EntryId;

/// Hands out entry ids that are never reused within a session.
///
/// Each category keeps its own running maximum. It starts at the number of
/// entries present when the session was opened (never below 1) and grows by
/// exactly one per allocation. Removing an entry never lowers it.
#[derive(Debug, Clone)]
pub struct EntryIdAllocator {
    highest: HashMap<Category, u32>,
}

impl EntryIdAllocator {
    /// `initial` is the count of entries each category starts with.
    pub fn new(initial: impl IntoIterator<Item = (Category, u32)>) -> Self {
        let mut highest: HashMap<Category, u32> =
            Category::ALL.iter().map(|&c| (c, 1)).collect();
        for (category, count) in initial {
            highest.insert(category, count.max(1));
        }
        Self { highest }
    }

    /// Allocates the next id for `category`, or `None` once the id space is
    /// used up. The counter never wraps, so an exhausted category stays
    /// exhausted.
    pub fn next(&mut self, category: Category) -> Option<EntryId> {
        let slot = self.highest.entry(category).or_insert(1);
        *slot = slot.checked_add(1)?;
        Some(EntryId(*slot))
    }
}
