// Repeatable form entries: id allocation, ordered storage, and field collection.
// The store is the only source of truth for which entries reach the preview.

pub mod allocator;
pub mod collector;
pub mod fields;
pub mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use collector::collect_active;
pub use fields::{compose_key, parse_key, Category, EntryField};
pub use store::{Entry, EntryStore};

/// Identifier of an entry within its category. Assigned once by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u32);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
