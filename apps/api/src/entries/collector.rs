//! Reads an entry's values out of a form snapshot by composed key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entries::fields::{compose_key, Category, EntryField};
use crate::entries::store::EntryStore;
use crate::entries::EntryId;
use crate::models::form::FormData;

/// Trimmed field values of one entry as seen at collection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedEntry {
    pub id: EntryId,
    pub category: Category,
    pub values: BTreeMap<EntryField, String>,
}

impl CollectedEntry {
    pub fn get(&self, field: EntryField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// True when at least one identity-bearing field is non-empty.
    pub fn is_meaningful(&self) -> bool {
        self.category
            .identity_fields()
            .iter()
            .any(|&f| !self.get(f).is_empty())
    }
}

/// Collects every expected field of entry `id`.
///
/// Missing keys (including those of an entry that no longer exists) read as
/// empty strings; this never fails.
pub fn collect(form: &FormData, category: Category, id: EntryId) -> CollectedEntry {
    let values = category
        .fields()
        .iter()
        .map(|&field| (field, form.trimmed(&compose_key(field, id)).to_string()))
        .collect();
    CollectedEntry {
        id,
        category,
        values,
    }
}

/// Collects the store's active entries of `category`, in store order, keeping
/// only the meaningful ones.
pub fn collect_active(
    store: &EntryStore,
    form: &FormData,
    category: Category,
) -> Vec<CollectedEntry> {
    store
        .list_active(category)
        .iter()
        .map(|entry| collect(form, category, entry.id))
        .filter(CollectedEntry::is_meaningful)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_trims_values() {
        let form: FormData = [("jobTitle1", "  Engineer "), ("company1", "Acme\n")]
            .into_iter()
            .collect();
        let entry = collect(&form, Category::Employment, EntryId(1));
        assert_eq!(entry.get(EntryField::Title), "Engineer");
        assert_eq!(entry.get(EntryField::Company), "Acme");
        assert_eq!(entry.get(EntryField::Duration), "");
        assert_eq!(entry.values.len(), 4);
    }

    #[test]
    fn test_collect_unknown_id_yields_empty_values() {
        let entry = collect(&FormData::new(), Category::Education, EntryId(42));
        assert!(entry.values.values().all(String::is_empty));
        assert!(!entry.is_meaningful());
    }

    #[test]
    fn test_meaningful_requires_identity_field() {
        let form: FormData = [("eduYear1", "2020")].into_iter().collect();
        assert!(!collect(&form, Category::Education, EntryId(1)).is_meaningful());

        let form: FormData = [("institution1", "MIT")].into_iter().collect();
        assert!(collect(&form, Category::Education, EntryId(1)).is_meaningful());
    }

    #[test]
    fn test_collect_active_skips_removed_entries_and_keeps_order() {
        let mut store = EntryStore::default();
        store.add(Category::Employment); // 2
        store.add(Category::Employment); // 3
        store.remove(Category::Employment, EntryId(2));

        let form: FormData = [
            ("company1", "First"),
            ("company2", "Removed"),
            ("company3", "Third"),
        ]
        .into_iter()
        .collect();

        let collected = collect_active(&store, &form, Category::Employment);
        let companies: Vec<&str> = collected
            .iter()
            .map(|e| e.get(EntryField::Company))
            .collect();
        assert_eq!(companies, vec!["First", "Third"]);
    }

    #[test]
    fn test_collect_active_drops_blank_entries() {
        let mut store = EntryStore::default();
        store.add(Category::Employment);
        let form: FormData = [("jobTitle2", "Dev"), ("duration1", "2019")]
            .into_iter()
            .collect();
        let collected = collect_active(&store, &form, Category::Employment);
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].id, EntryId(2));
    }
}
