// Headless form session: the model behind one user's form, the actions that
// mutate it, and the preview it last displayed.

pub mod form_view;
pub mod handlers;
pub mod registry;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::entries::{compose_key, parse_key, Category, Entry, EntryId, EntryStore};
use crate::models::form::{FormData, PersonalInfo, SKILLS};
use crate::preview::{build_draft, compose, render_html, Preview};

pub use registry::SessionRegistry;

/// The preview currently shown for a session. Export always reads this, never
/// a freshly composed one.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayedPreview {
    pub preview: Preview,
    pub html: String,
    pub export_enabled: bool,
    pub composed_at: DateTime<Utc>,
}

/// Outcome of applying a form submission to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormApplied {
    pub applied: usize,
    /// Keys that named a removed or unknown entry, or no field at all.
    pub ignored: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub employment: Vec<Entry>,
    pub education: Vec<Entry>,
    pub form: FormData,
    pub export_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    personal: PersonalInfo,
    skills: String,
    entries: EntryStore,
    displayed: Option<DisplayedPreview>,
}

impl Session {
    /// Opens a session with one empty entry per category (id 1 in each).
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            personal: PersonalInfo::default(),
            skills: String::new(),
            entries: EntryStore::default(),
            displayed: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn entries(&self) -> &EntryStore {
        &self.entries
    }

    pub fn add_entry(&mut self, category: Category) -> Option<EntryId> {
        self.entries.add(category).map(|e| e.id)
    }

    pub fn remove_entry(&mut self, category: Category, id: EntryId) -> bool {
        self.entries.remove(category, id)
    }

    /// Writes a form submission into the model.
    ///
    /// Top-level keys overwrite personal info and skills. Composed keys land in
    /// the matching active entry; keys for removed entries are dropped.
    pub fn apply_form(&mut self, form: &FormData) -> FormApplied {
        let mut outcome = FormApplied::default();
        for (key, value) in form.iter() {
            let stored = if key == SKILLS {
                self.skills = value.to_string();
                true
            } else if self.personal.apply(key, value) {
                true
            } else if let Some((field, id)) = parse_key(key) {
                self.entries.set_field(id, field, value.to_string())
            } else {
                false
            };

            if stored {
                outcome.applied += 1;
            } else {
                debug!(session = %self.id, key, "ignoring form key with no active target");
                outcome.ignored.push(key.to_string());
            }
        }
        outcome
    }

    /// Projects the model back to a flat form snapshot.
    pub fn form_data(&self) -> FormData {
        let mut form = FormData::new();
        self.personal.write_into(&mut form);
        form.insert(SKILLS, self.skills.clone());
        for category in Category::ALL {
            for entry in self.entries.list_active(category) {
                for &field in category.fields() {
                    form.insert(compose_key(field, entry.id), entry.raw(field));
                }
            }
        }
        form
    }

    /// Composes a preview from the model as it stands now and displays it.
    pub fn submit(&mut self, form: Option<&FormData>) -> &DisplayedPreview {
        if let Some(form) = form {
            self.apply_form(form);
        }
        let draft = build_draft(&self.entries, &self.form_data());
        let preview = compose(&draft);
        let displayed = DisplayedPreview {
            html: render_html(&preview),
            export_enabled: preview.has_content(),
            preview,
            composed_at: Utc::now(),
        };
        debug!(
            session = %self.id,
            export_enabled = displayed.export_enabled,
            jobs = draft.employment.len(),
            schools = draft.education.len(),
            "preview composed"
        );
        self.displayed.insert(displayed)
    }

    pub fn displayed(&self) -> Option<&DisplayedPreview> {
        self.displayed.as_ref()
    }

    /// Name offered for the exported file, read from the live full-name field.
    pub fn export_name(&self) -> &str {
        self.personal.full_name.trim()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            created_at: self.created_at,
            employment: self.entries.list_active(Category::Employment).to_vec(),
            education: self.entries.list_active(Category::Education).to_vec(),
            form: self.form_data(),
            export_enabled: self
                .displayed
                .as_ref()
                .map(|d| d.export_enabled)
                .unwrap_or(false),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryField;
    use crate::models::form::FULL_NAME;
    use crate::preview::model::PreviewBlock;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_apply_form_routes_keys() {
        let mut session = Session::new();
        let second = session.add_entry(Category::Employment).unwrap();
        let outcome = session.apply_form(&form(&[
            ("fullName", "Jane Doe"),
            ("skills", "Rust"),
            ("jobTitle2", "Engineer"),
            ("degree1", "BSc"),
            ("company9", "Nowhere"),
            ("favouriteColour", "green"),
        ]));

        assert_eq!(second, EntryId(2));
        assert_eq!(outcome.applied, 4);
        assert_eq!(outcome.ignored, vec!["company9", "favouriteColour"]);
        let data = session.form_data();
        assert_eq!(data.raw("fullName"), "Jane Doe");
        assert_eq!(data.raw("skills"), "Rust");
        let job = session.entries().get(Category::Employment, EntryId(2)).unwrap();
        assert_eq!(job.raw(EntryField::Title), "Engineer");
    }

    #[test]
    fn test_form_data_projects_only_active_entries() {
        let mut session = Session::new();
        session.add_entry(Category::Education);
        session.apply_form(&form(&[("degree1", "BSc"), ("degree2", "MSc")]));
        session.remove_entry(Category::Education, EntryId(1));

        let data = session.form_data();
        assert_eq!(data.raw("degree2"), "MSc");
        assert_eq!(data.raw("degree1"), "");
        assert!(data.iter().all(|(k, _)| k != "degree1"));
        assert_eq!(data.raw("jobTitle1"), "");
        assert!(data.iter().any(|(k, _)| k == "jobTitle1"));
    }

    #[test]
    fn test_submit_observes_state_at_submit_time() {
        let mut session = Session::new();
        session.submit(Some(&form(&[("company1", "Acme")])));
        let shown = session.displayed().unwrap().clone();

        session.remove_entry(Category::Employment, EntryId(1));
        assert_eq!(session.displayed().unwrap().html, shown.html);
        assert!(shown.export_enabled);

        let again = session.submit(None);
        assert!(!again.export_enabled);
    }

    #[test]
    fn test_submit_empty_form_disables_export() {
        let mut session = Session::new();
        let shown = session.submit(Some(&FormData::new()));
        assert!(!shown.export_enabled);
        assert!(shown.html.contains("Please enter your personal information"));
        assert!(!session.snapshot().export_enabled);
    }

    #[test]
    fn test_submit_keeps_store_order_after_interleaved_removals() {
        let mut session = Session::new();
        let b = session.add_entry(Category::Employment).unwrap();
        let c = session.add_entry(Category::Employment).unwrap();
        session.apply_form(&form(&[
            ("company1", "A"),
            (compose_key(EntryField::Company, b).as_str(), "B"),
            (compose_key(EntryField::Company, c).as_str(), "C"),
        ]));
        session.remove_entry(Category::Employment, b);
        let d = session.add_entry(Category::Employment).unwrap();
        session.apply_form(&form(&[(compose_key(EntryField::Company, d).as_str(), "D")]));

        let shown = session.submit(None);
        let jobs = match &shown.preview.document().unwrap().blocks[0] {
            PreviewBlock::Employment { jobs } => jobs.clone(),
            other => panic!("unexpected block {other:?}"),
        };
        let companies: Vec<_> = jobs.iter().map(|j| j.company.as_str()).collect();
        assert_eq!(companies, vec!["A", "C", "D"]);
        assert_eq!(d, EntryId(4));
    }

    #[test]
    fn test_export_name_trims_full_name() {
        let mut session = Session::new();
        session.apply_form(&form(&[(FULL_NAME, "  Jane Doe ")]));
        assert_eq!(session.export_name(), "Jane Doe");
    }
}
