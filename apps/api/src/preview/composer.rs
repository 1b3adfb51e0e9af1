//! Preview composition: form snapshot → `ResumeDraft` → `Preview`.
//!
//! Composition is deterministic and pure. The draft is rebuilt from the store's
//! active lists on every submit, so removed entries can never leak in.
//!
//! # Block rules
//! - Header: when full name, summary, or email is set. Name is upper-cased,
//!   `FULL NAME` when empty. Contacts are only the items that are present,
//!   so separators never dangle.
//! - Summary: when the summary is set.
//! - Employment / Education: when at least one meaningful entry exists.
//! - Skills: when at least one non-empty comma-separated token exists.

use tracing::debug;
use url::Url;

use crate::entries::{collect_active, Category, EntryField, EntryStore};
use crate::models::form::{FormData, EMAIL, FULL_NAME, LINKEDIN, PHONE, SKILLS, SUMMARY};
use crate::preview::model::{
    Contact, EducationRecord, EmploymentRecord, JobItem, PersonalDetails, Preview, PreviewBlock,
    PreviewDocument, ResumeDraft, SchoolItem, SKILL_SEPARATOR,
};

pub const NAME_PLACEHOLDER: &str = "FULL NAME";
pub const TITLE_PLACEHOLDER: &str = "Job Title";
pub const COMPANY_PLACEHOLDER: &str = "Company";
pub const DEGREE_PLACEHOLDER: &str = "Degree";
pub const INSTITUTION_PLACEHOLDER: &str = "Institution";
pub const YEAR_PLACEHOLDER: &str = "Year";

pub const EMPTY_PREVIEW_MESSAGE: &str = "Please enter your personal information and at least one section (Work, Education, or Skills) to generate a preview.";

/// Normalizes a form snapshot into a draft, walking the store's active entries.
pub fn build_draft(store: &EntryStore, form: &FormData) -> ResumeDraft {
    let employment = collect_active(store, form, Category::Employment)
        .into_iter()
        .map(|e| EmploymentRecord {
            title: e.get(EntryField::Title).to_string(),
            company: e.get(EntryField::Company).to_string(),
            duration: e.get(EntryField::Duration).to_string(),
            responsibilities: split_responsibilities(e.get(EntryField::Responsibilities)),
        })
        .collect();

    let education = collect_active(store, form, Category::Education)
        .into_iter()
        .map(|e| EducationRecord {
            degree: e.get(EntryField::Degree).to_string(),
            institution: e.get(EntryField::Institution).to_string(),
            year: e.get(EntryField::Year).to_string(),
        })
        .collect();

    ResumeDraft {
        personal: PersonalDetails {
            full_name: form.trimmed(FULL_NAME).to_string(),
            email: form.trimmed(EMAIL).to_string(),
            phone: form.trimmed(PHONE).to_string(),
            linkedin: form.trimmed(LINKEDIN).to_string(),
        },
        summary: form.trimmed(SUMMARY).to_string(),
        employment,
        education,
        skills: split_skills(form.raw(SKILLS)),
    }
}

/// One bullet per non-blank line, trimmed.
pub fn split_responsibilities(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-separated tokens, trimmed, empties dropped.
pub fn split_skills(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves a LinkedIn value to an http(s) link target.
///
/// Scheme-less values (`linkedin.com/in/jane`) are read as https. Any other
/// scheme is refused so the value is shown as text instead of becoming a link.
pub fn linkedin_href(raw: &str) -> Option<String> {
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{raw}")).ok()?
        }
        Err(_) => return None,
    };
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Some(parsed.to_string()),
        _ => None,
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn header_block(personal: &PersonalDetails) -> PreviewBlock {
    let mut contacts = Vec::new();
    if !personal.email.is_empty() {
        contacts.push(Contact::Email {
            value: personal.email.clone(),
        });
    }
    if !personal.phone.is_empty() {
        contacts.push(Contact::Phone {
            value: personal.phone.clone(),
        });
    }
    if !personal.linkedin.is_empty() {
        let href = linkedin_href(&personal.linkedin);
        if href.is_none() {
            debug!("linkedin value is not an http(s) url, rendering as text");
        }
        contacts.push(Contact::LinkedIn {
            href,
            text: personal.linkedin.clone(),
        });
    }

    let name = if personal.full_name.is_empty() {
        NAME_PLACEHOLDER.to_string()
    } else {
        personal.full_name.to_uppercase()
    };

    PreviewBlock::Header { name, contacts }
}

/// Composes the preview for `draft`.
pub fn compose(draft: &ResumeDraft) -> Preview {
    let mut blocks = Vec::new();
    let mut has_content = false;

    let personal = &draft.personal;
    if !personal.full_name.is_empty() || !draft.summary.is_empty() || !personal.email.is_empty()
    {
        has_content = true;
        blocks.push(header_block(personal));
    }

    if !draft.summary.is_empty() {
        blocks.push(PreviewBlock::Summary {
            text: draft.summary.clone(),
        });
    }

    if !draft.employment.is_empty() {
        has_content = true;
        let jobs = draft
            .employment
            .iter()
            .map(|job| JobItem {
                title: or_placeholder(&job.title, TITLE_PLACEHOLDER),
                company: or_placeholder(&job.company, COMPANY_PLACEHOLDER),
                duration: job.duration.clone(),
                bullets: job.responsibilities.clone(),
            })
            .collect();
        blocks.push(PreviewBlock::Employment { jobs });
    }

    if !draft.education.is_empty() {
        has_content = true;
        let schools = draft
            .education
            .iter()
            .map(|edu| SchoolItem {
                degree: or_placeholder(&edu.degree, DEGREE_PLACEHOLDER),
                institution: or_placeholder(&edu.institution, INSTITUTION_PLACEHOLDER),
                year: or_placeholder(&edu.year, YEAR_PLACEHOLDER),
            })
            .collect();
        blocks.push(PreviewBlock::Education { schools });
    }

    if !draft.skills.is_empty() {
        has_content = true;
        blocks.push(PreviewBlock::Skills {
            items: draft.skills.clone(),
            line: draft.skills.join(SKILL_SEPARATOR),
        });
    }

    if has_content {
        Preview::Document(PreviewDocument { blocks })
    } else {
        Preview::Empty {
            message: EMPTY_PREVIEW_MESSAGE.to_string(),
        }
    }
}
