//! Normalized draft input and the structured preview produced from it.

use serde::{Deserialize, Serialize};

/// Personal details after trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    pub title: String,
    pub company: String,
    pub duration: String,
    /// Non-blank responsibility lines, already trimmed.
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

/// Everything the composer needs, derived fresh on every submit and never stored
/// beyond the preview it produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDraft {
    pub personal: PersonalDetails,
    pub summary: String,
    /// Meaningful entries only, in the store's current order.
    pub employment: Vec<EmploymentRecord>,
    pub education: Vec<EducationRecord>,
    /// Trimmed, non-empty skill tokens.
    pub skills: Vec<String>,
}

/// One item of the header's contact line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Contact {
    Email { value: String },
    Phone { value: String },
    /// `href` is set only for a usable http(s) target; otherwise the raw text is shown.
    LinkedIn { href: Option<String>, text: String },
}

impl Contact {
    /// Plain-text rendering, as the item reads on the page.
    pub fn display_text(&self) -> String {
        match self {
            Contact::Email { value } => format!("Email: {value}"),
            Contact::Phone { value } => format!("Phone: {value}"),
            Contact::LinkedIn { href: Some(_), .. } => "LinkedIn".to_string(),
            Contact::LinkedIn { href: None, text } => format!("LinkedIn: {text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobItem {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolItem {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

/// A section of the composed preview. Texts already carry placeholder fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum PreviewBlock {
    Header { name: String, contacts: Vec<Contact> },
    Summary { text: String },
    Employment { jobs: Vec<JobItem> },
    Education { schools: Vec<SchoolItem> },
    Skills { items: Vec<String>, line: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewDocument {
    pub blocks: Vec<PreviewBlock>,
}

#[cfg(test)]
impl PreviewDocument {
    pub fn header(&self) -> Option<(&str, &[Contact])> {
        self.blocks.iter().find_map(|b| match b {
            PreviewBlock::Header { name, contacts } => Some((name.as_str(), contacts.as_slice())),
            _ => None,
        })
    }

    /// The header's contact items joined with `" | "`.
    pub fn contact_line(&self) -> Option<String> {
        self.header().map(|(_, contacts)| {
            contacts
                .iter()
                .map(Contact::display_text)
                .collect::<Vec<_>>()
                .join(CONTACT_SEPARATOR)
        })
    }

    pub fn skills_line(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            PreviewBlock::Skills { line, .. } => Some(line.as_str()),
            _ => None,
        })
    }
}

pub const CONTACT_SEPARATOR: &str = " | ";
pub const SKILL_SEPARATOR: &str = " • ";

/// Result of a submit: either a document or the guidance shown instead of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preview {
    Document(PreviewDocument),
    Empty { message: String },
}

impl Preview {
    /// Whether the export control is shown.
    pub fn has_content(&self) -> bool {
        matches!(self, Preview::Document(_))
    }

    #[cfg(test)]
    pub fn document(&self) -> Option<&PreviewDocument> {
        match self {
            Preview::Document(doc) => Some(doc),
            Preview::Empty { .. } => None,
        }
    }
}
