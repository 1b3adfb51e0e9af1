//! Entry categories, their field sets, and the composed `"{prefix}{id}"` form keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entries::EntryId;

/// The two repeatable sections of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Employment,
    Education,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Employment, Category::Education];

    /// Fields every entry of this category carries, in form order.
    pub fn fields(self) -> &'static [EntryField] {
        match self {
            Category::Employment => &[
                EntryField::Title,
                EntryField::Company,
                EntryField::Duration,
                EntryField::Responsibilities,
            ],
            Category::Education => &[
                EntryField::Degree,
                EntryField::Institution,
                EntryField::Year,
            ],
        }
    }

    /// The two fields that decide whether an entry is worth showing.
    pub fn identity_fields(self) -> [EntryField; 2] {
        match self {
            Category::Employment => [EntryField::Title, EntryField::Company],
            Category::Education => [EntryField::Degree, EntryField::Institution],
        }
    }

    /// Short tag carried by remove buttons (`data-type`).
    pub fn tag(self) -> &'static str {
        match self {
            Category::Employment => "work",
            Category::Education => "edu",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Employment => "employment",
            Category::Education => "education",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown entry category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "employment" | "work" => Ok(Category::Employment),
            "education" | "edu" => Ok(Category::Education),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// A single per-entry input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryField {
    Title,
    Company,
    Duration,
    Responsibilities,
    Degree,
    Institution,
    Year,
}

impl EntryField {
    /// Prefix of the composed form key.
    pub fn key_prefix(self) -> &'static str {
        match self {
            EntryField::Title => "jobTitle",
            EntryField::Company => "company",
            EntryField::Duration => "duration",
            EntryField::Responsibilities => "responsibilities",
            EntryField::Degree => "degree",
            EntryField::Institution => "institution",
            EntryField::Year => "eduYear",
        }
    }

    /// Human label used by the form projection.
    pub fn label(self) -> &'static str {
        match self {
            EntryField::Title => "Job Title:",
            EntryField::Company => "Company:",
            EntryField::Duration => "Duration (e.g., Jan 2020 - Present):",
            EntryField::Responsibilities => {
                "Key Responsibilities/Achievements (Use bullet points):"
            }
            EntryField::Degree => "Degree/Certification:",
            EntryField::Institution => "Institution Name:",
            EntryField::Year => "Graduation Year:",
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, EntryField::Responsibilities)
    }

    pub fn category(self) -> Category {
        match self {
            EntryField::Title
            | EntryField::Company
            | EntryField::Duration
            | EntryField::Responsibilities => Category::Employment,
            EntryField::Degree | EntryField::Institution | EntryField::Year => {
                Category::Education
            }
        }
    }
}

/// Builds the form key addressing `field` of entry `id`, e.g. `jobTitle3`.
pub fn compose_key(field: EntryField, id: EntryId) -> String {
    format!("{}{}", field.key_prefix(), id)
}

/// Splits a composed key back into its field and entry id.
///
/// Returns `None` for top-level keys, unknown prefixes, and suffixes that are
/// not a positive integer.
pub fn parse_key(key: &str) -> Option<(EntryField, EntryId)> {
    Category::ALL
        .iter()
        .flat_map(|c| c.fields().iter().copied())
        .find_map(|field| {
            let suffix = key.strip_prefix(field.key_prefix())?;
            if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            match suffix.parse::<u32>() {
                Ok(0) | Err(_) => None,
                Ok(n) => Some((field, EntryId(n))),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_key_uses_prefix_and_id() {
        assert_eq!(compose_key(EntryField::Title, EntryId(3)), "jobTitle3");
        assert_eq!(compose_key(EntryField::Year, EntryId(12)), "eduYear12");
    }

    #[test]
    fn test_parse_key_recovers_field_and_id() {
        assert_eq!(
            parse_key("responsibilities14"),
            Some((EntryField::Responsibilities, EntryId(14)))
        );
        assert_eq!(
            parse_key("institution2"),
            Some((EntryField::Institution, EntryId(2)))
        );
    }

    #[test]
    fn test_parse_key_rejects_top_level_and_malformed_keys() {
        assert_eq!(parse_key("fullName"), None);
        assert_eq!(parse_key("company"), None);
        assert_eq!(parse_key("company0"), None);
        assert_eq!(parse_key("company-1"), None);
        assert_eq!(parse_key("company+1"), None);
        assert_eq!(parse_key("company1a"), None);
    }

    #[test]
    fn test_category_from_str_accepts_tags() {
        assert_eq!("work".parse::<Category>().unwrap(), Category::Employment);
        assert_eq!("Education".parse::<Category>().unwrap(), Category::Education);
        assert!("skills".parse::<Category>().is_err());
    }

    #[test]
    fn test_every_field_belongs_to_its_category() {
        for category in Category::ALL {
            for field in category.fields() {
                assert_eq!(field.category(), category);
            }
        }
    }
}
