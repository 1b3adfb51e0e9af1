use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const FULL_NAME: &str = "fullName";
pub const SUMMARY: &str = "summary";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const LINKEDIN: &str = "linkedin";
pub const SKILLS: &str = "skills";

/// Flat `key -> raw value` snapshot of the form, as a browser form submission
/// would carry it. Entry inputs use composed keys such as `jobTitle3`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`; absent keys read as empty.
    pub fn raw(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value for `key`; absent keys read as empty.
    pub fn trimmed(&self, key: &str) -> &str {
        self.raw(key).trim()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The fixed, non-repeatable inputs at the top of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub full_name: String,
    pub summary: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
}

impl PersonalInfo {
    /// Stores `value` under the personal field named by `key`.
    /// Returns false, storing nothing, for any other key.
    pub fn apply(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            FULL_NAME => &mut self.full_name,
            SUMMARY => &mut self.summary,
            EMAIL => &mut self.email,
            PHONE => &mut self.phone,
            LINKEDIN => &mut self.linkedin,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }

    pub fn write_into(&self, form: &mut FormData) {
        form.insert(FULL_NAME, self.full_name.clone());
        form.insert(SUMMARY, self.summary.clone());
        form.insert(EMAIL, self.email.clone());
        form.insert(PHONE, self.phone.clone());
        form.insert(LINKEDIN, self.linkedin.clone());
    }
}
