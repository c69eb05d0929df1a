//! Public contact form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A message sent from the contact page. Also the body of `POST /contact`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// A required field is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} is required")]
pub struct MissingField(pub &'static str);

impl ContactMessage {
    /// Check required fields (everything but the phone number).
    pub fn validate(&self) -> Result<(), MissingField> {
        let required = [
            ("Name", &self.name),
            ("Email", &self.email),
            ("Subject", &self.subject),
            ("Message", &self.message),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((label, _)) => Err(MissingField(*label)),
            None => Ok(()),
        }
    }
}
