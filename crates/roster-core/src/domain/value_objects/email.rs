//! Email value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::ValidateEmail;

/// Error type for email validation.
#[derive(Debug, Error)]
#[error("Invalid email address: {0}")]
pub struct EmailError(String);

/// An email address.
///
/// Addresses entering through [`Email::parse`] are checked, trimmed and
/// lowercased. Deserializing does not re-check: serialized forms are only
/// produced from values that were already accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses and normalizes an email address.
    pub fn parse(email: impl Into<String>) -> Result<Self, EmailError> {
        let email = normalize(&email.into());
        if email.is_empty() || !email.validate_email() {
            return Err(EmailError(email));
        }
        Ok(Self(email))
    }

    /// Wraps an address read back from the store or cache, unchanged.
    #[must_use]
    pub fn from_trusted(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// Returns the email as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Email {
    fn from(value: String) -> Self {
        Self::from_trusted(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
