//! # Email
//!
//! A lowercase email address. The domain part has no TLD requirement, so
//! `user@host` is accepted.
//!
//! `Email` does not special-case the empty string: it is simply invalid.
//! Callers that treat an empty input as "no email" must check for that
//! before constructing.

use serde::Serialize;

use crate::error::ValidationError;
use crate::pattern::EMAIL;

/// A validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if EMAIL.is_match(&raw) {
            Ok(Self(raw))
        } else {
            Err(ValidationError::InvalidEmail(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl_validating_deserialize!(Email);
