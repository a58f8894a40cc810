//! # Document
//!
//! A Brazilian taxpayer identifier: CPF for individuals, CNPJ for companies.
//!
//! Both punctuated (`000.000.000-00`, `00.000.000/0000-00`) and digits-only
//! forms are accepted. The input is stored verbatim; no normalization and
//! no check-digit verification is performed.

use serde::Serialize;

use crate::error::ValidationError;
use crate::pattern::{CNPJ, CPF};

/// A validated taxpayer document, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Document {
    /// Individual taxpayer registry.
    Cpf(String),
    /// Corporate taxpayer registry.
    Cnpj(String),
}

impl Document {
    /// Classify and validate a raw document string.
    ///
    /// The CPF shape is tried first, then CNPJ. Anything else is rejected
    /// with [`ValidationError::InvalidDocument`].
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if CPF.is_match(&raw) {
            Ok(Self::Cpf(raw))
        } else if CNPJ.is_match(&raw) {
            Ok(Self::Cnpj(raw))
        } else {
            Err(ValidationError::InvalidDocument(raw))
        }
    }

    /// The document exactly as it was supplied.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cpf(raw) | Self::Cnpj(raw) => raw,
        }
    }

    /// `"CPF"` or `"CNPJ"`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Cpf(_) => "CPF",
            Self::Cnpj(_) => "CNPJ",
        }
    }

    pub fn is_cpf(&self) -> bool {
        matches!(self, Self::Cpf(_))
    }

    pub fn is_cnpj(&self) -> bool {
        matches!(self, Self::Cnpj(_))
    }

    /// Consume the document, returning the raw string.
    pub fn into_string(self) -> String {
        match self {
            Self::Cpf(raw) | Self::Cnpj(raw) => raw,
        }
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Document {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Document {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl_validating_deserialize!(Document);
