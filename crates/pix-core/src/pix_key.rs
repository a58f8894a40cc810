//! # PIX Keys
//!
//! A PIX key routes an instant payment to a bank account. Every key is one of
//! five closed types, and each type owns a format rule:
//!
//! | Type     | Accepted shape |
//! |----------|----------------|
//! | `Cnpj`   | same as a CNPJ [`Document`](crate::Document) |
//! | `Cpf`    | same as a CPF [`Document`](crate::Document) |
//! | `Email`  | same as [`Email`](crate::Email), checked independently |
//! | `Phone`  | optional `+55`, two-digit area code, nine digits starting with `9` |
//! | `Random` | lowercase UUID-shaped token |
//!
//! On top of the type rule, every key value must be non-empty and at most
//! [`MAX_KEY_LENGTH`] characters.

use serde::{Deserialize, Serialize};

use crate::error::{PixKeyViolation, ValidationError};
use crate::pattern::{StaticPattern, CNPJ, CPF, EMAIL, PHONE, RANDOM};

/// Maximum length of a key value, in characters.
pub const MAX_KEY_LENGTH: usize = 140;

// ─── Key Type ────────────────────────────────────────────────────────

/// Classification of a PIX key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixKeyType {
    Cnpj,
    Cpf,
    Email,
    Phone,
    Random,
}

impl PixKeyType {
    /// All key types, in canonical order.
    pub const ALL: [PixKeyType; 5] = [
        Self::Cnpj,
        Self::Cpf,
        Self::Email,
        Self::Phone,
        Self::Random,
    ];

    /// Resolve a type name, ignoring case. Returns `None` for unknown names.
    ///
    /// The input is lowercased but not trimmed: `" cpf"` is unknown.
    pub fn parse(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase();
        Self::ALL.into_iter().find(|ty| ty.as_str() == lowered)
    }

    /// Canonical display name: `"Cnpj"`, `"Cpf"`, `"Email"`, `"Phone"`, `"Random"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cnpj => "Cnpj",
            Self::Cpf => "Cpf",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Random => "Random",
        }
    }

    /// Lowercase storage token, as accepted by [`PixKeyType::parse`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cnpj => "cnpj",
            Self::Cpf => "cpf",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Random => "random",
        }
    }

    fn pattern(&self) -> &'static StaticPattern {
        match self {
            Self::Cnpj => &CNPJ,
            Self::Cpf => &CPF,
            Self::Email => &EMAIL,
            Self::Phone => &PHONE,
            Self::Random => &RANDOM,
        }
    }

    /// Check `key` against this type's format rule.
    pub fn validate(&self, key: &str) -> Result<(), ValidationError> {
        if self.pattern().is_match(key) {
            Ok(())
        } else {
            Err(ValidationError::InvalidKeyFormat { key_type: *self })
        }
    }
}

impl std::fmt::Display for PixKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PixKeyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::InvalidKeyType(s.to_string()))
    }
}

impl Serialize for PixKeyType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PixKeyType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Key ─────────────────────────────────────────────────────────────

/// A key value bound to its type. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPixKey")]
pub struct PixKey {
    value: String,
    #[serde(rename = "type")]
    key_type: PixKeyType,
}

impl PixKey {
    /// Build a key from a raw value and a type name.
    ///
    /// Checks run in order: type name, non-empty, length, format. The type
    /// name failure is [`ValidationError::InvalidKeyType`]; every value
    /// failure is [`ValidationError::InvalidPixKey`] carrying the rule.
    pub fn new(value: impl Into<String>, type_name: &str) -> Result<Self, ValidationError> {
        let key_type: PixKeyType = type_name.parse()?;
        Self::with_type(value, key_type)
    }

    /// Build a key for an already-resolved type.
    pub fn with_type(value: impl Into<String>, key_type: PixKeyType) -> Result<Self, ValidationError> {
        let value = value.into();
        let violation = if value.is_empty() {
            Some(PixKeyViolation::Empty)
        } else {
            let length = value.chars().count();
            if length > MAX_KEY_LENGTH {
                Some(PixKeyViolation::TooLong { length })
            } else if key_type.validate(&value).is_err() {
                Some(PixKeyViolation::Format(key_type))
            } else {
                None
            }
        };

        match violation {
            Some(cause) => Err(ValidationError::InvalidPixKey { cause }),
            None => Ok(Self { value, key_type }),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn key_type(&self) -> PixKeyType {
        self.key_type
    }
}

impl std::fmt::Display for PixKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.key_type, self.value)
    }
}

#[derive(Deserialize)]
struct RawPixKey {
    value: String,
    #[serde(rename = "type")]
    key_type: PixKeyType,
}

impl TryFrom<RawPixKey> for PixKey {
    type Error = ValidationError;

    fn try_from(raw: RawPixKey) -> Result<Self, Self::Error> {
        Self::with_type(raw.value, raw.key_type)
    }
}
