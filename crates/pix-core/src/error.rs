//! # Error Types: Validation Taxonomy
//!
//! All value-object constructors fail with [`ValidationError`]. Upper layers
//! classify failures through [`ErrorKind`], which is the stable vocabulary
//! shared by the aggregate, the persistence adapters and the HTTP mapping.
//!
//! ## Design
//!
//! - Every validation failure is a client-input error, never a system fault.
//! - Errors carry the offending input where it is safe to echo back.
//! - PIX key failures carry the specific violated rule as a [`PixKeyViolation`].

use thiserror::Error;

use crate::pix_key::{PixKeyType, MAX_KEY_LENGTH};

/// Error kinds across the receiver registry.
///
/// `Internal` is reserved for persistence or infrastructure faults passed
/// through opaquely; every other kind is a client-input error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidDocument,
    InvalidEmail,
    InvalidKeyType,
    InvalidPixKey,
    InvalidReceiver,
    AlreadyValid,
    /// Malformed request input outside any value-object rule.
    InvalidRequest,
    NotFound,
    Internal,
}

impl ErrorKind {
    /// Machine-readable code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDocument => "INVALID_DOCUMENT",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidKeyType => "INVALID_KEY_TYPE",
            Self::InvalidPixKey => "INVALID_PIX_KEY",
            Self::InvalidReceiver => "INVALID_RECEIVER",
            Self::AlreadyValid => "ALREADY_VALID",
            Self::InvalidRequest => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The specific rule a PIX key value broke.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixKeyViolation {
    /// The key value is the empty string.
    #[error("key value must not be empty")]
    Empty,

    /// The key value exceeds [`MAX_KEY_LENGTH`] characters.
    #[error("key value has {length} characters, maximum is {MAX_KEY_LENGTH}")]
    TooLong {
        /// Length of the rejected value, in characters.
        length: usize,
    },

    /// The key value does not match the format of its declared type.
    #[error("key value does not match the {0} format")]
    Format(PixKeyType),
}

/// Value-object validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Input matches neither the CPF nor the CNPJ shape.
    #[error("invalid document: {0:?} is neither a CPF nor a CNPJ")]
    InvalidDocument(String),

    /// Input does not match the email format.
    #[error("invalid email: {0:?}")]
    InvalidEmail(String),

    /// Unknown PIX key type name.
    #[error("invalid pix key type: {0:?}")]
    InvalidKeyType(String),

    /// A key value failed the format rule of a specific [`PixKeyType`].
    #[error("invalid {key_type} key format")]
    InvalidKeyFormat {
        /// The type whose rule was applied.
        key_type: PixKeyType,
    },

    /// A PIX key could not be constructed.
    #[error("invalid pix key: {cause}")]
    InvalidPixKey {
        /// The rule that was violated.
        cause: PixKeyViolation,
    },
}

impl ValidationError {
    /// Classify this error.
    ///
    /// A bare format mismatch from [`PixKeyType::validate`] is reported as
    /// [`ErrorKind::InvalidPixKey`]: it is always a key-value problem.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDocument(_) => ErrorKind::InvalidDocument,
            Self::InvalidEmail(_) => ErrorKind::InvalidEmail,
            Self::InvalidKeyType(_) => ErrorKind::InvalidKeyType,
            Self::InvalidKeyFormat { .. } | Self::InvalidPixKey { .. } => ErrorKind::InvalidPixKey,
        }
    }
}
