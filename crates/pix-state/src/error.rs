//! Errors raised by receiver construction and mutation.

use thiserror::Error;

use pix_core::{ErrorKind, ReceiverId, ValidationError};

/// Errors that can occur while building or mutating a [`Receiver`](crate::Receiver).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiverError {
    /// A single input field failed value-object validation.
    #[error("invalid {field}: {source}")]
    InvalidField {
        /// Name of the offending input field, e.g. `"document"`.
        field: &'static str,
        /// The underlying validation failure.
        source: ValidationError,
    },

    /// The aggregate as a whole is inconsistent, e.g. it has no PIX key.
    #[error("invalid receiver: {0}")]
    InvalidReceiver(String),

    /// A draft-only mutation was attempted on a VALID receiver.
    #[error("receiver {id} is already valid; only the email can be changed")]
    AlreadyValid {
        /// The receiver identifier.
        id: ReceiverId,
    },
}

impl ReceiverError {
    pub(crate) fn field(field: &'static str) -> impl FnOnce(ValidationError) -> Self {
        move |source| Self::InvalidField { field, source }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidField { source, .. } => source.kind(),
            Self::InvalidReceiver(_) => ErrorKind::InvalidReceiver,
            Self::AlreadyValid { .. } => ErrorKind::AlreadyValid,
        }
    }

    /// The input field at fault, when the failure is field-level.
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            Self::InvalidField { field, .. } => Some(*field),
            _ => None,
        }
    }
}
