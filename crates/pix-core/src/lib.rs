//! # pix-core: Foundational Types for the PIX Receiver Registry
//!
//! This crate is the leaf of the workspace DAG. It defines the value objects
//! that every receiver record is built from, and the error taxonomy that the
//! upper layers map onto their own surfaces.
//!
//! ## Value Objects
//!
//! - [`Document`]: a Brazilian taxpayer identifier, either a CPF (individual)
//!   or a CNPJ (company). Punctuated and digits-only forms are both accepted
//!   and stored verbatim.
//! - [`Email`]: a lowercase email address.
//! - [`PixKeyType`]: the closed set of five PIX key classifications, each
//!   with its own format rule.
//! - [`PixKey`]: a key value bound to its [`PixKeyType`].
//! - [`ReceiverId`]: the opaque identifier of a receiver aggregate.
//!
//! ## Crate Policy
//!
//! - Construction is the only validation gate. A value that exists is valid.
//! - Only the shape of CPF/CNPJ is checked; check digits are not verified.
//! - No I/O, no logging, no `.unwrap()` outside tests.

/// Implement `Deserialize` for a string-backed value object by routing the
/// raw string through the type's `new()` constructor, so invalid values are
/// rejected at deserialization time instead of being silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod document;
pub mod email;
pub mod error;
pub mod identity;
pub mod pix_key;

mod pattern;

pub use document::Document;
pub use email::Email;
pub use error::{ErrorKind, PixKeyViolation, ValidationError};
pub use identity::ReceiverId;
pub use pix_key::{PixKey, PixKeyType, MAX_KEY_LENGTH};
