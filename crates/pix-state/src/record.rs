//! # Storage Snapshot
//!
//! [`ReceiverRecord`] is the flat, unvalidated shape a receiver takes at rest.
//! Persistence adapters read and write records; [`Receiver::restore`] is the
//! only way back to an aggregate, and it re-runs every value-object check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pix_core::{Document, Email, ReceiverId};

use crate::error::ReceiverError;
use crate::receiver::{build_pix_key, BankAccount, Receiver, ReceiverStatus};

/// A receiver as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverRecord {
    pub receiver_id: ReceiverId,
    pub name: String,
    pub document: String,
    /// Empty when the receiver has no email.
    pub email: String,
    pub status: ReceiverStatus,
    pub bank: String,
    pub office: String,
    pub account_number: String,
    pub pix_key: Option<String>,
    pub pix_key_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Receiver {
    /// Snapshot this receiver for storage.
    pub fn to_record(&self) -> ReceiverRecord {
        ReceiverRecord {
            receiver_id: self.id,
            name: self.name.clone(),
            document: self.document.to_string(),
            email: self.email.as_ref().map(Email::to_string).unwrap_or_default(),
            status: self.status,
            bank: self.bank_account.bank.clone(),
            office: self.bank_account.office.clone(),
            account_number: self.bank_account.account_number.clone(),
            pix_key: Some(self.pix_key.value().to_string()),
            pix_key_type: Some(self.pix_key.key_type().as_str().to_string()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Rebuild a receiver from a stored record.
    ///
    /// Fails with [`ReceiverError::InvalidReceiver`] when the record has no
    /// PIX key, and with a field error when any stored value no longer
    /// validates.
    pub fn restore(record: ReceiverRecord) -> Result<Self, ReceiverError> {
        let (value, type_name) = match (&record.pix_key, &record.pix_key_type) {
            (Some(value), Some(type_name)) => (value.as_str(), type_name.as_str()),
            _ => {
                return Err(ReceiverError::InvalidReceiver(format!(
                    "receiver {} has no pix key",
                    record.receiver_id
                )))
            }
        };
        let pix_key = build_pix_key(value, type_name)?;
        let document =
            Document::new(record.document.as_str()).map_err(ReceiverError::field("document"))?;
        let email = if record.email.trim().is_empty() {
            None
        } else {
            Some(Email::new(record.email.as_str()).map_err(ReceiverError::field("email"))?)
        };

        let receiver = Self {
            id: record.receiver_id,
            name: record.name,
            document,
            email,
            status: record.status,
            bank_account: BankAccount {
                bank: record.bank,
                office: record.office,
                account_number: record.account_number,
            },
            pix_key,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        receiver.validate()?;
        Ok(receiver)
    }
}
