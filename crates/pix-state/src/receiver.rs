//! # Receiver Aggregate
//!
//! ## States
//!
//! - `DRAFT`: every field may change through [`Receiver::update_draft`].
//! - `VALID`: reached through [`Receiver::promote`]; only the email may
//!   change.
//!
//! `promote` is unguarded: it always succeeds, and callers decide when a
//! receiver is ready.
//!
//! ## Blank Inputs
//!
//! In every update a field that is absent or only whitespace means "leave
//! unchanged". An update in which every field is blank is a no-op and does
//! not bump `updated_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pix_core::{Document, Email, PixKey, ReceiverId, ValidationError};

use crate::error::ReceiverError;

// ─── Status ──────────────────────────────────────────────────────────

/// Lifecycle status of a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiverStatus {
    /// Freely editable.
    Draft,
    /// Promoted. Only the email can change.
    Valid,
}

impl ReceiverStatus {
    /// Storage token: `"DRAFT"` or `"VALID"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Valid => "VALID",
        }
    }

    /// Parse a status token, ignoring case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "VALID" => Some(Self::Valid),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReceiverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Banking ─────────────────────────────────────────────────────────

/// Banking details of a receiver. Free text; not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub bank: String,
    pub office: String,
    pub account_number: String,
}

// ─── Draft Update ────────────────────────────────────────────────────

/// Field changes requested for a DRAFT receiver.
///
/// `None` and whitespace-only values are skipped. When only one half of the
/// PIX key is given, the other half is taken from the current key and the
/// pair is validated together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftUpdate {
    pub name: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub pix_key_value: Option<String>,
    pub pix_key_type: Option<String>,
    pub bank: Option<String>,
    pub office: Option<String>,
    pub account_number: Option<String>,
}

impl DraftUpdate {
    /// Whether every field is absent or blank.
    pub fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.document,
            &self.email,
            &self.pix_key_value,
            &self.pix_key_type,
            &self.bank,
            &self.office,
            &self.account_number,
        ]
        .into_iter()
        .all(|field| non_blank(field.as_deref()).is_none())
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}

/// Validated values of a draft update, not yet applied.
struct StagedDraft {
    name: Option<String>,
    document: Option<Document>,
    email: Option<Email>,
    pix_key: Option<PixKey>,
    bank: Option<String>,
    office: Option<String>,
    account_number: Option<String>,
}

// ─── Receiver ────────────────────────────────────────────────────────

/// A payee registered for PIX transfers.
///
/// Fields are private: the status only moves through [`Receiver::promote`],
/// and every other field only through the update operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    pub(crate) id: ReceiverId,
    pub(crate) name: String,
    pub(crate) document: Document,
    pub(crate) email: Option<Email>,
    pub(crate) status: ReceiverStatus,
    pub(crate) bank_account: BankAccount,
    pub(crate) pix_key: PixKey,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Receiver {
    /// Register a new DRAFT receiver.
    ///
    /// A blank `email` means the receiver has none.
    pub fn new(
        document: &str,
        pix_key_value: &str,
        pix_key_type: &str,
        name: &str,
        email: &str,
    ) -> Result<Self, ReceiverError> {
        Self::new_at(document, pix_key_value, pix_key_type, name, email, Utc::now())
    }

    /// [`Receiver::new`] with an explicit clock reading.
    pub fn new_at(
        document: &str,
        pix_key_value: &str,
        pix_key_type: &str,
        name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ReceiverError> {
        let document = Document::new(document).map_err(ReceiverError::field("document"))?;
        let pix_key = build_pix_key(pix_key_value, pix_key_type)?;
        let email = non_blank(Some(email))
            .map(Email::new)
            .transpose()
            .map_err(ReceiverError::field("email"))?;

        let receiver = Self {
            id: ReceiverId::new(),
            name: name.to_string(),
            document,
            email,
            status: ReceiverStatus::Draft,
            bank_account: BankAccount::default(),
            pix_key,
            created_at: now,
            updated_at: now,
        };
        receiver.validate()?;
        Ok(receiver)
    }

    // ── Accessors ──

    pub fn id(&self) -> ReceiverId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn status(&self) -> ReceiverStatus {
        self.status
    }

    pub fn bank_account(&self) -> &BankAccount {
        &self.bank_account
    }

    pub fn pix_key(&self) -> &PixKey {
        &self.pix_key
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_valid(&self) -> bool {
        self.status == ReceiverStatus::Valid
    }

    // ── Transitions ──

    /// Move the receiver to VALID (DRAFT → VALID). Always succeeds, also
    /// when the receiver is already VALID.
    pub fn promote(&mut self) {
        self.promote_at(Utc::now())
    }

    /// [`Receiver::promote`] with an explicit clock reading.
    pub fn promote_at(&mut self, now: DateTime<Utc>) {
        self.status = ReceiverStatus::Valid;
        self.updated_at = now;
    }

    /// Change the email. Allowed in both states; a blank email is a no-op.
    pub fn update_email(&mut self, email: &str) -> Result<(), ReceiverError> {
        self.update_email_at(email, Utc::now())
    }

    /// [`Receiver::update_email`] with an explicit clock reading.
    pub fn update_email_at(&mut self, email: &str, now: DateTime<Utc>) -> Result<(), ReceiverError> {
        let Some(raw) = non_blank(Some(email)) else {
            return Ok(());
        };
        let email = Email::new(raw).map_err(ReceiverError::field("email"))?;
        self.email = Some(email);
        self.updated_at = now;
        self.validate()
    }

    /// Apply a [`DraftUpdate`]. Fails with [`ReceiverError::AlreadyValid`]
    /// once the receiver has been promoted, whatever the update contains.
    pub fn update_draft(&mut self, update: &DraftUpdate) -> Result<(), ReceiverError> {
        self.update_draft_at(update, Utc::now())
    }

    /// [`Receiver::update_draft`] with an explicit clock reading.
    ///
    /// All fields are validated before any is written: on error the
    /// receiver is unchanged.
    pub fn update_draft_at(
        &mut self,
        update: &DraftUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), ReceiverError> {
        if self.is_valid() {
            return Err(ReceiverError::AlreadyValid { id: self.id });
        }
        if update.is_blank() {
            return Ok(());
        }

        let staged = self.stage(update)?;
        self.commit(staged);
        self.updated_at = now;
        self.validate()
    }

    fn stage(&self, update: &DraftUpdate) -> Result<StagedDraft, ReceiverError> {
        let document = non_blank(update.document.as_deref())
            .map(Document::new)
            .transpose()
            .map_err(ReceiverError::field("document"))?;

        let email = non_blank(update.email.as_deref())
            .map(Email::new)
            .transpose()
            .map_err(ReceiverError::field("email"))?;

        let value = non_blank(update.pix_key_value.as_deref());
        let type_name = non_blank(update.pix_key_type.as_deref());
        let pix_key = match (value, type_name) {
            (None, None) => None,
            (value, Some(type_name)) => Some(build_pix_key(
                value.unwrap_or(self.pix_key.value()),
                type_name,
            )?),
            (Some(value), None) => Some(
                PixKey::with_type(value, self.pix_key.key_type())
                    .map_err(ReceiverError::field("pix_key"))?,
            ),
        };

        let text = |raw: &Option<String>| non_blank(raw.as_deref()).map(str::to_string);
        Ok(StagedDraft {
            name: text(&update.name),
            document,
            email,
            pix_key,
            bank: text(&update.bank),
            office: text(&update.office),
            account_number: text(&update.account_number),
        })
    }

    fn commit(&mut self, staged: StagedDraft) {
        if let Some(name) = staged.name {
            self.name = name;
        }
        if let Some(document) = staged.document {
            self.document = document;
        }
        if let Some(email) = staged.email {
            self.email = Some(email);
        }
        if let Some(pix_key) = staged.pix_key {
            self.pix_key = pix_key;
        }
        if let Some(bank) = staged.bank {
            self.bank_account.bank = bank;
        }
        if let Some(office) = staged.office {
            self.bank_account.office = office;
        }
        if let Some(account_number) = staged.account_number {
            self.bank_account.account_number = account_number;
        }
    }

    /// Aggregate consistency check: the email, when present, must still
    /// match the email format, and the PIX key must satisfy its type rule.
    pub fn validate(&self) -> Result<(), ReceiverError> {
        if let Some(email) = &self.email {
            Email::new(email.as_str()).map_err(ReceiverError::field("email"))?;
        }
        self.pix_key
            .key_type()
            .validate(self.pix_key.value())
            .map_err(|_| ReceiverError::InvalidReceiver("pix key does not match its type".into()))
    }
}

/// Build a PIX key, attributing an unknown type name to `pix_key_type` and
/// any value failure to `pix_key`.
pub(crate) fn build_pix_key(value: &str, type_name: &str) -> Result<PixKey, ReceiverError> {
    PixKey::new(value, type_name).map_err(|err| {
        let field = match err {
            ValidationError::InvalidKeyType(_) => "pix_key_type",
            _ => "pix_key",
        };
        ReceiverError::InvalidField { field, source: err }
    })
}
