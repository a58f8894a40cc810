//! # pix-state: Receiver Lifecycle
//!
//! The [`Receiver`] aggregate owns a payee's identity, document, email,
//! banking details and PIX key, and guards which of them may change
//! depending on its [`ReceiverStatus`].
//!
//! ## Lifecycle
//!
//! ```text
//! construct ──▶ DRAFT ──promote──▶ VALID
//!                 │                  │
//!          update_draft        update_email
//!          update_email
//! ```
//!
//! The transition is one-way. Once `VALID`, only the email can change and
//! every draft update fails with [`ReceiverError::AlreadyValid`].
//!
//! Draft updates are staged: every incoming field is validated before any
//! of them is written, so a failed update leaves the receiver untouched.

pub mod error;
pub mod receiver;
pub mod record;

pub use error::ReceiverError;
pub use receiver::{BankAccount, DraftUpdate, Receiver, ReceiverStatus};
pub use record::ReceiverRecord;
