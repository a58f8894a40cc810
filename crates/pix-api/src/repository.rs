//! # Receiver Repository
//!
//! The persistence port consumed by [`ReceiverService`](crate::service::ReceiverService),
//! and its in-memory adapter. The Postgres adapter lives in
//! [`db::receivers`](crate::db::receivers).
//!
//! Both adapters persist [`ReceiverRecord`] snapshots and rebuild aggregates
//! through [`Receiver::restore`], so a record that no longer validates is
//! reported as [`RepositoryError::Corrupt`] instead of being handed out.

use async_trait::async_trait;
use thiserror::Error;

use pix_core::{ErrorKind, PixKeyType, ReceiverId};
use pix_state::{Receiver, ReceiverRecord, ReceiverStatus};

use crate::store::Store;

// ─── Errors ──────────────────────────────────────────────────────────

/// Persistence failures. Everything except `NotFound` is a system fault.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("receiver {id} not found")]
    NotFound { id: ReceiverId },

    #[error("receiver {id} already exists")]
    Duplicate { id: ReceiverId },

    #[error("stored receiver {id} is corrupt: {reason}")]
    Corrupt { id: ReceiverId, reason: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }
}

// ─── Filter ──────────────────────────────────────────────────────────

/// Criteria for [`ReceiverRepository::find_many`].
///
/// `name` matches as a case-insensitive substring; the other criteria are
/// exact. Results are ordered newest first and paginated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverFilter {
    pub status: Option<ReceiverStatus>,
    pub name: Option<String>,
    pub pix_key_value: Option<String>,
    pub pix_key_type: Option<PixKeyType>,
    /// 1-based page number. `0` is read as `1`.
    pub page: u32,
    pub per_page: u32,
}

impl Default for ReceiverFilter {
    fn default() -> Self {
        Self {
            status: None,
            name: None,
            pix_key_value: None,
            pix_key_type: None,
            page: 1,
            per_page: 10,
        }
    }
}

impl ReceiverFilter {
    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.per_page)
    }

    /// Whether a stored record satisfies every criterion.
    pub fn matches(&self, record: &ReceiverRecord) -> bool {
        if self.status.is_some_and(|status| status != record.status) {
            return false;
        }
        if let Some(name) = &self.name {
            if !record.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(value) = &self.pix_key_value {
            if record.pix_key.as_deref() != Some(value.as_str()) {
                return false;
            }
        }
        if let Some(key_type) = self.pix_key_type {
            let stored = record.pix_key_type.as_deref().and_then(PixKeyType::parse);
            if stored != Some(key_type) {
                return false;
            }
        }
        true
    }
}

// ─── Port ────────────────────────────────────────────────────────────

/// Storage of receiver aggregates.
#[async_trait]
pub trait ReceiverRepository: Send + Sync {
    /// Fetch one receiver. `NotFound` when absent.
    async fn find_by_id(&self, id: ReceiverId) -> Result<Receiver, RepositoryError>;

    /// Fetch one page of receivers matching `filter`, newest first.
    async fn find_many(&self, filter: &ReceiverFilter) -> Result<Vec<Receiver>, RepositoryError>;

    /// Store a new receiver.
    async fn create(&self, receiver: &Receiver) -> Result<(), RepositoryError>;

    /// Overwrite an existing receiver. `NotFound` if the id is unknown.
    async fn update(&self, receiver: &Receiver) -> Result<(), RepositoryError>;

    /// Remove every listed receiver, returning how many were removed.
    async fn delete_many(&self, ids: &[ReceiverId]) -> Result<u64, RepositoryError>;
}

pub(crate) fn restore(record: ReceiverRecord) -> Result<Receiver, RepositoryError> {
    let id = record.receiver_id;
    Receiver::restore(record).map_err(|err| RepositoryError::Corrupt {
        id,
        reason: err.to_string(),
    })
}

// ─── In-Memory Adapter ───────────────────────────────────────────────

/// Repository over a process-local [`Store`]. State is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReceiverRepository {
    records: Store<ReceiverRecord>,
}

impl InMemoryReceiverRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ReceiverRepository for InMemoryReceiverRepository {
    async fn find_by_id(&self, id: ReceiverId) -> Result<Receiver, RepositoryError> {
        let record = self
            .records
            .get(&id)
            .ok_or(RepositoryError::NotFound { id })?;
        restore(record)
    }

    async fn find_many(&self, filter: &ReceiverFilter) -> Result<Vec<Receiver>, RepositoryError> {
        let mut matching: Vec<ReceiverRecord> = self
            .records
            .list()
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.receiver_id.cmp(&a.receiver_id))
        });

        let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let receivers = matching
            .into_iter()
            .skip(offset)
            .take(filter.per_page as usize)
            .filter_map(|record| {
                let id = record.receiver_id;
                restore(record)
                    .map_err(|err| {
                        tracing::error!(receiver_id = %id, error = %err, "skipping corrupt receiver record");
                    })
                    .ok()
            })
            .collect();
        Ok(receivers)
    }

    async fn create(&self, receiver: &Receiver) -> Result<(), RepositoryError> {
        let id = receiver.id();
        if self.records.insert_new(id, receiver.to_record()) {
            Ok(())
        } else {
            Err(RepositoryError::Duplicate { id })
        }
    }

    async fn update(&self, receiver: &Receiver) -> Result<(), RepositoryError> {
        let id = receiver.id();
        if self.records.replace(&id, receiver.to_record()) {
            Ok(())
        } else {
            Err(RepositoryError::NotFound { id })
        }
    }

    async fn delete_many(&self, ids: &[ReceiverId]) -> Result<u64, RepositoryError> {
        Ok(self.records.remove_many(ids) as u64)
    }
}
