//! # Receiver Use Cases
//!
//! [`ReceiverService`] turns raw request fields into aggregate operations and
//! persists the result through a [`ReceiverRepository`]. It owns no state of
//! its own; every call is a single load-mutate-store sequence, and two
//! concurrent updates to the same receiver are last-writer-wins.
//!
//! Outputs are the flat projections returned to HTTP clients, with
//! RFC 3339 timestamps.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use pix_core::{ErrorKind, PixKeyType, ReceiverId};
use pix_state::{DraftUpdate, Receiver, ReceiverError, ReceiverStatus};

use crate::repository::{ReceiverFilter, ReceiverRepository, RepositoryError};

// ─── Errors ──────────────────────────────────────────────────────────

/// Use-case failures.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The aggregate rejected the input.
    #[error(transparent)]
    Receiver(#[from] ReceiverError),

    /// Persistence failed or the receiver does not exist.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Malformed use-case input outside any aggregate rule.
    #[error("{0}")]
    InvalidInput(String),

    /// A bulk delete matched no stored receiver.
    #[error("none of the given receivers exist")]
    NothingDeleted,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Receiver(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::InvalidInput(_) => ErrorKind::InvalidRequest,
            Self::NothingDeleted => ErrorKind::NotFound,
        }
    }

    fn log(&self, operation: &'static str) {
        if self.kind().is_client_error() {
            tracing::warn!(operation, error = %self, "receiver operation rejected");
        } else {
            tracing::error!(operation, error = %self, "receiver operation failed");
        }
    }
}

// ─── Inputs ──────────────────────────────────────────────────────────

/// Fields for registering a receiver.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateReceiverInput {
    pub name: String,
    pub document: String,
    #[serde(default)]
    pub email: Option<String>,
    pub pix_key_value: String,
    /// Key type name, case-insensitive: cnpj, cpf, email, phone or random.
    pub pix_key_type: String,
    #[serde(default)]
    pub bank: Option<String>,
    #[serde(default)]
    pub office: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
}

/// Field changes for a DRAFT receiver. Absent or blank fields are kept.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateDraftInput {
    pub name: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub pix_key_value: Option<String>,
    pub pix_key_type: Option<String>,
    pub bank: Option<String>,
    pub office: Option<String>,
    pub account_number: Option<String>,
}

impl From<UpdateDraftInput> for DraftUpdate {
    fn from(input: UpdateDraftInput) -> Self {
        Self {
            name: input.name,
            document: input.document,
            email: input.email,
            pix_key_value: input.pix_key_value,
            pix_key_type: input.pix_key_type,
            bank: input.bank,
            office: input.office,
            account_number: input.account_number,
        }
    }
}

/// Query criteria for listing receivers. Blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindReceiversInput {
    /// `DRAFT` or `VALID`.
    pub status: Option<String>,
    /// Case-insensitive substring of the receiver name.
    pub name: Option<String>,
    pub pix_key_value: Option<String>,
    pub pix_key_type: Option<String>,
    /// 1-based page number. Defaults to 1.
    pub page: Option<u32>,
}

// ─── Outputs ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PixKeyOutput {
    pub value: String,
    /// Canonical type name, e.g. `Email`.
    #[serde(rename = "type")]
    pub key_type: String,
}

/// Projection of a receiver for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReceiverOutput {
    pub receiver_id: Uuid,
    pub name: String,
    pub document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `DRAFT` or `VALID`.
    pub status: String,
    pub bank: String,
    pub office: String,
    pub account_number: String,
    pub pix_key: PixKeyOutput,
    /// RFC 3339.
    pub created_at: String,
    /// RFC 3339.
    pub updated_at: String,
}

impl From<&Receiver> for ReceiverOutput {
    fn from(receiver: &Receiver) -> Self {
        let account = receiver.bank_account();
        Self {
            receiver_id: *receiver.id().as_uuid(),
            name: receiver.name().to_string(),
            document: receiver.document().to_string(),
            email: receiver.email().map(ToString::to_string),
            status: receiver.status().to_string(),
            bank: account.bank.clone(),
            office: account.office.clone(),
            account_number: account.account_number.clone(),
            pix_key: PixKeyOutput {
                value: receiver.pix_key().value().to_string(),
                key_type: receiver.pix_key().key_type().name().to_string(),
            },
            created_at: rfc3339(receiver.created_at()),
            updated_at: rfc3339(receiver.updated_at()),
        }
    }
}

/// One page of receivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FindReceiversOutput {
    pub current_page: u32,
    pub receivers: Vec<ReceiverOutput>,
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ─── Service ─────────────────────────────────────────────────────────

/// Receiver use cases over a repository.
#[derive(Clone)]
pub struct ReceiverService {
    repository: Arc<dyn ReceiverRepository>,
    page_size: u32,
}

impl std::fmt::Debug for ReceiverService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiverService")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl ReceiverService {
    pub fn new(repository: Arc<dyn ReceiverRepository>, page_size: u32) -> Self {
        Self {
            repository,
            page_size: page_size.max(1),
        }
    }

    /// Register a DRAFT receiver.
    pub async fn create(&self, input: CreateReceiverInput) -> Result<ReceiverOutput, ServiceError> {
        let result = self.try_create(input).await;
        if let Err(err) = &result {
            err.log("create");
        }
        result
    }

    async fn try_create(&self, input: CreateReceiverInput) -> Result<ReceiverOutput, ServiceError> {
        let now = Utc::now();
        let mut receiver = Receiver::new_at(
            &input.document,
            &input.pix_key_value,
            &input.pix_key_type,
            &input.name,
            input.email.as_deref().unwrap_or_default(),
            now,
        )?;

        let banking = DraftUpdate {
            bank: input.bank,
            office: input.office,
            account_number: input.account_number,
            ..Default::default()
        };
        receiver.update_draft_at(&banking, now)?;

        self.repository.create(&receiver).await?;
        tracing::info!(receiver_id = %receiver.id(), "receiver created");
        Ok(ReceiverOutput::from(&receiver))
    }

    pub async fn find_by_id(&self, id: ReceiverId) -> Result<ReceiverOutput, ServiceError> {
        let result = self.repository.find_by_id(id).await.map_err(ServiceError::from);
        match result {
            Ok(receiver) => Ok(ReceiverOutput::from(&receiver)),
            Err(err) => {
                err.log("find_by_id");
                Err(err)
            }
        }
    }

    /// List one page of receivers matching the criteria, newest first.
    pub async fn find_many(
        &self,
        input: FindReceiversInput,
    ) -> Result<FindReceiversOutput, ServiceError> {
        let result = self.try_find_many(input).await;
        if let Err(err) = &result {
            err.log("find_many");
        }
        result
    }

    async fn try_find_many(
        &self,
        input: FindReceiversInput,
    ) -> Result<FindReceiversOutput, ServiceError> {
        let status = non_blank(input.status)
            .map(|raw| {
                ReceiverStatus::parse(raw.trim())
                    .ok_or_else(|| ServiceError::InvalidInput(format!("unknown status {raw:?}")))
            })
            .transpose()?;

        let pix_key_type = non_blank(input.pix_key_type)
            .map(|raw| {
                raw.parse::<PixKeyType>()
                    .map_err(|source| ReceiverError::InvalidField {
                        field: "pix_key_type",
                        source,
                    })
            })
            .transpose()?;

        let page = input.page.unwrap_or(1).max(1);
        let filter = ReceiverFilter {
            status,
            name: non_blank(input.name),
            pix_key_value: non_blank(input.pix_key_value),
            pix_key_type,
            page,
            per_page: self.page_size,
        };

        let receivers = self.repository.find_many(&filter).await?;
        tracing::debug!(page, count = receivers.len(), "receivers listed");
        Ok(FindReceiversOutput {
            current_page: page,
            receivers: receivers.iter().map(ReceiverOutput::from).collect(),
        })
    }

    /// Apply field changes to a DRAFT receiver.
    pub async fn update_draft(
        &self,
        id: ReceiverId,
        input: UpdateDraftInput,
    ) -> Result<ReceiverOutput, ServiceError> {
        let update = DraftUpdate::from(input);
        self.mutate(id, "update_draft", |receiver| receiver.update_draft(&update))
            .await
    }

    /// Change the email of a receiver in either state.
    pub async fn update_email(
        &self,
        id: ReceiverId,
        email: &str,
    ) -> Result<ReceiverOutput, ServiceError> {
        self.mutate(id, "update_email", |receiver| receiver.update_email(email))
            .await
    }

    /// Promote a receiver to VALID.
    pub async fn promote(&self, id: ReceiverId) -> Result<ReceiverOutput, ServiceError> {
        self.mutate(id, "promote", |receiver| {
            receiver.promote();
            Ok(())
        })
        .await
    }

    async fn mutate(
        &self,
        id: ReceiverId,
        operation: &'static str,
        change: impl FnOnce(&mut Receiver) -> Result<(), ReceiverError>,
    ) -> Result<ReceiverOutput, ServiceError> {
        let result = async {
            let mut receiver = self.repository.find_by_id(id).await?;
            change(&mut receiver)?;
            self.repository.update(&receiver).await?;
            tracing::info!(receiver_id = %id, operation, status = %receiver.status(), "receiver updated");
            Ok::<_, ServiceError>(ReceiverOutput::from(&receiver))
        }
        .await;

        if let Err(err) = &result {
            err.log(operation);
        }
        result
    }

    /// Delete receivers by id. Returns the number removed.
    ///
    /// An empty id list is rejected, and so is a list of which no receiver
    /// exists.
    pub async fn delete_many(&self, ids: &[ReceiverId]) -> Result<u64, ServiceError> {
        let result = async {
            if ids.is_empty() {
                return Err(ServiceError::InvalidInput(
                    "ids must contain at least one receiver id".to_string(),
                ));
            }
            let removed = self.repository.delete_many(ids).await?;
            if removed == 0 {
                return Err(ServiceError::NothingDeleted);
            }
            tracing::info!(requested = ids.len(), removed, "receivers deleted");
            Ok::<_, ServiceError>(removed)
        }
        .await;

        if let Err(err) = &result {
            err.log("delete_many");
        }
        result
    }
}
