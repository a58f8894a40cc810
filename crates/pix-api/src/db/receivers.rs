//! Receiver persistence operations on the `receivers` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use pix_core::ReceiverId;
use pix_state::{Receiver, ReceiverRecord, ReceiverStatus};

use crate::repository::{restore, ReceiverFilter, ReceiverRepository, RepositoryError};

const SELECT_COLUMNS: &str = "SELECT receiver_id, name, document, email, status, pix_key, \
     pix_key_type, bank, office, account_number, created_at, updated_at FROM receivers";

/// [`ReceiverRepository`] backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgReceiverRepository {
    pool: PgPool,
}

impl PgReceiverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Delete every receiver. Returns the number of rows removed.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM receivers")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Number of stored receivers.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM receivers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ReceiverRepository for PgReceiverRepository {
    async fn find_by_id(&self, id: ReceiverId) -> Result<Receiver, RepositoryError> {
        let row = sqlx::query_as::<_, ReceiverRow>(&format!(
            "{SELECT_COLUMNS} WHERE receiver_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound { id })?;

        restore(row.into_record()?)
    }

    async fn find_many(&self, filter: &ReceiverFilter) -> Result<Vec<Receiver>, RepositoryError> {
        let name_pattern = filter
            .name
            .as_deref()
            .map(|name| format!("%{}%", escape_like(name)));

        let rows = sqlx::query_as::<_, ReceiverRow>(&format!(
            "{SELECT_COLUMNS}
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR name ILIKE $2)
               AND ($3::text IS NULL OR pix_key = $3)
               AND ($4::text IS NULL OR lower(pix_key_type) = $4)
             ORDER BY created_at DESC, receiver_id DESC
             LIMIT $5 OFFSET $6"
        ))
        .bind(filter.status.map(|status| status.as_str()))
        .bind(name_pattern)
        .bind(filter.pix_key_value.as_deref())
        .bind(filter.pix_key_type.map(|key_type| key_type.as_str()))
        .bind(i64::from(filter.per_page))
        .bind(i64::try_from(filter.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let mut receivers = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.receiver_id;
            match row.into_record().and_then(restore) {
                Ok(receiver) => receivers.push(receiver),
                Err(err) => {
                    tracing::error!(receiver_id = %id, error = %err, "skipping corrupt receiver row");
                }
            }
        }
        Ok(receivers)
    }

    async fn create(&self, receiver: &Receiver) -> Result<(), RepositoryError> {
        let record = receiver.to_record();
        let result = sqlx::query(
            "INSERT INTO receivers (receiver_id, name, document, email, status, pix_key,
             pix_key_type, bank, office, account_number, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             ON CONFLICT (receiver_id) DO NOTHING",
        )
        .bind(record.receiver_id.as_uuid())
        .bind(&record.name)
        .bind(&record.document)
        .bind(non_empty(&record.email))
        .bind(record.status.as_str())
        .bind(record.pix_key.as_deref())
        .bind(record.pix_key_type.as_deref())
        .bind(&record.bank)
        .bind(&record.office)
        .bind(&record.account_number)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Duplicate {
                id: record.receiver_id,
            });
        }
        Ok(())
    }

    async fn update(&self, receiver: &Receiver) -> Result<(), RepositoryError> {
        let record = receiver.to_record();
        let result = sqlx::query(
            "UPDATE receivers SET name = $1, document = $2, email = $3, status = $4,
             pix_key = $5, pix_key_type = $6, bank = $7, office = $8, account_number = $9,
             updated_at = $10 WHERE receiver_id = $11",
        )
        .bind(&record.name)
        .bind(&record.document)
        .bind(non_empty(&record.email))
        .bind(record.status.as_str())
        .bind(record.pix_key.as_deref())
        .bind(record.pix_key_type.as_deref())
        .bind(&record.bank)
        .bind(&record.office)
        .bind(&record.account_number)
        .bind(record.updated_at)
        .bind(record.receiver_id.as_uuid())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound {
                id: record.receiver_id,
            });
        }
        Ok(())
    }

    async fn delete_many(&self, ids: &[ReceiverId]) -> Result<u64, RepositoryError> {
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let result = sqlx::query("DELETE FROM receivers WHERE receiver_id = ANY($1)")
            .bind(&ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Escape `ILIKE` wildcards so the name filter is a literal substring match.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ReceiverRow {
    receiver_id: Uuid,
    name: String,
    document: String,
    email: Option<String>,
    status: String,
    pix_key: Option<String>,
    pix_key_type: Option<String>,
    bank: String,
    office: String,
    account_number: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReceiverRow {
    fn into_record(self) -> Result<ReceiverRecord, RepositoryError> {
        let id = ReceiverId::from_uuid(self.receiver_id);
        let status = ReceiverStatus::parse(&self.status).ok_or_else(|| {
            tracing::warn!(receiver_id = %id, status = %self.status, "unknown receiver status in database");
            RepositoryError::Corrupt {
                id,
                reason: format!("unknown status {:?}", self.status),
            }
        })?;

        Ok(ReceiverRecord {
            receiver_id: id,
            name: self.name,
            document: self.document,
            email: self.email.unwrap_or_default(),
            status,
            bank: self.bank,
            office: self.office,
            account_number: self.account_number,
            pix_key: self.pix_key,
            pix_key_type: self.pix_key_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(status: &str) -> ReceiverRow {
        let now = Utc.with_ymd_and_hms(2024, 2, 2, 10, 0, 0).unwrap();
        ReceiverRow {
            receiver_id: Uuid::new_v4(),
            name: "Jane Johnson".into(),
            document: "12345678901".into(),
            email: None,
            status: status.into(),
            pix_key: Some("12345678901".into()),
            pix_key_type: Some("cpf".into()),
            bank: "Itau".into(),
            office: "0002".into(),
            account_number: "445566".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn rows_become_records() {
        let record = row("VALID").into_record().unwrap();
        assert_eq!(record.status, ReceiverStatus::Valid);
        assert_eq!(record.email, "");
        let receiver = restore(record).unwrap();
        assert!(receiver.is_valid());
        assert_eq!(receiver.bank_account().office, "0002");
    }

    #[test]
    fn unknown_status_is_corrupt() {
        assert!(matches!(
            row("ARCHIVED").into_record(),
            Err(RepositoryError::Corrupt { .. })
        ));
    }

    #[test]
    fn row_without_pix_key_is_corrupt() {
        let mut r = row("DRAFT");
        r.pix_key = None;
        let err = r.into_record().and_then(restore).unwrap_err();
        assert!(matches!(err, RepositoryError::Corrupt { .. }));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Jane"), "Jane");
    }
}
