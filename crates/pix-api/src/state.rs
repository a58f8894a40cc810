//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::db::receivers::PgReceiverRepository;
use crate::repository::{InMemoryReceiverRepository, ReceiverRepository};
use crate::service::ReceiverService;

/// Shared application state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub receivers: ReceiverService,
    /// Present when running against Postgres; used by the readiness probe.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// In-memory state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Build state from configuration and an optional database pool.
    ///
    /// With a pool, receivers are stored in Postgres; otherwise in memory.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let repository: Arc<dyn ReceiverRepository> = match &db_pool {
            Some(pool) => Arc::new(PgReceiverRepository::new(pool.clone())),
            None => Arc::new(InMemoryReceiverRepository::new()),
        };
        Self::with_repository(config, repository, db_pool)
    }

    /// Build state around an explicit repository.
    pub fn with_repository(
        config: AppConfig,
        repository: Arc<dyn ReceiverRepository>,
        db_pool: Option<PgPool>,
    ) -> Self {
        let receivers = ReceiverService::new(repository, config.page_size);
        Self {
            config,
            receivers,
            db_pool,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
