//! Analysis persistence
//!
//! Two backends sit behind [`AnalysisStore`]: a process-local store for
//! development and tests, and a SQL warehouse over `sqlx`.

pub mod demo;
pub mod memory;
pub mod sql;
pub mod summary;

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{AnalysisRecord, DashboardSummary};
use thiserror::Error;

pub use memory::InMemoryStore;
pub use sql::SqlStore;

use crate::config::StoreKind;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Create the schema if it does not exist yet
    async fn initialize(&self) -> StoreResult<()>;

    /// Persist an analysis with its markers and recommendations
    async fn store_analysis(&self, record: &AnalysisRecord) -> StoreResult<()>;

    async fn get_analysis(&self, analysis_id: &str) -> StoreResult<Option<AnalysisRecord>>;

    /// Aggregate figures across every stored analysis
    async fn dashboard(&self) -> StoreResult<DashboardSummary>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}

/// Build and initialize the configured store
pub async fn open(kind: StoreKind, database_url: &str) -> StoreResult<Arc<dyn AnalysisStore>> {
    let store: Arc<dyn AnalysisStore> = match kind {
        StoreKind::Memory => Arc::new(InMemoryStore::new()),
        StoreKind::Sql => Arc::new(SqlStore::connect(database_url).await?),
    };
    store.initialize().await?;
    tracing::info!("Analysis store ready ({})", store.backend());
    Ok(store)
}
