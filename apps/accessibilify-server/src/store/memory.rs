//! In-memory analysis store for development and testing

use std::collections::HashMap;

use async_trait::async_trait;
use shared_types::{AnalysisRecord, DashboardSummary};
use tokio::sync::RwLock;

use super::summary::summarize;
use super::{AnalysisStore, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    analyses: RwLock<HashMap<String, AnalysisRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryStore {
    async fn initialize(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn store_analysis(&self, record: &AnalysisRecord) -> StoreResult<()> {
        let mut analyses = self.analyses.write().await;
        analyses.insert(record.analysis_id.clone(), record.clone());
        Ok(())
    }

    async fn get_analysis(&self, analysis_id: &str) -> StoreResult<Option<AnalysisRecord>> {
        let analyses = self.analyses.read().await;
        Ok(analyses.get(analysis_id).cloned())
    }

    async fn dashboard(&self) -> StoreResult<DashboardSummary> {
        let analyses = self.analyses.read().await;
        let records: Vec<&AnalysisRecord> = analyses.values().collect();
        Ok(summarize(&records))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
