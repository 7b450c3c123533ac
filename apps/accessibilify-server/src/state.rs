//! Shared application state

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use compliance_engine::{IssueFeed, LabelIngest};
use tracing::info;

use crate::config::Args;
use crate::store::{self, AnalysisStore};
use crate::vision::{HttpLabelDetector, LabelDetector};

#[derive(Clone)]
pub struct AppState {
    pub ingest: LabelIngest,
    pub store: Arc<dyn AnalysisStore>,
    /// Unset when no vision endpoint is configured
    pub detector: Option<Arc<dyn LabelDetector>>,
    feed: Arc<Mutex<IssueFeed>>,
}

impl AppState {
    pub fn new(
        ingest: LabelIngest,
        store: Arc<dyn AnalysisStore>,
        detector: Option<Arc<dyn LabelDetector>>,
        feed_capacity: usize,
    ) -> Self {
        Self {
            ingest,
            store,
            detector,
            feed: Arc::new(Mutex::new(IssueFeed::new(feed_capacity))),
        }
    }

    /// Build the store, vision client and feed described by `args`
    pub async fn from_args(args: &Args) -> anyhow::Result<Self> {
        let store = store::open(args.store, &args.database_url).await?;

        let detector: Option<Arc<dyn LabelDetector>> = match &args.vision_endpoint {
            Some(endpoint) => {
                let client = HttpLabelDetector::new(endpoint.clone(), args.vision_timeout())?;
                info!("Vision endpoint: {}", client.endpoint());
                Some(Arc::new(client))
            }
            None => {
                info!("No vision endpoint configured; frames must carry labels");
                None
            }
        };

        Ok(Self::new(
            LabelIngest::new(args.job_grouping),
            store,
            detector,
            args.feed_capacity,
        ))
    }

    /// Lock the live feed
    ///
    /// A panic while holding the lock cannot leave the feed half-written, so a
    /// poisoned lock is recovered.
    pub fn feed(&self) -> MutexGuard<'_, IssueFeed> {
        self.feed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
