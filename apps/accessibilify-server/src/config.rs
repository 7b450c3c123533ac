//! Command-line and environment configuration

use std::time::Duration;

use clap::{Parser, ValueEnum};
use compliance_engine::feed::DEFAULT_FEED_CAPACITY;
use compliance_engine::JobGrouping;

/// Which [`AnalysisStore`](crate::store::AnalysisStore) backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Process-local, lost on restart
    Memory,
    /// SQL warehouse reached through `--database-url`
    Sql,
}

/// Command-line arguments for the Accessibilify server
#[derive(Parser, Debug, Clone)]
#[command(name = "accessibilify-server")]
#[command(about = "ADA compliance findings from vision-service labels")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "ACCESSIBILIFY_PORT", default_value = "3000")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "ACCESSIBILIFY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Rate limit: requests per second per IP
    #[arg(long, env = "ACCESSIBILIFY_RATE_LIMIT", default_value = "10")]
    pub rate_limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Analysis store backend
    #[arg(long, env = "ACCESSIBILIFY_STORE", value_enum, default_value = "memory")]
    pub store: StoreKind,

    /// Database URL for the SQL store
    #[arg(long, env = "ACCESSIBILIFY_DATABASE_URL", default_value = "sqlite::memory:")]
    pub database_url: String,

    /// Issues kept in the live feed
    #[arg(long, env = "ACCESSIBILIFY_FEED_CAPACITY", default_value_t = DEFAULT_FEED_CAPACITY)]
    pub feed_capacity: usize,

    /// How job result items are grouped: per-label or per-timestamp
    #[arg(long, env = "ACCESSIBILIFY_JOB_GROUPING", default_value = "per-label")]
    pub job_grouping: JobGrouping,

    /// Label-detection endpoint; frame images are rejected when unset
    #[arg(long, env = "ACCESSIBILIFY_VISION_ENDPOINT")]
    pub vision_endpoint: Option<String>,

    /// Vision request timeout in milliseconds
    #[arg(long, env = "ACCESSIBILIFY_VISION_TIMEOUT_MS", default_value = "10000")]
    pub vision_timeout_ms: u64,

    /// Load the demo analyses into the store at startup
    #[arg(long, env = "ACCESSIBILIFY_SEED_DEMO")]
    pub seed_demo: bool,
}

impl Args {
    pub fn vision_timeout(&self) -> Duration {
        Duration::from_millis(self.vision_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
