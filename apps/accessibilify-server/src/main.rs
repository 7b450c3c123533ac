//! Accessibilify Server
//!
//! Turns vision-service labels into ADA compliance findings. Provides REST API
//! endpoints for:
//!
//! - Frame analysis (pre-detected labels or a base64 frame)
//! - Video label-detection job results
//! - A live feed of recent issues
//! - Stored analyses and the compliance dashboard
//!
//! ## Architecture
//!
//! Classification is pure and lives in `compliance-engine`. This server adds:
//!
//! - Rate limiting via tower-governor
//! - An optional HTTP vision client for raw frames
//! - An analysis store (in-memory or SQL)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod error;
mod state;
mod store;
mod vision;
#[cfg(test)]
mod tests;

use api::{
    handle_analyze_frame, handle_dashboard, handle_feed, handle_get_analysis, handle_health,
    handle_init_storage, handle_job_results, handle_list_rules, handle_store_analysis,
};
use config::Args;
use state::AppState;

/// Routes, tracing and CORS; rate limiting is layered on in `main`
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Classification
        .route("/api/rules", get(handle_list_rules))
        .route("/api/analyze/frame", post(handle_analyze_frame))
        .route("/api/analyze/job-results", post(handle_job_results))
        .route("/api/feed", get(handle_feed))
        // Storage
        .route("/api/analysis", post(handle_store_analysis))
        .route("/api/analysis/:id", get(handle_get_analysis))
        .route("/api/dashboard", get(handle_dashboard))
        .route("/api/storage/init", post(handle_init_storage))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Accessibilify server on {}", args.bind_address());

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .context("Failed to create rate limiter config")?,
    );

    let state = AppState::from_args(&args).await?;

    if args.seed_demo {
        let seeded = store::demo::seed(state.store.as_ref()).await?;
        info!("Loaded {} demo analyses", seeded);
    }

    let app = build_router(state).layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr: SocketAddr = args.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Job grouping: {}", args.job_grouping);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
