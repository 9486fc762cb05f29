//! OceanEye Hotspot Service
//!
//! Groups geotagged ocean-hazard reports into scored spatial hotspots for
//! map overlays and alerting.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   OCEANEYE HOTSPOTS                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌──────────────────┐   │
//! │  │  API      │──▶│  Filter +    │──▶│  Hotspot         │   │
//! │  │  (Axum)   │   │  Enrichment  │   │  Detector (pure) │   │
//! │  └───────────┘   └──────────────┘   └──────────────────┘   │
//! │        ▲                                     │              │
//! │        └──────── alert levels + summary ◀────┘              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service keeps no state between requests: reports arrive in the
//! request body and hotspots are recomputed every time.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self { config }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes();

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/hotspots/detect", post(handlers::hotspots::detect))
        .route("/api/v1/hotspots/alert-thresholds", get(handlers::hotspots::alert_thresholds))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
