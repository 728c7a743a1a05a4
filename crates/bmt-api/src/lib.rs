//! # BookMyTrip Ticket API
//!
//! A travel ticket marketplace backend. Vendors submit tickets, admins
//! approve or reject them, and up to a fixed number of tickets can be
//! advertised at any one time.
//!
//! ## Architecture
//!
//! - **Storage**: in-memory [`bmt_store::TicketStore`] as the source of
//!   truth for reads, with optional Postgres write-through for durability.
//! - **Service**: [`service::TicketService`] owns the lifecycle rules,
//!   including the advertisement admission control.
//! - **API**: axum routes under [`routes`], documented via OpenAPI.
//! - **Auth**: optional bearer-token middleware ([`auth`]); disabled
//!   unless a token is configured.

pub mod auth;
pub mod db;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod service;
pub mod state;

pub use error::AppError;
pub use state::{AppConfig, AppState};

use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

/// Maximum accepted request body size. Ticket payloads are small; anything
/// larger is rejected before deserialization.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Build the application router.
///
/// Health endpoints are mounted outside the auth middleware so probes
/// never need credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = auth::AuthConfig {
        token: state.config.auth_token.clone(),
    };

    Router::new()
        .merge(routes::tickets::router())
        .merge(openapi::router())
        .layer(axum::middleware::from_fn(auth::auth_middleware))
        .layer(Extension(auth_config))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Liveness probe: the process is up and serving.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: verifies the database connection when one is
/// configured. Without a database the in-memory store is always ready.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    if let Some(pool) = state.db_pool() {
        sqlx::query("SELECT 1").execute(pool).await.map_err(|err| {
            tracing::error!(error = %err, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        })?;
    }
    Ok("ready")
}
