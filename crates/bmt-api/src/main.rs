//! BookMyTrip ticket API server entrypoint.

use bmt_api::{app, AppConfig, AppState};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;
    let port = config.port;

    let db_pool = bmt_api::db::init_pool().await?;
    let state = AppState::with_config(config, db_pool);

    if let Err(err) = state.hydrate_from_db().await {
        tracing::error!(error = %err, "failed to hydrate store from database");
        return Err(err.into());
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "BookMyTrip ticket API listening");

    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Read configuration from the environment.
///
/// - `PORT`: listen port (default 3000)
/// - `BMT_AUTH_TOKEN`: when set, bearer-token auth gates the ticket API
/// - `BMT_MAX_ADVERTISED`: advertisement slot count (default 6)
fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::default();

    if let Ok(port) = std::env::var("PORT") {
        config.port = port
            .parse()
            .map_err(|_| format!("PORT must be a number, got {port:?}"))?;
    }
    if let Ok(token) = std::env::var("BMT_AUTH_TOKEN") {
        if !token.is_empty() {
            config.auth_token = Some(token);
        }
    }
    if let Ok(cap) = std::env::var("BMT_MAX_ADVERTISED") {
        config.max_advertised = cap
            .parse()
            .map_err(|_| format!("BMT_MAX_ADVERTISED must be a number, got {cap:?}"))?;
    }

    Ok(config)
}
