//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! `AppState` holds the [`TicketService`] (which owns the in-memory ticket
//! store and the optional Postgres pool) and the application configuration.
//! Clone-friendly via `Arc` internals.

use sqlx::PgPool;

use crate::service::TicketService;
use bmt_store::TicketStore;

/// Default number of promotional advertisement slots.
pub const DEFAULT_MAX_ADVERTISED: usize = 6;

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_token` to prevent credential leakage
/// in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer secret for the authentication collaborator.
    /// If `None`, authentication is disabled and every route is open.
    pub auth_token: Option<String>,
    /// Number of advertisement slots ticket promotion may occupy.
    pub max_advertised: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("max_advertised", &self.max_advertised)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            auth_token: None,
            max_advertised: DEFAULT_MAX_ADVERTISED,
        }
    }
}

/// Shared application state accessible to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The ticket lifecycle service, the sole writer of `status` and
    /// `isAdvertised`.
    pub tickets: TicketService,
    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration, an empty
    /// store, and no database pool.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create a new application state with the given configuration and
    /// optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let tickets = TicketService::new(TicketStore::new(), db_pool, config.max_advertised);
        Self { tickets, config }
    }

    /// The Postgres pool, when durable persistence is configured.
    pub fn db_pool(&self) -> Option<&PgPool> {
        self.tickets.db_pool()
    }

    /// Hydrate the in-memory store from the database.
    ///
    /// Called once on startup when a database pool is available, so that
    /// read operations stay fast and synchronous afterwards.
    pub async fn hydrate_from_db(&self) -> Result<(), sqlx::Error> {
        let pool = match self.db_pool() {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let tickets = crate::db::tickets::load_all(pool).await?;
        let count = tickets.len();
        for ticket in tickets {
            self.tickets.store().insert(ticket);
        }

        tracing::info!(tickets = count, "Hydrated in-memory store from database");
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
