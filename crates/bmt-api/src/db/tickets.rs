//! Ticket persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `tickets` table.
//! The vendor record and the opaque vendor payload are stored as JSONB;
//! `vendor_email` is additionally denormalized into its own column so the
//! ownership-scoped query stays indexable.

use sqlx::PgPool;
use uuid::Uuid;

use bmt_core::{Ticket, TicketId, TicketPatch, TicketStatus, Vendor};

/// Insert a new ticket record.
pub async fn insert(pool: &PgPool, ticket: &Ticket) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO tickets (id, vendor, vendor_email, status, is_visible, is_advertised,
         extra, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(ticket.id.as_uuid())
    .bind(serde_json::to_value(&ticket.vendor).unwrap_or_default())
    .bind(&ticket.vendor.email)
    .bind(ticket.status.as_str())
    .bind(ticket.is_visible)
    .bind(ticket.is_advertised)
    .bind(serde_json::Value::Object(ticket.extra.clone()))
    .bind(ticket.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Apply a partial update to exactly the fields the patch names.
///
/// Returns whether a row matched.
pub async fn update_fields(
    pool: &PgPool,
    id: &TicketId,
    patch: &TicketPatch,
) -> Result<bool, sqlx::Error> {
    let result = match (patch.status, patch.is_advertised) {
        (Some(status), Some(advertised)) => {
            sqlx::query("UPDATE tickets SET status = $1, is_advertised = $2 WHERE id = $3")
                .bind(status.as_str())
                .bind(advertised)
                .bind(id.as_uuid())
                .execute(pool)
                .await?
        }
        (Some(status), None) => {
            sqlx::query("UPDATE tickets SET status = $1 WHERE id = $2")
                .bind(status.as_str())
                .bind(id.as_uuid())
                .execute(pool)
                .await?
        }
        (None, Some(advertised)) => {
            sqlx::query("UPDATE tickets SET is_advertised = $1 WHERE id = $2")
                .bind(advertised)
                .bind(id.as_uuid())
                .execute(pool)
                .await?
        }
        (None, None) => return Ok(false),
    };

    Ok(result.rows_affected() > 0)
}

/// Load all tickets from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Ticket>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TicketRow>(
        "SELECT id, vendor, status, is_visible, is_advertised, extra, created_at
         FROM tickets ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    // into_record logs and skips rows it cannot map; keep loading the rest.
    Ok(rows.into_iter().filter_map(TicketRow::into_record).collect())
}

fn parse_status(s: &str) -> TicketStatus {
    match s {
        "pending" => TicketStatus::Pending,
        "approved" => TicketStatus::Approved,
        "rejected" => TicketStatus::Rejected,
        other => {
            tracing::warn!(
                status = other,
                "unknown ticket status in database, defaulting to pending"
            );
            TicketStatus::Pending
        }
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    vendor: serde_json::Value,
    status: String,
    is_visible: bool,
    is_advertised: bool,
    extra: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TicketRow {
    fn into_record(self) -> Option<Ticket> {
        let vendor: Vendor = match serde_json::from_value(self.vendor) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "skipping ticket row with invalid vendor document");
                return None;
            }
        };
        let extra = match self.extra {
            serde_json::Value::Object(map) => map,
            other => {
                tracing::warn!(id = %self.id, ?other, "non-object ticket payload in database, dropping");
                serde_json::Map::new()
            }
        };
        Some(Ticket {
            id: TicketId::from_uuid(self.id),
            vendor,
            status: parse_status(&self.status),
            is_visible: self.is_visible,
            is_advertised: self.is_advertised,
            created_at: self.created_at,
            extra,
        })
    }
}
