//! # Ticket Lifecycle Service
//!
//! The one component with business rules: the submit → approve/reject
//! status machine and the advertisement-slot admission control. It is the
//! sole writer of `status` and `isAdvertised`; the store itself applies no
//! validation.
//!
//! Mutations are written through to Postgres when a pool is configured,
//! mirroring the in-memory store. A write-through failure is surfaced to
//! the caller because the in-memory record would be lost on restart.

use sqlx::PgPool;

use crate::error::AppError;
use bmt_core::{NewTicket, Ticket, TicketId, TicketPatch, TicketStatus, UpdateReport};
use bmt_store::TicketStore;

/// Ticket lifecycle operations over a [`TicketStore`].
///
/// Cheap to clone: the store shares data and `PgPool` is a handle.
#[derive(Debug, Clone)]
pub struct TicketService {
    store: TicketStore,
    db_pool: Option<PgPool>,
    max_advertised: usize,
}

impl TicketService {
    /// Create a service over the given store with the given slot cap.
    pub fn new(store: TicketStore, db_pool: Option<PgPool>, max_advertised: usize) -> Self {
        Self {
            store,
            db_pool,
            max_advertised,
        }
    }

    /// The underlying ticket store.
    pub fn store(&self) -> &TicketStore {
        &self.store
    }

    /// The Postgres pool, when configured.
    pub fn db_pool(&self) -> Option<&PgPool> {
        self.db_pool.as_ref()
    }

    /// The advertisement-slot cap this service enforces.
    pub fn max_advertised(&self) -> usize {
        self.max_advertised
    }

    /// Persist a vendor submission.
    ///
    /// No validation of the payload shape beyond what deserialization
    /// already guaranteed; the store assigns the id and the `pending`
    /// default status.
    pub async fn submit(&self, new: NewTicket) -> Result<Ticket, AppError> {
        let ticket = self.store.create(new);

        if let Some(pool) = &self.db_pool {
            if let Err(e) = crate::db::tickets::insert(pool, &ticket).await {
                tracing::error!(ticket_id = %ticket.id, error = %e, "failed to persist ticket to database");
                return Err(AppError::Persistence(
                    "ticket recorded in-memory but database persist failed".to_string(),
                ));
            }
        }

        Ok(ticket)
    }

    /// All tickets in the public listing (`isVisible = true`).
    pub fn list_public(&self) -> Vec<Ticket> {
        self.store.find_visible()
    }

    /// All tickets submitted by the given vendor email, regardless of
    /// visibility or status.
    pub fn list_for_vendor(&self, email: &str) -> Vec<Ticket> {
        self.store.find_by_vendor_email(email)
    }

    /// All approved tickets.
    pub fn list_approved(&self) -> Vec<Ticket> {
        self.store.find_approved()
    }

    /// Fetch a single ticket.
    pub fn get(&self, id: &TicketId) -> Result<Ticket, AppError> {
        self.store
            .find_by_id(id)
            .ok_or_else(|| AppError::NotFound(format!("ticket {id} not found")))
    }

    /// Approve a ticket.
    ///
    /// No guard on the current status: any ticket in any status may be
    /// approved at any time, and re-approving succeeds silently. A missing
    /// id yields `matched = 0` rather than an error.
    pub async fn approve(&self, id: &TicketId) -> Result<UpdateReport, AppError> {
        self.set_status(id, TicketStatus::Approved).await
    }

    /// Reject a ticket. Symmetric to [`TicketService::approve`].
    pub async fn reject(&self, id: &TicketId) -> Result<UpdateReport, AppError> {
        self.set_status(id, TicketStatus::Rejected).await
    }

    async fn set_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
    ) -> Result<UpdateReport, AppError> {
        let patch = TicketPatch::status(status);
        let report = self.store.update_fields(id, &patch);
        self.write_through(id, &patch, &report).await?;
        Ok(report)
    }

    /// Set or clear the advertisement flag, enforcing the slot cap.
    ///
    /// Admission control applies only when advertising: if the store-wide
    /// advertised count has reached the cap, the call fails with
    /// `CapacityExceeded` and nothing is written. Removal is always
    /// permitted, uncapped.
    ///
    /// Known limitation: the count and the write are two separate store
    /// operations with no lock spanning them, so two concurrent calls can
    /// both observe `count = cap - 1` and both succeed, overshooting the
    /// cap by one.
    pub async fn set_advertised(
        &self,
        id: &TicketId,
        desired: bool,
    ) -> Result<UpdateReport, AppError> {
        if desired {
            let advertised = self.store.count_advertised();
            if advertised >= self.max_advertised {
                tracing::warn!(
                    ticket_id = %id,
                    advertised,
                    cap = self.max_advertised,
                    "advertisement slots exhausted"
                );
                return Err(AppError::CapacityExceeded {
                    cap: self.max_advertised,
                });
            }
        }

        let patch = TicketPatch::advertised(desired);
        let report = self.store.update_fields(id, &patch);
        self.write_through(id, &patch, &report).await?;
        Ok(report)
    }

    /// Mirror a matched in-memory update to Postgres.
    async fn write_through(
        &self,
        id: &TicketId,
        patch: &TicketPatch,
        report: &UpdateReport,
    ) -> Result<(), AppError> {
        if report.matched == 0 {
            return Ok(());
        }
        if let Some(pool) = &self.db_pool {
            if let Err(e) = crate::db::tickets::update_fields(pool, id, patch).await {
                tracing::error!(ticket_id = %id, error = %e, "failed to persist ticket update to database");
                return Err(AppError::Persistence(
                    "ticket updated in-memory but database persist failed".to_string(),
                ));
            }
        }
        Ok(())
    }
}
