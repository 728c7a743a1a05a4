//! # bmt-store — The Ticket Store
//!
//! Thread-safe, cloneable in-memory store of [`Ticket`] records. Owns
//! persistence and retrieval only; it applies no business validation —
//! the lifecycle rules (status transitions, advertisement-slot admission
//! control) live in `bmt-api`.
//!
//! All operations are synchronous (the RwLock is `parking_lot`, not
//! `tokio::sync`) because the lock is never held across `.await` points.
//! `parking_lot::RwLock` is non-poisonable — a panicking writer does not
//! permanently corrupt the store.
//!
//! Durable mirroring to Postgres is layered on top by the API crate
//! (write-through after each mutation, hydration via [`TicketStore::insert`]
//! on startup); this crate stays I/O-free.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use bmt_core::{NewTicket, Ticket, TicketId, TicketPatch, TicketStatus, UpdateReport, RESERVED_FIELDS};

/// The ticket collection.
///
/// Cloning shares the underlying data (`Arc` internals), so the store can
/// be handed to every request handler cheaply.
#[derive(Debug)]
pub struct TicketStore {
    data: Arc<RwLock<HashMap<TicketId, Ticket>>>,
}

impl Clone for TicketStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl TicketStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Persist a new record from a submission payload.
    ///
    /// The store assigns the id and creation timestamp; `status` starts at
    /// its default (`pending`) and the advertisement flag at `false`.
    /// Managed field names are stripped from the opaque payload so they
    /// cannot shadow the record's own fields on the wire.
    pub fn create(&self, new: NewTicket) -> Ticket {
        let mut extra = new.extra;
        for field in RESERVED_FIELDS {
            extra.remove(*field);
        }
        let ticket = Ticket {
            id: TicketId::new(),
            vendor: new.vendor,
            status: TicketStatus::default(),
            is_visible: new.is_visible,
            is_advertised: false,
            created_at: chrono::Utc::now(),
            extra,
        };
        self.data.write().insert(ticket.id, ticket.clone());
        ticket
    }

    /// Insert a fully-formed record, keyed by its id. Returns the previous
    /// value if the key existed. Used when hydrating from the database.
    pub fn insert(&self, ticket: Ticket) -> Option<Ticket> {
        self.data.write().insert(ticket.id, ticket)
    }

    /// All records included in the public listing (`isVisible = true`).
    /// No ordering guarantee.
    pub fn find_visible(&self) -> Vec<Ticket> {
        self.data
            .read()
            .values()
            .filter(|t| t.is_visible)
            .cloned()
            .collect()
    }

    /// All records submitted by the given vendor email, unfiltered by
    /// visibility or status.
    pub fn find_by_vendor_email(&self, email: &str) -> Vec<Ticket> {
        self.data
            .read()
            .values()
            .filter(|t| t.vendor.email == email)
            .cloned()
            .collect()
    }

    /// All records with `status = approved`.
    pub fn find_approved(&self) -> Vec<Ticket> {
        self.data
            .read()
            .values()
            .filter(|t| t.status == TicketStatus::Approved)
            .cloned()
            .collect()
    }

    /// Retrieve a record by id.
    pub fn find_by_id(&self, id: &TicketId) -> Option<Ticket> {
        self.data.read().get(id).cloned()
    }

    /// Apply a partial update to exactly the fields the patch names,
    /// leaving all others untouched.
    ///
    /// The report says whether a matching record was found and whether the
    /// update changed its state; setting a field to its current value
    /// matches without modifying. No side effects beyond the single record.
    pub fn update_fields(&self, id: &TicketId, patch: &TicketPatch) -> UpdateReport {
        let mut guard = self.data.write();
        match guard.get_mut(id) {
            Some(ticket) => UpdateReport::matched(patch.apply_to(ticket)),
            None => UpdateReport::unmatched(),
        }
    }

    /// Count records with `isAdvertised = true` across the whole store.
    pub fn count_advertised(&self) -> usize {
        self.data.read().values().filter(|t| t.is_advertised).count()
    }

    /// List all records. No ordering guarantee.
    pub fn list(&self) -> Vec<Ticket> {
        self.data.read().values().cloned().collect()
    }

    /// Check if a record exists.
    pub fn contains(&self, id: &TicketId) -> bool {
        self.data.read().contains_key(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new()
    }
}
