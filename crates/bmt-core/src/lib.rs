//! # bmt-core — Foundational Types for the BookMyTrip Backend
//!
//! Domain types shared by the ticket store and the HTTP layer:
//!
//! - [`TicketId`] — store-native opaque identifier, validated at parse time.
//! - [`TicketStatus`] — the submit → approve/reject state machine.
//! - [`Ticket`], [`Vendor`], [`NewTicket`] — the persisted record and its
//!   creation payload, with arbitrary vendor-supplied fields carried as an
//!   opaque flattened payload.
//! - [`TicketPatch`], [`UpdateReport`] — conditional partial updates and
//!   their matched/modified result counts.
//!
//! This crate has no I/O and no business rules; the slot admission control
//! lives in `bmt-api`, persistence in `bmt-store`.

pub mod id;
pub mod status;
pub mod ticket;

pub use id::{TicketId, TicketIdError};
pub use status::TicketStatus;
pub use ticket::{NewTicket, Ticket, TicketPatch, UpdateReport, Vendor, RESERVED_FIELDS};
