//! # Ticket Identifiers
//!
//! [`TicketId`] is the store-native opaque identifier assigned at creation.
//! It is a distinct type — you cannot pass an arbitrary string or a raw
//! UUID where a `TicketId` is expected without going through [`TicketId::parse`]
//! or [`TicketId::from_uuid`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A malformed ticket identifier.
///
/// Raised before any store access: a request naming an id that cannot be a
/// valid identifier never touches persistence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed ticket id {input:?}: {reason}")]
pub struct TicketIdError {
    /// The rejected input, as received.
    pub input: String,
    /// Parser diagnostic.
    pub reason: String,
}

/// Unique identifier for a persisted ticket record.
///
/// Assigned by the store at creation and immutable for the lifetime of the
/// record. Serializes as its canonical UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Create a new random ticket identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID (used when hydrating from the database).
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an identifier from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`TicketIdError`] when the input is not a well-formed
    /// identifier.
    pub fn parse(input: &str) -> Result<Self, TicketIdError> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| TicketIdError {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// Return the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
