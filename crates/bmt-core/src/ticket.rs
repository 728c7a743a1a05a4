//! # Ticket Records
//!
//! The persisted ticket document and its creation payload. Beyond the
//! fields the lifecycle logic owns (`status`, `isAdvertised`) and the
//! visibility flag set at creation, vendors attach arbitrary payload
//! (route, price, dates, seat class, …) which is carried opaquely via
//! `#[serde(flatten)]` and returned unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::id::TicketId;
use crate::status::TicketStatus;

/// Wire-level field names owned by the lifecycle logic.
///
/// Stripped from the opaque payload at creation so a vendor-supplied
/// `"status"` (or similar) cannot shadow the managed fields when the
/// flattened record is serialized.
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "vendor",
    "status",
    "isVisible",
    "isAdvertised",
    "createdAt",
];

/// The submitting party. Identified by email; any additional vendor
/// metadata (display name, phone, …) rides along opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Vendor {
    /// Identifies the vendor for ownership-scoped queries.
    pub email: String,
    /// Opaque vendor metadata, preserved verbatim.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl Vendor {
    /// Construct a vendor with no extra metadata.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: Map::new(),
        }
    }
}

/// A persisted ticket record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Assigned by the store at creation; immutable.
    pub id: TicketId,
    /// The submitting vendor.
    pub vendor: Vendor,
    /// Moderation status. Absent in documents written before moderation
    /// existed, hence the serde default (`pending`).
    #[serde(default)]
    pub status: TicketStatus,
    /// Whether the ticket appears in the public listing. Set by the caller
    /// at creation; never mutated by the lifecycle logic.
    pub is_visible: bool,
    /// Whether the ticket occupies one of the promotional advertisement
    /// slots. Mutated only through the admission-controlled operation.
    #[serde(default)]
    pub is_advertised: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Arbitrary vendor-supplied payload, persisted and returned unchanged.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// Creation payload for a ticket submission.
///
/// No schema validation is applied beyond deserialization: whatever the
/// vendor sends (minus the managed fields) is persisted as-is.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    /// The submitting vendor.
    pub vendor: Vendor,
    /// Public-listing visibility, chosen by the caller. Defaults to hidden.
    #[serde(default)]
    pub is_visible: bool,
    /// Arbitrary vendor-supplied payload.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// A conditional partial update: only the named fields are touched, all
/// others are left as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketPatch {
    /// New moderation status, if being set.
    pub status: Option<TicketStatus>,
    /// New advertisement flag, if being set.
    pub is_advertised: Option<bool>,
}

impl TicketPatch {
    /// A patch that sets only the status.
    pub fn status(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            is_advertised: None,
        }
    }

    /// A patch that sets only the advertisement flag.
    pub fn advertised(is_advertised: bool) -> Self {
        Self {
            status: None,
            is_advertised: Some(is_advertised),
        }
    }

    /// Apply the patch to a record in place.
    ///
    /// Returns whether any field actually changed value — setting a field
    /// to its current value matches but does not modify.
    pub fn apply_to(&self, ticket: &mut Ticket) -> bool {
        let mut modified = false;
        if let Some(status) = self.status {
            if ticket.status != status {
                ticket.status = status;
                modified = true;
            }
        }
        if let Some(is_advertised) = self.is_advertised {
            if ticket.is_advertised != is_advertised {
                ticket.is_advertised = is_advertised;
                modified = true;
            }
        }
        modified
    }

    /// Whether the patch names no fields at all.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.is_advertised.is_none()
    }
}

/// Result of a conditional update: whether a matching record was found and
/// whether the update changed its state.
///
/// Wire names are `matchedCount` / `modifiedCount`, the update-result
/// shape this API has always returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateReport {
    /// Number of records matching the id (0 or 1).
    #[serde(rename = "matchedCount")]
    pub matched: u64,
    /// Number of records whose state actually changed (0 or 1).
    #[serde(rename = "modifiedCount")]
    pub modified: u64,
}

impl UpdateReport {
    /// Report for a missing record.
    pub fn unmatched() -> Self {
        Self {
            matched: 0,
            modified: 0,
        }
    }

    /// Report for a matched record.
    pub fn matched(modified: bool) -> Self {
        Self {
            matched: 1,
            modified: u64::from(modified),
        }
    }
}
