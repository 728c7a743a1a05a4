//! # Ticket Status State Machine
//!
//! States: `pending` (initial) → `approved` / `rejected`.
//!
//! The transition table is deliberately fully permissive: an approved
//! ticket may be re-approved or rejected later, and vice versa. No terminal
//! state is enforced — the admin endpoints may flip a ticket's status at
//! any time, and re-applying the current status succeeds silently.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Moderation status of a ticket.
///
/// Uses lowercase wire names to match the stored document contract
/// (`"pending"`, `"approved"`, `"rejected"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Submitted by a vendor, awaiting admin review. Initial state.
    #[default]
    Pending,
    /// Approved by the admin; eligible for the approved listing.
    Approved,
    /// Rejected by the admin.
    Rejected,
}

impl TicketStatus {
    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a transition from `self` to `to` is permitted.
    ///
    /// Every transition is legal, including self-transitions.
    pub fn transition_allowed(&self, to: TicketStatus) -> bool {
        use TicketStatus::{Approved, Pending, Rejected};
        match (*self, to) {
            (Pending, Pending | Approved | Rejected) => true,
            (Approved, Pending | Approved | Rejected) => true,
            (Rejected, Pending | Approved | Rejected) => true,
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_pending() {
        assert_eq!(TicketStatus::default(), TicketStatus::Pending);
    }

    #[test]
    fn wire_names_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&TicketStatus::Approved).unwrap(),
            "\"approved\""
        );
        assert_eq!(
            serde_json::to_string(&TicketStatus::Rejected).unwrap(),
            "\"rejected\""
        );
    }

    #[test]
    fn deserializes_from_lowercase() {
        let status: TicketStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, TicketStatus::Approved);
    }

    #[test]
    fn rejects_unknown_status_strings() {
        assert!(serde_json::from_str::<TicketStatus>("\"cancelled\"").is_err());
    }

    #[test]
    fn as_str_matches_serde() {
        for status in [
            TicketStatus::Pending,
            TicketStatus::Approved,
            TicketStatus::Rejected,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn all_transitions_are_permitted() {
        let all = [
            TicketStatus::Pending,
            TicketStatus::Approved,
            TicketStatus::Rejected,
        ];
        for from in all {
            for to in all {
                assert!(
                    from.transition_allowed(to),
                    "{from} -> {to} should be permitted"
                );
            }
        }
    }
}
