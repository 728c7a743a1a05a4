//! # API Route Modules
//!
//! - `tickets` — the whole ticket marketplace surface: vendor submission,
//!   public and vendor-scoped listings, admin approve/reject, and the
//!   admission-controlled advertisement toggle.

pub mod tickets;
