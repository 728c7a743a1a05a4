//! # Ticket API
//!
//! The marketplace surface: vendor submission, public and vendor-scoped
//! listings, admin approve/reject, and the admission-controlled
//! advertisement toggle.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;
use bmt_core::{NewTicket, Ticket, TicketId, UpdateReport};

/// Body of the advertisement toggle.
///
/// A deliberately strict shape: anything but a JSON boolean in
/// `isAdvertised` is rejected before storage is touched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdvertiseRequest {
    #[serde(rename = "isAdvertised")]
    pub is_advertised: bool,
}

/// Extract a JSON body, mapping deserialization errors to
/// [`AppError::InvalidArgument`].
fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::InvalidArgument(err.body_text()))
}

/// Build the ticket router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tickets", post(submit).get(list_public))
        .route("/tickets/:id", get(get_ticket))
        .route("/my-tickets/:email", get(my_tickets))
        .route("/approved-tickets", get(approved_tickets))
        .route("/tickets/approve/:id", patch(approve_ticket))
        .route("/tickets/reject/:id", patch(reject_ticket))
        .route("/advertise-tickets/:id", patch(advertise_ticket))
}

/// POST /tickets — Submit a ticket.
#[utoipa::path(
    post,
    path = "/tickets",
    request_body = NewTicket,
    responses(
        (status = 201, description = "Ticket created", body = Ticket),
        (status = 400, description = "Malformed payload", body = crate::error::ErrorBody),
    ),
    tag = "tickets"
)]
pub(crate) async fn submit(
    State(state): State<AppState>,
    body: Result<Json<NewTicket>, JsonRejection>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let new = extract_json(body)?;
    let ticket = state.tickets.submit(new).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /tickets — Public listing (`isVisible = true` only).
#[utoipa::path(
    get,
    path = "/tickets",
    responses(
        (status = 200, description = "Visible tickets", body = [Ticket]),
    ),
    tag = "tickets"
)]
pub(crate) async fn list_public(State(state): State<AppState>) -> Json<Vec<Ticket>> {
    Json(state.tickets.list_public())
}

/// GET /tickets/:id — Fetch a single ticket.
#[utoipa::path(
    get,
    path = "/tickets/{id}",
    params(("id" = String, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket found", body = Ticket),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "tickets"
)]
pub(crate) async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, AppError> {
    let id = TicketId::parse(&id)?;
    Ok(Json(state.tickets.get(&id)?))
}

/// GET /my-tickets/:email — Tickets submitted by a vendor.
///
/// The email is a plain path parameter, not a verified identity; callers
/// see whatever vendor scope they name.
#[utoipa::path(
    get,
    path = "/my-tickets/{email}",
    params(("email" = String, Path, description = "Vendor email")),
    responses(
        (status = 200, description = "Tickets for the vendor", body = [Ticket]),
    ),
    tag = "tickets"
)]
pub(crate) async fn my_tickets(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Json<Vec<Ticket>> {
    Json(state.tickets.list_for_vendor(&email))
}

/// GET /approved-tickets — All approved tickets.
#[utoipa::path(
    get,
    path = "/approved-tickets",
    responses(
        (status = 200, description = "Approved tickets", body = [Ticket]),
    ),
    tag = "tickets"
)]
pub(crate) async fn approved_tickets(State(state): State<AppState>) -> Json<Vec<Ticket>> {
    Json(state.tickets.list_approved())
}

/// PATCH /tickets/approve/:id — Approve a ticket.
#[utoipa::path(
    patch,
    path = "/tickets/approve/{id}",
    params(("id" = String, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Update applied", body = UpdateReport),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
    ),
    tag = "tickets"
)]
pub(crate) async fn approve_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateReport>, AppError> {
    let id = TicketId::parse(&id)?;
    Ok(Json(state.tickets.approve(&id).await?))
}

/// PATCH /tickets/reject/:id — Reject a ticket.
#[utoipa::path(
    patch,
    path = "/tickets/reject/{id}",
    params(("id" = String, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Update applied", body = UpdateReport),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
    ),
    tag = "tickets"
)]
pub(crate) async fn reject_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateReport>, AppError> {
    let id = TicketId::parse(&id)?;
    Ok(Json(state.tickets.reject(&id).await?))
}

/// PATCH /advertise-tickets/:id — Set or clear the advertisement flag.
///
/// Advertising is admission-controlled: when all promotional slots are
/// occupied the call fails with 400 `CAPACITY_EXCEEDED` and nothing is
/// written. Removal is always permitted.
#[utoipa::path(
    patch,
    path = "/advertise-tickets/{id}",
    params(("id" = String, Path, description = "Ticket ID")),
    request_body = AdvertiseRequest,
    responses(
        (status = 200, description = "Update applied", body = UpdateReport),
        (status = 400, description = "Non-boolean flag, malformed id, or capacity exceeded", body = crate::error::ErrorBody),
    ),
    tag = "tickets"
)]
pub(crate) async fn advertise_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<AdvertiseRequest>, JsonRejection>,
) -> Result<Json<UpdateReport>, AppError> {
    let req = extract_json(body)?;
    let id = TicketId::parse(&id)?;
    Ok(Json(state.tickets.set_advertised(&id, req.is_advertised).await?))
}
