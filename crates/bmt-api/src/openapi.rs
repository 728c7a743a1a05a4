//! OpenAPI document for the ticket marketplace API.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::routes;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BookMyTrip Ticket API",
        description = "Travel ticket marketplace: vendor submission, admin review, and admission-controlled advertisement.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        routes::tickets::submit,
        routes::tickets::list_public,
        routes::tickets::get_ticket,
        routes::tickets::my_tickets,
        routes::tickets::approved_tickets,
        routes::tickets::approve_ticket,
        routes::tickets::reject_ticket,
        routes::tickets::advertise_ticket,
    ),
    components(schemas(
        bmt_core::Ticket,
        bmt_core::NewTicket,
        bmt_core::Vendor,
        bmt_core::TicketId,
        bmt_core::TicketStatus,
        bmt_core::UpdateReport,
        routes::tickets::AdvertiseRequest,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "tickets", description = "Ticket lifecycle and advertisement")
    )
)]
pub struct ApiDoc;

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Router exposing the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}
