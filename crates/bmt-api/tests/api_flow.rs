//! End-to-end flow tests against the assembled application router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bmt_api::{app, AppConfig, AppState};
use bmt_core::{Ticket, TicketStatus, UpdateReport};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn submit(app: &Router, email: &str) -> Ticket {
    let body = format!(
        r#"{{"vendor":{{"email":"{email}","name":"Vendor"}},"isVisible":true,"from":"Dhaka","to":"Chittagong","price":1200}}"#
    );
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/tickets", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

#[tokio::test]
async fn full_ticket_lifecycle() {
    let app = app(AppState::new());

    // Vendor submits a ticket; it appears in the public listing as pending.
    let ticket = submit(&app, "vendor@example.com").await;
    assert_eq!(ticket.status, TicketStatus::Pending);
    assert_eq!(ticket.extra["price"], 1200);

    let listed: Vec<Ticket> = body_json(
        app.clone().oneshot(get_request("/tickets")).await.unwrap(),
    )
    .await;
    assert_eq!(listed.len(), 1);

    // Admin approves it.
    let resp = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/tickets/approve/{}", ticket.id),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let report: UpdateReport = body_json(resp).await;
    assert_eq!(report, UpdateReport { matched: 1, modified: 1 });

    // The ticket shows up approved.
    let fetched: Ticket = body_json(
        app.clone()
            .oneshot(get_request(&format!("/tickets/{}", ticket.id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(fetched.status, TicketStatus::Approved);

    let approved: Vec<Ticket> = body_json(
        app.clone()
            .oneshot(get_request("/approved-tickets"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(approved.len(), 1);

    // The vendor sees it in their own listing.
    let mine: Vec<Ticket> = body_json(
        app.clone()
            .oneshot(get_request("/my-tickets/vendor@example.com"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn advertisement_slots_fill_and_free() {
    let app = app(AppState::new());

    // Fill all six advertisement slots.
    let mut advertised = Vec::new();
    for i in 0..6 {
        let ticket = submit(&app, &format!("vendor{i}@example.com")).await;
        let resp = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &format!("/advertise-tickets/{}", ticket.id),
                r#"{"isAdvertised":true}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        advertised.push(ticket);
    }

    // The seventh is refused.
    let overflow = submit(&app, "late@example.com").await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/advertise-tickets/{}", overflow.id),
            r#"{"isAdvertised":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = body_json(resp).await;
    assert_eq!(err["error"]["code"], "CAPACITY_EXCEEDED");

    // Freeing one slot lets the latecomer in.
    let resp = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/advertise-tickets/{}", advertised[0].id),
            r#"{"isAdvertised":false}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/advertise-tickets/{}", overflow.id),
            r#"{"isAdvertised":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn authenticated_app_requires_bearer_token() {
    let config = AppConfig {
        auth_token: Some("hub-secret".to_string()),
        ..AppConfig::default()
    };
    let app = app(AppState::with_config(config, None));

    // Anonymous request is refused.
    let resp = app.clone().oneshot(get_request("/tickets")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // With a valid token the same request succeeds.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/tickets")
                .header("Authorization", "Bearer admin@example.com:hub-secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Health stays open.
    let resp = app
        .oneshot(get_request("/health/liveness"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
