//! # Authentication Middleware
//!
//! Bearer-token collaborator yielding a verified caller email.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {email}:{secret}
//! ```
//!
//! The secret is compared in constant time against the configured value;
//! on success the email part is trusted as the caller's identity and a
//! [`VerifiedCaller`] is injected into request extensions.
//!
//! When `AuthConfig.token` is `None` (the default), the middleware passes
//! every request through untouched and no route is gated. Setting
//! `BMT_AUTH_TOKEN` turns authentication on for the whole ticket API.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;

use crate::error::{AppError, ErrorBody, ErrorDetail};

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Identity of the authenticated caller: the verified email the token
/// carried. Available to handlers via `FromRequestParts` once the
/// middleware has run with authentication enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCaller {
    pub email: String,
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for VerifiedCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedCaller>()
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("no verified caller in request context".into()))
    }
}

/// Constant-time comparison of bearer secrets.
///
/// When lengths differ, performs a dummy comparison to avoid leaking
/// length information through timing variance.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer token of the form `{email}:{secret}`.
///
/// The secret must match the configured value; the email part is then
/// trusted as the caller's verified identity.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<VerifiedCaller, String> {
    let Some((email, secret)) = provided.split_once(':') else {
        return Err("invalid token format, expected {email}:{secret}".into());
    };

    if !constant_time_token_eq(secret, expected_secret) {
        return Err("invalid bearer token".into());
    }
    if email.is_empty() {
        return Err("token carries no caller email".into());
    }

    Ok(VerifiedCaller {
        email: email.to_string(),
    })
}

/// Extract and validate the Bearer token from the Authorization header.
///
/// Injects the [`VerifiedCaller`] into request extensions for downstream
/// handlers. When no token is configured, requests pass through with no
/// identity attached and nothing is gated.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_config = request.extensions().get::<AuthConfig>().cloned();

    match auth_config {
        Some(AuthConfig {
            token: Some(ref expected),
        }) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(header_value) if header_value.starts_with("Bearer ") => {
                    let provided = &header_value[7..];
                    match parse_bearer_token(provided, expected) {
                        Ok(caller) => {
                            request.extensions_mut().insert(caller);
                            next.run(request).await
                        }
                        Err(msg) => {
                            tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                            unauthenticated_response(&msg)
                        }
                    }
                }
                Some(_) => {
                    tracing::warn!("authentication failed: non-Bearer authorization scheme");
                    unauthenticated_response("authorization header must use Bearer scheme")
                }
                None => {
                    tracing::warn!("authentication failed: missing authorization header");
                    unauthenticated_response("missing authorization header")
                }
            }
        }
        _ => next.run(request).await,
    }
}

fn unauthenticated_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHENTICATED".to_string(),
            message: message.to_string(),
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
