//! Signature middleware.
//!
//! Buffers the request body, reconstructs the canonical signing input
//! from the method, the full path with query, and the body bytes, and
//! verifies the `x-auth` header against the configured public key. A
//! denied request gets a fixed 406 response and never reaches a handler.

use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use warden_auth::AUTH_HEADER;

/// Largest body the control plane accepts. The only JSON body on this
/// surface is the reject message, capped far below this.
const MAX_BODY_BYTES: usize = 64 * 1024;

pub async fn require_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return ApiError::Unauthorized.into_response(),
    };

    let path_with_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());

    let header = parts
        .headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !state
        .authenticator
        .authenticate(parts.method.as_str(), path_with_query, &bytes, header)
    {
        return ApiError::Unauthorized.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
