//! Request error taxonomy and its response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;
use warden_store::StoreError;
use warden_types::ValidationError;

/// Errors a control-plane request can end in.
///
/// Auth failures carry a fixed body that reveals nothing about which
/// part of the check failed. Validation failures name the specific
/// defect. Store failures are logged in full server-side and surface
/// only a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized.")]
    Unauthorized,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => {
                (StatusCode::NOT_ACCEPTABLE, "Unauthorized.").into_response()
            }
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            ApiError::Store(e) => {
                error!(error = %e, "Store failure while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
