//! Reject-message policy routes.

use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;
use warden_types::{RejectMessage, ValidationError, DEFAULT_REJECT_MESSAGE};

/// `GET /rejectMessage`. Returns the stored message, or the built-in
/// default when none is stored.
pub async fn current(State(state): State<AppState>) -> Result<String, ApiError> {
    let message = state.store.policy()?.reject_message()?;
    Ok(message.unwrap_or_else(|| DEFAULT_REJECT_MESSAGE.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub struct SetMessageBody {
    #[serde(default)]
    message: Option<String>,
}

/// `POST /rejectMessage` with body `{"message": "..."}`. A missing or
/// empty message is a client error, as is one over the protocol limit.
/// A non-JSON body is treated the same as a missing message.
pub async fn set(State(state): State<AppState>, body: Bytes) -> Result<(), ApiError> {
    let parsed: SetMessageBody = serde_json::from_slice(&body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|m| !m.is_empty())
        .ok_or(ValidationError::MissingMessage)?;
    let message = RejectMessage::new(message)?;
    state.store.policy()?.set_reject_message(&message)?;
    Ok(())
}

/// `DELETE /rejectMessage`. Reverts to the built-in default.
pub async fn clear(State(state): State<AppState>) -> Result<(), ApiError> {
    state.store.policy()?.clear_reject_message()?;
    Ok(())
}
