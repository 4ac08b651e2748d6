//! Whitelist management routes.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use warden_types::PeerPubKey;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

/// `GET /whitelist?limit=N`. The scan stops once `limit` allowed peers
/// have been collected; revoked rows do not count against the limit.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let peers = state.store.whitelist()?.allowed_peers(params.limit)?;
    Ok(Json(peers))
}

/// `POST /whitelist/:pub_key`. Idempotent.
pub async fn add(
    State(state): State<AppState>,
    Path(pub_key): Path<String>,
) -> Result<(), ApiError> {
    let peer = PeerPubKey::from_hex(&pub_key)?;
    state.store.whitelist()?.allow(&peer)?;
    Ok(())
}

/// `DELETE /whitelist/:pub_key`. Flips the row to not-allowed rather
/// than removing it; a no-op for unknown peers.
pub async fn remove(
    State(state): State<AppState>,
    Path(pub_key): Path<String>,
) -> Result<(), ApiError> {
    let peer = PeerPubKey::from_hex(&pub_key)?;
    state.store.whitelist()?.revoke(&peer)?;
    Ok(())
}
