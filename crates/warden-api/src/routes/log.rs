//! Persisted-log routes.
//!
//! Log keys are `{epoch_ms:013}_{severity}`, so a zero-padded
//! millisecond string is a valid range bound: every key at that
//! timestamp sorts after it, and bounds from any date compare exactly.

use crate::dates::parse_date;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use warden_store::RangeFilter;
use warden_types::{LogRecord, ValidationError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// `GET /log?limit&startDate&endDate`. `startDate` is inclusive,
/// `endDate` exclusive.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<LogRecord>>, ApiError> {
    let mut filter = RangeFilter::new();

    if let Some(raw) = &params.start_date {
        let ms = parse_date(raw).ok_or(ValidationError::InvalidDate { param: "startDate" })?;
        filter = filter.gte(LogRecord::timestamp_key(ms));
    }
    if let Some(raw) = &params.end_date {
        let ms = parse_date(raw).ok_or(ValidationError::InvalidDate { param: "endDate" })?;
        filter = filter.lt(LogRecord::timestamp_key(ms));
    }
    if let Some(limit) = params.limit {
        filter = filter.limit(limit);
    }

    Ok(Json(state.store.log()?.records(&filter)?))
}

#[derive(Debug, Deserialize)]
pub struct PurgeParams {
    pub before: Option<String>,
    pub after: Option<String>,
    pub limit: Option<usize>,
    pub desc: Option<String>,
}

/// `DELETE /log?before&after&limit&desc`. At least one bound is
/// required. `desc` only matters together with `limit`: it purges the
/// newest matching records instead of the oldest.
pub async fn purge(
    State(state): State<AppState>,
    Query(params): Query<PurgeParams>,
) -> Result<(), ApiError> {
    if params.after.is_none() && params.before.is_none() {
        return Err(ValidationError::MissingDateBounds.into());
    }

    let mut filter = RangeFilter::new();

    if let Some(raw) = &params.after {
        let ms = parse_date(raw).ok_or(ValidationError::InvalidDateBound { param: "after" })?;
        filter = filter.gt(LogRecord::timestamp_key(ms));
    }
    if let Some(raw) = &params.before {
        let ms = parse_date(raw).ok_or(ValidationError::InvalidDateBound { param: "before" })?;
        filter = filter.lt(LogRecord::timestamp_key(ms));
    }
    if let Some(limit) = params.limit {
        filter = filter.limit(limit);
        if is_truthy(params.desc.as_deref()) {
            filter = filter.reverse(true);
        }
    }

    state.store.log()?.purge(&filter)?;
    Ok(())
}

fn is_truthy(raw: Option<&str>) -> bool {
    matches!(raw, Some(v) if v.eq_ignore_ascii_case("true") || v == "1")
}
