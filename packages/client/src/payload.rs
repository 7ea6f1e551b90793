//! Request bodies for the nearby endpoints.
//!
//! `max_walk_time` is sent only when it differs from
//! [`DEFAULT_MAX_WALK_TIME`]. Leaving the default out keeps payloads
//! minimal and lets the backend own its default.

use chrono::Utc;
use parking_finder_parking_models::{DEFAULT_MAX_WALK_TIME, LocationQuery, PredictTime};
use serde::Serialize;

/// Body of `POST /parking/nearby`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyPayload {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_walk_time: Option<f64>,
}

/// Body of `POST /parking/nearby/predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictPayload {
    #[serde(flatten)]
    pub nearby: NearbyPayload,
    /// Arrival time as sent on the wire.
    pub datetime: String,
}

/// Returns `max_walk_time` unless it is absent or equal to the backend
/// default.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn effective_max_walk_time(max_walk_time: Option<f64>) -> Option<f64> {
    max_walk_time.filter(|minutes| *minutes != DEFAULT_MAX_WALK_TIME)
}

/// Builds the nearby body. `query.address` is trusted to be non-empty.
#[must_use]
pub fn build_nearby_payload(query: &LocationQuery) -> NearbyPayload {
    debug_assert!(!query.address.is_empty(), "nearby query without address");
    NearbyPayload {
        address: query.address.clone(),
        max_walk_time: effective_max_walk_time(query.max_walk_time),
    }
}

/// Builds the predict body.
///
/// A typed arrival time is rendered as ISO-8601 UTC; a string is passed
/// through unchanged. A query without an arrival time predicts for now.
#[must_use]
pub fn build_predict_payload(query: &LocationQuery) -> PredictPayload {
    let datetime = query
        .datetime
        .as_ref()
        .map_or_else(|| PredictTime::At(Utc::now()).to_wire(), PredictTime::to_wire);

    PredictPayload {
        nearby: build_nearby_payload(query),
        datetime,
    }
}
