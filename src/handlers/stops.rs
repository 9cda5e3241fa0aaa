//! Police log handlers

use axum::{extract::{State, Query}, Json};
use serde::Serialize;

use crate::AppState;
use crate::models::{StopListParams, StopRecord};
use crate::predictor;
use crate::store;

#[derive(Debug, Serialize)]
pub struct StopListResponse {
    pub stops: Vec<StopRecord>,
    pub message: Option<String>,
    pub notices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DurationsResponse {
    pub durations: Vec<String>,
    pub notices: Vec<String>,
}

/// Police logs overview
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<StopListParams>,
) -> Json<StopListResponse> {
    let limit = params
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(state.config.overview_limit);

    let fetched = store::stops_or_empty(state.store.as_ref(), limit).await;
    let message = fetched
        .data
        .is_empty()
        .then(|| "No rows returned from police_logs (or table is empty).".to_string());

    Json(StopListResponse {
        stops: fetched.data,
        message,
        notices: fetched.error.into_iter().collect(),
    })
}

/// Stop duration choices for the prediction form
pub async fn durations(State(state): State<AppState>) -> Json<DurationsResponse> {
    let fetched = store::dataset_or_empty(state.store.as_ref()).await;

    Json(DurationsResponse {
        durations: predictor::distinct_durations(&fetched.data),
        notices: fetched.error.into_iter().collect(),
    })
}
