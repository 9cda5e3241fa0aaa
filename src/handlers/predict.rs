//! Outcome prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use crate::{AppState, AppResult};
use crate::models::{PredictionForm, PredictionResponse};
use crate::predictor;
use crate::store;

/// Predict violation and stop outcome for a new police log
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionForm>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(form) = payload?;
    form.validate()?;

    // A failed load behaves like an empty history and yields the fallback
    let dataset = store::dataset_or_empty(state.store.as_ref()).await;

    let criteria = form.criteria();
    let (prediction, matched) = predictor::predict(&dataset.data, &criteria);

    tracing::info!(
        "Prediction from {} of {} records: {} / {}",
        matched,
        dataset.data.len(),
        prediction.predicted_violation,
        prediction.predicted_outcome
    );

    Ok(Json(PredictionResponse {
        summary: form.summary(&prediction),
        matched_records: matched,
        prediction,
        input: form,
        notices: dataset.error.into_iter().collect(),
    }))
}
