use axum::{
    extract::{Path, State},
    Json,
};
use rand::rng;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::models::SkillRecord;
use crate::state::AppState;
use crate::store::seed::{generate_mock_records, DEFAULT_RECORD_COUNT};

/// GET /api/manpower
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<SkillRecord>>, AppError> {
    let records = state.records.list().await?;
    info!(count = records.len(), backend = state.records.backend(), "Listed records");
    Ok(Json(records))
}

/// PUT /api/manpower/:id
///
/// Whole-record replacement. The id in the path wins over any id in the body.
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(record): Json<SkillRecord>,
) -> Result<Json<SkillRecord>, AppError> {
    let saved = state.records.replace(id, record).await?;
    Ok(Json(saved))
}

/// DELETE /api/manpower/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.records.remove(id).await?;
    Ok(Json(json!({ "message": "Record deleted" })))
}

/// POST /api/reset-data
///
/// Replaces the local store with freshly generated mock records.
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let records = generate_mock_records(&mut rng(), DEFAULT_RECORD_COUNT);
    state.records.overwrite(records).await?;
    info!(count = DEFAULT_RECORD_COUNT, "Data reset");
    Ok(Json(json!({ "message": "Data reset successfully" })))
}
