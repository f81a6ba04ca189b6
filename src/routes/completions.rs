use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{CompletionRecord, NewCompletion},
    routes::AppState,
    services::completions,
};

/// Handler for logging a finished exercise
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    user_id: Result<Path<i64>, PathRejection>,
    request: Result<Json<NewCompletion>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CompletionRecord>)> {
    let Path(user_id) = user_id?;
    let Json(request) = request?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        exercise = %request.exercise_name,
        "Recording completion"
    );

    let record = completions::record_completion(
        state.store.clone(),
        user_id,
        request,
        Utc::now().timestamp(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}
