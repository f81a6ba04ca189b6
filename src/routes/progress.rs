use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use std::sync::Arc;

use crate::{error::AppResult, models::ProgressSummary, routes::AppState, services::progress};

/// Handler for the progress overview endpoint
pub async fn summary(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ProgressSummary>> {
    let Path(user_id) = user_id?;
    let summary = progress::get_progress(state.store.clone(), user_id).await?;
    Ok(Json(summary))
}
