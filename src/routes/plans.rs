use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use std::sync::Arc;

use crate::{error::AppResult, models::WorkoutPlan, routes::AppState, services::plan};

/// Handler for the weekly plan of a focus area
///
/// The plan is redrawn at most once every seven days.
pub async fn weekly(
    State(state): State<Arc<AppState>>,
    focus_area: Result<Path<String>, PathRejection>,
) -> AppResult<Json<WorkoutPlan>> {
    let Path(focus_area) = focus_area?;
    let plan = plan::get_plan(state.store.clone(), &focus_area).await?;
    Ok(Json(plan))
}
