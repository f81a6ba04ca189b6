use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{RecommendationQuery, RecommendationSet},
    routes::AppState,
    services::recommendations,
};

/// Handler for the recommendations endpoint
///
/// Always answers 200 for a well-formed count; when nothing can be suggested
/// the list holds a single message with an empty category. Large counts are
/// bounded by the number of uncompleted exercises.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    user_id: Result<Path<i64>, PathRejection>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationSet>> {
    let Path(user_id) = user_id?;
    let Query(query) = query?;
    let count = query.count.unwrap_or(state.default_recommendation_count);

    tracing::info!(
        request_id = %request_id,
        user_id,
        count,
        "Processing recommendation request"
    );

    let set =
        recommendations::get_recommendations(state.store.clone(), &state.engine, user_id, count)
            .await;

    Ok(Json(set))
}
