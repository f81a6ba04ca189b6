use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{CatalogQuery, ExerciseRecord},
    routes::AppState,
};

/// Handler for browsing the exercise catalog, optionally filtered by tier
pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> AppResult<Json<Vec<ExerciseRecord>>> {
    let Query(query) = query?;
    let catalog = match query.exercise_type {
        Some(exercise_type) => state.store.fetch_catalog_by_type(exercise_type).await?,
        None => state.store.fetch_catalog().await?,
    };
    Ok(Json(catalog))
}
