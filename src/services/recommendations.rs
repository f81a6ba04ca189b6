use std::sync::Arc;

use chrono::Utc;

use super::{
    engine::{RecommendationEngine, RecommendationInput},
    progress::category_progress,
};
use crate::{
    db::ExerciseStore,
    error::AppResult,
    models::{Placeholder, RecommendationSet},
};

/// Generates personalized exercise recommendations
///
/// Reads the catalog, the user's history and (for users without history)
/// their age, derives per-tier progress and hands everything to the engine.
/// Never fails: storage problems become the "could not generate" placeholder.
pub async fn get_recommendations(
    store: Arc<dyn ExerciseStore>,
    engine: &RecommendationEngine,
    user_id: i64,
    count: usize,
) -> RecommendationSet {
    match try_recommend(store, engine, user_id, count).await {
        Ok(set) => set,
        Err(e) => {
            tracing::error!(user_id, error = %e, "Could not load recommendation data");
            RecommendationSet::placeholder(None, Placeholder::Unavailable)
        }
    }
}

async fn try_recommend(
    store: Arc<dyn ExerciseStore>,
    engine: &RecommendationEngine,
    user_id: i64,
    count: usize,
) -> AppResult<RecommendationSet> {
    let catalog = store.fetch_catalog().await?;
    let history = store.fetch_history(user_id).await?;
    let user_age = if history.is_empty() {
        store.fetch_user_age(user_id).await?
    } else {
        None
    };

    let input = RecommendationInput {
        user_id,
        catalog: &catalog,
        history: &history,
        requested_count: count,
        progress: category_progress(&catalog, &history),
        user_age,
        now: Utc::now().timestamp(),
    };

    let set = {
        let mut rng = rand::thread_rng();
        engine.recommend(&input, &mut rng)
    };

    tracing::info!(
        user_id,
        requested = count,
        returned = set.len(),
        strategy = ?set.strategy,
        "Recommendations generated"
    );

    Ok(set)
}
