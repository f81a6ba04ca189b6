use std::sync::Arc;

use super::{
    redis::{Cache, CacheKey},
    store::ExerciseStore,
};
use crate::{
    cached,
    error::AppResult,
    models::{
        CompletedExercise, CompletionRecord, ExerciseRecord, ExerciseType, PendingCompletion,
        WorkoutPlan,
    },
};

/// `ExerciseStore` decorator serving the read-only catalog from Redis
///
/// History, ages, plans and writes always go to the inner store, so a freshly
/// logged completion is visible to the next recommendation request.
pub struct CachedExerciseStore {
    inner: Arc<dyn ExerciseStore>,
    cache: Cache,
    ttl_secs: u64,
}

impl CachedExerciseStore {
    pub fn new(inner: Arc<dyn ExerciseStore>, cache: Cache, ttl_secs: u64) -> Self {
        Self {
            inner,
            cache,
            ttl_secs,
        }
    }
}

#[async_trait::async_trait]
impl ExerciseStore for CachedExerciseStore {
    async fn fetch_catalog(&self) -> AppResult<Vec<ExerciseRecord>> {
        cached!(
            self.cache,
            CacheKey::Catalog,
            self.ttl_secs,
            self.inner.fetch_catalog()
        )
    }

    async fn fetch_catalog_by_type(
        &self,
        exercise_type: ExerciseType,
    ) -> AppResult<Vec<ExerciseRecord>> {
        cached!(
            self.cache,
            CacheKey::CatalogByType(exercise_type),
            self.ttl_secs,
            self.inner.fetch_catalog_by_type(exercise_type)
        )
    }

    async fn fetch_exercise(&self, name: &str) -> AppResult<Option<ExerciseRecord>> {
        cached!(
            self.cache,
            CacheKey::Exercise(name.to_string()),
            self.ttl_secs,
            self.inner.fetch_exercise(name)
        )
    }

    async fn fetch_history(&self, user_id: i64) -> AppResult<Vec<CompletedExercise>> {
        self.inner.fetch_history(user_id).await
    }

    async fn fetch_user_age(&self, user_id: i64) -> AppResult<Option<i64>> {
        self.inner.fetch_user_age(user_id).await
    }

    async fn user_exists(&self, user_id: i64) -> AppResult<bool> {
        self.inner.user_exists(user_id).await
    }

    async fn record_completion(
        &self,
        completion: PendingCompletion,
    ) -> AppResult<CompletionRecord> {
        self.inner.record_completion(completion).await
    }

    async fn fetch_plan(&self, focus_area: &str) -> AppResult<Option<WorkoutPlan>> {
        self.inner.fetch_plan(focus_area).await
    }

    async fn replace_plan(&self, plan: WorkoutPlan) -> AppResult<()> {
        self.inner.replace_plan(plan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{redis::create_redis_client, store::MockExerciseStore, CacheWriterHandle};
    use crate::models::EnergyLevel;

    // Nothing listens on port 1, so every cache read fails fast
    async fn unreachable_cache(
        inner: MockExerciseStore,
    ) -> (CachedExerciseStore, CacheWriterHandle) {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client).await;
        (CachedExerciseStore::new(Arc::new(inner), cache, 60), handle)
    }

    fn history_entry() -> CompletedExercise {
        CompletedExercise {
            exercise_name: "Squats".to_string(),
            focus_area: Some("muscle strengthening".to_string()),
            exercise_type: Some("medium".to_string()),
            target_body_part: Some("leg".to_string()),
            energy_level: EnergyLevel::High,
            completed_at: 1_000,
            duration_secs: Some(60),
            reps: None,
        }
    }

    #[tokio::test]
    async fn test_catalog_falls_back_to_inner_store_when_redis_is_down() {
        let mut inner = MockExerciseStore::new();
        inner.expect_fetch_catalog().times(1).returning(|| {
            Ok(vec![ExerciseRecord::new(
                "Squats",
                "muscle strengthening",
                "medium",
                "leg",
            )])
        });
        let (store, _handle) = unreachable_cache(inner).await;

        let catalog = store.fetch_catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "Squats");
    }

    #[tokio::test]
    async fn test_exercise_lookup_falls_back_to_inner_store() {
        let mut inner = MockExerciseStore::new();
        inner
            .expect_fetch_exercise()
            .times(1)
            .returning(|_| Ok(None));
        let (store, _handle) = unreachable_cache(inner).await;

        assert_eq!(store.fetch_exercise("Moonwalk").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_history_and_age_are_always_delegated() {
        let mut inner = MockExerciseStore::new();
        inner
            .expect_fetch_history()
            .times(2)
            .returning(|_| Ok(vec![history_entry()]));
        inner
            .expect_fetch_user_age()
            .times(1)
            .returning(|_| Ok(Some(33)));
        inner.expect_user_exists().times(1).returning(|_| Ok(true));
        let (store, _handle) = unreachable_cache(inner).await;

        assert_eq!(store.fetch_history(7).await.unwrap(), vec![history_entry()]);
        assert_eq!(store.fetch_history(7).await.unwrap().len(), 1);
        assert_eq!(store.fetch_user_age(7).await.unwrap(), Some(33));
        assert!(store.user_exists(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_inner_store_errors_are_not_masked() {
        let mut inner = MockExerciseStore::new();
        inner
            .expect_fetch_catalog()
            .times(1)
            .returning(|| Err(crate::error::AppError::Internal("locked".to_string())));
        let (store, _handle) = unreachable_cache(inner).await;

        assert!(store.fetch_catalog().await.is_err());
    }
}
