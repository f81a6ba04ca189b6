use std::sync::Arc;

use crate::{
    db::ExerciseStore,
    error::{AppError, AppResult},
    models::{CompletionRecord, NewCompletion, PendingCompletion},
};

/// Seconds spent on the exercise
///
/// A stopwatch start/stop pair wins over an explicit duration; with neither
/// the completion is logged with zero duration.
fn resolve_duration(request: &NewCompletion) -> AppResult<i64> {
    let duration = match (request.started_at, request.ended_at) {
        (Some(started), Some(ended)) => {
            if ended < started {
                return Err(AppError::InvalidInput(
                    "ended_at must not be before started_at".to_string(),
                ));
            }
            ended - started
        }
        _ => request.duration_secs.unwrap_or(0),
    };

    if duration < 0 {
        return Err(AppError::InvalidInput(
            "duration_secs must not be negative".to_string(),
        ));
    }
    Ok(duration)
}

/// Logs a finished exercise for a user
///
/// Completions are append-only; once stored the exercise is excluded from
/// that user's recommendations.
pub async fn record_completion(
    store: Arc<dyn ExerciseStore>,
    user_id: i64,
    request: NewCompletion,
    now: i64,
) -> AppResult<CompletionRecord> {
    let exercise_name = request.exercise_name.trim().to_string();
    if exercise_name.is_empty() {
        return Err(AppError::InvalidInput(
            "exercise_name must not be empty".to_string(),
        ));
    }
    if request.reps.is_some_and(|reps| reps < 0) {
        return Err(AppError::InvalidInput("reps must not be negative".to_string()));
    }
    let duration_secs = resolve_duration(&request)?;

    if !store.user_exists(user_id).await? {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }
    if store.fetch_exercise(&exercise_name).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Exercise {:?} not found",
            exercise_name
        )));
    }

    let record = store
        .record_completion(PendingCompletion {
            user_id,
            exercise_name,
            energy_level: request.energy_level,
            completed_at: now,
            started_at: request.started_at,
            ended_at: request.ended_at,
            duration_secs,
            reps: request.reps,
        })
        .await?;

    tracing::info!(
        user_id,
        completion_id = record.id,
        exercise = %record.completion.exercise_name,
        energy_level = %record.completion.energy_level,
        duration_secs,
        "Completion recorded"
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MockExerciseStore;
    use crate::models::{EnergyLevel, ExerciseRecord};

    fn request(name: &str) -> NewCompletion {
        NewCompletion {
            exercise_name: name.to_string(),
            energy_level: EnergyLevel::High,
            started_at: None,
            ended_at: None,
            duration_secs: None,
            reps: None,
        }
    }

    fn store_with_user_and_exercise() -> MockExerciseStore {
        let mut store = MockExerciseStore::new();
        store.expect_user_exists().returning(|id| Ok(id == 1));
        store.expect_fetch_exercise().returning(|name| {
            Ok((name == "Plank").then(|| ExerciseRecord::new("Plank", "core", "medium", "abs")))
        });
        store
    }

    #[test]
    fn test_stopwatch_duration_wins() {
        let mut req = request("Plank");
        req.started_at = Some(1_000);
        req.ended_at = Some(1_090);
        req.duration_secs = Some(5);
        assert_eq!(resolve_duration(&req).unwrap(), 90);
    }

    #[test]
    fn test_missing_duration_is_zero() {
        assert_eq!(resolve_duration(&request("Plank")).unwrap(), 0);
    }

    #[test]
    fn test_stopwatch_backwards_rejected() {
        let mut req = request("Plank");
        req.started_at = Some(2_000);
        req.ended_at = Some(1_000);
        assert!(matches!(resolve_duration(&req), Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_record_completion_stores_trimmed_name() {
        let mut store = store_with_user_and_exercise();
        store
            .expect_record_completion()
            .withf(|pending| pending.exercise_name == "Plank" && pending.completed_at == 500)
            .times(1)
            .returning(|completion| Ok(CompletionRecord { id: 9, completion }));

        let mut req = request("  Plank ");
        req.duration_secs = Some(45);
        let record = record_completion(Arc::new(store), 1, req, 500).await.unwrap();

        assert_eq!(record.id, 9);
        assert_eq!(record.completion.duration_secs, 45);
        assert_eq!(record.completion.energy_level, EnergyLevel::High);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = store_with_user_and_exercise();
        let result = record_completion(Arc::new(store), 2, request("Plank"), 500).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_exercise_is_not_found() {
        let store = store_with_user_and_exercise();
        let result = record_completion(Arc::new(store), 1, request("Moonwalk"), 500).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_blank_name_rejected_before_storage() {
        let store = MockExerciseStore::new();
        let result = record_completion(Arc::new(store), 1, request("   "), 500).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
