use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::{
        CompletedExercise, CompletionRecord, EnergyLevel, ExerciseRecord, ExerciseType,
        PendingCompletion, PlanDay, WorkoutPlan,
    },
};

/// Read access to the catalog and per-user history, plus append-only completion logging
///
/// Recommendation, progress and completion services only talk to storage
/// through this trait, so they can run against SQLite, a cache decorator or a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ExerciseStore: Send + Sync {
    /// All catalog entries in insertion order
    async fn fetch_catalog(&self) -> AppResult<Vec<ExerciseRecord>>;

    /// Catalog entries of one difficulty tier
    async fn fetch_catalog_by_type(
        &self,
        exercise_type: ExerciseType,
    ) -> AppResult<Vec<ExerciseRecord>>;

    /// A single catalog entry by name
    async fn fetch_exercise(&self, name: &str) -> AppResult<Option<ExerciseRecord>>;

    /// Every completion of the user joined with the exercise tags, newest first
    async fn fetch_history(&self, user_id: i64) -> AppResult<Vec<CompletedExercise>>;

    /// The user's age; `None` for an unknown user or a missing age
    async fn fetch_user_age(&self, user_id: i64) -> AppResult<Option<i64>>;

    async fn user_exists(&self, user_id: i64) -> AppResult<bool>;

    /// Appends a completion and returns the stored row
    async fn record_completion(&self, completion: PendingCompletion)
        -> AppResult<CompletionRecord>;

    /// The stored weekly plan for a lowercased focus area, if any
    async fn fetch_plan(&self, focus_area: &str) -> AppResult<Option<WorkoutPlan>>;

    /// Replaces every stored day of the plan's focus area
    async fn replace_plan(&self, plan: WorkoutPlan) -> AppResult<()>;
}

const CATALOG_COLUMNS: &str = "exercise_name, focus_area, exercise_type, target_body_part, \
                               exercise_steps, min_count_duration, benefit";

#[derive(sqlx::FromRow)]
struct HistoryRow {
    exercise_name: String,
    focus_area: Option<String>,
    exercise_type: Option<String>,
    target_body_part: Option<String>,
    energy_level: String,
    date_completed: i64,
    duration: Option<i64>,
    reps_completed: Option<i64>,
}

impl TryFrom<HistoryRow> for CompletedExercise {
    type Error = AppError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let energy_level: EnergyLevel = row.energy_level.parse().map_err(|e| {
            AppError::MalformedData(format!("completion of {:?}: {}", row.exercise_name, e))
        })?;

        Ok(CompletedExercise {
            exercise_name: row.exercise_name,
            focus_area: row.focus_area,
            exercise_type: row.exercise_type,
            target_body_part: row.target_body_part,
            energy_level,
            completed_at: row.date_completed,
            duration_secs: row.duration,
            reps: row.reps_completed,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PlanRow {
    day: String,
    exercise_name: String,
    exercise_type: Option<String>,
    target_body_part: Option<String>,
    benefit: Option<String>,
    generated_on: NaiveDate,
}

/// `ExerciseStore` backed by the local SQLite database
#[derive(Clone)]
pub struct SqliteExerciseStore {
    pool: SqlitePool,
}

impl SqliteExerciseStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ExerciseStore for SqliteExerciseStore {
    async fn fetch_catalog(&self) -> AppResult<Vec<ExerciseRecord>> {
        let sql = format!("SELECT {CATALOG_COLUMNS} FROM exercises ORDER BY id");
        let catalog = sqlx::query_as::<_, ExerciseRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    async fn fetch_catalog_by_type(
        &self,
        exercise_type: ExerciseType,
    ) -> AppResult<Vec<ExerciseRecord>> {
        let sql = format!(
            "SELECT {CATALOG_COLUMNS} FROM exercises \
             WHERE LOWER(TRIM(exercise_type)) = ? ORDER BY id"
        );
        let catalog = sqlx::query_as::<_, ExerciseRecord>(&sql)
            .bind(exercise_type.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(catalog)
    }

    async fn fetch_exercise(&self, name: &str) -> AppResult<Option<ExerciseRecord>> {
        let sql = format!(
            "SELECT {CATALOG_COLUMNS} FROM exercises WHERE exercise_name = ? ORDER BY id LIMIT 1"
        );
        let exercise = sqlx::query_as::<_, ExerciseRecord>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(exercise)
    }

    async fn fetch_history(&self, user_id: i64) -> AppResult<Vec<CompletedExercise>> {
        // Tags come from the first catalog row of each name; completions of
        // exercises no longer in the catalog are kept with empty tags.
        let rows = sqlx::query_as::<_, HistoryRow>(
            r"
            SELECT ce.exercise_name, e.focus_area, e.exercise_type, e.target_body_part,
                   ce.energy_level, ce.date_completed, ce.duration, ce.reps_completed
            FROM completed_exercises ce
            LEFT JOIN exercises e
                ON e.id = (SELECT MIN(id) FROM exercises WHERE exercise_name = ce.exercise_name)
            WHERE ce.user_id = ?
            ORDER BY ce.date_completed DESC, ce.id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let history = rows
            .into_iter()
            .map(CompletedExercise::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        tracing::debug!(user_id, count = history.len(), "History loaded");
        Ok(history)
    }

    async fn fetch_user_age(&self, user_id: i64) -> AppResult<Option<i64>> {
        let row: Option<(Option<i64>,)> =
            sqlx::query_as("SELECT age FROM user_profile WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.and_then(|(age,)| age))
    }

    async fn user_exists(&self, user_id: i64) -> AppResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM user_profile WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn record_completion(
        &self,
        completion: PendingCompletion,
    ) -> AppResult<CompletionRecord> {
        let result = sqlx::query(
            r"
            INSERT INTO completed_exercises
                (user_id, exercise_name, date_completed, start_time, end_time,
                 duration, reps_completed, energy_level)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(completion.user_id)
        .bind(&completion.exercise_name)
        .bind(completion.completed_at)
        .bind(completion.started_at)
        .bind(completion.ended_at)
        .bind(completion.duration_secs)
        .bind(completion.reps)
        .bind(completion.energy_level.as_str())
        .execute(&self.pool)
        .await?;

        Ok(CompletionRecord {
            id: result.last_insert_rowid(),
            completion,
        })
    }

    async fn fetch_plan(&self, focus_area: &str) -> AppResult<Option<WorkoutPlan>> {
        let rows = sqlx::query_as::<_, PlanRow>(
            r"
            SELECT day, exercise_name, exercise_type, target_body_part, benefit, generated_on
            FROM workout_plan
            WHERE focus_area = ?
            ORDER BY day_index
            ",
        )
        .bind(focus_area)
        .fetch_all(&self.pool)
        .await?;

        let Some(generated_on) = rows.iter().map(|row| row.generated_on).max() else {
            return Ok(None);
        };

        let days = rows
            .into_iter()
            .map(|row| PlanDay {
                day: row.day,
                exercise_name: row.exercise_name,
                exercise_type: row.exercise_type,
                target_body_part: row.target_body_part,
                benefit: row.benefit,
            })
            .collect();

        Ok(Some(WorkoutPlan {
            focus_area: focus_area.to_string(),
            generated_on,
            days,
        }))
    }

    async fn replace_plan(&self, plan: WorkoutPlan) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM workout_plan WHERE focus_area = ?")
            .bind(&plan.focus_area)
            .execute(&mut *tx)
            .await?;

        for (day_index, day) in plan.days.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO workout_plan
                    (focus_area, day_index, day, exercise_name, exercise_type,
                     target_body_part, benefit, generated_on)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(&plan.focus_area)
            .bind(day_index as i64)
            .bind(&day.day)
            .bind(&day.exercise_name)
            .bind(&day.exercise_type)
            .bind(&day.target_body_part)
            .bind(&day.benefit)
            .bind(plan.generated_on)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(focus_area = %plan.focus_area, days = plan.days.len(), "Plan stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, init_schema};

    async fn test_store() -> SqliteExerciseStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        init_schema(&pool).await.unwrap();

        for (name, focus, tier, part) in [
            ("Arm Circles", "bone mobility", "simple", "arm"),
            ("Squats", "muscle strengthening", "Medium", "leg"),
            ("Burpees", "cardio", "complex", "full body"),
        ] {
            sqlx::query(
                "INSERT INTO exercises (exercise_name, focus_area, exercise_type, target_body_part) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(name)
            .bind(focus)
            .bind(tier)
            .bind(part)
            .execute(&pool)
            .await
            .unwrap();
        }

        sqlx::query("INSERT INTO user_profile (name, age, password) VALUES ('Asha', 64, 'x')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO user_profile (name, age, password) VALUES ('Ravi', NULL, 'x')")
            .execute(&pool)
            .await
            .unwrap();

        SqliteExerciseStore::new(pool)
    }

    fn pending(user_id: i64, name: &str, energy_level: EnergyLevel, at: i64) -> PendingCompletion {
        PendingCompletion {
            user_id,
            exercise_name: name.to_string(),
            energy_level,
            completed_at: at,
            started_at: None,
            ended_at: None,
            duration_secs: 90,
            reps: Some(12),
        }
    }

    #[tokio::test]
    async fn test_fetch_catalog_in_insertion_order() {
        let store = test_store().await;
        let catalog = store.fetch_catalog().await.unwrap();
        let names: Vec<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Arm Circles", "Squats", "Burpees"]);
        assert_eq!(catalog[0].focus_area.as_deref(), Some("bone mobility"));
    }

    #[tokio::test]
    async fn test_fetch_catalog_by_type_ignores_case() {
        let store = test_store().await;
        let medium = store
            .fetch_catalog_by_type(ExerciseType::Medium)
            .await
            .unwrap();
        assert_eq!(medium.len(), 1);
        assert_eq!(medium[0].name, "Squats");
    }

    #[tokio::test]
    async fn test_fetch_user_age() {
        let store = test_store().await;
        assert_eq!(store.fetch_user_age(1).await.unwrap(), Some(64));
        assert_eq!(store.fetch_user_age(2).await.unwrap(), None);
        assert_eq!(store.fetch_user_age(99).await.unwrap(), None);
        assert!(store.user_exists(2).await.unwrap());
        assert!(!store.user_exists(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_record_and_fetch_history_newest_first() {
        let store = test_store().await;
        store
            .record_completion(pending(1, "Arm Circles", EnergyLevel::Low, 100))
            .await
            .unwrap();
        let stored = store
            .record_completion(pending(1, "Squats", EnergyLevel::High, 200))
            .await
            .unwrap();
        store
            .record_completion(pending(2, "Burpees", EnergyLevel::Medium, 300))
            .await
            .unwrap();

        assert_eq!(stored.completion.exercise_name, "Squats");
        assert!(stored.id > 0);

        let history = store.fetch_history(1).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].exercise_name, "Squats");
        assert_eq!(history[0].exercise_type.as_deref(), Some("Medium"));
        assert_eq!(history[0].energy_level, EnergyLevel::High);
        assert_eq!(history[1].completed_at, 100);
    }

    #[tokio::test]
    async fn test_replace_plan_overwrites_previous_days() {
        let store = test_store().await;
        let catalog = store.fetch_catalog().await.unwrap();
        let first = WorkoutPlan {
            focus_area: "bone mobility".to_string(),
            generated_on: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            days: vec![
                PlanDay::new(chrono::Weekday::Mon, &catalog[0]),
                PlanDay::new(chrono::Weekday::Tue, &catalog[0]),
            ],
        };
        store.replace_plan(first).await.unwrap();

        let second = WorkoutPlan {
            focus_area: "bone mobility".to_string(),
            generated_on: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            days: vec![PlanDay::new(chrono::Weekday::Mon, &catalog[2])],
        };
        store.replace_plan(second.clone()).await.unwrap();

        assert_eq!(store.fetch_plan("bone mobility").await.unwrap(), Some(second));
        assert_eq!(store.fetch_plan("cardio").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_energy_level_is_malformed() {
        let store = test_store().await;
        sqlx::query(
            "INSERT INTO completed_exercises (user_id, exercise_name, date_completed, energy_level) \
             VALUES (1, 'Squats', 10, 'sleepy')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let result = store.fetch_history(1).await;
        assert!(matches!(result, Err(AppError::MalformedData(_))));
    }
}
