use std::path::Path;

use anyhow::Context;
use sqlx::SqlitePool;

use crate::models::ExerciseRecord;

/// Parses a JSON array of catalog entries
///
/// Only `name` is required; the other columns may be omitted.
pub fn parse_catalog(json: &str) -> anyhow::Result<Vec<ExerciseRecord>> {
    let exercises = serde_json::from_str(json).context("Invalid catalog seed JSON")?;
    Ok(exercises)
}

/// Inserts the given entries when the catalog is still empty
///
/// Returns the number of rows inserted. A populated catalog is left alone,
/// so running this on every start is safe. Entries with a blank name are skipped.
pub async fn seed_catalog(pool: &SqlitePool, exercises: &[ExerciseRecord]) -> anyhow::Result<u64> {
    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM exercises")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::info!(existing, "Catalog already populated, skipping seed");
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for exercise in exercises {
        let name = exercise.name.trim();
        if name.is_empty() {
            tracing::warn!("Skipping catalog seed entry without a name");
            continue;
        }

        sqlx::query(
            r"
            INSERT INTO exercises
                (focus_area, exercise_type, target_body_part, exercise_name,
                 exercise_steps, min_count_duration, benefit)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&exercise.focus_area)
        .bind(&exercise.exercise_type)
        .bind(&exercise.target_body_part)
        .bind(name)
        .bind(&exercise.steps)
        .bind(&exercise.min_count_duration)
        .bind(&exercise.benefit)
        .execute(&mut *tx)
        .await?;
        inserted += 1;
    }
    tx.commit().await?;

    tracing::info!(inserted, "Catalog seeded");
    Ok(inserted)
}

/// Reads a JSON seed file and imports it into an empty catalog
pub async fn seed_catalog_from_file(
    pool: &SqlitePool,
    path: impl AsRef<Path>,
) -> anyhow::Result<u64> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog seed {}", path.display()))?;
    let exercises = parse_catalog(&json)?;

    seed_catalog(pool, &exercises).await
}
