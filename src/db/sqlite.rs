use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

const SCHEMA: [&str; 6] = [
    r"
    CREATE TABLE IF NOT EXISTS exercises (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        focus_area TEXT,
        exercise_type TEXT,
        target_body_part TEXT,
        exercise_name TEXT NOT NULL,
        exercise_steps TEXT,
        min_count_duration TEXT,
        benefit TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS user_profile (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        age INTEGER,
        gender TEXT,
        phone_number TEXT UNIQUE,
        password TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS completed_exercises (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        exercise_name TEXT NOT NULL,
        date_completed INTEGER NOT NULL,
        start_time INTEGER,
        end_time INTEGER,
        duration INTEGER,
        reps_completed INTEGER,
        energy_level TEXT NOT NULL
    )
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_completed_exercises_user
        ON completed_exercises (user_id, date_completed)
    ",
    r"
    CREATE TABLE IF NOT EXISTS workout_plan (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        focus_area TEXT NOT NULL,
        day_index INTEGER NOT NULL,
        day TEXT NOT NULL,
        exercise_name TEXT NOT NULL,
        exercise_type TEXT,
        target_body_part TEXT,
        benefit TEXT,
        generated_on TEXT NOT NULL
    )
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_workout_plan_focus
        ON workout_plan (focus_area, day_index)
    ",
];

/// Creates a SQLite connection pool
///
/// The database file is created when missing. In-memory databases are
/// private to a connection, so they get a single-connection pool.
pub async fn create_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let mut pool_options = SqlitePoolOptions::new().max_connections(5);
    if database_url.contains(":memory:") {
        // Closing the only connection would drop the database
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}

/// Creates the exercise, profile, completion and plan tables if they do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("Database schema ready");
    Ok(())
}
