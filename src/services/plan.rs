use std::sync::Arc;

use chrono::{NaiveDate, Utc, Weekday};
use rand::{seq::SliceRandom, Rng};

use crate::{
    db::ExerciseStore,
    error::{AppError, AppResult},
    models::{ExerciseRecord, PlanDay, WorkoutPlan},
};

/// A stored plan is kept until it is this many days old
pub const PLAN_LIFETIME_DAYS: i64 = 7;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn normalize_focus_area(focus_area: &str) -> String {
    focus_area.trim().to_lowercase()
}

/// Draws one random exercise of the focus area for each day, Monday first
///
/// Days are drawn independently, so an exercise may repeat within a week.
/// An unknown focus area yields a plan without days.
pub fn generate_plan<R: Rng + ?Sized>(
    catalog: &[ExerciseRecord],
    focus_area: &str,
    today: NaiveDate,
    rng: &mut R,
) -> WorkoutPlan {
    let focus_area = normalize_focus_area(focus_area);
    let pool: Vec<&ExerciseRecord> = catalog
        .iter()
        .filter(|exercise| {
            exercise
                .focus_area
                .as_deref()
                .is_some_and(|f| normalize_focus_area(f) == focus_area)
        })
        .collect();

    let days = WEEK
        .iter()
        .filter_map(|&day| {
            pool.choose(&mut *rng)
                .map(|&exercise| PlanDay::new(day, exercise))
        })
        .collect();

    WorkoutPlan {
        focus_area,
        generated_on: today,
        days,
    }
}

/// Whether a plan generated on `generated_on` should be replaced on `today`
pub fn is_stale(generated_on: NaiveDate, today: NaiveDate) -> bool {
    (today - generated_on).num_days() >= PLAN_LIFETIME_DAYS
}

/// Returns the stored plan while it is fresh, otherwise draws and stores a new one
pub async fn get_or_generate_plan(
    store: Arc<dyn ExerciseStore>,
    focus_area: &str,
    today: NaiveDate,
) -> AppResult<WorkoutPlan> {
    let focus_area = normalize_focus_area(focus_area);
    if focus_area.is_empty() {
        return Err(AppError::InvalidInput(
            "focus area must not be empty".to_string(),
        ));
    }

    if let Some(plan) = store.fetch_plan(&focus_area).await? {
        if !is_stale(plan.generated_on, today) {
            tracing::debug!(
                focus_area = %focus_area,
                generated_on = %plan.generated_on,
                "Reusing weekly plan"
            );
            return Ok(plan);
        }
    }

    let catalog = store.fetch_catalog().await?;
    let plan = {
        let mut rng = rand::thread_rng();
        generate_plan(&catalog, &focus_area, today, &mut rng)
    };
    if plan.days.is_empty() {
        return Err(AppError::NotFound(format!(
            "No exercises for focus area {:?}",
            focus_area
        )));
    }

    store.replace_plan(plan.clone()).await?;
    tracing::info!(focus_area = %focus_area, generated_on = %today, "Weekly plan generated");

    Ok(plan)
}

/// Current plan as of today (UTC)
pub async fn get_plan(store: Arc<dyn ExerciseStore>, focus_area: &str) -> AppResult<WorkoutPlan> {
    get_or_generate_plan(store, focus_area, Utc::now().date_naive()).await
}
