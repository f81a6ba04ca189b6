use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};

use crate::{
    db::ExerciseStore,
    error::{AppError, AppResult},
    models::{
        CategoryProgress, CompletedExercise, DailyCount, ExerciseRecord, ExerciseType,
        MonthlyCount, ProgressSummary,
    },
};

const STREAK_LOOKBACK_DAYS: u64 = 365;

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_one_decimal(completed as f64 / total as f64 * 100.0)
}

/// Share of each tier's distinct catalog exercises the user has completed
pub fn category_progress(
    catalog: &[ExerciseRecord],
    history: &[CompletedExercise],
) -> CategoryProgress {
    let tier_progress = |tier: ExerciseType| {
        let total: HashSet<&str> = catalog
            .iter()
            .filter(|e| e.tier() == Some(tier))
            .map(|e| e.name.as_str())
            .collect();
        let completed: HashSet<&str> = history
            .iter()
            .filter(|h| h.tier() == Some(tier))
            .map(|h| h.exercise_name.as_str())
            .filter(|name| total.contains(name))
            .collect();
        percent(completed.len(), total.len())
    };

    CategoryProgress {
        simple: tier_progress(ExerciseType::Simple),
        medium: tier_progress(ExerciseType::Medium),
        complex: tier_progress(ExerciseType::Complex),
    }
}

fn completion_date(entry: &CompletedExercise) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(entry.completed_at, 0).map(|dt| dt.date_naive())
}

/// Distinct exercise names and summed duration over an inclusive date range
fn activity_between(
    dated: &[(NaiveDate, &CompletedExercise)],
    from: NaiveDate,
    to: NaiveDate,
) -> (usize, i64) {
    let mut names = HashSet::new();
    let mut duration = 0;
    for (date, entry) in dated {
        if *date >= from && *date <= to {
            names.insert(entry.exercise_name.as_str());
            duration += entry.duration_secs.unwrap_or(0);
        }
    }
    (names.len(), duration)
}

/// Builds the progress overview for a user as of `now` (days are UTC days)
pub fn summarize(
    catalog: &[ExerciseRecord],
    history: &[CompletedExercise],
    now: DateTime<Utc>,
) -> AppResult<ProgressSummary> {
    let today = now.date_naive();
    let dated: Vec<(NaiveDate, &CompletedExercise)> = history
        .iter()
        .filter_map(|entry| completion_date(entry).map(|date| (date, entry)))
        .collect();

    let catalog_names: HashSet<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
    let completed_names: HashSet<&str> = history
        .iter()
        .map(|h| h.exercise_name.as_str())
        .filter(|name| catalog_names.contains(name))
        .collect();

    let month_start = today
        .with_day(1)
        .ok_or_else(|| AppError::Internal(format!("no first day for {}", today)))?;
    let (workouts_this_month, duration_this_month) = activity_between(&dated, month_start, today);
    let avg_duration_minutes_this_month = if workouts_this_month == 0 {
        0.0
    } else {
        round_one_decimal(duration_this_month as f64 / workouts_this_month as f64 / 60.0)
    };

    let mut per_day: HashMap<NaiveDate, HashSet<&str>> = HashMap::new();
    for (date, entry) in &dated {
        per_day
            .entry(*date)
            .or_default()
            .insert(entry.exercise_name.as_str());
    }
    let day_count = |date: NaiveDate| per_day.get(&date).map_or(0, HashSet::len);

    let mut current_streak_days = 0;
    for offset in 0..STREAK_LOOKBACK_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(offset)) else {
            break;
        };
        if day_count(date) == 0 {
            break;
        }
        current_streak_days += 1;
    }

    let last_seven_days = (0..7u64)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| DailyCount {
            date,
            exercises: day_count(date),
        })
        .collect();

    let mut last_six_months = Vec::with_capacity(6);
    for offset in (0..6u32).rev() {
        let Some(start) = month_start.checked_sub_months(Months::new(offset)) else {
            continue;
        };
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(today);
        let (exercises, duration_secs) = activity_between(&dated, start, end);
        last_six_months.push(MonthlyCount {
            month: start.format("%b %y").to_string(),
            exercises,
            duration_secs,
        });
    }

    Ok(ProgressSummary {
        overall_percent: percent(completed_names.len(), catalog_names.len()),
        categories: category_progress(catalog, history),
        workouts_this_month,
        avg_duration_minutes_this_month,
        current_streak_days,
        last_seven_days,
        last_six_months,
    })
}

/// Loads a user's data and summarizes it as of now
pub async fn get_progress(store: Arc<dyn ExerciseStore>, user_id: i64) -> AppResult<ProgressSummary> {
    if !store.user_exists(user_id).await? {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    let catalog = store.fetch_catalog().await?;
    let history = store.fetch_history(user_id).await?;

    summarize(&catalog, &history, Utc::now())
}
