use chrono::NaiveDate;
use serde::Serialize;

use super::CategoryProgress;

/// Distinct exercises completed on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub exercises: usize,
}

/// Distinct exercises completed in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCount {
    /// Label such as "Mar 25"
    pub month: String,
    pub exercises: usize,
    pub duration_secs: i64,
}

/// Overview of a user's training, backing the progress and home screens
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub overall_percent: f64,
    pub categories: CategoryProgress,
    pub workouts_this_month: usize,
    pub avg_duration_minutes_this_month: f64,
    pub current_streak_days: u32,
    /// Oldest day first, today last
    pub last_seven_days: Vec<DailyCount>,
    /// Oldest month first, current month last
    pub last_six_months: Vec<MonthlyCount>,
}
