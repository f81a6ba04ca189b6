use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::ExerciseRecord;

/// Full English day name, as shown in the plan
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One day of a weekly plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    pub day: String,
    pub exercise_name: String,
    pub exercise_type: Option<String>,
    pub target_body_part: Option<String>,
    pub benefit: Option<String>,
}

impl PlanDay {
    pub fn new(day: Weekday, exercise: &ExerciseRecord) -> Self {
        Self {
            day: day_name(day).to_string(),
            exercise_name: exercise.name.clone(),
            exercise_type: exercise.exercise_type.clone(),
            target_body_part: exercise.target_body_part.clone(),
            benefit: exercise.benefit.clone(),
        }
    }
}

/// Weekly plan for one focus area, Monday first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Lowercased focus area the plan was drawn from
    pub focus_area: String,
    pub generated_on: NaiveDate,
    pub days: Vec<PlanDay>,
}
