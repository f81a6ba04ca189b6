use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use super::ExerciseType;

/// Energy rating reported by the user when finishing an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    /// Contribution of a completion to the user's profile vector
    pub fn weight(&self) -> f64 {
        match self {
            EnergyLevel::High => 1.5,
            EnergyLevel::Medium => 1.0,
            EnergyLevel::Low => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
        }
    }
}

impl Display for EnergyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a stored energy label is not one of the known levels
#[derive(Debug, thiserror::Error)]
#[error("unknown energy level: {0:?}")]
pub struct UnknownEnergyLevel(pub String);

impl FromStr for EnergyLevel {
    type Err = UnknownEnergyLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(EnergyLevel::Low),
            "medium" => Ok(EnergyLevel::Medium),
            "high" => Ok(EnergyLevel::High),
            _ => Err(UnknownEnergyLevel(s.to_string())),
        }
    }
}

/// A completion ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingCompletion {
    pub user_id: i64,
    pub exercise_name: String,
    pub energy_level: EnergyLevel,
    /// Seconds since the Unix epoch
    pub completed_at: i64,
    pub started_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub duration_secs: i64,
    pub reps: Option<i64>,
}

/// A stored completion row, immutable once written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRecord {
    pub id: i64,
    #[serde(flatten)]
    pub completion: PendingCompletion,
}

/// One entry of a user's history: a completion joined with the exercise's tags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedExercise {
    pub exercise_name: String,
    pub focus_area: Option<String>,
    pub exercise_type: Option<String>,
    pub target_body_part: Option<String>,
    pub energy_level: EnergyLevel,
    pub completed_at: i64,
    pub duration_secs: Option<i64>,
    pub reps: Option<i64>,
}

impl CompletedExercise {
    pub fn tier(&self) -> Option<ExerciseType> {
        self.exercise_type.as_deref().and_then(ExerciseType::parse)
    }
}

/// Request body for logging a finished exercise
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewCompletion {
    pub exercise_name: String,
    pub energy_level: EnergyLevel,
    /// Stopwatch start, seconds since the Unix epoch
    #[serde(default)]
    pub started_at: Option<i64>,
    /// Stopwatch stop, seconds since the Unix epoch
    #[serde(default)]
    pub ended_at: Option<i64>,
    #[serde(default)]
    pub duration_secs: Option<i64>,
    #[serde(default)]
    pub reps: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_weights() {
        assert_eq!(EnergyLevel::High.weight(), 1.5);
        assert_eq!(EnergyLevel::Medium.weight(), 1.0);
        assert_eq!(EnergyLevel::Low.weight(), 0.5);
    }

    #[test]
    fn test_parse_energy_level() {
        assert_eq!("High".parse::<EnergyLevel>().unwrap(), EnergyLevel::High);
        assert_eq!(" low".parse::<EnergyLevel>().unwrap(), EnergyLevel::Low);
        assert!("exhausted".parse::<EnergyLevel>().is_err());
    }

    #[test]
    fn test_new_completion_optional_fields_default() {
        let completion: NewCompletion = serde_json::from_str(
            r#"{"exercise_name": "Plank", "energy_level": "medium"}"#,
        )
        .unwrap();
        assert_eq!(completion.energy_level, EnergyLevel::Medium);
        assert_eq!(completion.started_at, None);
        assert_eq!(completion.reps, None);
    }
}
