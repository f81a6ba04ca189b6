use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Difficulty tier of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Simple,
    Medium,
    Complex,
}

impl ExerciseType {
    /// Parses the free-text tier stored in the catalog
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything other than the three known tiers yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "simple" => Some(ExerciseType::Simple),
            "medium" => Some(ExerciseType::Medium),
            "complex" => Some(ExerciseType::Complex),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Simple => "simple",
            ExerciseType::Medium => "medium",
            ExerciseType::Complex => "complex",
        }
    }

    /// Tier suggested to a user with no history yet, based on age
    pub fn for_age(age: i64) -> Self {
        if age >= 60 {
            ExerciseType::Simple
        } else if age > 40 {
            ExerciseType::Medium
        } else {
            ExerciseType::Complex
        }
    }
}

impl Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog entry, seeded once and read-only at runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExerciseRecord {
    /// Unique exercise name
    #[sqlx(rename = "exercise_name")]
    pub name: String,
    /// Top-level goal, e.g. "bone mobility"
    pub focus_area: Option<String>,
    /// Tier as stored ("simple", "medium", "complex")
    pub exercise_type: Option<String>,
    pub target_body_part: Option<String>,
    #[sqlx(rename = "exercise_steps")]
    pub steps: Option<String>,
    pub min_count_duration: Option<String>,
    pub benefit: Option<String>,
}

impl ExerciseRecord {
    /// Creates a catalog entry carrying only the tags used for recommendations
    pub fn new(name: &str, focus_area: &str, exercise_type: &str, target_body_part: &str) -> Self {
        Self {
            name: name.to_string(),
            focus_area: Some(focus_area.to_string()),
            exercise_type: Some(exercise_type.to_string()),
            target_body_part: Some(target_body_part.to_string()),
            steps: None,
            min_count_duration: None,
            benefit: None,
        }
    }

    /// Parsed difficulty tier, if the stored value is a known one
    pub fn tier(&self) -> Option<ExerciseType> {
        self.exercise_type.as_deref().and_then(ExerciseType::parse)
    }

    /// Category label returned alongside recommendations
    pub fn category(&self) -> String {
        self.exercise_type.clone().unwrap_or_default()
    }

    /// Trimmed, non-empty feature tokens in column order
    pub fn tags(&self) -> Vec<&str> {
        [
            self.focus_area.as_deref(),
            self.exercise_type.as_deref(),
            self.target_body_part.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
    }
}

/// Query parameters for browsing the catalog
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(rename = "type")]
    pub exercise_type: Option<ExerciseType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exercise_type_ignores_case_and_whitespace() {
        assert_eq!(ExerciseType::parse(" Simple "), Some(ExerciseType::Simple));
        assert_eq!(ExerciseType::parse("MEDIUM"), Some(ExerciseType::Medium));
        assert_eq!(ExerciseType::parse("complex"), Some(ExerciseType::Complex));
        assert_eq!(ExerciseType::parse("advanced"), None);
    }

    #[test]
    fn test_age_bands() {
        assert_eq!(ExerciseType::for_age(70), ExerciseType::Simple);
        assert_eq!(ExerciseType::for_age(60), ExerciseType::Simple);
        assert_eq!(ExerciseType::for_age(59), ExerciseType::Medium);
        assert_eq!(ExerciseType::for_age(41), ExerciseType::Medium);
        assert_eq!(ExerciseType::for_age(40), ExerciseType::Complex);
        assert_eq!(ExerciseType::for_age(25), ExerciseType::Complex);
    }

    #[test]
    fn test_tags_skip_blank_columns() {
        let mut exercise = ExerciseRecord::new("Arm Circles", " bone mobility ", "simple", "arm");
        exercise.target_body_part = Some("   ".to_string());
        assert_eq!(exercise.tags(), vec!["bone mobility", "simple"]);
    }

    #[test]
    fn test_category_keeps_stored_text() {
        let exercise = ExerciseRecord::new("Plank", "core", "Medium", "abs");
        assert_eq!(exercise.category(), "Medium");
        assert_eq!(exercise.tier(), Some(ExerciseType::Medium));
    }
}
