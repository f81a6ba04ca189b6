use serde::{Deserialize, Serialize};

/// A single suggested exercise, or a placeholder message with an empty category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub exercise_name: String,
    pub category: String,
}

impl Recommendation {
    pub fn new(exercise_name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            category: category.into(),
        }
    }
}

/// Rule that produced a recommendation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// No history yet: pick from the tier matching the user's age
    NewUser,
    /// Consistent high-energy medium work: push toward complex exercises
    Promotion,
    /// Content-based ranking against the user's weighted history
    Similarity,
}

/// Reason a user-facing message was returned instead of exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    EmptyCatalog,
    AllCompleted,
    FirstExercise,
    NoProfileSignal,
    NoMatches,
    Unavailable,
}

impl Placeholder {
    pub fn message(&self) -> &'static str {
        match self {
            Placeholder::EmptyCatalog => "No exercises available in the library.",
            Placeholder::AllCompleted => "You've completed all available exercises! Great job!",
            Placeholder::FirstExercise => {
                "Complete your first exercise to get personalized recommendations!"
            }
            Placeholder::NoProfileSignal => {
                "Complete some exercises to get personalized recommendations!"
            }
            Placeholder::NoMatches => "No specific recommendations at this time.",
            Placeholder::Unavailable => "Could not generate recommendations at this time.",
        }
    }
}

/// Ordered recommendations together with how they were chosen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSet {
    pub strategy: Option<Strategy>,
    pub placeholder: Option<Placeholder>,
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationSet {
    pub fn empty() -> Self {
        Self {
            strategy: None,
            placeholder: None,
            recommendations: Vec::new(),
        }
    }

    pub fn from_strategy(strategy: Strategy, recommendations: Vec<Recommendation>) -> Self {
        Self {
            strategy: Some(strategy),
            placeholder: None,
            recommendations,
        }
    }

    /// Single-entry list carrying a user-facing message
    pub fn placeholder(strategy: Option<Strategy>, placeholder: Placeholder) -> Self {
        Self {
            strategy,
            placeholder: Some(placeholder),
            recommendations: vec![Recommendation::new(placeholder.message(), "")],
        }
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    /// Names of the suggested exercises, skipping placeholder messages
    pub fn exercise_names(&self) -> Vec<&str> {
        if self.placeholder.is_some() {
            return Vec::new();
        }
        self.recommendations
            .iter()
            .map(|r| r.exercise_name.as_str())
            .collect()
    }
}

/// Share of each tier's distinct exercises the user has completed, 0-100
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub simple: f64,
    pub medium: f64,
    pub complex: f64,
}

/// Query parameters for the recommendations endpoint
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub count: Option<usize>,
}
