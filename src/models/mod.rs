pub mod completion;
pub mod exercise;
pub mod plan;
pub mod progress;
pub mod recommendation;

pub use completion::{
    CompletedExercise, CompletionRecord, EnergyLevel, NewCompletion, PendingCompletion,
};
pub use exercise::{CatalogQuery, ExerciseRecord, ExerciseType};
pub use plan::{day_name, PlanDay, WorkoutPlan};
pub use progress::{DailyCount, MonthlyCount, ProgressSummary};
pub use recommendation::{
    CategoryProgress, Placeholder, Recommendation, RecommendationQuery, RecommendationSet,
    Strategy,
};
