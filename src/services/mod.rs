pub mod completions;
pub mod engine;
pub mod features;
pub mod plan;
pub mod progress;
pub mod recommendations;

pub use engine::{EngineConfig, RecommendationEngine, RecommendationInput};
pub use features::FeatureSpace;
