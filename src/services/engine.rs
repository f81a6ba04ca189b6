use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use super::features::{cosine_similarity, FeatureSpace};
use crate::models::{
    CategoryProgress, CompletedExercise, EnergyLevel, ExerciseRecord, ExerciseType, Placeholder,
    Recommendation, RecommendationSet, Strategy,
};

const SECONDS_PER_DAY: i64 = 86_400;

/// Malformed input detected before any strategy runs
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("catalog entry {0} has a blank exercise name")]
    BlankCatalogName(usize),
    #[error("history entry {0} has a blank exercise name")]
    BlankHistoryName(usize),
    #[error("{0} progress is not a finite number")]
    NonFiniteProgress(&'static str),
}

/// Tunables for strategy selection
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Medium-tier progress (percent) required before promotion is considered
    pub promotion_progress_threshold: f64,
    /// Share of recent medium completions that must be high energy
    pub promotion_high_energy_ratio: f64,
    /// Trailing window for the promotion check
    pub promotion_window_days: i64,
    /// Complex exercises placed at the head of a promotion list
    pub promotion_complex_slots: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            promotion_progress_threshold: 50.0,
            promotion_high_energy_ratio: 0.7,
            promotion_window_days: 7,
            promotion_complex_slots: 2,
        }
    }
}

/// Everything one recommendation request is computed from
#[derive(Debug, Clone)]
pub struct RecommendationInput<'a> {
    pub user_id: i64,
    pub catalog: &'a [ExerciseRecord],
    pub history: &'a [CompletedExercise],
    pub requested_count: usize,
    pub progress: CategoryProgress,
    /// Only consulted for users with no history
    pub user_age: Option<i64>,
    /// Evaluation time, seconds since the Unix epoch
    pub now: i64,
}

/// Rule-based exercise recommender
///
/// Picks one of three strategies (new user, promotion, similarity) and never
/// fails: every problem becomes a single placeholder entry.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Produces up to `requested_count` suggestions, none of them already completed
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        input: &RecommendationInput<'_>,
        rng: &mut R,
    ) -> RecommendationSet {
        if input.requested_count == 0 {
            return RecommendationSet::empty();
        }

        if let Err(e) = validate(input) {
            tracing::error!(user_id = input.user_id, error = %e, "Malformed recommendation input");
            return RecommendationSet::placeholder(None, Placeholder::Unavailable);
        }

        if input.catalog.is_empty() {
            return RecommendationSet::placeholder(None, Placeholder::EmptyCatalog);
        }

        let uncompleted = uncompleted_exercises(input.catalog, input.history);
        if uncompleted.is_empty() {
            return RecommendationSet::placeholder(None, Placeholder::AllCompleted);
        }

        let set = if input.history.is_empty() {
            self.new_user(input, &uncompleted, rng)
        } else if self.is_eligible_for_promotion(input) {
            self.promotion(input.requested_count, &uncompleted, rng)
        } else {
            self.similarity(input, &uncompleted)
        };

        tracing::debug!(
            user_id = input.user_id,
            strategy = ?set.strategy,
            placeholder = ?set.placeholder,
            returned = set.len(),
            "Recommendations computed"
        );

        set
    }

    fn new_user<R: Rng + ?Sized>(
        &self,
        input: &RecommendationInput<'_>,
        uncompleted: &[&ExerciseRecord],
        rng: &mut R,
    ) -> RecommendationSet {
        let Some(age) = input.user_age else {
            return RecommendationSet::placeholder(Some(Strategy::NewUser), Placeholder::FirstExercise);
        };

        let tier = ExerciseType::for_age(age);
        let pool = of_tier(uncompleted, tier);
        if pool.is_empty() {
            // No fallback to another tier
            return RecommendationSet::placeholder(Some(Strategy::NewUser), Placeholder::FirstExercise);
        }

        let recommendations = pool
            .choose_multiple(rng, input.requested_count)
            .map(|&exercise| to_recommendation(exercise))
            .collect();

        RecommendationSet::from_strategy(Strategy::NewUser, recommendations)
    }

    /// Medium progress over threshold and mostly high-energy medium work in the recent window
    fn is_eligible_for_promotion(&self, input: &RecommendationInput<'_>) -> bool {
        if input.progress.medium < self.config.promotion_progress_threshold {
            return false;
        }

        let window_start = input.now - self.config.promotion_window_days * SECONDS_PER_DAY;
        let (medium_total, medium_high) = input
            .history
            .iter()
            .filter(|entry| entry.completed_at >= window_start)
            .filter(|entry| entry.tier() == Some(ExerciseType::Medium))
            .fold((0usize, 0usize), |(total, high), entry| {
                let is_high = entry.energy_level == EnergyLevel::High;
                (total + 1, high + usize::from(is_high))
            });

        medium_total > 0
            && (medium_high as f64 / medium_total as f64)
                >= self.config.promotion_high_energy_ratio
    }

    fn promotion<R: Rng + ?Sized>(
        &self,
        requested_count: usize,
        uncompleted: &[&ExerciseRecord],
        rng: &mut R,
    ) -> RecommendationSet {
        let mut chosen: Vec<&ExerciseRecord> =
            Vec::with_capacity(requested_count.min(uncompleted.len()));
        let mut chosen_names: HashSet<&str> = HashSet::new();

        let complex_slots = self.config.promotion_complex_slots.min(requested_count);
        let fills = [
            (Some(ExerciseType::Complex), complex_slots),
            (Some(ExerciseType::Simple), requested_count),
            (None, requested_count),
        ];

        for (tier, limit) in fills {
            if chosen.len() >= limit {
                continue;
            }
            let pool: Vec<&ExerciseRecord> = uncompleted
                .iter()
                .copied()
                .filter(|exercise| tier.map_or(true, |t| exercise.tier() == Some(t)))
                .filter(|exercise| !chosen_names.contains(exercise.name.as_str()))
                .collect();

            for &exercise in pool.choose_multiple(rng, limit - chosen.len()) {
                chosen_names.insert(exercise.name.as_str());
                chosen.push(exercise);
            }
        }

        let recommendations = chosen.into_iter().map(to_recommendation).collect();
        RecommendationSet::from_strategy(Strategy::Promotion, recommendations)
    }

    fn similarity(
        &self,
        input: &RecommendationInput<'_>,
        uncompleted: &[&ExerciseRecord],
    ) -> RecommendationSet {
        let space = FeatureSpace::from_catalog(input.catalog);

        // Lifetime history, unlike the promotion window
        let Some(profile) = space.profile(input.history) else {
            return RecommendationSet::placeholder(
                Some(Strategy::Similarity),
                Placeholder::NoProfileSignal,
            );
        };

        let mut scored: Vec<(&ExerciseRecord, f64)> = uncompleted
            .iter()
            .map(|&exercise| {
                let score = space
                    .vector_for(&exercise.name)
                    .map_or(0.0, |vector| cosine_similarity(&profile, vector));
                (exercise, score)
            })
            .collect();

        // Stable: equal scores keep catalog order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let recommendations: Vec<Recommendation> = scored
            .into_iter()
            .take(input.requested_count)
            .map(|(exercise, _)| to_recommendation(exercise))
            .collect();

        if recommendations.is_empty() {
            return RecommendationSet::placeholder(Some(Strategy::Similarity), Placeholder::NoMatches);
        }
        RecommendationSet::from_strategy(Strategy::Similarity, recommendations)
    }
}

fn validate(input: &RecommendationInput<'_>) -> Result<(), EngineError> {
    if let Some(i) = input.catalog.iter().position(|e| e.name.trim().is_empty()) {
        return Err(EngineError::BlankCatalogName(i));
    }
    if let Some(i) = input
        .history
        .iter()
        .position(|e| e.exercise_name.trim().is_empty())
    {
        return Err(EngineError::BlankHistoryName(i));
    }

    let progress = input.progress;
    for (label, value) in [
        ("simple", progress.simple),
        ("medium", progress.medium),
        ("complex", progress.complex),
    ] {
        if !value.is_finite() {
            return Err(EngineError::NonFiniteProgress(label));
        }
    }
    Ok(())
}

/// Catalog entries absent from the history, in catalog order, one per name
fn uncompleted_exercises<'a>(
    catalog: &'a [ExerciseRecord],
    history: &[CompletedExercise],
) -> Vec<&'a ExerciseRecord> {
    let completed: HashSet<&str> = history.iter().map(|h| h.exercise_name.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    catalog
        .iter()
        .filter(|exercise| !completed.contains(exercise.name.as_str()))
        .filter(|exercise| seen.insert(exercise.name.as_str()))
        .collect()
}

fn of_tier<'a>(exercises: &[&'a ExerciseRecord], tier: ExerciseType) -> Vec<&'a ExerciseRecord> {
    exercises
        .iter()
        .copied()
        .filter(|exercise| exercise.tier() == Some(tier))
        .collect()
}

fn to_recommendation(exercise: &ExerciseRecord) -> Recommendation {
    Recommendation::new(exercise.name.clone(), exercise.category())
}
