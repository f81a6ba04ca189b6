use std::collections::{BTreeSet, HashMap};

use crate::models::{CompletedExercise, ExerciseRecord};

/// One-hot encoding of the catalog over its tag vocabulary
///
/// The vocabulary is every distinct focus area, exercise type and target body
/// part seen in the catalog, sorted. Built fresh for each request.
#[derive(Debug, Clone)]
pub struct FeatureSpace {
    vocabulary: Vec<String>,
    vectors: Vec<Vec<f64>>,
    by_name: HashMap<String, usize>,
}

impl FeatureSpace {
    pub fn from_catalog(catalog: &[ExerciseRecord]) -> Self {
        let vocabulary: Vec<String> = catalog
            .iter()
            .flat_map(|exercise| exercise.tags())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, token)| (token.as_str(), i))
            .collect();

        let vectors = catalog
            .iter()
            .map(|exercise| {
                let mut vector = vec![0.0; vocabulary.len()];
                for tag in exercise.tags() {
                    if let Some(&i) = index.get(tag) {
                        vector[i] = 1.0;
                    }
                }
                vector
            })
            .collect();

        // First catalog row wins for duplicated names
        let mut by_name = HashMap::new();
        for (i, exercise) in catalog.iter().enumerate() {
            by_name.entry(exercise.name.clone()).or_insert(i);
        }

        Self {
            vocabulary,
            vectors,
            by_name,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Feature vector of the catalog row at `position`
    pub fn vector_at(&self, position: usize) -> Option<&[f64]> {
        self.vectors.get(position).map(Vec::as_slice)
    }

    /// Feature vector of the named exercise
    pub fn vector_for(&self, name: &str) -> Option<&[f64]> {
        self.by_name.get(name).and_then(|&i| self.vector_at(i))
    }

    /// Energy-weighted sum of the completed exercises' vectors, normalized to sum to 1
    ///
    /// Completions of exercises missing from the catalog contribute nothing.
    /// Returns `None` when nothing contributed.
    pub fn profile(&self, history: &[CompletedExercise]) -> Option<Vec<f64>> {
        let mut profile = vec![0.0; self.vocabulary.len()];

        for entry in history {
            let Some(vector) = self.vector_for(&entry.exercise_name) else {
                continue;
            };
            let weight = entry.energy_level.weight();
            for (acc, value) in profile.iter_mut().zip(vector) {
                *acc += value * weight;
            }
        }

        let total: f64 = profile.iter().sum();
        if total <= 0.0 {
            return None;
        }
        for value in profile.iter_mut() {
            *value /= total;
        }
        Some(profile)
    }
}

/// Cosine similarity; 0.0 when either vector has zero norm
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
