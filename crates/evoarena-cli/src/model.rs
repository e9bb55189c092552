use chrono::{DateTime, Utc};
use evoarena_core::Chromosome;
use serde::{Deserialize, Serialize};

/// Saved result of a training run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainedModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub generations: usize,
    pub best_generation: usize,
    pub best_score: f64,
    pub chromosome: Chromosome,
}
