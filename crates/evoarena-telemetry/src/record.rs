use evoarena_core::Chromosome;
use serde::{Deserialize, Serialize};

/// Score summary of one finished generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummaryRecord {
    pub generation_index: usize,
    pub min_score: f64,
    pub max_score: f64,
    /// Every agent's score, in post-rollout population order.
    pub scores: Vec<f64>,
}

/// The best agent of one finished generation.
///
/// The score is the one earned during the generation's scored rollouts, not
/// during the telemetry replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestAgentRecord {
    pub generation_index: usize,
    pub score: f64,
    pub chromosome: Chromosome,
}

/// One intermediate state of the best-agent replay rollout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_index: usize,
    pub state_vector: Vec<f64>,
}
