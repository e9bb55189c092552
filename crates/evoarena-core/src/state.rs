use serde::{Deserialize, Serialize};

/// Mutable state of one rollout.
///
/// Created fresh by [`Environment::initialize_state`](crate::Environment::initialize_state)
/// at rollout start and mutated in place by each `advance` call. Once
/// `terminal` is set the rollout runner applies no further transitions, so the
/// state is effectively frozen from that point on.
///
/// The state vector's width is environment-defined; it may be wider than the
/// percept count when the environment tracks bookkeeping the agents never see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    /// Environment-defined state vector.
    pub state_vector: Vec<f64>,
    /// Number of transitions applied so far.
    pub step_index: usize,
    /// Whether the rollout has ended.
    pub terminal: bool,
}

impl SystemState {
    /// Creates a non-terminal state at step zero.
    #[must_use]
    pub fn new(state_vector: Vec<f64>) -> Self {
        Self {
            state_vector,
            step_index: 0,
            terminal: false,
        }
    }
}
