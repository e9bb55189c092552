use rand::RngCore;

use crate::{Agent, SystemState};

/// Contract between the training core and a concrete simulated environment.
///
/// Implementations define the physics of one rollout: how a fresh
/// [`SystemState`] looks, and how one transition step advances it. The core
/// never inspects the state vector; it only drives `advance` until `terminal`
/// is set (or a step ceiling is hit) and hands the state to telemetry.
///
/// # Scoring
///
/// `advance` **must** credit each relevant agent's score via
/// [`Agent::add_score`]; nothing else in the system awards fitness.
///
/// # Sharing and randomness
///
/// One environment value is shared by reference across all concurrent
/// rollouts of a generation, so implementations hold no per-rollout state.
/// Anything random (initial conditions, stochastic transitions) draws from
/// the RNG passed in by the caller, which is owned by a single rollout and
/// never shared across threads.
pub trait Environment: Send + Sync {
    /// Width of the percept vector each agent sees.
    fn percept_count(&self) -> usize;

    /// Width of the action vector each agent produces.
    fn action_count(&self) -> usize;

    /// Number of agents participating in one rollout.
    fn agents_per_rollout(&self) -> usize;

    /// Builds the initial state for a new rollout.
    fn initialize_state(&self, rng: &mut dyn RngCore) -> SystemState;

    /// Applies one transition step in place.
    ///
    /// Reads the current state, computes each agent's action from its percept
    /// view, writes the successor state into `state`, increments
    /// `state.step_index`, sets `state.terminal` when the rollout should end,
    /// and updates agent scores.
    fn advance(&self, state: &mut SystemState, agents: &mut [Agent], rng: &mut dyn RngCore);
}
