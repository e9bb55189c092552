//! Core data model for evoarena: agents, chromosomes, system states, and the
//! environment contract.
//!
//! An [`Agent`] is a linear controller: its [`Chromosome`] is an
//! `action_count x percept_count` matrix that maps a percept vector to an
//! action vector. Agents accumulate a fitness score as a side effect of being
//! run through an [`Environment`].
//!
//! Environments are pluggable via dynamic dispatch: anything implementing
//! [`Environment`] can be driven by the rollout runner in `evoarena-sim`.
//! The contract is deliberately small:
//!
//! - dimensionality queries (`percept_count`, `action_count`,
//!   `agents_per_rollout`),
//! - fresh [`SystemState`] construction,
//! - a single `advance` step that mutates the state in place, reads agent
//!   actions, and is solely responsible for updating agent scores.
//!
//! Randomness is passed in explicitly wherever it is needed so that
//! environments hold no hidden generator state and can be shared immutably
//! across concurrent rollouts.

pub use self::{
    agent::Agent,
    chromosome::Chromosome,
    environment::Environment,
    state::SystemState,
};

mod agent;
mod chromosome;
mod environment;
mod state;

/// Dimension mismatch between a chromosome and the data applied to it.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("expected {expected} genes, got {actual}")]
pub struct DimensionError {
    /// Gene count implied by the chromosome shape.
    pub expected: usize,
    /// Gene count actually supplied.
    pub actual: usize,
}
