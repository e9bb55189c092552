//! Generation pipeline: rollout execution, the worker pool, and the
//! population manager.
//!
//! One generation runs as a fixed sequence:
//!
//! 1. the population is shuffled (breaking the positional bias left by the
//!    previous generation's breeding order) and partitioned into disjoint
//!    rollout groups of `agents_per_rollout` agents,
//! 2. each group is dispatched as one work item onto a bounded queue consumed
//!    by a fixed-size pool of worker threads, each running the rollout runner
//!    to the environment's terminal state,
//! 3. the manager awaits one completion signal per dispatched work item,
//! 4. the best agent is extracted (stable tie-break), its rollout group is
//!    replayed on clones with full state recording, and the generation score
//!    summary goes to the telemetry sink,
//! 5. the scored population is handed to the genetic breeder and replaced
//!    wholesale by the next generation.
//!
//! # Concurrency model
//!
//! Rollout groups are disjoint `&mut` slices of the population, so no two
//! workers ever touch the same agent and no per-agent locking exists. Workers
//! hold no state across generations. Every rollout job owns an independently
//! seeded RNG derived from the manager's master RNG at partition time, which
//! keeps runs reproducible under a fixed seed regardless of worker scheduling.
//!
//! An external interrupt ([`StopFlag`]) is sampled only at generation
//! boundaries: once triggered, no further generations are dispatched and the
//! run returns cleanly with no half-bred generation left behind.

pub use self::{
    manager::{BestAgent, GenerationReport, Manager, ManagerConfig, RunOutcome},
    pool::{RolloutJob, WorkerPool},
    rollout::{MAX_ROLLOUT_STEPS, run_recorded_rollout, run_rollout},
    stop::StopFlag,
};

mod manager;
mod pool;
mod rollout;
mod stop;

use evoarena_telemetry::TelemetryError;
use evoarena_training::breeder::BreedError;

/// Rejected training setup. Fatal before any generation runs.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SetupError {
    #[display("worker count must be positive")]
    NoWorkers,
    #[display("rollouts per generation must be positive")]
    NoRollouts,
    #[display("environment must request at least one agent per rollout")]
    NoAgentsPerRollout,
    #[display("environment must report positive percept and action counts")]
    NoAgentDimensions,
    #[display("population of {population} cannot supply up to {required} distinct parents")]
    PopulationTooSmall { population: usize, required: usize },
}

/// Failure inside the generation loop. Breeding and telemetry errors are not
/// swallowed: a corrupted population or silently lost telemetry must not
/// propagate into later generations.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SimError {
    #[display("breeding failed: {_0}")]
    Breed(BreedError),
    #[display("telemetry failed: {_0}")]
    Telemetry(TelemetryError),
}
