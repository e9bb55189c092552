use evoarena_core::{Agent, Chromosome, Environment};
use evoarena_stats::descriptive::DescriptiveStats;
use evoarena_telemetry::{
    BestAgentRecord, GenerationSummaryRecord, TelemetryError, TelemetrySink,
};
use evoarena_training::breeder::GeneticBreeder;
use rand::{Rng as _, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg64Mcg;

use crate::{
    RolloutJob, SetupError, SimError, StopFlag, WorkerPool, rollout,
};

/// Sizing and seeding of a training run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Rollouts per generation. Population size is this times the
    /// environment's `agents_per_rollout`.
    pub rollouts_per_generation: usize,
    /// Worker threads sharing the rollout queue.
    pub worker_count: usize,
    /// Master seed; every other RNG in the run derives from it.
    pub seed: u64,
}

/// Summary of one completed generation, for progress reporting.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub generation_index: usize,
    pub best_score: f64,
    pub score_stats: DescriptiveStats,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub generations_completed: usize,
    /// True when the stop flag ended the run before the requested generation
    /// count.
    pub interrupted: bool,
}

/// Best agent observed so far across all generations of a run.
#[derive(Debug, Clone)]
pub struct BestAgent {
    pub generation_index: usize,
    pub score: f64,
    pub chromosome: Chromosome,
}

/// Orchestrates the generation pipeline.
///
/// Owns the population, the environment, the breeder, and the telemetry sink
/// for one training run. See the crate docs for the per-generation sequence.
pub struct Manager {
    environment: Box<dyn Environment>,
    breeder: GeneticBreeder,
    sink: Box<dyn TelemetrySink>,
    pool: WorkerPool,
    population: Vec<Agent>,
    rollouts_per_generation: usize,
    generation_index: usize,
    best_ever: Option<BestAgent>,
    stop: StopFlag,
    rng: Pcg64Mcg,
}

impl Manager {
    /// Validates the setup and seeds the initial random population.
    ///
    /// Refuses to start degenerate runs: zero workers, zero rollouts, an
    /// environment without agent slots, or a population too small for the
    /// breeder's maximum parent count.
    pub fn new(
        environment: Box<dyn Environment>,
        breeder: GeneticBreeder,
        sink: Box<dyn TelemetrySink>,
        config: &ManagerConfig,
    ) -> Result<Self, SetupError> {
        if config.rollouts_per_generation == 0 {
            return Err(SetupError::NoRollouts);
        }
        let agents_per_rollout = environment.agents_per_rollout();
        if agents_per_rollout == 0 {
            return Err(SetupError::NoAgentsPerRollout);
        }
        // Zero-gene chromosomes cannot be bred or mutated.
        if environment.percept_count() == 0 || environment.action_count() == 0 {
            return Err(SetupError::NoAgentDimensions);
        }
        let pool = WorkerPool::new(config.worker_count)?;

        let population_size = agents_per_rollout * config.rollouts_per_generation;
        if population_size < breeder.max_parent_count() {
            return Err(SetupError::PopulationTooSmall {
                population: population_size,
                required: breeder.max_parent_count(),
            });
        }

        let mut rng = Pcg64Mcg::seed_from_u64(config.seed);
        let population = (0..population_size)
            .map(|_| {
                Agent::random_gaussian(
                    environment.action_count(),
                    environment.percept_count(),
                    &mut rng,
                )
            })
            .collect();

        Ok(Self {
            environment,
            breeder,
            sink,
            pool,
            population,
            rollouts_per_generation: config.rollouts_per_generation,
            generation_index: 0,
            best_ever: None,
            stop: StopFlag::new(),
            rng,
        })
    }

    /// Current population, in breeding order.
    #[must_use]
    pub fn population(&self) -> &[Agent] {
        &self.population
    }

    /// Index of the next generation to run.
    #[must_use]
    pub fn generation_index(&self) -> usize {
        self.generation_index
    }

    /// Best agent observed so far, if any generation has completed.
    #[must_use]
    pub fn best_agent(&self) -> Option<&BestAgent> {
        self.best_ever.as_ref()
    }

    /// Clone of the run's stop flag, e.g. for wiring to a signal handler.
    #[must_use]
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Runs one full generation: rollouts, telemetry, breeding.
    pub fn run_generation(&mut self) -> Result<GenerationReport, SimError> {
        let agents_per_rollout = self.environment.agents_per_rollout();
        let generation_index = self.generation_index;

        // Dispatch: shuffle away the previous generation's positional bias,
        // then partition into disjoint rollout groups.
        self.population.shuffle(&mut self.rng);
        let rng = &mut self.rng;
        let jobs = self
            .population
            .chunks_mut(agents_per_rollout)
            .map(|agents| RolloutJob {
                agents,
                rng: Pcg64Mcg::seed_from_u64(rng.random()),
            })
            .collect::<Vec<_>>();
        let dispatched = jobs.len();
        debug_assert_eq!(dispatched, self.rollouts_per_generation);

        // Await completion of every dispatched rollout.
        let completed = self.pool.run_rollouts(self.environment.as_ref(), jobs);
        assert_eq!(
            completed, dispatched,
            "every dispatched rollout must signal completion"
        );

        // Scored: extract the best agent (first occurrence wins ties) and
        // replay its rollout group with full state recording.
        let scores = self.population.iter().map(Agent::score).collect::<Vec<_>>();
        let score_stats =
            DescriptiveStats::new(scores.iter().copied()).expect("population is non-empty");
        let mut best_index = 0;
        for (index, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best_index] {
                best_index = index;
            }
        }
        let best_score = scores[best_index];

        self.sink.record_best_agent(&BestAgentRecord {
            generation_index,
            score: best_score,
            chromosome: self.population[best_index].chromosome().clone(),
        })?;
        self.replay_best_group(&scores)?;
        self.sink.record_generation_summary(&GenerationSummaryRecord {
            generation_index,
            min_score: score_stats.min,
            max_score: score_stats.max,
            scores,
        })?;

        if self
            .best_ever
            .as_ref()
            .is_none_or(|best| best_score > best.score)
        {
            self.best_ever = Some(BestAgent {
                generation_index,
                score: best_score,
                chromosome: self.population[best_index].chromosome().clone(),
            });
        }

        // Bred: replace the population wholesale.
        self.population = self.breeder.next_generation(&self.population)?;
        self.generation_index += 1;

        Ok(GenerationReport {
            generation_index,
            best_score,
            score_stats,
        })
    }

    /// Re-simulates the top-scoring rollout group with per-step telemetry.
    ///
    /// The replay runs on clones: recorded trajectories must not perturb the
    /// scores the breeder is about to select on.
    fn replay_best_group(&mut self, scores: &[f64]) -> Result<(), TelemetryError> {
        let agents_per_rollout = self.environment.agents_per_rollout();

        let mut order = (0..self.population.len()).collect::<Vec<_>>();
        // Stable sort: tied scores keep population order.
        order.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));

        let mut replay_group = order[..agents_per_rollout]
            .iter()
            .map(|&index| self.population[index].clone())
            .collect::<Vec<_>>();
        let mut replay_rng = Pcg64Mcg::seed_from_u64(self.rng.random());
        rollout::run_recorded_rollout(
            self.environment.as_ref(),
            &mut replay_group,
            &mut replay_rng,
            self.sink.as_mut(),
        )
    }

    /// Runs up to `generations` generations, sampling the stop flag at each
    /// boundary.
    ///
    /// `on_generation` is called after every completed generation, e.g. for
    /// progress output. An interrupt is not an error: the outcome reports how
    /// many generations completed and that the run was cut short.
    pub fn run<F>(&mut self, generations: usize, mut on_generation: F) -> Result<RunOutcome, SimError>
    where
        F: FnMut(&GenerationReport),
    {
        for completed in 0..generations {
            if self.stop.is_triggered() {
                return Ok(RunOutcome {
                    generations_completed: completed,
                    interrupted: true,
                });
            }
            let report = self.run_generation()?;
            on_generation(&report);
        }
        Ok(RunOutcome {
            generations_completed: generations,
            interrupted: false,
        })
    }

    /// Flushes and closes the telemetry sink, ending the run.
    ///
    /// Returns the best agent observed across all generations, if any.
    pub fn finish(mut self) -> Result<Option<BestAgent>, TelemetryError> {
        self.sink.close()?;
        Ok(self.best_ever.take())
    }
}
