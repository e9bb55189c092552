use std::{path::PathBuf, thread};

use chrono::Utc;
use evoarena_core::Environment;
use evoarena_envs::{FlyerEnvironment, PaddleEnvironment, ToyEnvironment};
use evoarena_sim::{Manager, ManagerConfig};
use evoarena_telemetry::JsonLinesSink;
use evoarena_training::breeder::{BreederConfig, GeneticBreeder};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64Mcg;

use crate::{model::TrainedModel, util};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum EnvKind {
    #[default]
    Toy,
    Swarm,
    Paddle,
    Flyer,
}

impl EnvKind {
    fn name(self) -> &'static str {
        match self {
            EnvKind::Toy => "toy",
            EnvKind::Swarm => "swarm",
            EnvKind::Paddle => "paddle",
            EnvKind::Flyer => "flyer",
        }
    }

    fn build(self) -> Box<dyn Environment> {
        match self {
            EnvKind::Toy => Box::new(ToyEnvironment::solo()),
            EnvKind::Swarm => Box::new(ToyEnvironment::swarm()),
            EnvKind::Paddle => Box::new(PaddleEnvironment::new()),
            EnvKind::Flyer => Box::new(FlyerEnvironment::new()),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Environment to train in
    #[arg(long, default_value = "toy")]
    env: EnvKind,
    /// Number of generations to run
    #[arg(long, default_value_t = 100)]
    generations: usize,
    /// Rollouts per generation; the population is this times the
    /// environment's agents per rollout
    #[arg(long, default_value_t = 30)]
    rollouts: usize,
    /// Worker threads; defaults to the available parallelism
    #[arg(long)]
    workers: Option<usize>,
    /// Master seed; a random one is drawn when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Mutation probability per bred chromosome
    #[arg(long, default_value_t = 1e-3)]
    mutation_rate: f64,
    /// Directory for telemetry files
    #[arg(long, default_value = "training_data")]
    data_dir: PathBuf,
    /// Output file path for the trained model
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let workers = arg
        .workers
        .unwrap_or_else(|| thread::available_parallelism().map_or(1, usize::from));
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut master_rng = Pcg64Mcg::seed_from_u64(seed);

    let breeder_config = BreederConfig {
        mutation_rate: arg.mutation_rate,
        ..BreederConfig::default()
    };
    let breeder = GeneticBreeder::new(&breeder_config, Pcg64Mcg::seed_from_u64(master_rng.random()))?;
    let sink = JsonLinesSink::create(&arg.data_dir)?;

    let mut manager = Manager::new(
        arg.env.build(),
        breeder,
        Box::new(sink),
        &ManagerConfig {
            rollouts_per_generation: arg.rollouts,
            worker_count: workers,
            seed: master_rng.random(),
        },
    )?;

    let stop = manager.stop_flag();
    ctrlc::set_handler(move || {
        eprintln!("Interrupt received, stopping after the current generation...");
        stop.trigger();
    })?;

    eprintln!(
        "Training in `{}` ({} rollouts/generation, {workers} workers, seed {seed})",
        arg.env.name(),
        arg.rollouts,
    );
    let outcome = manager.run(arg.generations, |report| {
        eprintln!(
            "Generation #{}: best {:.3}, mean {:.3}, min {:.3}, max {:.3}",
            report.generation_index,
            report.best_score,
            report.score_stats.mean,
            report.score_stats.min,
            report.score_stats.max,
        );
    })?;
    if outcome.interrupted {
        eprintln!(
            "Interrupted after {} of {} generations",
            outcome.generations_completed, arg.generations,
        );
    }

    let best = manager.finish()?;
    let Some(best) = best else {
        eprintln!("No generations completed, nothing to save");
        return Ok(());
    };

    let model = TrainedModel {
        name: arg.env.name().to_owned(),
        trained_at: Utc::now(),
        generations: outcome.generations_completed,
        best_generation: best.generation_index,
        best_score: best.score,
        chromosome: best.chromosome,
    };
    util::save_json(&model, arg.output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!(
        "  Best score: {:.3} (generation #{})",
        model.best_score, model.best_generation,
    );

    Ok(())
}
