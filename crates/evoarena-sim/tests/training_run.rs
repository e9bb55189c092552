//! End-to-end training runs against a real environment.

use evoarena_envs::ToyEnvironment;
use evoarena_sim::{Manager, ManagerConfig};
use evoarena_telemetry::MemorySink;
use evoarena_training::breeder::{BreederConfig, GeneticBreeder};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

const ROLLOUTS: usize = 20;
const GENERATIONS: usize = 5;

fn manager_with_sink() -> (Manager, MemorySink) {
    let breeder =
        GeneticBreeder::new(&BreederConfig::default(), Pcg64Mcg::seed_from_u64(99)).unwrap();
    let sink = MemorySink::new();
    let manager = Manager::new(
        Box::new(ToyEnvironment::solo()),
        breeder,
        Box::new(sink.clone()),
        &ManagerConfig {
            rollouts_per_generation: ROLLOUTS,
            worker_count: 3,
            seed: 7,
        },
    )
    .unwrap();
    (manager, sink)
}

#[test]
fn test_full_run_records_every_generation() {
    let (mut manager, sink) = manager_with_sink();

    let mut reported = Vec::new();
    let outcome = manager
        .run(GENERATIONS, |report| {
            reported.push(report.generation_index);
        })
        .unwrap();
    assert_eq!(outcome.generations_completed, GENERATIONS);
    assert!(!outcome.interrupted);
    assert_eq!(reported, (0..GENERATIONS).collect::<Vec<_>>());

    // Population size is invariant across breeding.
    assert_eq!(manager.population().len(), ROLLOUTS);

    let summaries = sink.generation_summaries();
    assert_eq!(summaries.len(), GENERATIONS);
    for (index, summary) in summaries.iter().enumerate() {
        assert_eq!(summary.generation_index, index);
        assert_eq!(summary.scores.len(), ROLLOUTS);
        assert!(summary.min_score <= summary.max_score);
        assert!(
            summary
                .scores
                .iter()
                .all(|score| (summary.min_score..=summary.max_score).contains(score))
        );
    }

    let best_agents = sink.best_agents();
    assert_eq!(best_agents.len(), GENERATIONS);
    for (summary, best) in summaries.iter().zip(&best_agents) {
        assert_eq!(best.generation_index, summary.generation_index);
        assert_eq!(best.score, summary.max_score);
    }

    // The replay of the best rollout recorded at least the initial state of
    // every generation.
    assert!(sink.steps().len() >= GENERATIONS);

    let best = manager.finish().unwrap().expect("generations completed");
    assert!(best.generation_index < GENERATIONS);
    assert!(sink.is_closed());
}

#[test]
fn test_stop_before_first_generation_completes_nothing() {
    let (mut manager, sink) = manager_with_sink();
    manager.stop_flag().trigger();

    let outcome = manager.run(GENERATIONS, |_| {}).unwrap();
    assert_eq!(outcome.generations_completed, 0);
    assert!(outcome.interrupted);
    assert!(sink.generation_summaries().is_empty());

    let best = manager.finish().unwrap();
    assert!(best.is_none());
    assert!(sink.is_closed());
}

#[test]
fn test_stop_mid_run_finishes_the_current_generation() {
    let (mut manager, sink) = manager_with_sink();

    let stop = manager.stop_flag();
    let outcome = manager
        .run(GENERATIONS, |_report| {
            stop.trigger();
        })
        .unwrap();
    assert_eq!(outcome.generations_completed, 1);
    assert!(outcome.interrupted);

    let summaries = sink.generation_summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].generation_index, 0);

    let best = manager.finish().unwrap().expect("one generation completed");
    assert_eq!(best.generation_index, 0);
}

#[test]
fn test_fixed_seed_reproduces_scores() {
    let run_scores = || {
        let (mut manager, sink) = manager_with_sink();
        manager.run(3, |_| {}).unwrap();
        manager.finish().unwrap();
        sink.generation_summaries()
            .into_iter()
            .map(|summary| summary.scores)
            .collect::<Vec<_>>()
    };
    assert_eq!(run_scores(), run_scores());
}
