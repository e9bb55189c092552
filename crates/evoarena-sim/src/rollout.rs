use evoarena_core::{Agent, Environment};
use evoarena_telemetry::{StepRecord, TelemetryError, TelemetrySink};
use rand::RngCore;

/// Hard ceiling on transition steps per rollout.
///
/// Guards against non-terminating environments. Hitting the ceiling is not an
/// error: an agent that stalls indefinitely simply stops accumulating reward
/// and the rollout ends as an ordinary (likely low-scoring) outcome.
pub const MAX_ROLLOUT_STEPS: usize = 1_000_000;

/// Drives one rollout to termination.
///
/// Scores are recorded as a side effect on the agents; the environment is
/// responsible for all scoring during `advance`.
pub fn run_rollout(environment: &dyn Environment, agents: &mut [Agent], rng: &mut dyn RngCore) {
    debug_assert_eq!(agents.len(), environment.agents_per_rollout());

    let mut state = environment.initialize_state(rng);
    for _ in 0..MAX_ROLLOUT_STEPS {
        if state.terminal {
            break;
        }
        environment.advance(&mut state, agents, rng);
    }
}

/// Like [`run_rollout`], but snapshots every state (including the initial
/// one) to the telemetry sink.
///
/// Used only for the best-agent replay of a generation, keeping per-step
/// telemetry volume bounded.
pub fn run_recorded_rollout(
    environment: &dyn Environment,
    agents: &mut [Agent],
    rng: &mut dyn RngCore,
    sink: &mut dyn TelemetrySink,
) -> Result<(), TelemetryError> {
    debug_assert_eq!(agents.len(), environment.agents_per_rollout());

    let mut state = environment.initialize_state(rng);
    sink.record_step(&StepRecord {
        step_index: state.step_index,
        state_vector: state.state_vector.clone(),
    })?;
    for _ in 0..MAX_ROLLOUT_STEPS {
        if state.terminal {
            break;
        }
        environment.advance(&mut state, agents, rng);
        sink.record_step(&StepRecord {
            step_index: state.step_index,
            state_vector: state.state_vector.clone(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use evoarena_core::SystemState;
    use evoarena_telemetry::MemorySink;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    /// Counts steps and never terminates on its own.
    #[derive(Debug)]
    struct EndlessEnvironment;

    impl Environment for EndlessEnvironment {
        fn percept_count(&self) -> usize {
            1
        }

        fn action_count(&self) -> usize {
            1
        }

        fn agents_per_rollout(&self) -> usize {
            1
        }

        fn initialize_state(&self, _rng: &mut dyn RngCore) -> SystemState {
            SystemState::new(vec![0.0])
        }

        fn advance(&self, state: &mut SystemState, agents: &mut [Agent], _rng: &mut dyn RngCore) {
            state.step_index += 1;
            agents[0].add_score(1.0);
        }
    }

    /// Terminates after a fixed number of steps.
    #[derive(Debug)]
    struct CountdownEnvironment {
        steps: usize,
    }

    impl Environment for CountdownEnvironment {
        fn percept_count(&self) -> usize {
            1
        }

        fn action_count(&self) -> usize {
            1
        }

        fn agents_per_rollout(&self) -> usize {
            1
        }

        fn initialize_state(&self, _rng: &mut dyn RngCore) -> SystemState {
            SystemState::new(vec![0.0])
        }

        fn advance(&self, state: &mut SystemState, agents: &mut [Agent], _rng: &mut dyn RngCore) {
            state.step_index += 1;
            agents[0].add_score(1.0);
            if state.step_index >= self.steps {
                state.terminal = true;
            }
        }
    }

    fn solo_agent() -> Vec<Agent> {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        vec![Agent::random_gaussian(1, 1, &mut rng)]
    }

    #[test]
    fn test_rollout_stops_at_terminal_state() {
        let mut agents = solo_agent();
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        run_rollout(&CountdownEnvironment { steps: 10 }, &mut agents, &mut rng);
        assert_eq!(agents[0].score(), 10.0);
    }

    #[test]
    fn test_rollout_ceiling_terminates_silently() {
        let mut agents = solo_agent();
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        run_rollout(&EndlessEnvironment, &mut agents, &mut rng);
        #[expect(clippy::cast_precision_loss)]
        let ceiling = MAX_ROLLOUT_STEPS as f64;
        assert_eq!(agents[0].score(), ceiling);
    }

    #[test]
    fn test_recorded_rollout_snapshots_every_state() {
        let mut agents = solo_agent();
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let mut sink = MemorySink::new();
        run_recorded_rollout(
            &CountdownEnvironment { steps: 4 },
            &mut agents,
            &mut rng,
            &mut sink,
        )
        .unwrap();
        let steps = sink.steps();
        // Initial state plus one snapshot per transition.
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].step_index, 0);
        assert_eq!(steps[4].step_index, 4);
    }
}
