use evoarena_core::{Agent, Environment, SystemState};
use rand::RngCore;

/// One-step environment: the rollout is terminal after a single transition
/// and each agent's score is the sum of its action vector.
///
/// With an all-ones percept vector, the optimal chromosome is simply "every
/// gene as large as possible", which makes training progress easy to verify
/// by eye. The swarm flavor scores every agent in the rollout the same way.
#[derive(Debug, Clone)]
pub struct ToyEnvironment {
    percept_count: usize,
    action_count: usize,
    agents_per_rollout: usize,
}

impl ToyEnvironment {
    /// Single-agent flavor: 1 percept, 10 actions.
    #[must_use]
    pub fn solo() -> Self {
        Self {
            percept_count: 1,
            action_count: 10,
            agents_per_rollout: 1,
        }
    }

    /// Multi-agent flavor: 5 percepts, 5 actions, 10 agents per rollout.
    #[must_use]
    pub fn swarm() -> Self {
        Self {
            percept_count: 5,
            action_count: 5,
            agents_per_rollout: 10,
        }
    }
}

impl Environment for ToyEnvironment {
    fn percept_count(&self) -> usize {
        self.percept_count
    }

    fn action_count(&self) -> usize {
        self.action_count
    }

    fn agents_per_rollout(&self) -> usize {
        self.agents_per_rollout
    }

    fn initialize_state(&self, _rng: &mut dyn RngCore) -> SystemState {
        SystemState::new(vec![1.0; self.percept_count])
    }

    fn advance(&self, state: &mut SystemState, agents: &mut [Agent], _rng: &mut dyn RngCore) {
        state.step_index += 1;
        state.terminal = true;
        for agent in agents {
            let actions = agent.act(&state.state_vector);
            agent.add_score(actions.iter().sum());
        }
    }
}
