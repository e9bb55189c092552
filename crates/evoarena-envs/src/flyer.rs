use evoarena_core::{Agent, Environment, SystemState};
use rand::{Rng as _, RngCore};

// State vector layout:
// 0 - agent x
// 1 - agent y
// 2 - agent x velocity
// 3 - agent y velocity
// 4 - target x
// 5 - target y
// 6 - targets visited
// 7 - minimum distance reached to the current target
const STATE_VECTOR_LEN: usize = 8;

// Percepts are the first six state entries; the visit count and minimum
// distance are bookkeeping the agent does not see.
const PERCEPT_COUNT: usize = 6;

// Actions: vertical thrust, horizontal thrust.
const ACTION_COUNT: usize = 2;
const AGENTS_PER_ROLLOUT: usize = 1;

// The flight area spans [-bound, bound] in both axes.
const SIMULATION_BOUND: f64 = 100.0;
const TIME_DELTA: f64 = 0.05;
const GRAVITY: f64 = 0.0;
const FRICTION_CONSTANT: f64 = 0.0;
const MAX_THRUST: f64 = 5.0;

// A target counts as collected within this radius.
const AGENT_RADIUS: f64 = 10.0;
// Each new target is redrawn until at least this far from the previous one.
const MIN_NEXT_TARGET_RADIUS: f64 = 25.0;
// The rollout ends once this many targets have been collected.
const MAX_TARGETS: f64 = 10.0;

const TARGET_REWARD: f64 = 1.0;
const APPROACH_REWARD: f64 = 0.0;
const STEP_PENALTY: f64 = -0.001;

/// Thrust-controlled flyer chasing a sequence of waypoint targets.
///
/// A single agent starts at rest in the middle of the flight area and steers
/// with a vertical and a horizontal thruster. Collecting a target scores a
/// point and spawns the next one at a random position well away from the
/// last; a small per-step penalty rewards finishing quickly. The rollout is
/// terminal once ten targets have been collected.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlyerEnvironment;

impl FlyerEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Redraws uniformly over the flight area until the new target is at least
/// `MIN_NEXT_TARGET_RADIUS` from the previous one.
fn choose_next_target(previous: [f64; 2], rng: &mut dyn RngCore) -> [f64; 2] {
    let mut target = previous;
    while (target[0] - previous[0]).hypot(target[1] - previous[1]) < MIN_NEXT_TARGET_RADIUS {
        target = [
            rng.random_range(-SIMULATION_BOUND..SIMULATION_BOUND),
            rng.random_range(-SIMULATION_BOUND..SIMULATION_BOUND),
        ];
    }
    target
}

impl Environment for FlyerEnvironment {
    fn percept_count(&self) -> usize {
        PERCEPT_COUNT
    }

    fn action_count(&self) -> usize {
        ACTION_COUNT
    }

    fn agents_per_rollout(&self) -> usize {
        AGENTS_PER_ROLLOUT
    }

    fn initialize_state(&self, rng: &mut dyn RngCore) -> SystemState {
        // The agent starts at the origin, at rest.
        let target = choose_next_target([0.0, 0.0], rng);
        let min_distance = target[0].hypot(target[1]);
        SystemState::new(vec![
            0.0,
            0.0,
            0.0,
            0.0,
            target[0],
            target[1],
            0.0,
            min_distance,
        ])
    }

    fn advance(&self, state: &mut SystemState, agents: &mut [Agent], rng: &mut dyn RngCore) {
        debug_assert_eq!(state.state_vector.len(), STATE_VECTOR_LEN);
        let x = state.state_vector[0];
        let y = state.state_vector[1];
        let vel_x = state.state_vector[2];
        let vel_y = state.state_vector[3];
        let mut target_x = state.state_vector[4];
        let mut target_y = state.state_vector[5];
        let mut targets_visited = state.state_vector[6];
        let mut min_distance = state.state_vector[7];

        let percepts = [x, y, vel_x, vel_y, target_x, target_y];
        let agent = &mut agents[0];
        let actions = agent.act(&percepts);
        let vertical_thrust = actions[0].clamp(-MAX_THRUST, MAX_THRUST);
        let horizontal_thrust = actions[1].clamp(-MAX_THRUST, MAX_THRUST);

        let new_x = x + TIME_DELTA * vel_x;
        let new_y = y + TIME_DELTA * vel_y;
        let new_vel_y = (1.0 - FRICTION_CONSTANT) * (vel_y + TIME_DELTA * (vertical_thrust - GRAVITY));
        let new_vel_x = (1.0 - FRICTION_CONSTANT) * (vel_x + TIME_DELTA * horizontal_thrust);

        // Reward improving on the closest approach to the current target.
        let distance = (new_x - target_x).hypot(new_y - target_y);
        if distance < min_distance {
            min_distance = distance;
            agent.add_score(APPROACH_REWARD);
        }

        if distance < AGENT_RADIUS {
            agent.add_score(TARGET_REWARD);
            [target_x, target_y] = choose_next_target([target_x, target_y], rng);
            targets_visited += 1.0;
            min_distance = (new_x - target_x).hypot(new_y - target_y);
            if targets_visited >= MAX_TARGETS {
                state.terminal = true;
            }
        }

        agent.add_score(STEP_PENALTY);

        state.step_index += 1;
        state.state_vector[0] = new_x;
        state.state_vector[1] = new_y;
        state.state_vector[2] = new_vel_x;
        state.state_vector[3] = new_vel_y;
        state.state_vector[4] = target_x;
        state.state_vector[5] = target_y;
        state.state_vector[6] = targets_visited;
        state.state_vector[7] = min_distance;
    }
}

#[cfg(test)]
mod tests {
    use evoarena_core::Chromosome;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn coasting_agent() -> Agent {
        Agent::from_chromosome(
            Chromosome::from_genes(ACTION_COUNT, PERCEPT_COUNT, vec![0.0; 12]).unwrap(),
        )
    }

    #[test]
    fn test_initial_target_is_far_enough() {
        let environment = FlyerEnvironment::new();
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let state = environment.initialize_state(&mut rng);
        assert_eq!(state.state_vector.len(), STATE_VECTOR_LEN);
        let target_distance = state.state_vector[4].hypot(state.state_vector[5]);
        assert!(target_distance >= MIN_NEXT_TARGET_RADIUS);
        assert_eq!(state.state_vector[7], target_distance);
        assert!(!state.terminal);
    }

    #[test]
    fn test_coasting_agent_only_pays_step_penalty() {
        let environment = FlyerEnvironment::new();
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mut state = environment.initialize_state(&mut rng);
        let mut agents = vec![coasting_agent()];
        environment.advance(&mut state, &mut agents, &mut rng);
        // At rest with zero thrust the agent does not move, so no target and
        // no closest-approach improvement.
        assert_eq!(state.state_vector[0], 0.0);
        assert_eq!(state.state_vector[1], 0.0);
        assert!((agents[0].score() - STEP_PENALTY).abs() < 1e-12);
        assert_eq!(state.step_index, 1);
    }

    #[test]
    fn test_reaching_target_scores_and_respawns() {
        let environment = FlyerEnvironment::new();
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        // Agent one step away from drifting inside the target radius.
        let mut state = SystemState::new(vec![30.0, 40.0, 0.0, 0.0, 30.0, 40.0, 0.0, 50.0]);
        let mut agents = vec![coasting_agent()];
        environment.advance(&mut state, &mut agents, &mut rng);
        assert!(
            (agents[0].score() - (TARGET_REWARD + APPROACH_REWARD + STEP_PENALTY)).abs() < 1e-12
        );
        assert_eq!(state.state_vector[6], 1.0);
        let new_target_distance = (state.state_vector[4] - 30.0).hypot(state.state_vector[5] - 40.0);
        assert!(new_target_distance >= MIN_NEXT_TARGET_RADIUS);
        assert!(!state.terminal);
    }

    #[test]
    fn test_final_target_ends_rollout() {
        let environment = FlyerEnvironment::new();
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        // Nine targets already visited; collecting the tenth is terminal.
        let mut state = SystemState::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 9.0, 5.0]);
        let mut agents = vec![coasting_agent()];
        environment.advance(&mut state, &mut agents, &mut rng);
        assert!(state.terminal);
        assert_eq!(state.state_vector[6], 10.0);
    }

    #[test]
    fn test_thrust_is_clamped() {
        let environment = FlyerEnvironment::new();
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mut state = SystemState::new(vec![0.0, 0.0, 0.0, 0.0, 30.0, 40.0, 0.0, 50.0]);
        // Huge positive genes produce actions far beyond the thrust limit.
        let chromosome = Chromosome::from_genes(ACTION_COUNT, PERCEPT_COUNT, vec![1e6; 12]).unwrap();
        let mut agents = vec![Agent::from_chromosome(chromosome)];
        environment.advance(&mut state, &mut agents, &mut rng);
        assert!((state.state_vector[3] - TIME_DELTA * MAX_THRUST).abs() < 1e-12);
    }
}
