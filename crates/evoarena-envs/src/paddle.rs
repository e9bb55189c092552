use evoarena_core::{Agent, Environment, SystemState};
use rand::{Rng as _, RngCore};

// State vector layout (also the percept order):
// 0 - ball x
// 1 - ball y
// 2 - ball x velocity
// 3 - ball y velocity
// 4 - paddle 0 position
// 5 - paddle 1 position
const STATE_VECTOR_LEN: usize = 6;
const PERCEPT_COUNT: usize = 6;

// Each agent acts with a single paddle velocity.
const ACTION_COUNT: usize = 1;
const AGENTS_PER_ROLLOUT: usize = 2;

// The arena extends symmetrically about the origin: [-1, 1] in x (between
// the paddles) and [-0.5, 0.5] in y (across them).
const ARENA_X: f64 = 1.0;
const ARENA_Y: f64 = 0.5;

// Half-height of a paddle; the paddle covers position +- this amount.
const PADDLE_SIZE: f64 = 0.2;
const MAX_PADDLE_VELOCITY: f64 = 1.0;
const TIME_DELTA: f64 = 0.01;

const SCORING_REWARD: f64 = 100.0;
const BOUNCE_REWARD: f64 = 0.0;
// Reward per step for keeping the paddle in front of the ball.
const READY_REWARD: f64 = 1.0;

/// Two-player paddle-and-ball game.
///
/// The rollout advances until one agent scores a point (the ball crosses the
/// opponent's edge), at which point the state is terminal. The ball moves
/// with constant speed and bounces specularly off walls and paddles. The
/// arena is symmetric in x, so the second agent receives a mirrored percept
/// vector and both agents effectively play on the left.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddleEnvironment;

impl PaddleEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Reflects a velocity off a surface with the given normal.
fn bounce_specularly(velocity: &mut [f64; 2], normal: [f64; 2]) {
    let magnitude = normal[0].hypot(normal[1]);
    let unit = [normal[0] / magnitude, normal[1] / magnitude];
    let dot = velocity[0] * unit[0] + velocity[1] * unit[1];
    velocity[0] -= 2.0 * dot * unit[0];
    velocity[1] -= 2.0 * dot * unit[1];
}

impl Environment for PaddleEnvironment {
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
        // Ball starts halfway between the paddles at a random height, moving
        // towards a random side; paddles start neutral.
        let ball_x = 0.0;
        let ball_y = (2.0 * rng.random::<f64>() - 1.0) * ARENA_Y;
        let ball_vy = 0.5 * (rng.random::<f64>() + 1.0) * ARENA_Y;
        let mut ball_vx = 0.5 * (rng.random::<f64>() + 1.0) * ARENA_X;
        if rng.random_bool(0.5) {
            ball_vx = -ball_vx;
        }
        SystemState::new(vec![ball_x, ball_y, ball_vx, ball_vy, 0.0, 0.0])
    }

    fn advance(&self, state: &mut SystemState, agents: &mut [Agent], _rng: &mut dyn RngCore) {
        debug_assert_eq!(state.state_vector.len(), STATE_VECTOR_LEN);
        let mut ball_x = state.state_vector[0];
        let mut ball_y = state.state_vector[1];
        let ball_vx = state.state_vector[2];
        let ball_vy = state.state_vector[3];
        let mut paddle0 = state.state_vector[4];
        let mut paddle1 = state.state_vector[5];

        let percepts = [ball_x, ball_y, ball_vx, ball_vy, paddle0, paddle1];
        // The arena is symmetric in x: mirror the percepts for agent 1 so
        // both agents always play on the left.
        let mirrored = [-ball_x, ball_y, -ball_vx, ball_vy, paddle0, paddle1];

        let mut paddle0_velocity = agents[0].act(&percepts)[0];
        let mut paddle1_velocity = agents[1].act(&mirrored)[0];

        // A ball past either edge without interception is a point for the
        // opposite agent and ends the rollout.
        if ball_x >= ARENA_X {
            agents[0].add_score(SCORING_REWARD);
            state.terminal = true;
            return;
        }
        if ball_x <= -ARENA_X {
            agents[1].add_score(SCORING_REWARD);
            state.terminal = true;
            return;
        }

        ball_x += TIME_DELTA * ball_vx;
        ball_y += TIME_DELTA * ball_vy;
        let mut ball_velocity = [ball_vx, ball_vy];

        paddle0_velocity = paddle0_velocity.clamp(-MAX_PADDLE_VELOCITY, MAX_PADDLE_VELOCITY);
        paddle1_velocity = paddle1_velocity.clamp(-MAX_PADDLE_VELOCITY, MAX_PADDLE_VELOCITY);
        paddle0 = (paddle0 + TIME_DELTA * paddle0_velocity).clamp(-ARENA_Y, ARENA_Y);
        paddle1 = (paddle1 + TIME_DELTA * paddle1_velocity).clamp(-ARENA_Y, ARENA_Y);

        // Walls reflect the ball specularly.
        if ball_y <= -ARENA_Y {
            bounce_specularly(&mut ball_velocity, [0.0, 1.0]);
        }
        if ball_y >= ARENA_Y {
            bounce_specularly(&mut ball_velocity, [0.0, -1.0]);
        }
        // Paddles reflect only when actually in the way.
        if ball_x <= -ARENA_X && (paddle0 - PADDLE_SIZE..paddle0 + PADDLE_SIZE).contains(&ball_y) {
            bounce_specularly(&mut ball_velocity, [1.0, 0.0]);
            agents[0].add_score(BOUNCE_REWARD);
            ball_x = -0.9;
        }
        if ball_x >= ARENA_X && (paddle1 - PADDLE_SIZE..paddle1 + PADDLE_SIZE).contains(&ball_y) {
            bounce_specularly(&mut ball_velocity, [-1.0, 0.0]);
            agents[1].add_score(BOUNCE_REWARD);
            ball_x = 0.9;
        }

        // Standing ready in front of the ball earns a small shaping reward.
        if (paddle0 - PADDLE_SIZE..paddle0 + PADDLE_SIZE).contains(&ball_y) {
            agents[0].add_score(READY_REWARD);
        }
        if (paddle1 - PADDLE_SIZE..paddle1 + PADDLE_SIZE).contains(&ball_y) {
            agents[1].add_score(READY_REWARD);
        }

        ball_x = ball_x.clamp(-ARENA_X, ARENA_X);
        ball_y = ball_y.clamp(-ARENA_Y, ARENA_Y);

        state.step_index += 1;
        state.state_vector[0] = ball_x;
        state.state_vector[1] = ball_y;
        state.state_vector[2] = ball_velocity[0];
        state.state_vector[3] = ball_velocity[1];
        state.state_vector[4] = paddle0;
        state.state_vector[5] = paddle1;
    }
}
