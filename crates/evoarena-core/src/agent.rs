use rand::Rng;

use crate::Chromosome;

/// A linear controller with a chromosome and an accumulated fitness score.
///
/// The score starts at zero when the agent is born (randomly or through
/// breeding) and accumulates additively while the agent is run through an
/// environment. Scoring is entirely the environment's responsibility; the
/// agent only offers [`Agent::add_score`].
#[derive(Debug, Clone)]
pub struct Agent {
    chromosome: Chromosome,
    score: f64,
}

impl Agent {
    /// Creates an agent with a standard-normal random chromosome and zero
    /// score. Used to seed the first generation.
    pub fn random_gaussian<R>(action_count: usize, percept_count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::from_chromosome(Chromosome::random_gaussian(action_count, percept_count, rng))
    }

    /// Wraps a chromosome into a newborn agent with zero score.
    #[must_use]
    pub fn from_chromosome(chromosome: Chromosome) -> Self {
        Self {
            chromosome,
            score: 0.0,
        }
    }

    #[must_use]
    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    /// Mutable chromosome access, used by the genetic operators.
    pub fn chromosome_mut(&mut self) -> &mut Chromosome {
        &mut self.chromosome
    }

    /// Accumulated fitness score.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Adds reward (or penalty, if negative) to the agent's score.
    pub fn add_score(&mut self, delta: f64) {
        self.score += delta;
    }

    /// Computes the agent's action vector for a percept vector.
    ///
    /// # Panics
    ///
    /// Panics if `percepts` does not match the chromosome's percept count.
    #[must_use]
    pub fn act(&self, percepts: &[f64]) -> Vec<f64> {
        self.chromosome.act(percepts)
    }
}
