use evoarena_core::{Agent, Chromosome};
use rand::{
    Rng as _,
    distr::{Distribution as _, weighted::WeightedIndex},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg64Mcg;

use crate::genes;

/// Retry budget multiplier for duplicate-parent redraws, per parent slot.
///
/// A draw that duplicates an already-selected parent is rejected and redrawn;
/// after `SELECTION_RETRY_FACTOR * population` rejected draws the breeding
/// call fails instead of looping forever on a too-small or too-skewed
/// population.
const SELECTION_RETRY_FACTOR: usize = 1000;

/// Discrete distributions and rates steering the genetic operators.
///
/// The three weight vectors are indexed by outcome: `parent_count_weights[n]`
/// is the relative weight of drawing `n` parents for a child,
/// `crossover_count_weights[k]` the weight of `k` crossover points, and
/// `segment_length_weights[i]` the weight of a mutation segment of length
/// `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct BreederConfig {
    /// Weights over the number of parents per child. Indices 0 and 1 must be
    /// zero: every child has at least two parents.
    pub parent_count_weights: Vec<f64>,
    /// Weights over the number of crossover points per child.
    pub crossover_count_weights: Vec<f64>,
    /// Weights over the mutation segment length, offset by one
    /// (index 0 is length 1).
    pub segment_length_weights: Vec<f64>,
    /// Probability that a freshly bred agent is mutated at all.
    pub mutation_rate: f64,
}

impl Default for BreederConfig {
    /// Two to four parents, zero to three crossover points, mutation segments
    /// of one to five genes at a 0.1% mutation rate.
    fn default() -> Self {
        Self {
            parent_count_weights: vec![0.0, 0.0, 1.0, 1.0, 1.0],
            crossover_count_weights: vec![0.0, 1.0, 1.0, 1.0],
            segment_length_weights: vec![1.0; 5],
            mutation_rate: 1e-3,
        }
    }
}

/// Rejected breeder configuration.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BreederConfigError {
    /// A weight vector is empty, contains a negative or non-finite weight, or
    /// sums to zero.
    #[display("invalid {what} weights: must be non-empty, non-negative, and sum to a positive value")]
    InvalidWeights { what: &'static str },
    /// The parent count distribution can draw fewer than two parents.
    #[display("parent count weights must put zero weight on counts 0 and 1")]
    ParentCountBelowTwo,
    /// Mutation rate outside `[0, 1]`.
    #[display("mutation rate {rate} is not a probability")]
    InvalidMutationRate { rate: f64 },
}

/// Failure while breeding one generation.
///
/// Breeding errors are never swallowed: a population bred from too few
/// distinct parents would silently violate the genetic diversity assumptions,
/// so these abort the run.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BreedError {
    /// The population offers fewer distinct agents than the maximum drawable
    /// parent count.
    #[display("population of {population} cannot supply up to {required} distinct parents")]
    PopulationTooSmall { population: usize, required: usize },
    /// Could not find enough distinct parents within the retry budget.
    #[display("selected only {selected} of {requested} distinct parents within the retry budget")]
    SelectionExhausted { selected: usize, requested: usize },
}

/// Produces the next generation from a scored population.
///
/// See the crate docs for the selection / recombination / mutation pipeline.
/// The breeder owns its RNG; breeding is deterministic under a fixed seed.
#[derive(Debug)]
pub struct GeneticBreeder {
    mutation_rate: f64,
    parent_count_dist: WeightedIndex<f64>,
    crossover_count_dist: WeightedIndex<f64>,
    segment_length_dist: WeightedIndex<f64>,
    max_parent_count: usize,
    rng: Pcg64Mcg,
}

fn validate_weights(what: &'static str, weights: &[f64]) -> Result<(), BreederConfigError> {
    let valid = !weights.is_empty()
        && weights.iter().all(|w| w.is_finite() && *w >= 0.0)
        && weights.iter().sum::<f64>() > 0.0;
    if valid {
        Ok(())
    } else {
        Err(BreederConfigError::InvalidWeights { what })
    }
}

fn highest_weighted_index(weights: &[f64]) -> usize {
    weights
        .iter()
        .rposition(|w| *w > 0.0)
        .expect("weights were validated to have a positive entry")
}

impl GeneticBreeder {
    /// Validates the configuration and builds the breeder.
    pub fn new(config: &BreederConfig, rng: Pcg64Mcg) -> Result<Self, BreederConfigError> {
        validate_weights("parent count", &config.parent_count_weights)?;
        validate_weights("crossover count", &config.crossover_count_weights)?;
        validate_weights("segment length", &config.segment_length_weights)?;
        if config.parent_count_weights.iter().take(2).any(|w| *w > 0.0) {
            return Err(BreederConfigError::ParentCountBelowTwo);
        }
        if !(0.0..=1.0).contains(&config.mutation_rate) {
            return Err(BreederConfigError::InvalidMutationRate {
                rate: config.mutation_rate,
            });
        }

        let new_dist = |weights: &[f64]| {
            WeightedIndex::new(weights.iter().copied())
                .expect("weights were validated for WeightedIndex")
        };
        Ok(Self {
            mutation_rate: config.mutation_rate,
            parent_count_dist: new_dist(&config.parent_count_weights),
            crossover_count_dist: new_dist(&config.crossover_count_weights),
            segment_length_dist: new_dist(&config.segment_length_weights),
            max_parent_count: highest_weighted_index(&config.parent_count_weights),
            rng,
        })
    }

    /// Largest parent count the configuration can draw.
    ///
    /// Populations smaller than this cannot be bred; the manager checks this
    /// at setup so a run refuses to start rather than failing mid-training.
    #[must_use]
    pub fn max_parent_count(&self) -> usize {
        self.max_parent_count
    }

    /// Breeds a full next generation of the same size.
    ///
    /// Every child starts with a zero score. The input population is only
    /// read; replacing it with the returned generation is the caller's move.
    pub fn next_generation(&mut self, population: &[Agent]) -> Result<Vec<Agent>, BreedError> {
        if population.len() < self.max_parent_count {
            return Err(BreedError::PopulationTooSmall {
                population: population.len(),
                required: self.max_parent_count,
            });
        }

        let scores = population.iter().map(Agent::score).collect::<Vec<_>>();
        let weights = genes::selection_weights(&scores);
        // All-zero weights happen when every agent scored identically; fall
        // back to uniform selection instead of refusing to breed.
        let selection_dist = WeightedIndex::new(weights.iter().copied()).unwrap_or_else(|_| {
            WeightedIndex::new(vec![1.0; population.len()]).expect("uniform weights are valid")
        });

        let mut next_generation = Vec::with_capacity(population.len());
        for _ in 0..population.len() {
            let parents = self.select_parents(population, &selection_dist)?;
            let child = self.combine_parents(&parents);
            let child = self.apply_mutation(child);
            next_generation.push(child);
        }
        Ok(next_generation)
    }

    /// Draws an ordered set of distinct parents, weighted by fitness.
    fn select_parents<'a>(
        &mut self,
        population: &'a [Agent],
        selection_dist: &WeightedIndex<f64>,
    ) -> Result<Vec<&'a Agent>, BreedError> {
        let requested = self.parent_count_dist.sample(&mut self.rng);
        let retry_budget = SELECTION_RETRY_FACTOR * population.len();

        let mut selected_indices: Vec<usize> = Vec::with_capacity(requested);
        for _ in 0..requested {
            let drawn = (0..retry_budget)
                .map(|_| selection_dist.sample(&mut self.rng))
                .find(|index| !selected_indices.contains(index));
            match drawn {
                Some(index) => selected_indices.push(index),
                None => {
                    return Err(BreedError::SelectionExhausted {
                        selected: selected_indices.len(),
                        requested,
                    });
                }
            }
        }

        Ok(selected_indices
            .into_iter()
            .map(|index| &population[index])
            .collect())
    }

    /// Builds a child by k-point crossover over the parents' flat genes.
    fn combine_parents(&mut self, parents: &[&Agent]) -> Agent {
        let chromosomes = parents
            .iter()
            .map(|parent| parent.chromosome())
            .collect::<Vec<_>>();
        let first = chromosomes[0];
        let gene_count = first.gene_count();

        // Crossover points are distinct interior gene indices, drawn via a
        // full index shuffle and sorted so segments are copied in increasing,
        // non-overlapping order.
        let crossover_count = self
            .crossover_count_dist
            .sample(&mut self.rng)
            .min(gene_count.saturating_sub(1));
        let mut points = (1..gene_count).collect::<Vec<_>>();
        points.shuffle(&mut self.rng);
        points.truncate(crossover_count);
        points.sort_unstable();

        let first_parent = self.rng.random_range(0..parents.len());
        let child_genes = genes::recombine(&chromosomes, &points, first_parent);
        let chromosome =
            Chromosome::from_genes(first.action_count(), first.percept_count(), child_genes)
                .expect("recombination preserves chromosome dimensions");
        Agent::from_chromosome(chromosome)
    }

    /// With probability `mutation_rate`, overwrites one contiguous gene
    /// segment; otherwise returns the agent unchanged.
    fn apply_mutation(&mut self, mut agent: Agent) -> Agent {
        if !self.rng.random_bool(self.mutation_rate) {
            return agent;
        }

        let gene_count = agent.chromosome().gene_count();
        let length = (self.segment_length_dist.sample(&mut self.rng) + 1).min(gene_count);
        let start = self.rng.random_range(0..=gene_count - length);
        genes::mutate_segment(agent.chromosome_mut().genes_mut(), start, length, &mut self.rng);
        agent
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    fn rng() -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(42)
    }

    fn agent_with_score(genes: &[f64], score: f64) -> Agent {
        let mut agent =
            Agent::from_chromosome(Chromosome::from_genes(1, genes.len(), genes.to_vec()).unwrap());
        agent.add_score(score);
        agent
    }

    #[expect(clippy::cast_precision_loss)]
    fn population(size: usize) -> Vec<Agent> {
        (0..size)
            .map(|i| agent_with_score(&[i as f64, 1.0, -1.0, 0.5], i as f64))
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        let breeder = GeneticBreeder::new(&BreederConfig::default(), rng()).unwrap();
        assert_eq!(breeder.max_parent_count(), 4);
    }

    #[test]
    fn test_rejects_parent_count_below_two() {
        let config = BreederConfig {
            parent_count_weights: vec![0.0, 1.0, 1.0],
            ..BreederConfig::default()
        };
        assert!(matches!(
            GeneticBreeder::new(&config, rng()),
            Err(BreederConfigError::ParentCountBelowTwo)
        ));
    }

    #[test]
    fn test_rejects_empty_weights() {
        let config = BreederConfig {
            crossover_count_weights: vec![],
            ..BreederConfig::default()
        };
        assert!(matches!(
            GeneticBreeder::new(&config, rng()),
            Err(BreederConfigError::InvalidWeights {
                what: "crossover count"
            })
        ));
    }

    #[test]
    fn test_rejects_mutation_rate_above_one() {
        let config = BreederConfig {
            mutation_rate: 1.5,
            ..BreederConfig::default()
        };
        assert!(matches!(
            GeneticBreeder::new(&config, rng()),
            Err(BreederConfigError::InvalidMutationRate { .. })
        ));
    }

    #[test]
    fn test_next_generation_preserves_cardinality_and_dimensions() {
        let population = population(12);
        let mut breeder = GeneticBreeder::new(&BreederConfig::default(), rng()).unwrap();
        let next = breeder.next_generation(&population).unwrap();
        assert_eq!(next.len(), population.len());
        for child in &next {
            assert_eq!(child.chromosome().action_count(), 1);
            assert_eq!(child.chromosome().percept_count(), 4);
            assert_eq!(child.score(), 0.0);
        }
    }

    #[test]
    fn test_population_smaller_than_max_parent_count_is_rejected() {
        let population = population(3);
        let mut breeder = GeneticBreeder::new(&BreederConfig::default(), rng()).unwrap();
        assert!(matches!(
            breeder.next_generation(&population),
            Err(BreedError::PopulationTooSmall {
                population: 3,
                required: 4
            })
        ));
    }

    #[test]
    fn test_selection_exhaustion_fails_fast() {
        // All selection weight on a single agent: the second distinct parent
        // can never be drawn.
        let population = vec![
            agent_with_score(&[1.0, 2.0], 0.0),
            agent_with_score(&[3.0, 4.0], 0.0),
            agent_with_score(&[5.0, 6.0], 7.0),
        ];
        let config = BreederConfig {
            parent_count_weights: vec![0.0, 0.0, 1.0],
            ..BreederConfig::default()
        };
        let mut breeder = GeneticBreeder::new(&config, rng()).unwrap();
        assert!(matches!(
            breeder.next_generation(&population),
            Err(BreedError::SelectionExhausted {
                selected: 1,
                requested: 2
            })
        ));
    }

    #[test]
    fn test_identical_scores_fall_back_to_uniform_selection() {
        let population = vec![
            agent_with_score(&[1.0, 2.0], -4.0),
            agent_with_score(&[3.0, 4.0], -4.0),
            agent_with_score(&[5.0, 6.0], -4.0),
        ];
        let config = BreederConfig {
            parent_count_weights: vec![0.0, 0.0, 1.0],
            ..BreederConfig::default()
        };
        let mut breeder = GeneticBreeder::new(&config, rng()).unwrap();
        let next = breeder.next_generation(&population).unwrap();
        assert_eq!(next.len(), 3);
    }

    #[test]
    fn test_zero_crossover_points_copies_a_single_parent() {
        let population = vec![
            agent_with_score(&[1.0, 1.0, 1.0], 1.0),
            agent_with_score(&[2.0, 2.0, 2.0], 1.0),
        ];
        let config = BreederConfig {
            parent_count_weights: vec![0.0, 0.0, 1.0],
            crossover_count_weights: vec![1.0],
            mutation_rate: 0.0,
            ..BreederConfig::default()
        };
        let mut breeder = GeneticBreeder::new(&config, rng()).unwrap();
        let next = breeder.next_generation(&population).unwrap();
        for child in &next {
            let genes = child.chromosome().genes();
            assert!(genes == [1.0, 1.0, 1.0] || genes == [2.0, 2.0, 2.0]);
        }
    }

    #[test]
    fn test_zero_mutation_rate_leaves_children_untouched() {
        let parent_genes = [3.0, 3.0, 3.0, 3.0];
        let population = vec![
            agent_with_score(&parent_genes, 1.0),
            agent_with_score(&parent_genes, 1.0),
        ];
        let config = BreederConfig {
            parent_count_weights: vec![0.0, 0.0, 1.0],
            mutation_rate: 0.0,
            ..BreederConfig::default()
        };
        let mut breeder = GeneticBreeder::new(&config, rng()).unwrap();
        let next = breeder.next_generation(&population).unwrap();
        for child in &next {
            assert_eq!(child.chromosome().genes(), parent_genes);
        }
    }

    #[test]
    fn test_certain_mutation_with_full_segment_replaces_every_gene() {
        let population = vec![
            agent_with_score(&[1.0, 2.0, 3.0, 4.0], 1.0),
            agent_with_score(&[1.0, 2.0, 3.0, 4.0], 1.0),
        ];
        let config = BreederConfig {
            parent_count_weights: vec![0.0, 0.0, 1.0],
            crossover_count_weights: vec![1.0],
            // Segment length 8, clamped to the 4-gene chromosome.
            segment_length_weights: vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            mutation_rate: 1.0,
        };
        let mut breeder = GeneticBreeder::new(&config, rng()).unwrap();
        let next = breeder.next_generation(&population).unwrap();
        for child in &next {
            for (gene, original) in child.chromosome().genes().iter().zip([1.0, 2.0, 3.0, 4.0]) {
                assert_ne!(*gene, original);
            }
        }
    }
}
