use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::DimensionError;

/// The matrix parameters of an agent's linear action function.
///
/// A chromosome is an `action_count x percept_count` matrix stored as a flat,
/// row-major gene sequence. Applying it to a percept vector yields one value
/// per action (a plain matrix-vector product). The flat gene view is what the
/// genetic operators in `evoarena-training` work on: crossover splices gene
/// ranges, mutation overwrites contiguous gene segments.
///
/// Shape is fixed at construction and equal across every agent of a training
/// run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    action_count: usize,
    percept_count: usize,
    genes: Vec<f64>,
}

impl Chromosome {
    /// Creates a chromosome with every gene drawn from the standard normal
    /// distribution.
    pub fn random_gaussian<R>(action_count: usize, percept_count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let genes = (0..action_count * percept_count)
            .map(|_| rng.sample(StandardNormal))
            .collect();
        Self {
            action_count,
            percept_count,
            genes,
        }
    }

    /// Reassembles a chromosome from a flat gene sequence.
    ///
    /// This is how crossover offspring are built: genes spliced from several
    /// parents are stitched back into a matrix of the parents' shape.
    pub fn from_genes(
        action_count: usize,
        percept_count: usize,
        genes: Vec<f64>,
    ) -> Result<Self, DimensionError> {
        let expected = action_count * percept_count;
        if genes.len() != expected {
            return Err(DimensionError {
                expected,
                actual: genes.len(),
            });
        }
        Ok(Self {
            action_count,
            percept_count,
            genes,
        })
    }

    /// Number of rows (one per action).
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.action_count
    }

    /// Number of columns (one per percept).
    #[must_use]
    pub fn percept_count(&self) -> usize {
        self.percept_count
    }

    /// Total gene count (`action_count * percept_count`).
    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Flat, row-major view of the genes.
    #[must_use]
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Mutable flat view of the genes. Shape stays fixed; only values change.
    pub fn genes_mut(&mut self) -> &mut [f64] {
        &mut self.genes
    }

    /// Computes the action vector for a percept vector.
    ///
    /// # Panics
    ///
    /// Panics if `percepts` does not match the chromosome's percept count.
    #[must_use]
    pub fn act(&self, percepts: &[f64]) -> Vec<f64> {
        assert_eq!(
            percepts.len(),
            self.percept_count,
            "percept vector length must match chromosome width"
        );
        self.genes
            .chunks_exact(self.percept_count)
            .map(|row| row.iter().zip(percepts).map(|(g, p)| g * p).sum())
            .collect()
    }
}
