//! Genetic breeding engine for evolving populations of linear controllers.
//!
//! Given a fully scored population, [`breeder::GeneticBreeder`] produces the
//! next population of identical size. Each child is built in three stages:
//!
//! 1. **Selection** - 2 or more distinct parents are drawn from a categorical
//!    distribution weighted by (shifted) fitness score. Negative scores are
//!    shifted so the worst agent has weight zero while relative ordering is
//!    preserved; even low-fitness agents keep a chance of passing on genes,
//!    which maintains genetic diversity.
//! 2. **Recombination** - k-point crossover over the flat gene sequence:
//!    `k` distinct crossover points are drawn, and gene segments are copied
//!    round-robin from the parents starting at a random one.
//! 3. **Mutation** - with a small configured probability, a contiguous gene
//!    segment is overwritten with draws from a normal distribution whose
//!    moments are the current chromosome's own gene mean and standard
//!    deviation, keeping mutation magnitude proportional to the chromosome's
//!    value range.
//!
//! All stochastic choices (parent count, crossover count, segment length) come
//! from small configurable discrete distributions in
//! [`breeder::BreederConfig`]; degenerate configurations are rejected at
//! construction rather than producing degenerate generations.
//!
//! The breeder owns its RNG, passed in at construction. Breeding is
//! single-threaded and deterministic under a fixed seed.

pub mod breeder;
pub mod genes;
