//! Pure gene-level operations used by the breeder.
//!
//! These functions carry no RNG-distribution choices of their own; the
//! breeder decides *what* to do (how many parents, which crossover points,
//! which segment) and these functions do it.

use evoarena_core::Chromosome;
use evoarena_stats::descriptive::DescriptiveStats;
use rand::Rng;
use rand_distr::Normal;

/// Converts fitness scores into non-negative selection weights.
///
/// If the minimum score is negative, it is subtracted from every score so the
/// whole vector becomes a valid weight vector while relative fitness ordering
/// is preserved. Non-negative score vectors are returned unchanged.
///
/// ```
/// use evoarena_training::genes::selection_weights;
///
/// assert_eq!(selection_weights(&[-3.0, 0.0, 5.0]), vec![0.0, 3.0, 8.0]);
/// assert_eq!(selection_weights(&[1.0, 2.0]), vec![1.0, 2.0]);
/// ```
#[must_use]
pub fn selection_weights(scores: &[f64]) -> Vec<f64> {
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    if min < 0.0 {
        scores.iter().map(|s| s - min).collect()
    } else {
        scores.to_vec()
    }
}

/// Splices a child gene sequence out of several parent chromosomes.
///
/// `points` are crossover points in strictly increasing order, each in
/// `1..gene_count`. The segment up to the first point is copied from
/// `parents[first_parent]`; each following segment comes from the next parent
/// round-robin, through the final segment ending at the gene count.
///
/// # Panics
///
/// Panics if `parents` is empty, if parents disagree on gene count, or if
/// `points` is not strictly increasing within `1..gene_count`.
#[must_use]
pub fn recombine(parents: &[&Chromosome], points: &[usize], first_parent: usize) -> Vec<f64> {
    let gene_count = parents
        .first()
        .expect("recombination requires at least one parent")
        .gene_count();
    assert!(
        parents.iter().all(|p| p.gene_count() == gene_count),
        "parents must share chromosome dimensions"
    );
    assert!(
        points.is_sorted_by(|a, b| a < b) && points.iter().all(|p| (1..gene_count).contains(p)),
        "crossover points must be strictly increasing interior gene indices"
    );

    let mut genes = Vec::with_capacity(gene_count);
    let mut parent_index = first_parent % parents.len();
    let mut segment_start = 0;
    for boundary in points.iter().copied().chain(std::iter::once(gene_count)) {
        genes.extend_from_slice(&parents[parent_index].genes()[segment_start..boundary]);
        parent_index = (parent_index + 1) % parents.len();
        segment_start = boundary;
    }
    genes
}

/// Overwrites `genes[start..start + len]` with draws from a normal
/// distribution whose mean and standard deviation equal the empirical moments
/// of the *whole current* gene sequence.
///
/// The self-referential scale keeps mutation magnitude proportional to the
/// chromosome's own value range: a chromosome with large genes mutates in
/// large steps, one near zero mutates gently.
///
/// # Panics
///
/// Panics if `genes` is empty or the segment exceeds the gene sequence.
pub fn mutate_segment<R>(genes: &mut [f64], start: usize, len: usize, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let stats = DescriptiveStats::new(genes.iter().copied())
        .expect("chromosome has at least one gene");
    let normal =
        Normal::new(stats.mean, stats.std_dev).expect("gene standard deviation is non-negative");
    for gene in &mut genes[start..start + len] {
        *gene = rng.sample(normal);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn chromosome_of(genes: &[f64]) -> Chromosome {
        Chromosome::from_genes(1, genes.len(), genes.to_vec()).unwrap()
    }

    #[test]
    fn test_selection_weights_shift_negative_minimum() {
        assert_eq!(selection_weights(&[-3.0, 0.0, 5.0]), vec![0.0, 3.0, 8.0]);
    }

    #[test]
    fn test_selection_weights_keep_non_negative_scores() {
        assert_eq!(selection_weights(&[0.0, 3.0, 8.0]), vec![0.0, 3.0, 8.0]);
    }

    #[test]
    fn test_recombine_without_points_copies_one_parent() {
        let a = chromosome_of(&[1.0, 1.0, 1.0, 1.0]);
        let b = chromosome_of(&[2.0, 2.0, 2.0, 2.0]);
        assert_eq!(recombine(&[&a, &b], &[], 1), vec![2.0; 4]);
    }

    #[test]
    fn test_recombine_with_all_interior_points_rotates_parents() {
        let a = chromosome_of(&[1.0, 1.0, 1.0, 1.0]);
        let b = chromosome_of(&[2.0, 2.0, 2.0, 2.0]);
        let c = chromosome_of(&[3.0, 3.0, 3.0, 3.0]);
        let genes = recombine(&[&a, &b, &c], &[1, 2, 3], 0);
        assert_eq!(genes, vec![1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_recombine_segments_follow_points() {
        let a = chromosome_of(&[1.0, 1.0, 1.0, 1.0, 1.0]);
        let b = chromosome_of(&[2.0, 2.0, 2.0, 2.0, 2.0]);
        let genes = recombine(&[&a, &b], &[2], 0);
        assert_eq!(genes, vec![1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_mutate_segment_touches_only_the_segment() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let mut genes = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        mutate_segment(&mut genes, 1, 2, &mut rng);
        assert_eq!(genes[0], 1.0);
        assert_eq!(genes[3], 4.0);
        assert_eq!(genes[4], 5.0);
    }

    #[test]
    fn test_mutate_segment_of_constant_chromosome_stays_constant() {
        // std dev 0: every replacement draw equals the mean
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let mut genes = vec![2.5; 4];
        mutate_segment(&mut genes, 0, 4, &mut rng);
        assert_eq!(genes, vec![2.5; 4]);
    }
}
