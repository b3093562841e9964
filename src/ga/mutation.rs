//! Exchange (swap) mutation.
//!
//! Swapping two genes keeps the multiset of values, so a valid encoding
//! stays valid: a customer may move to another vehicle, two vehicles may
//! trade customers, or a separator may shift and resize two adjacent runs.

use rand::Rng;

use crate::models::Encoding;

/// Returns a copy of `encoding` where, with probability `probability`, two
/// distinct positions chosen uniformly at random are swapped.
///
/// Encodings shorter than two positions are returned unchanged.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::Encoding;
/// use u_cvrptw::ga::swap_mutation;
///
/// let enc = Encoding::new(vec![1, 2, 0, 3]);
/// let mut rng = u_numflow::random::create_rng(42);
///
/// let mutated = swap_mutation(&mut rng, 1.0, &enc);
/// assert_ne!(mutated, enc);
///
/// let mut sorted = mutated.into_genes();
/// sorted.sort();
/// assert_eq!(sorted, vec![0, 1, 2, 3]);
/// ```
pub fn swap_mutation<R: Rng>(rng: &mut R, probability: f64, encoding: &Encoding) -> Encoding {
    let mut mutated = encoding.clone();
    swap_mutation_in_place(rng, probability, &mut mutated);
    mutated
}

/// In-place variant of [`swap_mutation`]. Returns `true` if two positions
/// were swapped.
pub fn swap_mutation_in_place<R: Rng>(
    rng: &mut R,
    probability: f64,
    encoding: &mut Encoding,
) -> bool {
    let len = encoding.len();
    if len < 2 || rng.random_range(0.0..1.0) >= probability {
        return false;
    }

    // u_metaheur's swap_mutation may draw the same position twice, which
    // would waste the mutation; j is uniform over the other len - 1 positions
    let i = rng.random_range(0..len);
    let mut j = rng.random_range(0..len - 1);
    if j >= i {
        j += 1;
    }
    encoding.genes_mut().swap(i, j);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions_changed(a: &Encoding, b: &Encoding) -> usize {
        a.genes().iter().zip(b.genes()).filter(|(x, y)| x != y).count()
    }

    #[test]
    fn test_zero_probability_is_identity() {
        let enc = Encoding::new(vec![1, 2, 0, 3, 4]);
        let mut rng = u_numflow::random::create_rng(5);
        for _ in 0..100 {
            assert_eq!(swap_mutation(&mut rng, 0.0, &enc), enc);
        }
    }

    #[test]
    fn test_swaps_exactly_two_positions() {
        // all values distinct, so every swap changes exactly two positions
        let enc = Encoding::new(vec![1, 2, 3, 4, 5, 6]);
        let mut rng = u_numflow::random::create_rng(11);
        for _ in 0..200 {
            let m = swap_mutation(&mut rng, 1.0, &enc);
            assert_eq!(positions_changed(&enc, &m), 2);
        }
    }

    #[test]
    fn test_preserves_multiset() {
        let enc = Encoding::new(vec![3, 0, 1, 0, 2, 5, 4]);
        let mut rng = u_numflow::random::create_rng(17);
        let mut expected = enc.genes().to_vec();
        expected.sort_unstable();
        for _ in 0..100 {
            let mut genes = swap_mutation(&mut rng, 1.0, &enc).into_genes();
            genes.sort_unstable();
            assert_eq!(genes, expected);
        }
    }

    #[test]
    fn test_short_encodings_unchanged() {
        let mut rng = u_numflow::random::create_rng(0);
        let single = Encoding::new(vec![1]);
        assert_eq!(swap_mutation(&mut rng, 1.0, &single), single);
        let mut empty = Encoding::default();
        assert!(!swap_mutation_in_place(&mut rng, 1.0, &mut empty));
    }

    #[test]
    fn test_two_positions_always_swap() {
        let mut rng = u_numflow::random::create_rng(23);
        let mut enc = Encoding::new(vec![1, 2]);
        assert!(swap_mutation_in_place(&mut rng, 1.0, &mut enc));
        assert_eq!(enc.genes(), &[2, 1]);
    }

    #[test]
    fn test_every_pair_reachable() {
        let enc = Encoding::new(vec![1, 2, 3, 4]);
        let mut rng = u_numflow::random::create_rng(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(swap_mutation(&mut rng, 1.0, &enc));
        }
        // C(4, 2) distinct swaps
        assert_eq!(seen.len(), 6);
    }
}
