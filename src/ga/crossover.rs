//! Partially mapped crossover (PMX) with separator repair.
//!
//! # Algorithm
//!
//! Plain PMX on a separator encoding breaks the separator count: the swapped
//! segment can trade a customer for a separator, leaving the customer lost
//! and an extra separator behind. The repair works in four passes:
//!
//! 1. Swap the segment between two cut points and record, per offspring, a
//!    mapping table (customer → replacement) and the set of customers
//!    pushed out of the segment in exchange for a separator.
//! 2. Resolve every pending customer to the end of its mapping chain and
//!    drop those that were re-introduced by the segment itself.
//! 3. Outside the segment, replace each gene by the fixed point of the
//!    mapping chain, as in classical PMX.
//! 4. Fill the separators left outside the segment with the pending
//!    customers, lowest id first.
//!
//! Offspring that still break the permutation or separator-count invariant
//! are discarded and the parents are returned unchanged.
//!
//! # Complexity
//!
//! O(L + n) where L = encoding length and n = number of customers.
//!
//! # Reference
//!
//! Goldberg, D.E. & Lingle, R. (1985). "Alleles, loci, and the traveling
//! salesman problem", *Proc. 1st Int. Conf. on Genetic Algorithms*, 154-159.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

use crate::models::{Encoding, Instance, SEPARATOR};

/// What happened inside one crossover call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossoverOutcome {
    /// The probability draw failed; offspring are copies of the parents.
    Skipped,
    /// Both offspring were repaired into valid encodings.
    Repaired,
    /// Repair did not restore validity; offspring are copies of the parents.
    RepairFailed,
}

/// PMX crossover with separator repair.
///
/// With probability `probability` the parents are recombined; otherwise, or
/// when repair fails, copies of the parents are returned. Parents are
/// expected to be valid encodings of `instance`.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::{Customer, Encoding, Fleet, Instance};
/// use u_cvrptw::ga::pmx_separator_crossover;
///
/// let mut customers = vec![Customer::depot(0.0, 0.0)];
/// customers.extend((1..=4).map(|i| Customer::new(i, i as f64, 0.0, 1.0, 0.0)));
/// let instance = Instance::new("pmx", Fleet::new(2, 100.0), customers).unwrap();
/// let p1 = Encoding::new(vec![1, 2, 0, 3, 4]);
/// let p2 = Encoding::new(vec![4, 0, 3, 2, 1]);
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let (c1, c2) = pmx_separator_crossover(&instance, &mut rng, 1.0, &p1, &p2);
/// assert!(c1.is_structurally_valid(&instance));
/// assert!(c2.is_structurally_valid(&instance));
/// ```
pub fn pmx_separator_crossover<R: Rng>(
    instance: &Instance,
    rng: &mut R,
    probability: f64,
    parent1: &Encoding,
    parent2: &Encoding,
) -> (Encoding, Encoding) {
    let (c1, c2, _) =
        pmx_separator_crossover_with_outcome(instance, rng, probability, parent1, parent2);
    (c1, c2)
}

/// Same as [`pmx_separator_crossover`], also reporting whether the
/// offspring are recombined or parent copies.
pub fn pmx_separator_crossover_with_outcome<R: Rng>(
    instance: &Instance,
    rng: &mut R,
    probability: f64,
    parent1: &Encoding,
    parent2: &Encoding,
) -> (Encoding, Encoding, CrossoverOutcome) {
    let len = parent1.len();
    if len < 2 || parent2.len() != len || rng.random_range(0.0..1.0) >= probability {
        return (parent1.clone(), parent2.clone(), CrossoverOutcome::Skipped);
    }

    let mut cut1 = rng.random_range(0..len);
    let mut cut2 = rng.random_range(0..len);
    while cut2 == cut1 {
        cut2 = rng.random_range(0..len);
    }
    if cut1 > cut2 {
        std::mem::swap(&mut cut1, &mut cut2);
    }

    let repaired = repair(
        instance.customer_count(),
        parent1.genes(),
        parent2.genes(),
        cut1,
        cut2,
    )
    .map(|(g1, g2)| (Encoding::new(g1), Encoding::new(g2)))
    .filter(|(c1, c2)| c1.is_structurally_valid(instance) && c2.is_structurally_valid(instance));

    match repaired {
        Some((c1, c2)) => (c1, c2, CrossoverOutcome::Repaired),
        None => {
            debug!(cut1, cut2, "pmx repair failed, returning parents");
            (parent1.clone(), parent2.clone(), CrossoverOutcome::RepairFailed)
        }
    }
}

/// Mapping table from a customer id to its replacement; `Some(0)` means the
/// customer was traded for a separator.
type Mapping = Vec<Option<usize>>;

/// Builds both offspring for the inclusive segment `[cut1, cut2]`.
///
/// Returns `None` when a gene lies outside the table or a mapping chain
/// does not terminate.
fn repair(
    customer_count: usize,
    p1: &[usize],
    p2: &[usize],
    cut1: usize,
    cut2: usize,
) -> Option<(Vec<usize>, Vec<usize>)> {
    let size = customer_count + 1;
    if p1.iter().chain(p2).any(|&g| g >= size) {
        return None;
    }

    let mut o1 = p1.to_vec();
    let mut o2 = p2.to_vec();
    let mut table1: Mapping = vec![None; size];
    let mut table2: Mapping = vec![None; size];
    let mut recover1 = BTreeSet::new();
    let mut recover2 = BTreeSet::new();

    for i in cut1..=cut2 {
        let (a, b) = (p1[i], p2[i]);
        o1[i] = b;
        o2[i] = a;
        match (a, b) {
            (SEPARATOR, SEPARATOR) => {}
            (a, SEPARATOR) => {
                recover1.insert(a);
                table2[a] = Some(SEPARATOR);
            }
            (SEPARATOR, b) => {
                table1[b] = Some(SEPARATOR);
                recover2.insert(b);
            }
            (a, b) if a != b => {
                table1[b] = Some(a);
                table2[a] = Some(b);
            }
            _ => {}
        }
    }

    let recover1 = resolve_pending(recover1, &mut table1)?;
    let recover2 = resolve_pending(recover2, &mut table2)?;

    fill_outside(&mut o1, p1, &table1, recover1, cut1, cut2)?;
    fill_outside(&mut o2, p2, &table2, recover2, cut1, cut2)?;

    Some((o1, o2))
}

/// Drops pending customers the segment re-introduced, then moves every
/// remaining one to the end of its mapping chain.
fn resolve_pending(pending: BTreeSet<usize>, table: &mut Mapping) -> Option<BTreeSet<usize>> {
    let mut kept = BTreeSet::new();
    for id in pending {
        if table[id] == Some(SEPARATOR) {
            table[id] = None;
        } else {
            kept.insert(id);
        }
    }

    kept.into_iter().map(|id| chain_end(table, id)).collect()
}

/// Writes the outside-segment genes of one offspring.
fn fill_outside(
    offspring: &mut [usize],
    parent: &[usize],
    table: &Mapping,
    mut pending: BTreeSet<usize>,
    cut1: usize,
    cut2: usize,
) -> Option<()> {
    let outside = (0..offspring.len()).filter(|&i| i < cut1 || i > cut2);

    for i in outside.clone() {
        offspring[i] = chain_end(table, parent[i])?;
    }
    for i in outside {
        if offspring[i] == SEPARATOR {
            if let Some(id) = pending.pop_first() {
                offspring[i] = id;
            }
        }
    }
    Some(())
}

/// Follows `table` from `start` until an unmapped id is reached.
///
/// Returns `None` if the chain is longer than the table, which only happens
/// when the mapping contains a cycle.
fn chain_end(table: &Mapping, start: usize) -> Option<usize> {
    let mut current = start;
    for _ in 0..=table.len() {
        match table[current] {
            Some(next) => current = next,
            None => return Some(current),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Fleet};

    fn instance(customers: usize, vehicles: usize) -> Instance {
        let mut locs = vec![Customer::depot(0.0, 0.0)];
        for i in 1..=customers {
            locs.push(Customer::new(i, i as f64, 0.0, 1.0, 0.0));
        }
        Instance::new("pmx", Fleet::new(vehicles, 100.0), locs).expect("valid")
    }

    #[test]
    fn test_zero_probability_returns_copies() {
        let inst = instance(4, 2);
        let p1 = Encoding::new(vec![1, 2, 0, 3, 4]);
        let p2 = Encoding::new(vec![4, 3, 0, 2, 1]);
        let mut rng = u_numflow::random::create_rng(1);
        let (c1, c2, outcome) =
            pmx_separator_crossover_with_outcome(&inst, &mut rng, 0.0, &p1, &p2);
        assert_eq!(outcome, CrossoverOutcome::Skipped);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }

    #[test]
    fn test_closure_over_many_seeds() {
        let inst = instance(6, 3);
        let p1 = Encoding::new(vec![1, 2, 0, 3, 4, 0, 5, 6]);
        let p2 = Encoding::new(vec![6, 0, 5, 4, 0, 3, 2, 1]);
        let mut repaired = 0;
        for seed in 0..1000 {
            let mut rng = u_numflow::random::create_rng(seed);
            let (c1, c2, outcome) =
                pmx_separator_crossover_with_outcome(&inst, &mut rng, 1.0, &p1, &p2);
            assert!(c1.is_structurally_valid(&inst), "seed {seed}: {c1}");
            assert!(c2.is_structurally_valid(&inst), "seed {seed}: {c2}");
            assert_ne!(outcome, CrossoverOutcome::Skipped);
            if outcome == CrossoverOutcome::Repaired {
                repaired += 1;
            }
        }
        assert!(repaired > 0);
    }

    #[test]
    fn test_identical_parents() {
        let inst = instance(5, 3);
        let p = Encoding::new(vec![3, 0, 1, 5, 0, 2, 4]);
        let mut rng = u_numflow::random::create_rng(9);
        for _ in 0..50 {
            let (c1, c2) = pmx_separator_crossover(&inst, &mut rng, 1.0, &p, &p);
            assert_eq!(c1, p);
            assert_eq!(c2, p);
        }
    }

    #[test]
    fn test_repair_fixed_cuts_without_separators_in_segment() {
        // classical PMX case: segment [1, 2] swaps 2,3 with 3,2
        let p1 = [1, 2, 3, 0, 4];
        let p2 = [4, 3, 2, 0, 1];
        let (o1, o2) = repair(4, &p1, &p2, 1, 2).expect("repairable");
        assert_eq!(o1, vec![1, 3, 2, 0, 4]);
        assert_eq!(o2, vec![4, 2, 3, 0, 1]);
    }

    #[test]
    fn test_repair_recovers_customer_traded_for_separator() {
        // segment [0, 1]: p1 gives 1,2 and receives 0,3
        let p1 = [1, 2, 0, 3, 4];
        let p2 = [0, 3, 1, 2, 4];
        let (o1, o2) = repair(4, &p1, &p2, 0, 1).expect("repairable");
        // o1: outside 3 maps to 2, then the pending 1 takes the free separator
        assert_eq!(o1, vec![0, 3, 1, 2, 4]);
        // o2: outside 1 maps to a separator and 2 maps to 3
        assert_eq!(o2, vec![1, 2, 0, 3, 4]);
    }

    #[test]
    fn test_repair_reinstated_customer_is_not_recovered() {
        // 2 leaves p1's segment for a separator but p2's segment brings it back
        let p1 = [2, 0, 1, 3];
        let p2 = [0, 2, 3, 1];
        let (o1, o2) = repair(3, &p1, &p2, 0, 1).expect("repairable");
        assert_eq!(o1, vec![0, 2, 1, 3]);
        assert_eq!(o2, vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_repair_rejects_out_of_range_gene() {
        assert!(repair(2, &[1, 9, 0], &[2, 1, 0], 0, 1).is_none());
    }

    #[test]
    fn test_chain_end_detects_cycle() {
        let table: Mapping = vec![None, Some(2), Some(1)];
        assert_eq!(chain_end(&table, 0), Some(0));
        assert_eq!(chain_end(&table, 1), None);
    }

    #[test]
    fn test_mismatched_lengths_are_skipped() {
        let inst = instance(3, 2);
        let p1 = Encoding::new(vec![1, 2, 0, 3]);
        let p2 = Encoding::new(vec![1, 2, 3]);
        let mut rng = u_numflow::random::create_rng(3);
        let (_, _, outcome) =
            pmx_separator_crossover_with_outcome(&inst, &mut rng, 1.0, &p1, &p2);
        assert_eq!(outcome, CrossoverOutcome::Skipped);
    }
}
