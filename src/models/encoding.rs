//! Separator-delimited route encoding.
//!
//! An encoding is a flat sequence holding every customer id exactly once,
//! interleaved with `vehicle_count - 1` separators (value `0`). Each maximal
//! run of customer ids is the visiting order of one vehicle; an empty run
//! (adjacent separators, or a separator at either end) is an unused vehicle.
//!
//! ```text
//!   3 1 0 0 4 2 0 5      vehicles: [3, 1]  []  [4, 2]  [5]
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Instance;

/// The separator value marking a vehicle boundary.
pub const SEPARATOR: usize = 0;

/// A permutation of customers with route separators.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::Encoding;
///
/// let enc = Encoding::new(vec![3, 1, 0, 0, 4, 2]);
/// let runs: Vec<&[usize]> = enc.runs().collect();
/// assert_eq!(runs, vec![&[3, 1][..], &[4, 2][..]]);
/// assert_eq!(enc.separator_count(), 2);
/// assert_eq!(enc.used_vehicles(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Encoding {
    genes: Vec<usize>,
}

impl Encoding {
    /// Wraps a raw gene sequence. No validity check is performed.
    pub fn new(genes: Vec<usize>) -> Self {
        Self { genes }
    }

    /// Joins per-vehicle visiting orders with separators, padding with
    /// trailing separators (unused vehicles) up to `vehicle_count` routes.
    ///
    /// More routes than `vehicle_count` are joined as given, which yields a
    /// structurally invalid encoding.
    pub fn from_routes(routes: &[Vec<usize>], vehicle_count: usize) -> Self {
        let mut genes = Vec::new();
        for (i, route) in routes.iter().enumerate() {
            if i > 0 {
                genes.push(SEPARATOR);
            }
            genes.extend_from_slice(route);
        }
        let boundaries = routes.len().max(1);
        for _ in boundaries..vehicle_count {
            genes.push(SEPARATOR);
        }
        Self { genes }
    }

    /// A uniformly shuffled valid encoding for the given instance.
    pub fn random<R: Rng>(instance: &Instance, rng: &mut R) -> Self {
        let mut genes: Vec<usize> = (1..=instance.customer_count()).collect();
        genes.extend(std::iter::repeat(SEPARATOR).take(instance.fleet().separator_count()));

        // Fisher-Yates shuffle
        for i in (1..genes.len()).rev() {
            let j = rng.random_range(0..=i as u64) as usize;
            genes.swap(i, j);
        }

        Self { genes }
    }

    /// The raw gene sequence.
    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    /// Mutable access to the genes, for in-place operators.
    pub fn genes_mut(&mut self) -> &mut [usize] {
        &mut self.genes
    }

    /// Consumes the encoding, returning the gene sequence.
    pub fn into_genes(self) -> Vec<usize> {
        self.genes
    }

    /// Number of positions (customers plus separators).
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if the encoding has no positions.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Number of separator positions.
    pub fn separator_count(&self) -> usize {
        self.genes.iter().filter(|&&g| g == SEPARATOR).count()
    }

    /// Iterates over the non-empty runs in order.
    pub fn runs(&self) -> Runs<'_> {
        Runs { rest: &self.genes }
    }

    /// Number of vehicles that visit at least one customer.
    pub fn used_vehicles(&self) -> usize {
        self.runs().count()
    }

    /// The non-empty runs as owned routes.
    pub fn routes(&self) -> Vec<Vec<usize>> {
        self.runs().map(<[usize]>::to_vec).collect()
    }

    /// Checks the permutation and separator-count invariants.
    ///
    /// Valid iff the length is `customer_count + vehicle_count - 1`, every
    /// customer `1..=customer_count` occurs exactly once, and the separator
    /// occurs exactly `vehicle_count - 1` times.
    pub fn is_structurally_valid(&self, instance: &Instance) -> bool {
        if self.genes.len() != instance.encoding_len() {
            return false;
        }
        if self.separator_count() != instance.fleet().separator_count() {
            return false;
        }
        self.missing_customers(instance).is_empty() && !self.has_duplicates(instance)
    }

    /// Returns `true` if every customer appears exactly once, regardless of
    /// how many separators surround them.
    pub fn covers_all_customers(&self, instance: &Instance) -> bool {
        self.missing_customers(instance).is_empty() && !self.has_duplicates(instance)
    }

    /// Customers of the instance that do not appear in this encoding.
    pub fn missing_customers(&self, instance: &Instance) -> Vec<usize> {
        let n = instance.customer_count();
        let mut seen = vec![false; n + 1];
        for &g in &self.genes {
            if g <= n {
                seen[g] = true;
            }
        }
        (1..=n).filter(|&c| !seen[c]).collect()
    }

    fn has_duplicates(&self, instance: &Instance) -> bool {
        let n = instance.customer_count();
        let mut seen = vec![false; n + 1];
        for &g in &self.genes {
            if g == SEPARATOR {
                continue;
            }
            if g > n || seen[g] {
                return true;
            }
            seen[g] = true;
        }
        false
    }
}

impl From<Vec<usize>> for Encoding {
    fn from(genes: Vec<usize>) -> Self {
        Self::new(genes)
    }
}

impl AsRef<[usize]> for Encoding {
    fn as_ref(&self) -> &[usize] {
        &self.genes
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, g) in self.genes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{g}")?;
        }
        Ok(())
    }
}

/// Iterator over the non-empty runs of an [`Encoding`].
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    rest: &'a [usize],
}

impl<'a> Iterator for Runs<'a> {
    type Item = &'a [usize];

    fn next(&mut self) -> Option<&'a [usize]> {
        let start = self.rest.iter().position(|&g| g != SEPARATOR)?;
        let tail = &self.rest[start..];
        let len = tail
            .iter()
            .position(|&g| g == SEPARATOR)
            .unwrap_or(tail.len());
        let (run, rest) = tail.split_at(len);
        self.rest = rest;
        Some(run)
    }
}
