//! Single-objective greedy construction.
//!
//! # Algorithm
//!
//! Vehicles are filled one at a time. Starting at the depot with zero load
//! and a zero clock, every uncovered customer `i` with
//! `load + demand[i] ≤ capacity` and `clock ≤ due[i]` is a candidate. The
//! candidate with the best key is appended, its demand is loaded and the
//! clock moves to `max(clock, ready[i]) + service[i]`. When no candidate is
//! left the vehicle closes and, if customers remain and the fleet allows, a
//! separator is emitted and the next vehicle opens.
//!
//! Travel time is not part of the clock, matching the constraint checker.
//!
//! | Rule | Key | Best |
//! |------|-----|------|
//! | [`GreedyRule::Distance`] | distance from the current position | minimum |
//! | [`GreedyRule::Fuel`] | candidate demand | maximum |
//!
//! Ties go to the lowest customer id.
//!
//! # Complexity
//!
//! O(n²) where n = number of customers.

use tracing::{debug, trace};

use crate::models::{Encoding, Instance, SEPARATOR};

/// Selection rule of the greedy builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GreedyRule {
    /// Visit the nearest feasible customer next.
    Distance,
    /// Visit the feasible customer with the largest demand next, so heavy
    /// loads leave the vehicle early.
    Fuel,
}

impl GreedyRule {
    /// Returns `true` if `key` beats `best` under this rule.
    fn prefers(self, key: f64, best: f64) -> bool {
        match self {
            GreedyRule::Distance => key < best,
            GreedyRule::Fuel => key > best,
        }
    }
}

/// Result of a greedy construction.
///
/// The encoding holds exactly the emitted sequence: customers in visiting
/// order and one separator between consecutive opened vehicles. It is
/// structurally valid only when every customer was covered and every
/// vehicle was opened; see [`Construction::into_padded_encoding`].
#[derive(Debug, Clone, PartialEq)]
pub struct Construction {
    /// The emitted sequence.
    pub encoding: Encoding,
    /// Customers the fleet could not cover, ascending.
    pub uncovered: Vec<usize>,
    /// Number of vehicles opened.
    pub vehicles_used: usize,
}

impl Construction {
    /// Returns `true` if every customer was covered.
    pub fn is_complete(&self) -> bool {
        self.uncovered.is_empty()
    }

    /// Pads a complete construction with trailing separators so that it
    /// becomes a valid encoding for the given instance.
    ///
    /// Returns `None` if customers are uncovered.
    pub fn into_padded_encoding(self, instance: &Instance) -> Option<Encoding> {
        if !self.is_complete() {
            return None;
        }
        let mut genes = self.encoding.into_genes();
        let missing = instance
            .fleet()
            .separator_count()
            .saturating_sub(genes.iter().filter(|&&g| g == SEPARATOR).count());
        genes.extend(std::iter::repeat(SEPARATOR).take(missing));
        Some(Encoding::new(genes))
    }
}

/// Builds routes with the given selection rule.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::{Customer, Fleet, Instance, TimeWindow};
/// use u_cvrptw::constructive::{greedy, GreedyRule};
///
/// let instance = Instance::new(
///     "line",
///     Fleet::new(2, 10.0),
///     vec![
///         Customer::depot(0.0, 0.0),
///         Customer::new(1, 1.0, 0.0, 5.0, 0.0),
///         Customer::new(2, 2.0, 0.0, 5.0, 0.0),
///         Customer::new(3, 10.0, 10.0, 5.0, 0.0)
///             .with_time_window(TimeWindow::new(0.0, 5.0).unwrap()),
///     ],
/// )
/// .unwrap();
///
/// let construction = greedy(&instance, GreedyRule::Distance);
/// assert_eq!(construction.encoding.genes(), &[1, 2, 0, 3]);
/// assert!(construction.is_complete());
/// ```
pub fn greedy(instance: &Instance, rule: GreedyRule) -> Construction {
    let n = instance.customer_count();
    let vehicle_count = instance.vehicle_count();

    let mut covered = vec![false; n + 1];
    covered[0] = true;
    let mut remaining = n;
    let mut genes = Vec::with_capacity(instance.encoding_len());
    let mut vehicles_used = 0;

    while remaining > 0 && vehicles_used < vehicle_count {
        if vehicles_used > 0 {
            genes.push(SEPARATOR);
        }
        vehicles_used += 1;
        trace!(vehicle = vehicles_used, remaining, "opening vehicle");

        let mut current = 0;
        let mut load = 0.0;
        let mut time = 0.0;
        let mut served = 0;

        while let Some(next) = select(instance, rule, &covered, current, load, time) {
            let customer = instance.customer(next);
            covered[next] = true;
            remaining -= 1;
            served += 1;
            genes.push(next);

            load += customer.demand();
            time = customer.time_window().service_start(time) + customer.service_duration();
            current = next;
        }

        // a fresh vehicle starts from the same state, so none can do better
        if served == 0 {
            break;
        }
    }

    let uncovered: Vec<usize> = (1..=n).filter(|&c| !covered[c]).collect();
    if !uncovered.is_empty() {
        debug!(
            instance = instance.name(),
            ?rule,
            uncovered = uncovered.len(),
            vehicles_used,
            "greedy construction exhausted the fleet"
        );
    }

    Construction {
        encoding: Encoding::new(genes),
        uncovered,
        vehicles_used,
    }
}

/// Distance-first greedy: always visit the nearest feasible customer.
pub fn distance_greedy(instance: &Instance) -> Construction {
    greedy(instance, GreedyRule::Distance)
}

/// Fuel-first greedy: always visit the heaviest feasible customer.
pub fn fuel_greedy(instance: &Instance) -> Construction {
    greedy(instance, GreedyRule::Fuel)
}

/// Best feasible uncovered customer from `current`, or `None`.
fn select(
    instance: &Instance,
    rule: GreedyRule,
    covered: &[bool],
    current: usize,
    load: f64,
    time: f64,
) -> Option<usize> {
    let capacity = instance.capacity();
    let distances = instance.distances().row(current);
    let mut best: Option<(usize, f64)> = None;

    for (i, customer) in instance.customers().iter().enumerate().skip(1) {
        if covered[i] {
            continue;
        }
        if load + customer.demand() > capacity || time > customer.due_date() {
            continue;
        }

        let key = match rule {
            GreedyRule::Distance => distances[i],
            GreedyRule::Fuel => customer.demand(),
        };
        // strict comparison keeps the lowest id on ties
        if best.is_none_or(|(_, best_key)| rule.prefers(key, best_key)) {
            best = Some((i, key));
        }
    }

    best.map(|(i, _)| i)
}
