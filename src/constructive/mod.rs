//! Greedy construction heuristics.
//!
//! - [`distance_greedy`] — nearest feasible customer first
//! - [`fuel_greedy`] — heaviest feasible customer first
//!
//! Both share the skeleton in [`greedy`] and differ only in the
//! [`GreedyRule`] used to rank candidates.

mod greedy;

pub use greedy::{distance_greedy, fuel_greedy, greedy, Construction, GreedyRule};
