//! Genetic operators and the GA bridge for the separator encoding.
//!
//! - [`pmx_separator_crossover`] — PMX with separator repair
//! - [`swap_mutation`] — exchange of two positions
//! - [`RouteChromosome`] — encoding carried by the GA runner
//! - [`CvrptwGaProblem`] — [`GaProblem`](u_metaheur::ga::GaProblem) implementation

mod chromosome;
mod crossover;
mod mutation;
mod problem;

pub use chromosome::RouteChromosome;
pub use crossover::{pmx_separator_crossover, pmx_separator_crossover_with_outcome, CrossoverOutcome};
pub use mutation::{swap_mutation, swap_mutation_in_place};
pub use problem::{CvrptwGaProblem, Objective};
