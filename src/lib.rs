//! # u-cvrptw
//!
//! Core of a bi-objective capacitated vehicle routing problem with time
//! windows: minimize total distance and a load-weighted fuel proxy over a
//! homogeneous fleet served from a single depot.
//!
//! Solutions use a flat separator encoding: customers `1..=n` interleaved
//! with `vehicle_count - 1` zeros, each run between zeros being one
//! vehicle's visiting order.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Customer, TimeWindow, Fleet, Instance, Encoding)
//! - [`distance`] — Euclidean distance matrix
//! - [`evaluation`] — Distance and fuel objectives, constraint checking
//! - [`constructive`] — Distance-first and fuel-first greedy construction
//! - [`ga`] — Repair crossover, swap mutation and the GA bridge
//! - [`error`] — Instance and evaluation errors
//!
//! ## Example
//!
//! ```
//! use u_cvrptw::models::{Customer, Fleet, Instance};
//! use u_cvrptw::{distance_greedy, evaluate, is_feasible};
//!
//! let instance = Instance::new(
//!     "demo",
//!     Fleet::new(2, 10.0),
//!     vec![
//!         Customer::depot(0.0, 0.0),
//!         Customer::new(1, 1.0, 0.0, 5.0, 0.0),
//!         Customer::new(2, 2.0, 0.0, 5.0, 0.0),
//!         Customer::new(3, 0.0, 3.0, 5.0, 0.0),
//!     ],
//! )
//! .unwrap();
//!
//! let encoding = distance_greedy(&instance)
//!     .into_padded_encoding(&instance)
//!     .unwrap();
//! assert!(encoding.is_structurally_valid(&instance));
//! assert!(is_feasible(&instance, &encoding));
//!
//! let objectives = evaluate(&instance, &encoding).unwrap();
//! assert!(objectives.fuel >= objectives.distance);
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod models;

pub use constructive::{distance_greedy, fuel_greedy};
pub use error::{EvaluationError, InstanceError};
pub use evaluation::{check_constraints, evaluate, is_feasible};
pub use ga::{pmx_separator_crossover, swap_mutation};
