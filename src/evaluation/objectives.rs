//! Distance and fuel objectives.
//!
//! # Fuel model
//!
//! Each leg of a route is weighted by `1 + load / capacity`, where `load` is
//! the demand still on board while driving that leg. A vehicle leaves the
//! depot carrying the demand of its whole run and drops each customer's
//! demand on arrival, so it returns empty. Delivering heavy customers early
//! therefore burns less fuel than delivering them late.

use serde::{Deserialize, Serialize};

use super::check_ids;
use crate::error::EvaluationError;
use crate::models::{Encoding, Instance};

/// The two minimized objectives of an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Objectives {
    /// Total Euclidean travel distance.
    pub distance: f64,
    /// Load-weighted travel distance.
    pub fuel: f64,
}

impl Objectives {
    /// Objective vector `[distance, fuel]`.
    pub fn as_array(&self) -> [f64; 2] {
        [self.distance, self.fuel]
    }
}

impl std::ops::AddAssign for Objectives {
    fn add_assign(&mut self, rhs: Self) {
        self.distance += rhs.distance;
        self.fuel += rhs.fuel;
    }
}

/// Computes total distance and fuel of an encoding.
///
/// Separators and empty runs contribute nothing. Every non-empty run is a
/// closed tour `depot → run[0] → … → run[last] → depot`.
///
/// # Errors
///
/// - [`EvaluationError::UnknownCustomer`] if a value exceeds the customer count.
/// - [`EvaluationError::LoadNotClosed`] if a vehicle would return to the
///   depot with load on board.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::{Customer, Encoding, Fleet, Instance};
/// use u_cvrptw::evaluation::evaluate;
///
/// let instance = Instance::new(
///     "line",
///     Fleet::new(1, 10.0),
///     vec![
///         Customer::depot(0.0, 0.0),
///         Customer::new(1, 1.0, 0.0, 10.0, 0.0),
///     ],
/// )
/// .unwrap();
/// let obj = evaluate(&instance, &Encoding::new(vec![1])).unwrap();
/// assert!((obj.distance - 2.0).abs() < 1e-10);
/// // outbound fully loaded (factor 2), return empty (factor 1)
/// assert!((obj.fuel - 3.0).abs() < 1e-10);
/// ```
pub fn evaluate(instance: &Instance, encoding: &Encoding) -> Result<Objectives, EvaluationError> {
    check_ids(instance, encoding)?;

    let mut total = Objectives::default();
    for (run_index, run) in encoding.runs().enumerate() {
        total += evaluate_run(instance, run_index, run)?;
    }
    Ok(total)
}

/// Computes distance and fuel of a single vehicle run.
///
/// `run` must be non-empty and contain only customer ids of `instance`;
/// `run_index` is used in error reports only.
///
/// # Errors
///
/// [`EvaluationError::LoadNotClosed`] if the simulated load does not reach
/// zero at the end of the run.
///
/// # Panics
///
/// Panics if `run` holds an id greater than the customer count.
pub fn evaluate_run(
    instance: &Instance,
    run_index: usize,
    run: &[usize],
) -> Result<Objectives, EvaluationError> {
    let fleet = instance.fleet();
    let total_load: f64 = run.iter().map(|&c| instance.customer(c).demand()).sum();

    let mut load = total_load;
    let mut obj = Objectives::default();
    let mut prev = 0;

    for &c in run {
        let leg = instance.distance(prev, c);
        obj.distance += leg;
        obj.fuel += fleet.fuel_factor(load) * leg;
        load -= instance.customer(c).demand();
        prev = c;
    }

    let tolerance = 1e-9 * total_load.max(1.0);
    if load.abs() > tolerance {
        return Err(EvaluationError::LoadNotClosed {
            run_index,
            residual: load,
        });
    }

    // the vehicle returns empty; any residual is rounding noise
    let leg = instance.distance(prev, 0);
    obj.distance += leg;
    obj.fuel += fleet.fuel_factor(0.0) * leg;

    Ok(obj)
}
