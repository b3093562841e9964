//! Time-window and capacity constraint checking.
//!
//! Timing follows the construction model: a vehicle's clock advances only
//! by waiting for a customer's window to open and by service durations.
//! Travel time between locations is not added.

use super::check_ids;
use crate::error::EvaluationError;
use crate::models::{Encoding, Instance};

/// A type of constraint violation in an encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Service started after the customer's due date. Customer 0 denotes the
    /// return to the depot after the depot closed.
    TimeWindow {
        /// Run index (non-empty runs, in order).
        run_index: usize,
        /// Location where the violation occurred.
        customer_id: usize,
        /// Service start (or return) time.
        time: f64,
        /// Due date of the location.
        due: f64,
    },
    /// Total demand of a run exceeds the vehicle capacity.
    Capacity {
        /// Run index (non-empty runs, in order).
        run_index: usize,
        /// Total demand served by the run.
        load: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
}

/// A constraint violation in an encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }

    /// Non-positive penalty contributed by this violation.
    pub fn penalty(&self) -> f64 {
        match self.kind {
            ViolationType::TimeWindow { time, due, .. } => -(time - due),
            ViolationType::Capacity { load, capacity, .. } => -(load - capacity),
        }
    }
}

/// Penalty summary of an encoding.
///
/// The problem declares two constraints, time windows and capacity.
/// `violated_constraints` counts how many of the two are violated anywhere;
/// `violations` lists every individual occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintReport {
    /// Sum of all penalties; `0.0` when feasible, negative otherwise.
    pub overall_violation: f64,
    /// Number of violated constraint classes (0, 1 or 2).
    pub violated_constraints: usize,
    /// Summed time-window penalty (non-positive).
    pub time_window_violation: f64,
    /// Summed capacity penalty (non-positive).
    pub capacity_violation: f64,
    /// Every violation found, in encoding order.
    pub violations: Vec<Violation>,
}

impl ConstraintReport {
    /// Number of individual violations: each late customer, late depot
    /// return and overloaded run counts once.
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` if no constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, violation: Violation) {
        match violation.kind {
            ViolationType::TimeWindow { .. } => self.time_window_violation += violation.penalty(),
            ViolationType::Capacity { .. } => self.capacity_violation += violation.penalty(),
        }
        self.violations.push(violation);
    }

    fn finish(mut self) -> Self {
        self.overall_violation = 0.0;
        self.violated_constraints = 0;
        for class in [self.time_window_violation, self.capacity_violation] {
            if class < 0.0 {
                self.overall_violation += class;
                self.violated_constraints += 1;
            }
        }
        self
    }
}

/// Checks time windows and capacity for every vehicle run.
///
/// Per run, the clock starts at zero; at each customer
/// `time = max(time, ready)`, lateness beyond `due` is penalized, then the
/// service duration is added. Returning after the depot's due date and
/// exceeding the capacity are penalized once per run.
///
/// # Errors
///
/// [`EvaluationError::UnknownCustomer`] if a value exceeds the customer count.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::{Customer, Encoding, Fleet, Instance};
/// use u_cvrptw::evaluation::check_constraints;
///
/// let instance = Instance::new(
///     "cap",
///     Fleet::new(1, 10.0),
///     vec![
///         Customer::depot(0.0, 0.0),
///         Customer::new(1, 1.0, 0.0, 8.0, 0.0),
///         Customer::new(2, 2.0, 0.0, 7.0, 0.0),
///     ],
/// )
/// .unwrap();
/// let report = check_constraints(&instance, &Encoding::new(vec![1, 2])).unwrap();
/// assert_eq!(report.violated_constraints, 1);
/// assert!((report.overall_violation + 5.0).abs() < 1e-10);
/// ```
pub fn check_constraints(
    instance: &Instance,
    encoding: &Encoding,
) -> Result<ConstraintReport, EvaluationError> {
    check_ids(instance, encoding)?;

    let capacity = instance.capacity();
    let depot_due = instance.depot().due_date();
    let mut report = ConstraintReport::default();

    for (run_index, run) in encoding.runs().enumerate() {
        let mut time = 0.0;
        let mut load = 0.0;

        for &c in run {
            let customer = instance.customer(c);
            let tw = customer.time_window();
            time = tw.service_start(time);
            if tw.is_violated(time) {
                report.push(Violation::new(ViolationType::TimeWindow {
                    run_index,
                    customer_id: c,
                    time,
                    due: tw.due(),
                }));
            }
            time += customer.service_duration();
            load += customer.demand();
        }

        if time > depot_due {
            report.push(Violation::new(ViolationType::TimeWindow {
                run_index,
                customer_id: 0,
                time,
                due: depot_due,
            }));
        }
        if load > capacity {
            report.push(Violation::new(ViolationType::Capacity {
                run_index,
                load,
                capacity,
            }));
        }
    }

    Ok(report.finish())
}

/// Returns `true` if no run violates a time window or the capacity.
///
/// Stops at the first violation. Encodings referencing unknown locations
/// are infeasible.
pub fn is_feasible(instance: &Instance, encoding: &Encoding) -> bool {
    if check_ids(instance, encoding).is_err() {
        return false;
    }

    let capacity = instance.capacity();
    let depot_due = instance.depot().due_date();

    for run in encoding.runs() {
        let mut time = 0.0;
        let mut load = 0.0;

        for &c in run {
            let customer = instance.customer(c);
            let tw = customer.time_window();
            time = tw.service_start(time);
            if tw.is_violated(time) {
                return false;
            }
            time += customer.service_duration();
            load += customer.demand();
        }

        if time > depot_due || load > capacity {
            return false;
        }
    }

    true
}
