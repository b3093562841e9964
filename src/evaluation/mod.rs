//! Objective evaluation and constraint checking.
//!
//! - [`evaluate`] — total distance and load-weighted fuel of an encoding
//! - [`check_constraints`] — time-window and capacity penalties
//! - [`is_feasible`] — short-circuiting feasibility test
//! - [`evaluate_full`] — objectives and constraint report in one pass

mod constraints;
mod objectives;

pub use constraints::{check_constraints, is_feasible, ConstraintReport, Violation, ViolationType};
pub use objectives::{evaluate, evaluate_run, Objectives};

use crate::error::EvaluationError;
use crate::models::{Encoding, Instance};

/// Objectives together with the constraint report of one encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Distance and fuel.
    pub objectives: Objectives,
    /// Time-window and capacity violations.
    pub constraints: ConstraintReport,
}

impl Evaluation {
    /// Returns `true` if no constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.constraints.is_feasible()
    }
}

/// Computes objectives and constraint report for an encoding.
///
/// # Errors
///
/// See [`evaluate`].
pub fn evaluate_full(
    instance: &Instance,
    encoding: &Encoding,
) -> Result<Evaluation, EvaluationError> {
    Ok(Evaluation {
        objectives: evaluate(instance, encoding)?,
        constraints: check_constraints(instance, encoding)?,
    })
}

/// Rejects encodings that reference locations outside the instance.
fn check_ids(instance: &Instance, encoding: &Encoding) -> Result<(), EvaluationError> {
    let customer_count = instance.customer_count();
    match encoding.genes().iter().find(|&&id| id > customer_count) {
        Some(&id) => Err(EvaluationError::UnknownCustomer { id, customer_count }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Fleet};

    #[test]
    fn test_evaluate_full_combines_both() {
        let inst = Instance::new(
            "full",
            Fleet::new(2, 5.0),
            vec![
                Customer::depot(0.0, 0.0),
                Customer::new(1, 3.0, 4.0, 4.0, 0.0),
                Customer::new(2, 0.0, 4.0, 4.0, 0.0),
            ],
        )
        .expect("valid");
        let eval = evaluate_full(&inst, &Encoding::new(vec![1, 2, 0])).expect("ok");
        assert!((eval.objectives.distance - 12.0).abs() < 1e-10);
        assert!(!eval.is_feasible());
        assert!((eval.constraints.overall_violation + 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_check_ids() {
        let inst = Instance::new("ids", Fleet::new(1, 5.0), vec![Customer::depot(0.0, 0.0)])
            .expect("valid");
        assert!(check_ids(&inst, &Encoding::default()).is_ok());
        assert_eq!(
            check_ids(&inst, &Encoding::new(vec![1])),
            Err(EvaluationError::UnknownCustomer {
                id: 1,
                customer_count: 0,
            })
        );
    }
}
