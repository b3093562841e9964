//! Error types.

use thiserror::Error;

/// Rejection reasons for malformed instance data.
///
/// Returned by [`Instance::new`](crate::models::Instance::new) and
/// [`Instance::from_data`](crate::models::Instance::from_data). A rejected
/// instance would otherwise produce NaN or meaningless objective values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    #[error("instance must have at least one vehicle")]
    NoVehicles,

    #[error("vehicle capacity must be positive and finite, got {0}")]
    InvalidCapacity(f64),

    #[error("instance must contain at least the depot")]
    MissingDepot,

    #[error("field `{field}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("field `{field}` is negative at index {index}: {value}")]
    NegativeValue {
        field: &'static str,
        index: usize,
        value: f64,
    },

    #[error("field `{field}` is not finite at index {index}")]
    NonFiniteValue { field: &'static str, index: usize },

    #[error("depot demand must be zero, got {0}")]
    DepotDemand(f64),

    #[error("location {index} is stored at position {position}")]
    IdMismatch { index: usize, position: usize },

    #[error("time window of location {index} opens after it closes")]
    TimeWindow { index: usize },
}

/// Failures while evaluating an encoding.
///
/// Both variants signal a corrupted encoding: operators in this crate never
/// produce one, so seeing these means an invariant was broken upstream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("encoding references location {id}, but the instance has {customer_count} customers")]
    UnknownCustomer { id: usize, customer_count: usize },

    #[error("run {run_index} returns to the depot with residual load {residual}")]
    LoadNotClosed { run_index: usize, residual: f64 },
}
