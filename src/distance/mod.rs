//! Distance matrices.
//!
//! Provides the dense Euclidean distance matrix owned by every instance.

mod matrix;

pub use matrix::DistanceMatrix;
