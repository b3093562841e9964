//! Domain model types for the capacitated VRP with time windows.
//!
//! Provides the core abstractions: customers with demands and time windows,
//! a homogeneous fleet, the validated problem instance, and the
//! separator-delimited route encoding operated on by every heuristic.

mod customer;
mod encoding;
mod fleet;
mod instance;

pub use customer::{Customer, TimeWindow};
pub use encoding::{Encoding, Runs, SEPARATOR};
pub use fleet::Fleet;
pub use instance::{Instance, InstanceData};
