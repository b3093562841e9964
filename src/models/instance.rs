//! Validated CVRPTW problem instance.

use serde::{Deserialize, Serialize};

use super::{Customer, Fleet, TimeWindow};
use crate::distance::DistanceMatrix;
use crate::error::InstanceError;

/// Already-parsed instance data in column form.
///
/// Every vector is indexed by location, with index 0 the depot. This is the
/// shape a Solomon-format reader produces; it is checked and turned into an
/// [`Instance`] by [`Instance::from_data`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceData {
    #[serde(default)]
    pub name: String,
    pub vehicle_count: usize,
    pub capacity: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub demand: Vec<f64>,
    pub ready_time: Vec<f64>,
    /// Due dates; a window that never closes is `f64::INFINITY`, written
    /// as `null` by self-describing formats.
    #[serde(with = "open_due_dates")]
    pub due_date: Vec<f64>,
    pub service_time: Vec<f64>,
}

/// A CVRPTW instance: one depot, a homogeneous fleet, and customers with
/// demands, time windows, and service durations.
///
/// Immutable once built. The Euclidean distance matrix is computed up front
/// so evaluation never recomputes square roots.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::{Customer, Fleet, Instance};
///
/// let instance = Instance::new(
///     "tiny",
///     Fleet::new(2, 10.0),
///     vec![
///         Customer::depot(0.0, 0.0),
///         Customer::new(1, 3.0, 4.0, 5.0, 0.0),
///     ],
/// )
/// .unwrap();
/// assert_eq!(instance.customer_count(), 1);
/// assert_eq!(instance.encoding_len(), 2);
/// assert!((instance.distance(0, 1) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    fleet: Fleet,
    customers: Vec<Customer>,
    distances: DistanceMatrix,
}

impl Instance {
    /// Builds an instance from locations (index 0 = depot).
    ///
    /// # Errors
    ///
    /// Fails if the fleet is empty, the capacity is not positive, a
    /// location id does not match its position, any numeric field is
    /// negative or non-finite, or the depot has non-zero demand.
    pub fn new(
        name: impl Into<String>,
        fleet: Fleet,
        customers: Vec<Customer>,
    ) -> Result<Self, InstanceError> {
        if fleet.vehicle_count() == 0 {
            return Err(InstanceError::NoVehicles);
        }
        if !fleet.capacity().is_finite() || fleet.capacity() <= 0.0 {
            return Err(InstanceError::InvalidCapacity(fleet.capacity()));
        }
        if customers.is_empty() {
            return Err(InstanceError::MissingDepot);
        }

        for (position, c) in customers.iter().enumerate() {
            if c.id() != position {
                return Err(InstanceError::IdMismatch {
                    index: c.id(),
                    position,
                });
            }
            check_value("x", position, c.x(), false)?;
            check_value("y", position, c.y(), false)?;
            check_value("demand", position, c.demand(), true)?;
            check_value("service_time", position, c.service_duration(), true)?;
            check_value("ready_time", position, c.ready_time(), true)?;
            if c.due_date().is_nan() {
                return Err(InstanceError::NonFiniteValue {
                    field: "due_date",
                    index: position,
                });
            }
            if c.due_date() < 0.0 {
                return Err(InstanceError::NegativeValue {
                    field: "due_date",
                    index: position,
                    value: c.due_date(),
                });
            }
        }

        if customers[0].demand() != 0.0 {
            return Err(InstanceError::DepotDemand(customers[0].demand()));
        }

        let distances = DistanceMatrix::from_customers(&customers);
        Ok(Self {
            name: name.into(),
            fleet,
            customers,
            distances,
        })
    }

    /// Builds an instance from column-oriented parsed data.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Instance::new`], plus
    /// [`InstanceError::LengthMismatch`] when the columns disagree in length
    /// and [`InstanceError::TimeWindow`] when a ready time exceeds its due date.
    /// A due date of `f64::INFINITY` is an open window.
    pub fn from_data(data: InstanceData) -> Result<Self, InstanceError> {
        let expected = data.x.len();
        let columns: [(&'static str, &[f64]); 5] = [
            ("y", data.y.as_slice()),
            ("demand", data.demand.as_slice()),
            ("ready_time", data.ready_time.as_slice()),
            ("due_date", data.due_date.as_slice()),
            ("service_time", data.service_time.as_slice()),
        ];
        for (field, column) in columns {
            if column.len() != expected {
                return Err(InstanceError::LengthMismatch {
                    field,
                    expected,
                    actual: column.len(),
                });
            }
        }

        let mut customers = Vec::with_capacity(expected);
        for i in 0..expected {
            check_value("ready_time", i, data.ready_time[i], true)?;
            let due = data.due_date[i];
            let tw = if due == f64::INFINITY {
                TimeWindow::opening_at(data.ready_time[i])
            } else {
                check_value("due_date", i, due, true)?;
                TimeWindow::new(data.ready_time[i], due)
            }
            .ok_or(InstanceError::TimeWindow { index: i })?;
            let customer =
                Customer::new(i, data.x[i], data.y[i], data.demand[i], data.service_time[i]);
            customers.push(customer.with_time_window(tw));
        }

        Self::new(
            data.name,
            Fleet::new(data.vehicle_count, data.capacity),
            customers,
        )
    }

    /// Converts back into column form.
    pub fn to_data(&self) -> InstanceData {
        InstanceData {
            name: self.name.clone(),
            vehicle_count: self.fleet.vehicle_count(),
            capacity: self.fleet.capacity(),
            x: self.customers.iter().map(Customer::x).collect(),
            y: self.customers.iter().map(Customer::y).collect(),
            demand: self.customers.iter().map(Customer::demand).collect(),
            ready_time: self.customers.iter().map(Customer::ready_time).collect(),
            due_date: self.customers.iter().map(Customer::due_date).collect(),
            service_time: self
                .customers
                .iter()
                .map(Customer::service_duration)
                .collect(),
        }
    }

    /// Instance name (may be empty).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The vehicle fleet.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Number of vehicles.
    pub fn vehicle_count(&self) -> usize {
        self.fleet.vehicle_count()
    }

    /// Capacity of each vehicle.
    pub fn capacity(&self) -> f64 {
        self.fleet.capacity()
    }

    /// Number of customers (excluding depot).
    pub fn customer_count(&self) -> usize {
        self.customers.len() - 1
    }

    /// All locations (index 0 = depot, 1..=N = customers).
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Location with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id > customer_count()`.
    pub fn customer(&self, id: usize) -> &Customer {
        &self.customers[id]
    }

    /// The depot.
    pub fn depot(&self) -> &Customer {
        &self.customers[0]
    }

    /// Euclidean distance between two locations.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// The precomputed distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Length of every encoding for this instance: customers plus separators.
    pub fn encoding_len(&self) -> usize {
        self.customer_count() + self.fleet.separator_count()
    }

    /// Sum of all customer demands.
    pub fn total_demand(&self) -> f64 {
        self.customers.iter().map(Customer::demand).sum()
    }
}

fn check_value(
    field: &'static str,
    index: usize,
    value: f64,
    non_negative: bool,
) -> Result<(), InstanceError> {
    if !value.is_finite() {
        return Err(InstanceError::NonFiniteValue { field, index });
    }
    if non_negative && value < 0.0 {
        return Err(InstanceError::NegativeValue {
            field,
            index,
            value,
        });
    }
    Ok(())
}

/// Due-date column where `null` stands for a window that never closes.
mod open_due_dates {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dues: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            dues.iter()
                .map(|&due| (due != f64::INFINITY).then_some(due)),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let dues = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(dues
            .into_iter()
            .map(|due| due.unwrap_or(f64::INFINITY))
            .collect())
    }
}
