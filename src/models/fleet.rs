//! Homogeneous vehicle fleet.

/// A fleet of identical vehicles stationed at the depot.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::Fleet;
///
/// let fleet = Fleet::new(25, 200.0);
/// assert_eq!(fleet.vehicle_count(), 25);
/// assert_eq!(fleet.capacity(), 200.0);
/// assert_eq!(fleet.separator_count(), 24);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fleet {
    vehicle_count: usize,
    capacity: f64,
}

impl Fleet {
    /// Creates a fleet of `vehicle_count` vehicles with the given capacity.
    ///
    /// Values are checked when the fleet is attached to an
    /// [`Instance`](super::Instance).
    pub fn new(vehicle_count: usize, capacity: f64) -> Self {
        Self {
            vehicle_count,
            capacity,
        }
    }

    /// Number of available vehicles.
    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    /// Load capacity of every vehicle.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Number of route separators in a valid encoding for this fleet.
    pub fn separator_count(&self) -> usize {
        self.vehicle_count.saturating_sub(1)
    }

    /// Fuel weight of a leg travelled with `load` on board.
    ///
    /// An empty vehicle burns at rate 1, a full one at rate 2.
    pub fn fuel_factor(&self, load: f64) -> f64 {
        1.0 + load / self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_new() {
        let f = Fleet::new(3, 100.0);
        assert_eq!(f.vehicle_count(), 3);
        assert_eq!(f.capacity(), 100.0);
        assert_eq!(f.separator_count(), 2);
    }

    #[test]
    fn test_single_vehicle_has_no_separators() {
        assert_eq!(Fleet::new(1, 10.0).separator_count(), 0);
    }

    #[test]
    fn test_fuel_factor() {
        let f = Fleet::new(2, 50.0);
        assert_eq!(f.fuel_factor(0.0), 1.0);
        assert_eq!(f.fuel_factor(25.0), 1.5);
        assert_eq!(f.fuel_factor(50.0), 2.0);
    }
}
