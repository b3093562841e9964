//! Dense Euclidean distance matrix.

use crate::models::Customer;

/// Symmetric matrix of Euclidean distances between all locations,
/// row-major, indexed by location id (0 = depot).
///
/// Built once per [`Instance`](crate::models::Instance); every objective
/// and the distance-first greedy read from it instead of recomputing
/// square roots.
///
/// # Examples
///
/// ```
/// use u_cvrptw::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert!((dm.get(2, 0) - 10.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes the matrix for a list of `(x, y)` points.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let size = points.len();
        let mut data = vec![0.0; size * size];
        for (i, &(xi, yi)) in points.iter().enumerate() {
            for (j, &(xj, yj)) in points.iter().enumerate().skip(i + 1) {
                let d = (xi - xj).hypot(yi - yj);
                data[i * size + j] = d;
                data[j * size + i] = d;
            }
        }
        Self { data, size }
    }

    /// Computes the matrix from customer coordinates.
    pub fn from_customers(customers: &[Customer]) -> Self {
        let points: Vec<(f64, f64)> = customers.iter().map(|c| (c.x(), c.y())).collect();
        Self::from_points(&points)
    }

    /// Distance between two locations.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Distances from `from` to every location, indexed by location id.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Number of locations, depot included.
    pub fn size(&self) -> usize {
        self.size
    }
}
