//! Customer and time window types.

/// A time window constraint for service at a customer location.
///
/// Service may start no later than `due` and no earlier than `ready`
/// (waiting is allowed if early).
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.ready() <= tw.due());
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// A window that opens at time zero and never closes.
    pub fn unbounded() -> Self {
        Self {
            ready: 0.0,
            due: f64::INFINITY,
        }
    }

    /// A window that opens at `ready` and never closes.
    ///
    /// Returns `None` if `ready` is non-finite.
    pub fn opening_at(ready: f64) -> Option<Self> {
        ready.is_finite().then_some(Self {
            ready,
            due: f64::INFINITY,
        })
    }

    /// Earliest allowable service start.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest allowable service start.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Time at which service can start when the vehicle is ready at `time`.
    pub fn service_start(&self, time: f64) -> f64 {
        time.max(self.ready)
    }

    /// Returns `true` if starting service at the given time violates this window.
    pub fn is_violated(&self, time: f64) -> bool {
        time > self.due
    }

    /// How far past the due date `time` lies; zero when on time.
    pub fn lateness(&self, time: f64) -> f64 {
        if self.is_violated(time) {
            time - self.due
        } else {
            0.0
        }
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// A customer (or depot) in a routing problem.
///
/// Customer 0 is the depot. Customers have a location, a demand, a time
/// window, and a service duration. Demands are real-valued; the fuel model
/// divides them by the vehicle capacity.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::Customer;
///
/// let depot = Customer::depot(35.0, 35.0);
/// assert_eq!(depot.id(), 0);
/// assert_eq!(depot.demand(), 0.0);
///
/// let c = Customer::new(1, 41.0, 49.0, 10.0, 10.0);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.demand(), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: usize,
    x: f64,
    y: f64,
    demand: f64,
    service_duration: f64,
    time_window: TimeWindow,
}

impl Customer {
    /// Creates a new customer with an unbounded time window.
    pub fn new(id: usize, x: f64, y: f64, demand: f64, service_duration: f64) -> Self {
        Self {
            id,
            x,
            y,
            demand,
            service_duration,
            time_window: TimeWindow::unbounded(),
        }
    }

    /// Creates a depot at the given coordinates (id=0, demand=0).
    pub fn depot(x: f64, y: f64) -> Self {
        Self::new(0, x, y, 0.0, 0.0)
    }

    /// Sets the time window for this customer.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = tw;
        self
    }

    /// Customer ID (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Demand delivered at this customer.
    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Service duration at this customer.
    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }

    /// Time window constraint.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// Shorthand for `time_window().ready()`.
    pub fn ready_time(&self) -> f64 {
        self.time_window.ready()
    }

    /// Shorthand for `time_window().due()`.
    pub fn due_date(&self) -> f64 {
        self.time_window.due()
    }
}
