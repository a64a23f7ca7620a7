/// # Core Metrics Module
///
/// Timestamped wrappers for single point-in-time measurements. The sampler never keeps
/// history, so a metric is produced per call and handed straight to the caller.
///
/// ## Example
///
/// ```rust
/// use host_telemetry::core::metrics::Metric;
///
/// let usage = Metric::new(42.5);
/// assert_eq!(usage.value, 42.5);
/// ```
use std::time::SystemTime;

/// A single metric measurement with a timestamp
#[derive(Debug, Clone)]
pub struct Metric<T> {
    /// The value of the metric
    pub value: T,
    /// The timestamp when the metric was recorded
    pub timestamp: SystemTime,
}

impl<T> Metric<T> {
    /// Creates a new metric with the current time as timestamp
    pub fn new(value: T) -> Self {
        Self { value, timestamp: SystemTime::now() }
    }

    /// Maps the value while keeping the original timestamp
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Metric<U> {
        Metric { value: f(self.value), timestamp: self.timestamp }
    }
}
