//! # Core Types Module
//!
//! Fundamental value types shared by the CPU and GPU samplers.
//!
//! ## Key Types
//!
//! * `Percentage` - A utilization value, nominally between 0.0 and 100.0
//! * `Temperature` - A temperature in Celsius
//! * `Sample` - A value tagged with how it was obtained (`SampleStatus`)
//!
//! ## Example
//!
//! ```rust
//! use host_telemetry::core::types::{Sample, SampleStatus};
//!
//! let sample = Sample::unavailable(0.0);
//! assert_eq!(sample.status, SampleStatus::Unavailable);
//! assert!(!sample.is_ok());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents a percentage value
///
/// # Examples
///
/// ```rust
/// use host_telemetry::core::types::Percentage;
///
/// let p = Percentage(75.0);
/// assert_eq!(p.as_f64(), 75.0);
///
/// // Readings are never clamped
/// assert_eq!(Percentage(104.5).as_f64(), 104.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(pub f64);

impl Percentage {
    /// Returns the percentage value as a float
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// Represents a temperature in Celsius
///
/// # Examples
///
/// ```rust
/// use host_telemetry::core::types::Temperature;
///
/// let temp = Temperature::new(25.0);
/// assert_eq!(temp.as_celsius(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(pub f64);

impl Temperature {
    /// Creates a new Temperature from a value in Celsius
    pub fn new(celsius: f64) -> Self {
        Self(celsius)
    }

    /// Returns the temperature in Celsius
    pub fn as_celsius(&self) -> f64 {
        self.0
    }
}

/// How a sampled value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStatus {
    /// The value is a fresh measurement
    Ok,
    /// The subsystem was reachable but produced no measurement; the value is a sentinel
    Unavailable,
    /// The owning session could not be initialized; the value is a sentinel
    InitFailed,
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleStatus::Ok => write!(f, "ok"),
            SampleStatus::Unavailable => write!(f, "unavailable"),
            SampleStatus::InitFailed => write!(f, "init failed"),
        }
    }
}

/// A sampled value tagged with its status
///
/// Sentinel values are still meaningful to callers that only look at `value`: they are
/// always the zero the public operations report on failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample<T> {
    pub value: T,
    pub status: SampleStatus,
}

impl<T> Sample<T> {
    pub fn ok(value: T) -> Self {
        Self { value, status: SampleStatus::Ok }
    }

    pub fn unavailable(value: T) -> Self {
        Self { value, status: SampleStatus::Unavailable }
    }

    pub fn init_failed(value: T) -> Self {
        Self { value, status: SampleStatus::InitFailed }
    }

    pub fn is_ok(&self) -> bool {
        self.status == SampleStatus::Ok
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
