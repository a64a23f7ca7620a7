//! # CPU Module
//!
//! On-demand CPU telemetry.
//!
//! ## Features
//!
//! * System-wide CPU usage from the host performance-counter subsystem
//! * A CPU temperature capability, currently a stub reporting 0.0
//!
//! ## Example
//!
//! ```rust
//! use host_telemetry::cpu::{CpuUsageSampler, CpuTemperatureStub, sample_temperature};
//! use host_telemetry::pdh::UnsupportedCounters;
//!
//! let sampler = CpuUsageSampler::with_defaults(UnsupportedCounters);
//! // Without a counter subsystem the session cannot be opened.
//! assert!(sampler.usage().is_err());
//!
//! assert_eq!(sample_temperature(&CpuTemperatureStub).value, 0.0);
//! ```

pub mod constants;
mod cpu_impl;
mod monitors;
mod session;
mod temperature;

pub use cpu_impl::CpuUsageSampler;
pub use monitors::{CpuTemperatureMonitor, CpuUtilizationMonitor};
pub use session::CounterSession;
pub use temperature::{sample_temperature, CpuTemperatureSource, CpuTemperatureStub};

// Re-export core traits from the traits module
pub use crate::traits::{HardwareMonitor, TemperatureMonitor, UtilizationMonitor};

#[cfg(test)]
mod tests;
