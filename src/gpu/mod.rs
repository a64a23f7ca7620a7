//! # GPU Module
//!
//! On-demand utilization and temperature of the first GPU exposed by the vendor telemetry
//! interface. Multi-GPU hosts report device 0 only.

pub mod constants;
mod gpu_impl;
mod monitors;
mod session;
pub mod types;

pub use gpu_impl::GpuMetricsSampler;
pub use monitors::{GpuTemperatureMonitor, GpuUtilizationMonitor};
pub use session::GpuSession;
pub use types::{GpuDeviceSet, GpuInfo, ThermalSample, UtilizationDomain, UtilizationSample};

pub use crate::traits::{HardwareMonitor, TemperatureMonitor, UtilizationMonitor};
