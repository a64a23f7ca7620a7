//! Host Telemetry - on-demand CPU and GPU telemetry for Windows hosts
//!
//! This crate samples a small set of host metrics when asked, with no background
//! collection:
//!
//! - **CPU usage**: system-wide busy percentage from the OS performance-counter subsystem
//! - **CPU temperature**: a capability slot, currently a stub reporting 0.0
//! - **GPU metrics**: utilization and temperature of the first GPU exposed by the NVIDIA
//!   driver's telemetry interface
//!
//! # Examples
//!
//! ```rust
//! use host_telemetry::{get_cpu_temperature, get_gpu_info, sample_gpu_info};
//!
//! // GPU queries never fail. Without a supported driver the reading is zeroed.
//! let gpu = get_gpu_info();
//! println!("GPU: {:.1}% at {:.1} C", gpu.usage, gpu.temperature);
//!
//! // The tagged variant says why a reading is zero.
//! let sample = sample_gpu_info();
//! println!("GPU sample status: {}", sample.status);
//!
//! assert_eq!(get_cpu_temperature(), 0.0);
//! ```
//!
//! # Error Handling
//!
//! Only CPU session initialization is reported as an error. Every other failure degrades
//! to a zero reading:
//!
//! ```rust
//! use host_telemetry::{get_cpu_usage, Error};
//!
//! match get_cpu_usage() {
//!     Ok(usage) => println!("CPU: {:.1}%", usage),
//!     Err(e @ (Error::SessionUnavailable(_) | Error::CounterUnavailable(_))) => {
//!         eprintln!("CPU counters unavailable: {}", e)
//!     },
//!     Err(e) => eprintln!("unexpected error: {}", e),
//! }
//! ```
//!
//! # Thread Safety
//!
//! The free functions share one process-wide [`Telemetry`] context. Each native session
//! sits behind its own mutex, so concurrent first calls open it once. The context is never
//! torn down.

#![doc(html_root_url = "https://docs.rs/host-telemetry/0.1.0")]

pub mod config;
pub mod core;
pub mod cpu;
pub mod error;
pub mod gpu;
pub mod nvapi;
pub mod pdh;
pub mod system;
pub mod traits;

pub use crate::config::{CpuConfig, GpuConfig, TelemetryConfig};
pub use crate::core::types::{Sample, SampleStatus};
pub use crate::error::{Error, Result};
pub use crate::gpu::GpuInfo;
pub use crate::system::{Telemetry, TelemetrySnapshot};

/// System-wide CPU busy percentage.
///
/// The first successful call opens the counter session and blocks for the warm-up delay
/// (100 ms by default). Fails only when the session cannot be opened; a failed collection
/// on an open session reports 0.0.
pub fn get_cpu_usage() -> Result<f64> {
    Telemetry::global().cpu_usage()
}

/// CPU temperature in Celsius. Always 0.0 until a real source exists.
pub fn get_cpu_temperature() -> f64 {
    Telemetry::global().cpu_temperature()
}

/// Utilization and temperature of the first GPU. Never fails.
pub fn get_gpu_info() -> GpuInfo {
    Telemetry::global().gpu_info()
}

/// [`get_cpu_usage`] tagged with its status instead of an error
pub fn sample_cpu_usage() -> Sample<f64> {
    Telemetry::global().sample_cpu_usage()
}

/// [`get_cpu_temperature`] tagged with its status
pub fn sample_cpu_temperature() -> Sample<f64> {
    Telemetry::global().sample_cpu_temperature()
}

/// [`get_gpu_info`] tagged with its status
pub fn sample_gpu_info() -> Sample<GpuInfo> {
    Telemetry::global().sample_gpu_info()
}

/// Installs a `tracing` fmt subscriber filtered by `directives` (e.g. `"host_telemetry=debug"`).
///
/// Directives are passed explicitly; the environment is not consulted. Calling it again,
/// or after the host installed its own subscriber, is a no-op.
pub fn init_tracing(directives: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_new(directives)
        .map_err(|e| Error::config(format!("invalid tracing directives '{}': {}", directives, e)))?;

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
    Ok(())
}

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::config::TelemetryConfig;
    pub use crate::core::metrics::Metric;
    pub use crate::core::types::{Percentage, Sample, SampleStatus, Temperature};
    pub use crate::cpu::{CpuTemperatureMonitor, CpuUtilizationMonitor};
    pub use crate::gpu::{GpuInfo, GpuTemperatureMonitor, GpuUtilizationMonitor};
    pub use crate::system::{Telemetry, TelemetrySnapshot};
    pub use crate::traits::{HardwareMonitor, TemperatureMonitor, UtilizationMonitor};
    pub use crate::Error;
    pub use crate::Result;
}
