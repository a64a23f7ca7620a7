//! GPU vendor telemetry interface
//!
//! The GPU sampler talks to the vendor interface only through [`GpuTelemetry`]. On Windows
//! the production implementation is [`NvApi`], which loads the NVIDIA driver's NVAPI
//! library at runtime so hosts without an NVIDIA driver still start. Every other platform
//! (and every other vendor) gets [`UnsupportedGpu`], whose initialization always fails;
//! the sampler turns that into zeroed readings.

#[cfg(any(test, feature = "mock"))]
use mockall::automock;

use crate::error::{Error, Result};
use crate::gpu::types::{GpuDeviceSet, ThermalSample, UtilizationSample};

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use self::windows::{NvApi, NvPhysicalGpuHandle};

/// Access to a vendor GPU telemetry interface
#[cfg_attr(any(test, feature = "mock"), automock(type Device = u32;))]
pub trait GpuTelemetry: Send + Sync + std::fmt::Debug {
    /// Opaque physical device handle
    type Device: Copy + Default + Send;

    /// Initializes the vendor library. Called until it first succeeds.
    fn initialize(&self) -> Result<()>;

    /// Enumerates physical devices into a bounded set
    fn enumerate_physical_gpus(&self) -> Result<GpuDeviceSet<Self::Device>>;

    /// Reads the device's thermal sensors (all targets)
    fn thermal_settings(&self, device: Self::Device) -> Result<ThermalSample>;

    /// Reads the device's dynamic utilization-by-domain data
    fn dynamic_utilization(&self, device: Self::Device) -> Result<UtilizationSample>;
}

/// GPU backend for platforms or vendors without a supported telemetry interface
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedGpu;

impl GpuTelemetry for UnsupportedGpu {
    type Device = ();

    fn initialize(&self) -> Result<()> {
        Err(Error::not_available("GPU vendor telemetry is not supported on this platform"))
    }

    fn enumerate_physical_gpus(&self) -> Result<GpuDeviceSet<()>> {
        Ok(GpuDeviceSet::empty())
    }

    fn thermal_settings(&self, _device: ()) -> Result<ThermalSample> {
        Err(Error::not_available("GPU thermal settings"))
    }

    fn dynamic_utilization(&self, _device: ()) -> Result<UtilizationSample> {
        Err(Error::not_available("GPU utilization"))
    }
}

/// The GPU backend used by the global context on this platform
#[cfg(windows)]
pub type DefaultGpu = NvApi;

/// The GPU backend used by the global context on this platform
#[cfg(not(windows))]
pub type DefaultGpu = UnsupportedGpu;

/// Builds the platform GPU backend, honouring a library-name override where the
/// backend loads one.
#[cfg(windows)]
pub fn default_gpu(library: Option<&str>) -> DefaultGpu {
    match library {
        Some(name) => NvApi::with_library(name),
        None => NvApi::default(),
    }
}

/// Builds the platform GPU backend, honouring a library-name override where the
/// backend loads one.
#[cfg(not(windows))]
pub fn default_gpu(_library: Option<&str>) -> DefaultGpu {
    UnsupportedGpu
}
