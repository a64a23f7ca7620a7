use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use host_telemetry::{
    gpu::{GpuDeviceSet, ThermalSample, UtilizationDomain, UtilizationSample},
    nvapi::GpuTelemetry,
    Error, Result,
};

/// Call counts observed by a [`FakeGpu`] backend
#[derive(Debug, Default)]
pub struct GpuStats {
    pub initializes: AtomicUsize,
    pub enumerations: AtomicUsize,
}

impl GpuStats {
    pub fn initializes(&self) -> usize {
        self.initializes.load(Ordering::SeqCst)
    }

    pub fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }
}

/// In-memory vendor interface with a configurable device list and sensor readings
#[derive(Debug)]
pub struct FakeGpu {
    stats: Arc<GpuStats>,
    init_ok: bool,
    devices: Vec<u32>,
    temperature: Option<i32>,
    domains: Option<Vec<UtilizationDomain>>,
}

impl FakeGpu {
    /// One device at `temperature` Celsius with the given utilization domains
    pub fn single(temperature: i32, domains: &[UtilizationDomain]) -> Self {
        Self {
            stats: Arc::default(),
            init_ok: true,
            devices: vec![1],
            temperature: Some(temperature),
            domains: Some(domains.to_vec()),
        }
    }

    /// A driver that never initializes
    pub fn missing_driver() -> Self {
        Self { init_ok: false, ..Self::single(0, &[]) }
    }

    pub fn with_devices(mut self, devices: &[u32]) -> Self {
        self.devices = devices.to_vec();
        self
    }

    pub fn without_thermal(mut self) -> Self {
        self.temperature = None;
        self
    }

    pub fn without_utilization(mut self) -> Self {
        self.domains = None;
        self
    }

    pub fn stats(&self) -> Arc<GpuStats> {
        Arc::clone(&self.stats)
    }
}

impl GpuTelemetry for FakeGpu {
    type Device = u32;

    fn initialize(&self) -> Result<()> {
        self.stats.initializes.fetch_add(1, Ordering::SeqCst);
        if self.init_ok {
            Ok(())
        } else {
            Err(Error::LibraryLoad("nvapi64.dll: module not found".to_string()))
        }
    }

    fn enumerate_physical_gpus(&self) -> Result<GpuDeviceSet<u32>> {
        self.stats.enumerations.fetch_add(1, Ordering::SeqCst);
        Ok(GpuDeviceSet::from_slice(&self.devices))
    }

    fn thermal_settings(&self, _device: u32) -> Result<ThermalSample> {
        self.temperature
            .map(|t| ThermalSample::from_sensors(&[t]))
            .ok_or_else(|| Error::Vendor { status: -5, context: "NvAPI_GPU_GetThermalSettings".to_string() })
    }

    fn dynamic_utilization(&self, _device: u32) -> Result<UtilizationSample> {
        self.domains
            .as_deref()
            .map(UtilizationSample::from_domains)
            .ok_or_else(|| Error::Vendor { status: -5, context: "NvAPI_GPU_GetDynamicPstatesInfoEx".to_string() })
    }
}
