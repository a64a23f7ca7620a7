use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    core::metrics::Metric,
    core::types::{Percentage, Temperature},
    error::Result,
    nvapi::{DefaultGpu, GpuTelemetry},
    pdh::{DefaultCounters, PerfCounters},
    system::{run_blocking, Telemetry},
    traits::{HardwareMonitor, TemperatureMonitor, UtilizationMonitor},
};

//=============================================================================
// CPU Utilization Monitor
//=============================================================================

/// Monitor for system-wide CPU utilization
///
/// Sampling runs on the blocking pool, so the first call's warm-up delay does not stall the
/// executor. The percentage is passed through unclamped.
#[derive(Debug)]
pub struct CpuUtilizationMonitor<P: PerfCounters = DefaultCounters, G: GpuTelemetry = DefaultGpu> {
    telemetry: Arc<Telemetry<P, G>>,
    device_id: String,
}

impl<P: PerfCounters, G: GpuTelemetry> CpuUtilizationMonitor<P, G> {
    /// Creates a new CpuUtilizationMonitor over the given context and device ID
    pub fn new(telemetry: Arc<Telemetry<P, G>>, device_id: String) -> Self {
        Self { telemetry, device_id }
    }
}

#[async_trait]
impl<P, G> HardwareMonitor for CpuUtilizationMonitor<P, G>
where
    P: PerfCounters + 'static,
    G: GpuTelemetry + 'static,
{
    type MetricType = Percentage;

    async fn name(&self) -> Result<String> {
        Ok("CPU Utilization Monitor".to_string())
    }

    async fn hardware_type(&self) -> Result<String> {
        Ok("CPU".to_string())
    }

    async fn device_id(&self) -> Result<String> {
        Ok(self.device_id.clone())
    }

    async fn get_metric(&self) -> Result<Metric<Self::MetricType>> {
        let telemetry = Arc::clone(&self.telemetry);
        let usage = run_blocking(move || telemetry.cpu_usage()).await??;
        Ok(Metric::new(Percentage(usage)))
    }
}

#[async_trait]
impl<P, G> UtilizationMonitor for CpuUtilizationMonitor<P, G>
where
    P: PerfCounters + 'static,
    G: GpuTelemetry + 'static,
{
}

//=============================================================================
// CPU Temperature Monitor
//=============================================================================

/// Monitor for CPU temperature
///
/// Reports the context's temperature source, 0.0 while the stub is installed.
#[derive(Debug)]
pub struct CpuTemperatureMonitor<P: PerfCounters = DefaultCounters, G: GpuTelemetry = DefaultGpu> {
    telemetry: Arc<Telemetry<P, G>>,
    device_id: String,
}

impl<P: PerfCounters, G: GpuTelemetry> CpuTemperatureMonitor<P, G> {
    /// Creates a new CpuTemperatureMonitor over the given context and device ID
    pub fn new(telemetry: Arc<Telemetry<P, G>>, device_id: String) -> Self {
        Self { telemetry, device_id }
    }
}

#[async_trait]
impl<P, G> HardwareMonitor for CpuTemperatureMonitor<P, G>
where
    P: PerfCounters + 'static,
    G: GpuTelemetry + 'static,
{
    type MetricType = Temperature;

    async fn name(&self) -> Result<String> {
        Ok("CPU Temperature Monitor".to_string())
    }

    async fn hardware_type(&self) -> Result<String> {
        Ok("CPU".to_string())
    }

    async fn device_id(&self) -> Result<String> {
        Ok(self.device_id.clone())
    }

    async fn get_metric(&self) -> Result<Metric<Self::MetricType>> {
        Ok(Metric::new(Temperature::new(self.telemetry.cpu_temperature())))
    }
}

#[async_trait]
impl<P, G> TemperatureMonitor for CpuTemperatureMonitor<P, G>
where
    P: PerfCounters + 'static,
    G: GpuTelemetry + 'static,
{
}
