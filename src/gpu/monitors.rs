use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    core::metrics::Metric,
    core::types::{Percentage, Temperature},
    error::Result,
    gpu::types::GpuInfo,
    nvapi::{DefaultGpu, GpuTelemetry},
    pdh::{DefaultCounters, PerfCounters},
    system::{run_blocking, Telemetry},
    traits::{HardwareMonitor, TemperatureMonitor, UtilizationMonitor},
};

async fn read_gpu<P, G>(telemetry: &Arc<Telemetry<P, G>>) -> Result<Metric<GpuInfo>>
where
    P: PerfCounters + 'static,
    G: GpuTelemetry + 'static,
{
    let telemetry = Arc::clone(telemetry);
    let info = run_blocking(move || telemetry.gpu_info()).await?;
    Ok(Metric::new(info))
}

//------------------------------------------------------------------------------
// GpuUtilizationMonitor
//------------------------------------------------------------------------------

/// Monitor for the first GPU's utilization
#[derive(Debug)]
pub struct GpuUtilizationMonitor<P: PerfCounters = DefaultCounters, G: GpuTelemetry = DefaultGpu> {
    telemetry: Arc<Telemetry<P, G>>,
    device_id: String,
}

impl<P: PerfCounters, G: GpuTelemetry> GpuUtilizationMonitor<P, G> {
    /// Create a new GPU utilization monitor
    pub fn new(telemetry: Arc<Telemetry<P, G>>, device_id: String) -> Self {
        Self { telemetry, device_id }
    }
}

#[async_trait]
impl<P, G> HardwareMonitor for GpuUtilizationMonitor<P, G>
where
    P: PerfCounters + 'static,
    G: GpuTelemetry + 'static,
{
    type MetricType = Percentage;

    async fn name(&self) -> Result<String> {
        Ok("GPU Utilization Monitor".to_string())
    }

    async fn hardware_type(&self) -> Result<String> {
        Ok("GPU".to_string())
    }

    async fn device_id(&self) -> Result<String> {
        Ok(self.device_id.clone())
    }

    async fn get_metric(&self) -> Result<Metric<Self::MetricType>> {
        Ok(read_gpu(&self.telemetry).await?.map(|info| Percentage(info.usage)))
    }
}

#[async_trait]
impl<P, G> UtilizationMonitor for GpuUtilizationMonitor<P, G>
where
    P: PerfCounters + 'static,
    G: GpuTelemetry + 'static,
{
}

//------------------------------------------------------------------------------
// GpuTemperatureMonitor
//------------------------------------------------------------------------------

/// Monitor for the first GPU's primary thermal sensor
#[derive(Debug)]
pub struct GpuTemperatureMonitor<P: PerfCounters = DefaultCounters, G: GpuTelemetry = DefaultGpu> {
    telemetry: Arc<Telemetry<P, G>>,
    device_id: String,
}

impl<P: PerfCounters, G: GpuTelemetry> GpuTemperatureMonitor<P, G> {
    /// Create a new GPU temperature monitor
    pub fn new(telemetry: Arc<Telemetry<P, G>>, device_id: String) -> Self {
        Self { telemetry, device_id }
    }
}

#[async_trait]
impl<P, G> HardwareMonitor for GpuTemperatureMonitor<P, G>
where
    P: PerfCounters + 'static,
    G: GpuTelemetry + 'static,
{
    type MetricType = Temperature;

    async fn name(&self) -> Result<String> {
        Ok("GPU Temperature Monitor".to_string())
    }

    async fn hardware_type(&self) -> Result<String> {
        Ok("GPU".to_string())
    }

    async fn device_id(&self) -> Result<String> {
        Ok(self.device_id.clone())
    }

    async fn get_metric(&self) -> Result<Metric<Self::MetricType>> {
        Ok(read_gpu(&self.telemetry).await?.map(|info| Temperature::new(info.temperature)))
    }
}

#[async_trait]
impl<P, G> TemperatureMonitor for GpuTemperatureMonitor<P, G>
where
    P: PerfCounters + 'static,
    G: GpuTelemetry + 'static,
{
}
