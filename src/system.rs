use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;
use tokio::task;

use crate::config::TelemetryConfig;
use crate::core::metrics::Metric;
use crate::core::types::Sample;
use crate::cpu::{sample_temperature, CpuTemperatureSource, CpuTemperatureStub, CpuUsageSampler};
use crate::error::{Error, Result};
use crate::gpu::{GpuInfo, GpuMetricsSampler};
use crate::nvapi::{self, DefaultGpu, GpuTelemetry};
use crate::pdh::{DefaultCounters, PerfCounters};

static GLOBAL: Lazy<Arc<Telemetry>> = Lazy::new(|| Arc::new(Telemetry::new()));

/// Process-wide telemetry context
///
/// Owns one CPU counter session, one CPU temperature source and one GPU vendor session.
/// Sessions are initialized lazily by the first sampling call and retried after a
/// failure.
///
/// # Lifetime
///
/// The context returned by [`Telemetry::global`] lives until the process exits and its
/// sessions are never torn down. Contexts created with the constructors below close their
/// counter query when dropped.
#[derive(Debug)]
pub struct Telemetry<P: PerfCounters = DefaultCounters, G: GpuTelemetry = DefaultGpu> {
    cpu: CpuUsageSampler<P>,
    cpu_temperature: Box<dyn CpuTemperatureSource>,
    gpu: GpuMetricsSampler<G>,
}

impl Telemetry {
    /// Creates a context with the platform backends and default configuration
    pub fn new() -> Self {
        let config = TelemetryConfig::default();
        Self::with_backends(DefaultCounters::default(), nvapi::default_gpu(None), &config)
    }

    /// Creates a context with the platform backends and a validated configuration
    pub fn with_config(config: &TelemetryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_backends(
            DefaultCounters::default(),
            nvapi::default_gpu(config.gpu.library.as_deref()),
            config,
        ))
    }

    /// The process-wide context used by the crate's free functions
    pub fn global() -> Arc<Telemetry> {
        Arc::clone(&GLOBAL)
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PerfCounters, G: GpuTelemetry> Telemetry<P, G> {
    /// Creates a context over explicit backends. `config.gpu` is ignored here; the GPU
    /// backend is already built.
    pub fn with_backends(counters: P, gpu: G, config: &TelemetryConfig) -> Self {
        Self {
            cpu: CpuUsageSampler::new(counters, &config.cpu),
            cpu_temperature: Box::new(CpuTemperatureStub),
            gpu: GpuMetricsSampler::new(gpu),
        }
    }

    /// Replaces the CPU temperature stub with a real source
    pub fn with_temperature_source(mut self, source: Box<dyn CpuTemperatureSource>) -> Self {
        self.cpu_temperature = source;
        self
    }

    pub fn cpu(&self) -> &CpuUsageSampler<P> {
        &self.cpu
    }

    pub fn gpu(&self) -> &GpuMetricsSampler<G> {
        &self.gpu
    }

    /// CPU usage percentage. Blocks for the warm-up delay on the first successful call.
    pub fn cpu_usage(&self) -> Result<f64> {
        self.cpu.usage()
    }

    /// CPU usage tagged with its status. Initialization failures become `InitFailed`.
    pub fn sample_cpu_usage(&self) -> Sample<f64> {
        self.cpu.sample().unwrap_or_else(|_| Sample::init_failed(0.0))
    }

    pub fn cpu_temperature(&self) -> f64 {
        self.sample_cpu_temperature().into_value()
    }

    pub fn sample_cpu_temperature(&self) -> Sample<f64> {
        sample_temperature(self.cpu_temperature.as_ref())
    }

    pub fn gpu_info(&self) -> GpuInfo {
        self.gpu.info()
    }

    pub fn sample_gpu_info(&self) -> Sample<GpuInfo> {
        self.gpu.sample()
    }
}

impl<P, G> Telemetry<P, G>
where
    P: PerfCounters + 'static,
    G: GpuTelemetry + 'static,
{
    /// Gathers all readings without blocking the async executor.
    ///
    /// CPU and GPU sampling run concurrently on the blocking pool.
    pub async fn snapshot(self: Arc<Self>) -> Result<Metric<TelemetrySnapshot>> {
        let cpu = {
            let telemetry = Arc::clone(&self);
            run_blocking(move || telemetry.sample_cpu_usage())
        };
        let gpu = {
            let telemetry = Arc::clone(&self);
            run_blocking(move || telemetry.sample_gpu_info())
        };
        let (cpu_usage, gpu) = futures::join!(cpu, gpu);

        Ok(Metric::new(TelemetrySnapshot {
            cpu_usage: cpu_usage?,
            cpu_temperature: self.sample_cpu_temperature(),
            gpu: gpu?,
        }))
    }
}

/// One reading of every metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub cpu_usage: Sample<f64>,
    pub cpu_temperature: Sample<f64>,
    pub gpu: Sample<GpuInfo>,
}

/// Runs a blocking sampler call on tokio's blocking pool
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    task::spawn_blocking(f).await.map_err(|e| Error::task(e.to_string()))
}
