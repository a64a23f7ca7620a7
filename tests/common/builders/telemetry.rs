use std::sync::Arc;

use host_telemetry::{gpu::UtilizationDomain, Telemetry, TelemetryConfig};

use crate::common::mocks::{counters::FakeCounters, gpu::FakeGpu};

/// Builds a [`Telemetry`] context over fake backends
#[derive(Debug)]
pub struct TestTelemetryBuilder {
    counters: FakeCounters,
    gpu: FakeGpu,
    config: TelemetryConfig,
}

impl Default for TestTelemetryBuilder {
    fn default() -> Self {
        let mut config = TelemetryConfig::default();
        config.cpu.warmup_ms = 0;
        Self {
            counters: FakeCounters::reporting(25.0),
            gpu: FakeGpu::single(60, &[UtilizationDomain::present(40.0)]),
            config,
        }
    }
}

impl TestTelemetryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(mut self, counters: FakeCounters) -> Self {
        self.counters = counters;
        self
    }

    pub fn gpu(mut self, gpu: FakeGpu) -> Self {
        self.gpu = gpu;
        self
    }

    pub fn warmup_ms(mut self, warmup_ms: u64) -> Self {
        self.config.cpu.warmup_ms = warmup_ms;
        self
    }

    pub fn build(self) -> Arc<Telemetry<FakeCounters, FakeGpu>> {
        Arc::new(Telemetry::with_backends(self.counters, self.gpu, &self.config))
    }
}
