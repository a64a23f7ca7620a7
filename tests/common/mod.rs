#![allow(dead_code)]

pub mod builders;
pub mod mocks;

pub use builders::telemetry::TestTelemetryBuilder;
pub use mocks::counters::FakeCounters;
pub use mocks::gpu::FakeGpu;
