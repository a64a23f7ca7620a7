// Traits module
//
// Monitor traits shared by the CPU and GPU modules. Backend seams (`PerfCounters`,
// `GpuTelemetry`) live next to their native bindings instead.

pub mod hardware;

pub use hardware::{HardwareMonitor, TemperatureMonitor, UtilizationMonitor};
