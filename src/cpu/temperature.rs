use super::constants::CPU_TEMPERATURE_SENTINEL;
use crate::core::types::Sample;
use crate::error::{Error, Result};

/// A source of CPU package temperature readings in Celsius
pub trait CpuTemperatureSource: Send + Sync + std::fmt::Debug {
    fn temperature(&self) -> Result<f64>;
}

/// Placeholder for the missing CPU temperature capability.
///
/// Always reports "not implemented"; callers see the 0.0 sentinel. Replace it with a real
/// [`CpuTemperatureSource`] through `Telemetry::with_temperature_source`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuTemperatureStub;

impl CpuTemperatureSource for CpuTemperatureStub {
    fn temperature(&self) -> Result<f64> {
        Err(Error::not_implemented("CPU temperature acquisition"))
    }
}

/// Reads a source, mapping any failure to the 0.0 sentinel
pub fn sample_temperature(source: &dyn CpuTemperatureSource) -> Sample<f64> {
    match source.temperature() {
        Ok(celsius) => Sample::ok(celsius),
        Err(_) => Sample::unavailable(CPU_TEMPERATURE_SENTINEL),
    }
}
