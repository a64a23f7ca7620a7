//! Sampler configuration
//!
//! Hosts that build their own [`Telemetry`](crate::Telemetry) context can tune the counter
//! path, the warm-up delay and the vendor library name. The global context always uses
//! [`TelemetryConfig::default`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cpu::constants::{DEFAULT_COUNTER_PATH, DEFAULT_WARMUP_MS, MAX_WARMUP_MS};
use crate::error::{Error, Result};

/// Configuration for the CPU counter sampler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    /// Full path of the system-wide CPU busy counter
    pub counter_path: String,
    /// Delay between the priming collection and the first real sample, in milliseconds
    pub warmup_ms: u64,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self { counter_path: DEFAULT_COUNTER_PATH.to_string(), warmup_ms: DEFAULT_WARMUP_MS }
    }
}

impl CpuConfig {
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }
}

/// Configuration for the GPU vendor interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuConfig {
    /// Overrides the vendor library file name (`nvapi64.dll` / `nvapi.dll` by default)
    pub library: Option<String>,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub cpu: CpuConfig,
    pub gpu: GpuConfig,
}

impl TelemetryConfig {
    /// Parses a JSON document supplied by the host application and validates it.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cpu.counter_path.trim().is_empty() {
            return Err(Error::config("cpu.counter_path must not be empty"));
        }
        if self.cpu.warmup_ms > MAX_WARMUP_MS {
            return Err(Error::config(format!(
                "cpu.warmup_ms must be at most {} (got {})",
                MAX_WARMUP_MS, self.cpu.warmup_ms
            )));
        }
        if let Some(library) = &self.gpu.library {
            if library.trim().is_empty() {
                return Err(Error::config("gpu.library must not be empty when set"));
            }
        }
        Ok(())
    }
}
