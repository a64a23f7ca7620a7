use serde::{Deserialize, Serialize};

use super::constants::{MAX_GPU_UTILIZATIONS, MAX_PHYSICAL_GPUS, MAX_THERMAL_SENSORS_PER_GPU, PRIMARY_SENSOR_INDEX};

/// Result of a GPU query: the only value that crosses the boundary for GPU calls
///
/// Serializes as `{"usage": .., "temperature": ..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    /// Mean busy percentage across the present utilization domains
    pub usage: f64,
    /// Current temperature of the first thermal sensor, in Celsius
    pub temperature: f64,
}

impl GpuInfo {
    pub fn new(usage: f64, temperature: f64) -> Self {
        Self { usage, temperature }
    }
}

/// Enumerated device handles, bounded by the vendor interface's device capacity
///
/// Never cached between queries: devices can appear or disappear between calls.
#[derive(Debug, Clone, Copy)]
pub struct GpuDeviceSet<D> {
    handles: [D; MAX_PHYSICAL_GPUS],
    count: usize,
}

impl<D: Copy + Default> GpuDeviceSet<D> {
    pub fn empty() -> Self {
        Self { handles: [D::default(); MAX_PHYSICAL_GPUS], count: 0 }
    }

    /// Wraps a filled enumeration buffer. Counts beyond the capacity are truncated.
    pub fn from_buffer(handles: [D; MAX_PHYSICAL_GPUS], count: usize) -> Self {
        Self { handles, count: count.min(MAX_PHYSICAL_GPUS) }
    }

    /// Copies up to `MAX_PHYSICAL_GPUS` handles from a slice
    pub fn from_slice(devices: &[D]) -> Self {
        let mut set = Self::empty();
        let count = devices.len().min(MAX_PHYSICAL_GPUS);
        set.handles[..count].copy_from_slice(&devices[..count]);
        set.count = count;
        set
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: usize) -> Option<D> {
        self.as_slice().get(index).copied()
    }

    pub fn as_slice(&self) -> &[D] {
        &self.handles[..self.count]
    }

    pub fn iter(&self) -> impl Iterator<Item = &D> {
        self.as_slice().iter()
    }
}

impl<D: Copy + Default> Default for GpuDeviceSet<D> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Busy percentage of one hardware pipeline domain
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UtilizationDomain {
    pub present: bool,
    pub percentage: f64,
}

impl UtilizationDomain {
    pub fn present(percentage: f64) -> Self {
        Self { present: true, percentage }
    }

    pub fn absent() -> Self {
        Self::default()
    }
}

/// Per-device utilization, one slot per domain
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UtilizationSample {
    pub domains: [UtilizationDomain; MAX_GPU_UTILIZATIONS],
}

impl UtilizationSample {
    /// Builds a sample from the leading domains; remaining slots are absent
    pub fn from_domains(domains: &[UtilizationDomain]) -> Self {
        let mut sample = Self::default();
        for (slot, domain) in sample.domains.iter_mut().zip(domains) {
            *slot = *domain;
        }
        sample
    }

    pub fn present_count(&self) -> usize {
        self.domains.iter().filter(|d| d.present).count()
    }

    /// Unweighted mean over the domains flagged present, or 0.0 when none are
    pub fn average(&self) -> f64 {
        let (total, count) = self
            .domains
            .iter()
            .filter(|d| d.present)
            .fold((0.0, 0usize), |(total, count), d| (total + d.percentage, count + 1));

        if count > 0 {
            total / count as f64
        } else {
            0.0
        }
    }
}

/// Per-device thermal sensor readings in Celsius
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThermalSample {
    pub sensors: [i32; MAX_THERMAL_SENSORS_PER_GPU],
    pub count: usize,
}

impl ThermalSample {
    pub fn from_sensors(readings: &[i32]) -> Self {
        let mut sample = Self::default();
        let count = readings.len().min(MAX_THERMAL_SENSORS_PER_GPU);
        sample.sensors[..count].copy_from_slice(&readings[..count]);
        sample.count = count;
        sample
    }

    /// Current temperature of sensor 0, the only sensor reported
    pub fn primary(&self) -> f64 {
        self.sensors[PRIMARY_SENSOR_INDEX] as f64
    }
}
