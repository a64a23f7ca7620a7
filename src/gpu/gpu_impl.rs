use parking_lot::Mutex;
use tracing::{debug, instrument, trace, warn};

use super::constants::PRIMARY_DEVICE_INDEX;
use super::session::GpuSession;
use super::types::GpuInfo;
use crate::core::types::Sample;
use crate::nvapi::GpuTelemetry;

/// Produces one `{usage, temperature}` reading per call from the first enumerated GPU
///
/// Never fails: a missing driver, a failed initialization, zero devices or failed sensor
/// queries all degrade to zeroed fields. The returned [`Sample`] status tells the cases
/// apart:
///
/// * `InitFailed` - the vendor interface could not be initialized (retried next call)
/// * `Unavailable` - no device, or neither the thermal nor the utilization query worked
/// * `Ok` - at least one of the two sub-queries succeeded
///
/// Devices are enumerated on every call. Only the first one is queried; other devices are
/// ignored.
#[derive(Debug)]
pub struct GpuMetricsSampler<G: GpuTelemetry> {
    session: Mutex<GpuSession<G>>,
}

impl<G: GpuTelemetry> GpuMetricsSampler<G> {
    pub fn new(backend: G) -> Self {
        Self { session: Mutex::new(GpuSession::new(backend)) }
    }

    pub fn is_initialized(&self) -> bool {
        self.session.lock().is_initialized()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn sample(&self) -> Sample<GpuInfo> {
        let mut session = self.session.lock();

        if let Err(e) = session.ensure_initialized() {
            warn!(error = %e, "GPU vendor interface unavailable");
            return Sample::init_failed(GpuInfo::default());
        }

        let backend = session.backend();
        let devices = match backend.enumerate_physical_gpus() {
            Ok(devices) => devices,
            Err(e) => {
                debug!(error = %e, "GPU enumeration failed");
                return Sample::unavailable(GpuInfo::default());
            },
        };
        let Some(device) = devices.get(PRIMARY_DEVICE_INDEX) else {
            debug!("no physical GPUs enumerated");
            return Sample::unavailable(GpuInfo::default());
        };
        if devices.len() > 1 {
            trace!(count = devices.len(), "querying the first of several GPUs");
        }

        let mut info = GpuInfo::default();
        let mut answered = false;

        match backend.thermal_settings(device) {
            Ok(thermal) => {
                info.temperature = thermal.primary();
                answered = true;
            },
            Err(e) => debug!(error = %e, "GPU thermal query failed"),
        }

        match backend.dynamic_utilization(device) {
            Ok(utilization) => {
                info.usage = utilization.average();
                answered = true;
            },
            Err(e) => debug!(error = %e, "GPU utilization query failed"),
        }

        trace!(usage = info.usage, temperature = info.temperature, "GPU sampled");
        if answered {
            Sample::ok(info)
        } else {
            Sample::unavailable(info)
        }
    }

    /// Takes one measurement and returns the bare reading
    pub fn info(&self) -> GpuInfo {
        self.sample().into_value()
    }
}
