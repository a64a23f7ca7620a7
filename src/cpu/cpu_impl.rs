use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, instrument, trace, warn};

use super::constants::{CPU_USAGE_SENTINEL, DEFAULT_COUNTER_PATH, DEFAULT_WARMUP_MS};
use super::session::CounterSession;
use crate::config::CpuConfig;
use crate::core::types::Sample;
use crate::error::Result;
use crate::pdh::PerfCounters;

/// Produces one system-wide CPU usage percentage per call
///
/// The counter is a rate counter: a meaningful value needs two collections separated by a
/// real time delta. The first call that opens the session therefore primes the counter
/// and then **blocks the calling thread** for the warm-up delay before sampling. Later
/// calls never sleep.
///
/// All session access happens under one lock. A caller that arrives while another is
/// warming up waits for the warm-up to finish and then takes its own sample.
#[derive(Debug)]
pub struct CpuUsageSampler<P: PerfCounters> {
    session: Mutex<CounterSession<P>>,
    warmup: Duration,
}

impl<P: PerfCounters> CpuUsageSampler<P> {
    pub fn new(backend: P, config: &CpuConfig) -> Self {
        Self {
            session: Mutex::new(CounterSession::new(backend, config.counter_path.clone())),
            warmup: config.warmup(),
        }
    }

    /// Creates a sampler for the default counter with the default warm-up
    pub fn with_defaults(backend: P) -> Self {
        Self {
            session: Mutex::new(CounterSession::new(backend, DEFAULT_COUNTER_PATH)),
            warmup: Duration::from_millis(DEFAULT_WARMUP_MS),
        }
    }

    pub fn warmup(&self) -> Duration {
        self.warmup
    }

    pub fn is_initialized(&self) -> bool {
        self.session.lock().is_open()
    }

    /// Takes one measurement.
    ///
    /// # Errors
    ///
    /// Only session initialization errors are returned (`SessionUnavailable`,
    /// `CounterUnavailable`); the next call retries. A failed collection yields
    /// `Sample::unavailable(0.0)`. Values are not clamped.
    #[instrument(level = "debug", skip(self))]
    pub fn sample(&self) -> Result<Sample<f64>> {
        let mut session = self.session.lock();

        let opened = session.ensure_open().map_err(|e| {
            warn!(error = %e, "failed to initialize CPU counter session");
            e
        })?;

        if opened {
            if let Err(e) = session.collect() {
                debug!(error = %e, "priming collection failed");
            }
            debug!(warmup_ms = self.warmup.as_millis() as u64, "warming up CPU counter");
            thread::sleep(self.warmup);
        }

        match session.read() {
            Ok(usage) => {
                trace!(usage, "CPU usage sampled");
                Ok(Sample::ok(usage))
            },
            Err(e) => {
                warn!(error = %e, "CPU usage collection failed, reporting {}", CPU_USAGE_SENTINEL);
                Ok(Sample::unavailable(CPU_USAGE_SENTINEL))
            },
        }
    }

    /// Takes one measurement and returns the bare percentage
    pub fn usage(&self) -> Result<f64> {
        self.sample().map(Sample::into_value)
    }
}
