use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use host_telemetry::{pdh::PerfCounters, Error, Result};

/// Call counts observed by a [`FakeCounters`] backend
#[derive(Debug, Default)]
pub struct CounterStats {
    pub opens: AtomicUsize,
    pub adds: AtomicUsize,
    pub collects: AtomicUsize,
    pub closes: AtomicUsize,
}

impl CounterStats {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn collects(&self) -> usize {
        self.collects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// In-memory counter subsystem reporting a fixed value
#[derive(Debug)]
pub struct FakeCounters {
    stats: Arc<CounterStats>,
    value: f64,
    failing_opens: AtomicUsize,
    failing_reads: bool,
}

impl FakeCounters {
    pub fn reporting(value: f64) -> Self {
        Self { stats: Arc::default(), value, failing_opens: AtomicUsize::new(0), failing_reads: false }
    }

    /// Fails the next `count` attempts to open a query
    pub fn with_failing_opens(self, count: usize) -> Self {
        self.failing_opens.store(count, Ordering::SeqCst);
        self
    }

    /// Fails every value read on an open query
    pub fn with_failing_reads(mut self) -> Self {
        self.failing_reads = true;
        self
    }

    pub fn stats(&self) -> Arc<CounterStats> {
        Arc::clone(&self.stats)
    }
}

impl PerfCounters for FakeCounters {
    type Query = u64;
    type Counter = u64;

    fn open_query(&self) -> Result<u64> {
        let pending = self.failing_opens.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_opens.store(pending - 1, Ordering::SeqCst);
            return Err(Error::SessionUnavailable("PdhOpenQueryW returned 0xC0000BB8".to_string()));
        }
        Ok(self.stats.opens.fetch_add(1, Ordering::SeqCst) as u64 + 1)
    }

    fn add_counter(&self, query: &mut u64, _path: &str) -> Result<u64> {
        self.stats.adds.fetch_add(1, Ordering::SeqCst);
        Ok(*query * 100)
    }

    fn collect(&self, _query: &mut u64) -> Result<()> {
        self.stats.collects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn formatted_value(&self, _counter: &u64) -> Result<f64> {
        if self.failing_reads {
            return Err(Error::Collection("PDH_CALC_NEGATIVE_VALUE".to_string()));
        }
        Ok(self.value)
    }

    fn close_query(&self, _query: u64) {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
    }
}
