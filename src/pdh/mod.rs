//! Host performance-counter subsystem
//!
//! The CPU sampler reaches the operating system's counter subsystem only through the
//! [`PerfCounters`] trait. On Windows the production implementation is [`PdhCounters`],
//! a thin wrapper over the Performance Data Helper API. Every other platform gets
//! [`UnsupportedCounters`], which refuses to open a query.
//!
//! # Safety
//!
//! Query and counter handles are opaque pointers owned by PDH. The wrappers in this module
//! never dereference them; they are only passed back into the API that produced them.
//!
//! # Thread Safety
//!
//! Handles are `Send` so the owning session can live inside a mutex, but a single query
//! must not be collected from two threads at once. `CounterSession` serializes all access.

#[cfg(any(test, feature = "mock"))]
use mockall::automock;

use crate::error::{Error, Result};

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use self::windows::{PdhCounter, PdhCounters, PdhQuery};

/// Access to a differential performance-counter subsystem.
///
/// `Query` and `Counter` are the subsystem's opaque handles. A counter is only valid while
/// the query it was added to is open.
#[cfg_attr(any(test, feature = "mock"), automock(type Query = u32; type Counter = u32;))]
pub trait PerfCounters: Send + Sync + std::fmt::Debug {
    type Query: Send;
    type Counter: Send;

    /// Opens a new counter query against the local machine
    fn open_query(&self) -> Result<Self::Query>;

    /// Registers a counter path on an open query
    fn add_counter(&self, query: &mut Self::Query, path: &str) -> Result<Self::Counter>;

    /// Collects one raw sample for every counter on the query
    fn collect(&self, query: &mut Self::Query) -> Result<()>;

    /// Formats the counter's latest value as a double
    fn formatted_value(&self, counter: &Self::Counter) -> Result<f64>;

    /// Closes a query, invalidating its counters
    fn close_query(&self, query: Self::Query);
}

/// Counter backend for platforms without a supported counter subsystem
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedCounters;

impl PerfCounters for UnsupportedCounters {
    type Query = ();
    type Counter = ();

    fn open_query(&self) -> Result<()> {
        Err(Error::session_unavailable("performance counters are not supported on this platform"))
    }

    fn add_counter(&self, _query: &mut (), path: &str) -> Result<()> {
        Err(Error::counter_unavailable(format!("cannot add {path}: performance counters are not supported")))
    }

    fn collect(&self, _query: &mut ()) -> Result<()> {
        Err(Error::not_available("performance counters"))
    }

    fn formatted_value(&self, _counter: &()) -> Result<f64> {
        Err(Error::not_available("performance counters"))
    }

    fn close_query(&self, _query: ()) {}
}

/// The counter backend used by the global context on this platform
#[cfg(windows)]
pub type DefaultCounters = PdhCounters;

/// The counter backend used by the global context on this platform
#[cfg(not(windows))]
pub type DefaultCounters = UnsupportedCounters;
