use std::fmt;

use scopeguard::ScopeGuard;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pdh::PerfCounters;

/// Query and counter handles of an open session. The counter is only valid while the
/// query is open, so both live and die together.
struct OpenCounter<P: PerfCounters> {
    query: P::Query,
    counter: P::Counter,
}

/// Lifecycle of the OS-level CPU utilization counter query
///
/// The session is opened lazily by [`ensure_open`](Self::ensure_open). A failure at either
/// step leaves it closed so the next call starts over. Dropping the session closes the
/// query; the global context's session is never dropped.
pub struct CounterSession<P: PerfCounters> {
    backend: P,
    counter_path: String,
    open: Option<OpenCounter<P>>,
}

impl<P: PerfCounters> CounterSession<P> {
    pub fn new(backend: P, counter_path: impl Into<String>) -> Self {
        Self { backend, counter_path: counter_path.into(), open: None }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn counter_path(&self) -> &str {
        &self.counter_path
    }

    pub fn backend(&self) -> &P {
        &self.backend
    }

    /// Opens the query and registers the counter unless already open.
    ///
    /// Returns `Ok(true)` when this call performed the initialization.
    ///
    /// # Errors
    ///
    /// * [`Error::SessionUnavailable`] if the query cannot be opened
    /// * [`Error::CounterUnavailable`] if the counter cannot be registered; the query that
    ///   was just opened is closed again
    pub fn ensure_open(&mut self) -> Result<bool> {
        if self.open.is_some() {
            return Ok(false);
        }

        let backend = &self.backend;
        let query = backend.open_query().map_err(|e| match e {
            Error::SessionUnavailable(_) => e,
            other => Error::session_unavailable(other.to_string()),
        })?;

        let mut query = scopeguard::guard(query, |q| backend.close_query(q));
        let counter = backend.add_counter(&mut *query, &self.counter_path).map_err(|e| match e {
            Error::CounterUnavailable(_) => e,
            other => Error::counter_unavailable(other.to_string()),
        })?;
        let query = ScopeGuard::into_inner(query);

        debug!(counter = %self.counter_path, "counter session opened");
        self.open = Some(OpenCounter { query, counter });
        Ok(true)
    }

    /// Collects one raw sample without reading it
    pub fn collect(&mut self) -> Result<()> {
        let open = self.open.as_mut().ok_or_else(|| Error::collection("counter session is not open"))?;
        self.backend.collect(&mut open.query)
    }

    /// Collects a fresh sample and formats the counter as a double
    pub fn read(&mut self) -> Result<f64> {
        let open = self.open.as_mut().ok_or_else(|| Error::collection("counter session is not open"))?;
        self.backend.collect(&mut open.query)?;
        self.backend.formatted_value(&open.counter)
    }

    /// Closes the query if open. The next `ensure_open` starts from scratch.
    pub fn close(&mut self) {
        if let Some(open) = self.open.take() {
            debug!(counter = %self.counter_path, "closing counter session");
            self.backend.close_query(open.query);
        }
    }
}

impl<P: PerfCounters> Drop for CounterSession<P> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<P: PerfCounters> fmt::Debug for CounterSession<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterSession")
            .field("backend", &self.backend)
            .field("counter_path", &self.counter_path)
            .field("opened", &self.is_open())
            .finish()
    }
}
