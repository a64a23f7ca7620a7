use tracing::debug;

use crate::error::Result;
use crate::nvapi::GpuTelemetry;

/// Lifecycle of the vendor GPU telemetry interface
///
/// `initialized` only becomes true after the vendor library reports success. Until then
/// every call to [`ensure_initialized`](Self::ensure_initialized) tries again. There is no
/// teardown: the vendor library stays initialized for the life of the session owner.
#[derive(Debug)]
pub struct GpuSession<G: GpuTelemetry> {
    backend: G,
    initialized: bool,
}

impl<G: GpuTelemetry> GpuSession<G> {
    pub fn new(backend: G) -> Self {
        Self { backend, initialized: false }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn backend(&self) -> &G {
        &self.backend
    }

    /// Initializes the vendor interface unless already done.
    ///
    /// Returns `Ok(true)` when this call performed the initialization.
    pub fn ensure_initialized(&mut self) -> Result<bool> {
        if self.initialized {
            return Ok(false);
        }
        self.backend.initialize()?;
        self.initialized = true;
        debug!("GPU vendor interface initialized");
        Ok(true)
    }
}
