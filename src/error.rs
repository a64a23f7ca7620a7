#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Counter session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("Counter unavailable: {0}")]
    CounterUnavailable(String),

    #[error("Counter collection failed: {0}")]
    Collection(String),

    #[error("Vendor interface error (status {status}): {context}")]
    Vendor { status: i32, context: String },

    #[error("Failed to load native library: {0}")]
    LibraryLoad(String),

    #[error("Feature not available: {0}")]
    NotAvailable(String),

    #[error("Feature not implemented: {0}")]
    NotImplemented(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl Error {
    pub(crate) fn session_unavailable<S: Into<String>>(msg: S) -> Self {
        Error::SessionUnavailable(msg.into())
    }

    pub(crate) fn counter_unavailable<S: Into<String>>(msg: S) -> Self {
        Error::CounterUnavailable(msg.into())
    }

    pub(crate) fn collection<S: Into<String>>(msg: S) -> Self {
        Error::Collection(msg.into())
    }

    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn vendor<S: Into<String>>(status: i32, context: S) -> Self {
        Error::Vendor { status, context: context.into() }
    }

    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn library_load<S: Into<String>>(msg: S) -> Self {
        Error::LibraryLoad(msg.into())
    }

    pub(crate) fn not_available<S: Into<String>>(msg: S) -> Self {
        Error::NotAvailable(msg.into())
    }

    pub(crate) fn not_implemented<S: Into<String>>(msg: S) -> Self {
        Error::NotImplemented(msg.into())
    }

    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn task<S: Into<String>>(msg: S) -> Self {
        Error::Task(msg.into())
    }

    /// Returns true for the CPU session open/register failures, the only errors
    /// `get_cpu_usage` ever raises.
    pub fn is_init_failure(&self) -> bool {
        matches!(self, Error::SessionUnavailable(_) | Error::CounterUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_failure_classification() {
        assert!(Error::session_unavailable("open").is_init_failure());
        assert!(Error::counter_unavailable("add").is_init_failure());
        assert!(!Error::collection("collect").is_init_failure());
        assert!(!Error::not_available("gpu").is_init_failure());
    }

    #[test]
    fn test_vendor_error_display() {
        let err = Error::vendor(-6, "NvAPI_EnumPhysicalGPUs");
        assert_eq!(err.to_string(), "Vendor interface error (status -6): NvAPI_EnumPhysicalGPUs");
    }
}
