// Core modules
pub mod metrics;
pub mod types;

pub use metrics::Metric;
pub use types::{Percentage, Sample, SampleStatus, Temperature};
