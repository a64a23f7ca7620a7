pub mod counters;
pub mod gpu;
