/// System-wide CPU busy counter
pub const DEFAULT_COUNTER_PATH: &str = r"\Processor(_Total)\% Processor Time";

/// Delay between the priming collection and the first real sample, in milliseconds
pub const DEFAULT_WARMUP_MS: u64 = 100;

/// Longest warm-up delay a configuration may request, in milliseconds
pub const MAX_WARMUP_MS: u64 = 10_000;

/// Reported CPU temperature while no real temperature source exists
pub const CPU_TEMPERATURE_SENTINEL: f64 = 0.0;

/// Reported CPU usage when a collection fails
pub const CPU_USAGE_SENTINEL: f64 = 0.0;
