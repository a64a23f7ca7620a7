/// Maximum number of physical GPUs the vendor interface enumerates
pub const MAX_PHYSICAL_GPUS: usize = 64;

/// Number of utilization domains reported per device
pub const MAX_GPU_UTILIZATIONS: usize = 8;

/// Number of thermal sensor slots reported per device
pub const MAX_THERMAL_SENSORS_PER_GPU: usize = 3;

/// Index of the only device that is ever queried
pub const PRIMARY_DEVICE_INDEX: usize = 0;

/// Index of the only thermal sensor that is ever reported
pub const PRIMARY_SENSOR_INDEX: usize = 0;

/// Vendor library names
pub mod library {
    /// 64-bit NVAPI library
    pub const NVAPI_64: &str = "nvapi64.dll";
    /// 32-bit NVAPI library
    pub const NVAPI_32: &str = "nvapi.dll";

    /// Library name matching the current target's pointer width
    pub const fn default_name() -> &'static str {
        if cfg!(target_pointer_width = "64") {
            NVAPI_64
        } else {
            NVAPI_32
        }
    }
}
