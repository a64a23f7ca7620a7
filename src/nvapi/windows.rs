use std::ffi::c_void;
use std::mem;
use std::ptr;

use libloading::Library;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use super::GpuTelemetry;
use crate::error::{Error, Result};
use crate::gpu::constants::{library, MAX_GPU_UTILIZATIONS, MAX_PHYSICAL_GPUS, MAX_THERMAL_SENSORS_PER_GPU};
use crate::gpu::types::{GpuDeviceSet, ThermalSample, UtilizationDomain, UtilizationSample};

type NvApiStatus = i32;

const NVAPI_OK: NvApiStatus = 0;
const NVAPI_THERMAL_TARGET_ALL: u32 = 15;

// nvapi_QueryInterface function identifiers
const ID_INITIALIZE: u32 = 0x0150_E828;
const ID_ENUM_PHYSICAL_GPUS: u32 = 0xE5AC_921F;
const ID_GPU_GET_THERMAL_SETTINGS: u32 = 0xE364_0A56;
const ID_GPU_GET_DYNAMIC_PSTATES_INFO_EX: u32 = 0x60DE_D2ED;

type QueryInterfaceFn = unsafe extern "C" fn(u32) -> *const c_void;
type InitializeFn = unsafe extern "C" fn() -> NvApiStatus;
type EnumPhysicalGpusFn = unsafe extern "C" fn(*mut NvPhysicalGpuHandle, *mut u32) -> NvApiStatus;
type GetThermalSettingsFn =
    unsafe extern "C" fn(NvPhysicalGpuHandle, u32, *mut NvGpuThermalSettings) -> NvApiStatus;
type GetDynamicPstatesInfoExFn =
    unsafe extern "C" fn(NvPhysicalGpuHandle, *mut NvGpuDynamicPstatesInfoEx) -> NvApiStatus;

/// NVAPI physical GPU handle
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NvPhysicalGpuHandle(*mut c_void);

impl Default for NvPhysicalGpuHandle {
    fn default() -> Self {
        Self(ptr::null_mut())
    }
}

// Handles are driver-side identifiers, never dereferenced on this side.
unsafe impl Send for NvPhysicalGpuHandle {}
unsafe impl Sync for NvPhysicalGpuHandle {}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct NvThermalSensor {
    controller: i32,
    default_min_temp: i32,
    default_max_temp: i32,
    current_temp: i32,
    target: i32,
}

#[repr(C)]
#[derive(Debug, Default)]
struct NvGpuThermalSettings {
    version: u32,
    count: u32,
    sensor: [NvThermalSensor; MAX_THERMAL_SENSORS_PER_GPU],
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct NvUtilizationDomain {
    // bit 0: bIsPresent
    flags: u32,
    percentage: u32,
}

#[repr(C)]
#[derive(Debug, Default)]
struct NvGpuDynamicPstatesInfoEx {
    version: u32,
    flags: u32,
    utilization: [NvUtilizationDomain; MAX_GPU_UTILIZATIONS],
}

/// MAKE_NVAPI_VERSION: struct size in the low word, revision in the high word
const fn make_version<T>(revision: u32) -> u32 {
    mem::size_of::<T>() as u32 | (revision << 16)
}

const NV_GPU_THERMAL_SETTINGS_VER: u32 = make_version::<NvGpuThermalSettings>(2);
const NV_GPU_DYNAMIC_PSTATES_INFO_EX_VER: u32 = make_version::<NvGpuDynamicPstatesInfoEx>(1);

fn check(status: NvApiStatus, context: &str) -> Result<()> {
    if status == NVAPI_OK {
        Ok(())
    } else {
        Err(Error::vendor(status, context))
    }
}

/// Resolved NVAPI entry points. The library stays loaded as long as the pointers exist.
struct Entrypoints {
    _library: Library,
    initialize: InitializeFn,
    enum_physical_gpus: EnumPhysicalGpusFn,
    get_thermal_settings: GetThermalSettingsFn,
    get_dynamic_pstates_info_ex: GetDynamicPstatesInfoExFn,
}

impl std::fmt::Debug for Entrypoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entrypoints").finish_non_exhaustive()
    }
}

impl Entrypoints {
    fn load(name: &str) -> Result<Self> {
        let library = unsafe { Library::new(name) }.map_err(|e| Error::library_load(format!("{name}: {e}")))?;
        let query_interface: QueryInterfaceFn = unsafe {
            *library
                .get::<QueryInterfaceFn>(b"nvapi_QueryInterface\0")
                .map_err(|e| Error::library_load(format!("{name}: nvapi_QueryInterface: {e}")))?
        };

        let resolve = |id: u32, label: &str| -> Result<*const c_void> {
            let address = unsafe { query_interface(id) };
            if address.is_null() {
                Err(Error::library_load(format!("{name}: {label} is not exported")))
            } else {
                Ok(address)
            }
        };

        unsafe {
            Ok(Self {
                initialize: mem::transmute::<*const c_void, InitializeFn>(resolve(ID_INITIALIZE, "NvAPI_Initialize")?),
                enum_physical_gpus: mem::transmute::<*const c_void, EnumPhysicalGpusFn>(resolve(
                    ID_ENUM_PHYSICAL_GPUS,
                    "NvAPI_EnumPhysicalGPUs",
                )?),
                get_thermal_settings: mem::transmute::<*const c_void, GetThermalSettingsFn>(resolve(
                    ID_GPU_GET_THERMAL_SETTINGS,
                    "NvAPI_GPU_GetThermalSettings",
                )?),
                get_dynamic_pstates_info_ex: mem::transmute::<*const c_void, GetDynamicPstatesInfoExFn>(resolve(
                    ID_GPU_GET_DYNAMIC_PSTATES_INFO_EX,
                    "NvAPI_GPU_GetDynamicPstatesInfoEx",
                )?),
                _library: library,
            })
        }
    }
}

/// NVIDIA NVAPI backend, loaded from the driver's library on first initialization
#[derive(Debug)]
pub struct NvApi {
    library: String,
    entrypoints: OnceCell<Entrypoints>,
}

impl Default for NvApi {
    fn default() -> Self {
        Self::with_library(library::default_name())
    }
}

impl NvApi {
    pub fn with_library(name: impl Into<String>) -> Self {
        Self { library: name.into(), entrypoints: OnceCell::new() }
    }

    fn entrypoints(&self) -> Result<&Entrypoints> {
        self.entrypoints.get().ok_or_else(|| Error::not_available("NVAPI has not been initialized"))
    }
}

impl GpuTelemetry for NvApi {
    type Device = NvPhysicalGpuHandle;

    fn initialize(&self) -> Result<()> {
        let api = self.entrypoints.get_or_try_init(|| {
            debug!(library = %self.library, "loading NVAPI");
            Entrypoints::load(&self.library)
        })?;
        check(unsafe { (api.initialize)() }, "NvAPI_Initialize")
    }

    fn enumerate_physical_gpus(&self) -> Result<GpuDeviceSet<NvPhysicalGpuHandle>> {
        let api = self.entrypoints()?;
        let mut handles = [NvPhysicalGpuHandle::default(); MAX_PHYSICAL_GPUS];
        let mut count: u32 = 0;
        check(unsafe { (api.enum_physical_gpus)(handles.as_mut_ptr(), &mut count) }, "NvAPI_EnumPhysicalGPUs")?;
        trace!(count, "enumerated physical GPUs");
        Ok(GpuDeviceSet::from_buffer(handles, count as usize))
    }

    fn thermal_settings(&self, device: NvPhysicalGpuHandle) -> Result<ThermalSample> {
        let api = self.entrypoints()?;
        let mut settings = NvGpuThermalSettings { version: NV_GPU_THERMAL_SETTINGS_VER, ..Default::default() };
        check(
            unsafe { (api.get_thermal_settings)(device, NVAPI_THERMAL_TARGET_ALL, &mut settings) },
            "NvAPI_GPU_GetThermalSettings",
        )?;

        let count = (settings.count as usize).min(MAX_THERMAL_SENSORS_PER_GPU);
        let mut sample = ThermalSample { count, ..Default::default() };
        for (slot, sensor) in sample.sensors.iter_mut().zip(settings.sensor.iter()) {
            *slot = sensor.current_temp;
        }
        Ok(sample)
    }

    fn dynamic_utilization(&self, device: NvPhysicalGpuHandle) -> Result<UtilizationSample> {
        let api = self.entrypoints()?;
        let mut pstates =
            NvGpuDynamicPstatesInfoEx { version: NV_GPU_DYNAMIC_PSTATES_INFO_EX_VER, ..Default::default() };
        check(
            unsafe { (api.get_dynamic_pstates_info_ex)(device, &mut pstates) },
            "NvAPI_GPU_GetDynamicPstatesInfoEx",
        )?;

        let mut sample = UtilizationSample::default();
        for (slot, raw) in sample.domains.iter_mut().zip(pstates.utilization.iter()) {
            *slot = UtilizationDomain { present: raw.flags & 1 != 0, percentage: raw.percentage as f64 };
        }
        Ok(sample)
    }
}
