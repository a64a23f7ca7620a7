use std::ffi::OsStr;
use std::iter::once;
use std::mem;
use std::os::windows::ffi::OsStrExt;
use std::ptr;

use tracing::trace;
use winapi::shared::winerror::ERROR_SUCCESS;
use winapi::um::pdh::{
    PdhAddCounterW, PdhCloseQuery, PdhCollectQueryData, PdhGetFormattedCounterValue, PdhOpenQueryW,
    PDH_FMT_COUNTERVALUE, PDH_FMT_DOUBLE, PDH_HCOUNTER, PDH_HQUERY, PDH_STATUS,
};

use super::PerfCounters;
use crate::error::{Error, Result};

/// Open PDH query handle
#[derive(Debug)]
pub struct PdhQuery(PDH_HQUERY);

/// PDH counter handle, valid while its query is open
#[derive(Debug)]
pub struct PdhCounter(PDH_HCOUNTER);

// PDH handles are plain identifiers; the session mutex provides exclusive access.
unsafe impl Send for PdhQuery {}
unsafe impl Send for PdhCounter {}

/// Windows Performance Data Helper backend
#[derive(Debug, Default, Clone, Copy)]
pub struct PdhCounters;

fn check(status: PDH_STATUS) -> std::result::Result<(), PDH_STATUS> {
    if status as u32 == ERROR_SUCCESS {
        Ok(())
    } else {
        Err(status)
    }
}

fn to_wide(value: &str) -> Vec<u16> {
    OsStr::new(value).encode_wide().chain(once(0)).collect()
}

impl PerfCounters for PdhCounters {
    type Query = PdhQuery;
    type Counter = PdhCounter;

    fn open_query(&self) -> Result<PdhQuery> {
        let mut handle: PDH_HQUERY = ptr::null_mut();
        let status = unsafe { PdhOpenQueryW(ptr::null(), 0, &mut handle) };
        check(status)
            .map_err(|s| Error::session_unavailable(format!("PdhOpenQueryW failed with status {:#010x}", s)))?;
        Ok(PdhQuery(handle))
    }

    fn add_counter(&self, query: &mut PdhQuery, path: &str) -> Result<PdhCounter> {
        let wide = to_wide(path);
        let mut counter: PDH_HCOUNTER = ptr::null_mut();
        let status = unsafe { PdhAddCounterW(query.0, wide.as_ptr(), 0, &mut counter) };
        check(status).map_err(|s| {
            Error::counter_unavailable(format!("PdhAddCounterW({path}) failed with status {:#010x}", s))
        })?;
        Ok(PdhCounter(counter))
    }

    fn collect(&self, query: &mut PdhQuery) -> Result<()> {
        let status = unsafe { PdhCollectQueryData(query.0) };
        check(status).map_err(|s| Error::collection(format!("PdhCollectQueryData failed with status {:#010x}", s)))
    }

    fn formatted_value(&self, counter: &PdhCounter) -> Result<f64> {
        let mut value: PDH_FMT_COUNTERVALUE = unsafe { mem::zeroed() };
        let status = unsafe { PdhGetFormattedCounterValue(counter.0, PDH_FMT_DOUBLE, ptr::null_mut(), &mut value) };
        check(status).map_err(|s| {
            Error::collection(format!("PdhGetFormattedCounterValue failed with status {:#010x}", s))
        })?;
        let double = unsafe { *value.u.doubleValue() };
        trace!(value = double, "formatted counter value");
        Ok(double)
    }

    fn close_query(&self, query: PdhQuery) {
        let status = unsafe { PdhCloseQuery(query.0) };
        if let Err(s) = check(status) {
            trace!(status = s, "PdhCloseQuery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_string_is_nul_terminated() {
        let wide = to_wide("ab");
        assert_eq!(wide, vec![b'a' as u16, b'b' as u16, 0]);
    }

    #[test]
    fn test_processor_time_counter() {
        // Talks to the real PDH service; tolerate hosts where it is disabled.
        let backend = PdhCounters;
        let Ok(mut query) = backend.open_query() else {
            return;
        };
        if let Ok(counter) = backend.add_counter(&mut query, r"\Processor(_Total)\% Processor Time") {
            assert!(backend.collect(&mut query).is_ok());
            std::thread::sleep(std::time::Duration::from_millis(100));
            assert!(backend.collect(&mut query).is_ok());
            let value = backend.formatted_value(&counter).unwrap();
            assert!(value.is_finite());
        }
        backend.close_query(query);
    }
}
