use std::time::{Duration, Instant};

use crate::config::CpuConfig;
use crate::core::types::SampleStatus;
use crate::cpu::{sample_temperature, CounterSession, CpuTemperatureSource, CpuTemperatureStub, CpuUsageSampler};
use crate::error::Error;
use crate::pdh::MockPerfCounters;

const COUNTER: &str = r"\Processor(_Total)\% Processor Time";

fn config(warmup_ms: u64) -> CpuConfig {
    CpuConfig { warmup_ms, ..CpuConfig::default() }
}

/// A mock whose session opens cleanly and reports `value` on every read
fn healthy_backend(value: f64) -> MockPerfCounters {
    let mut mock = MockPerfCounters::new();
    mock.expect_open_query().times(1).returning(|| Ok(1));
    mock.expect_add_counter().withf(|query, path| *query == 1 && path == COUNTER).times(1).returning(|_, _| Ok(2));
    mock.expect_collect().returning(|_| Ok(()));
    mock.expect_formatted_value().returning(move |_| Ok(value));
    mock.expect_close_query().times(1).returning(|_| ());
    mock
}

#[test]
fn test_first_sample_warms_up() {
    let sampler = CpuUsageSampler::new(healthy_backend(37.5), &config(100));

    let start = Instant::now();
    let first = sampler.sample().expect("first sample");
    let first_elapsed = start.elapsed();

    let start = Instant::now();
    let second = sampler.sample().expect("second sample");
    let second_elapsed = start.elapsed();

    assert_eq!(first.value, 37.5);
    assert_eq!(first.status, SampleStatus::Ok);
    assert_eq!(second.value, 37.5);
    assert!(first_elapsed >= Duration::from_millis(100), "warm-up took {:?}", first_elapsed);
    assert!(second_elapsed < Duration::from_millis(100), "second call took {:?}", second_elapsed);
}

#[test]
fn test_priming_collection_precedes_first_read() {
    let mut mock = MockPerfCounters::new();
    mock.expect_open_query().returning(|| Ok(1));
    mock.expect_add_counter().returning(|_, _| Ok(2));
    // One priming collection plus one collection per read
    mock.expect_collect().times(3).returning(|_| Ok(()));
    mock.expect_formatted_value().times(2).returning(|_| Ok(10.0));
    mock.expect_close_query().returning(|_| ());

    let sampler = CpuUsageSampler::new(mock, &config(0));
    sampler.usage().unwrap();
    sampler.usage().unwrap();
}

#[test]
fn test_open_failure_is_raised_and_retried() {
    let mut mock = MockPerfCounters::new();
    let mut attempts = 0;
    mock.expect_open_query().times(2).returning(move || {
        attempts += 1;
        if attempts == 1 {
            Err(Error::session_unavailable("PdhOpenQueryW failed"))
        } else {
            Ok(1)
        }
    });
    mock.expect_add_counter().times(1).returning(|_, _| Ok(2));
    mock.expect_collect().returning(|_| Ok(()));
    mock.expect_formatted_value().returning(|_| Ok(55.0));
    mock.expect_close_query().times(1).returning(|_| ());

    let sampler = CpuUsageSampler::new(mock, &config(0));

    let err = sampler.usage().unwrap_err();
    assert!(matches!(err, Error::SessionUnavailable(_)));
    assert!(!sampler.is_initialized());

    assert_eq!(sampler.usage().unwrap(), 55.0);
    assert!(sampler.is_initialized());
}

#[test]
fn test_open_errors_are_normalized() {
    let mut mock = MockPerfCounters::new();
    mock.expect_open_query().returning(|| Err(Error::collection("service stopped")));

    let sampler = CpuUsageSampler::new(mock, &config(0));
    let err = sampler.usage().unwrap_err();
    assert!(matches!(err, Error::SessionUnavailable(_)));
    assert!(err.to_string().contains("service stopped"));
}

#[test]
fn test_counter_failure_closes_query_and_retries_from_scratch() {
    let mut mock = MockPerfCounters::new();
    mock.expect_open_query().times(2).returning(|| Ok(1));
    let mut attempts = 0;
    mock.expect_add_counter().times(2).returning(move |_, _| {
        attempts += 1;
        if attempts == 1 {
            Err(Error::counter_unavailable("PDH_CSTATUS_NO_COUNTER"))
        } else {
            Ok(2)
        }
    });
    // Once for the failed registration, once when the sampler is dropped
    mock.expect_close_query().times(2).returning(|_| ());
    mock.expect_collect().returning(|_| Ok(()));
    mock.expect_formatted_value().returning(|_| Ok(12.0));

    let sampler = CpuUsageSampler::new(mock, &config(0));

    let err = sampler.sample().unwrap_err();
    assert!(matches!(err, Error::CounterUnavailable(_)));
    assert!(err.is_init_failure());
    assert!(!sampler.is_initialized());

    assert_eq!(sampler.usage().unwrap(), 12.0);
}

#[test]
fn test_collection_failure_reports_zero() {
    let mut mock = MockPerfCounters::new();
    mock.expect_open_query().returning(|| Ok(1));
    mock.expect_add_counter().returning(|_, _| Ok(2));
    mock.expect_collect().returning(|_| Ok(()));
    mock.expect_formatted_value().returning(|_| Err(Error::collection("PDH_INVALID_DATA")));
    mock.expect_close_query().returning(|_| ());

    let sampler = CpuUsageSampler::new(mock, &config(0));
    let sample = sampler.sample().expect("collection failures are not raised");

    assert_eq!(sample.value, 0.0);
    assert_eq!(sample.status, SampleStatus::Unavailable);
    assert!(sampler.is_initialized());
}

#[test]
fn test_failed_read_collection_reports_zero_and_keeps_session() {
    let mut mock = MockPerfCounters::new();
    mock.expect_open_query().times(1).returning(|| Ok(1));
    mock.expect_add_counter().times(1).returning(|_, _| Ok(2));
    let mut collections = 0;
    mock.expect_collect().times(3).returning(move |_| {
        collections += 1;
        match collections {
            // Priming collection succeeds, the first real read fails
            1 => Ok(()),
            2 => Err(Error::collection("PdhCollectQueryData failed with status 0x800007d5")),
            _ => Ok(()),
        }
    });
    mock.expect_formatted_value().times(1).returning(|_| Ok(18.0));
    mock.expect_close_query().times(1).returning(|_| ());

    let sampler = CpuUsageSampler::new(mock, &config(0));

    let sample = sampler.sample().expect("collection failures are not raised");
    assert_eq!(sample.value, 0.0);
    assert_eq!(sample.status, SampleStatus::Unavailable);
    assert!(sampler.is_initialized());

    assert_eq!(sampler.usage().unwrap(), 18.0);
}

#[test]
fn test_values_are_not_clamped() {
    let sampler = CpuUsageSampler::new(healthy_backend(104.2), &config(0));
    assert_eq!(sampler.usage().unwrap(), 104.2);
}

#[test]
fn test_concurrent_first_calls_open_once() {
    let sampler = CpuUsageSampler::new(healthy_backend(20.0), &config(20));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| sampler.usage())).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 20.0);
        }
    });
}

#[test]
fn test_session_closes_on_drop() {
    let mut mock = MockPerfCounters::new();
    mock.expect_open_query().returning(|| Ok(1));
    mock.expect_add_counter().returning(|_, _| Ok(2));
    mock.expect_close_query().withf(|query| *query == 1).times(1).returning(|_| ());

    let mut session = CounterSession::new(mock, COUNTER);
    assert!(session.ensure_open().unwrap());
    assert!(!session.ensure_open().unwrap());
    assert!(session.is_open());
    drop(session);
}

#[test]
fn test_read_requires_open_session() {
    let mock = MockPerfCounters::new();
    let mut session = CounterSession::new(mock, COUNTER);
    assert!(matches!(session.read(), Err(Error::Collection(_))));
    assert!(session.collect().is_err());
}

#[test]
fn test_temperature_stub() {
    let stub = CpuTemperatureStub;
    assert!(matches!(stub.temperature(), Err(Error::NotImplemented(_))));

    let sample = sample_temperature(&stub);
    assert_eq!(sample.value, 0.0);
    assert_eq!(sample.status, SampleStatus::Unavailable);
}

#[derive(Debug)]
struct FixedTemperature(f64);

impl CpuTemperatureSource for FixedTemperature {
    fn temperature(&self) -> crate::Result<f64> {
        Ok(self.0)
    }
}

#[test]
fn test_temperature_source_is_replaceable() {
    let sample = sample_temperature(&FixedTemperature(48.0));
    assert_eq!(sample.value, 48.0);
    assert!(sample.is_ok());
}
