//! Unit tests for error handling and recovery

use crate::common::test_utils::{create_default_sampler, run_ticks, ONE_G_RAW};
use crate::common::{MockBus, MockError};
use mpu6050_attitude::{AttitudeSensor, EmptyHistory, Error, Mpu6050Driver};

#[test]
fn test_wake_failure_aborts_startup() {
    let bus = MockBus::new();
    bus.fail_next_write();

    let result = Mpu6050Driver::new(bus.clone());
    assert!(matches!(
        result,
        Err(Error::DeviceInit(MockError::Communication))
    ));
    assert!(bus.writes().is_empty(), "No write after the failed wake-up");
}

#[test]
fn test_sensor_startup_failure_propagates() {
    let bus = MockBus::new();
    bus.fail_next_write();

    let result = AttitudeSensor::new(bus.clone());
    assert!(
        matches!(result, Err(Error::DeviceInit(MockError::Communication))),
        "Start-up write failure must be fatal"
    );
    assert_eq!(bus.read_count(), 0, "No sampling after failed start-up");
}

#[test]
fn test_persistent_read_failure_is_not_fatal() {
    let (mut sampler, bus) = create_default_sampler();
    bus.set_accel_data(0, 0, ONE_G_RAW);
    run_ticks(&mut sampler, 5);

    bus.fail_all_reads(true);
    run_ticks(&mut sampler, 10);

    let stats = sampler.snapshot().stats();
    assert_eq!(stats.ticks, 15, "Filter keeps running on stale readings");
    assert_eq!(stats.gyro_read_failures, 10);
    assert_eq!(stats.accel_read_failures, 10);

    bus.fail_all_reads(false);
    sampler.fast_tick();
    assert_eq!(sampler.snapshot().stats().gyro_read_failures, 10);
}

#[test]
fn test_empty_history_converts_to_crate_error() {
    let error: Error<MockError> = EmptyHistory.into();
    assert_eq!(error, Error::EmptyHistory);
}

#[test]
fn test_error_display() {
    let cases: [(Error<MockError>, &str); 4] = [
        (
            Error::BusRead(MockError::Communication),
            "bus read failed: Communication",
        ),
        (
            Error::DeviceInit(MockError::Communication),
            "device initialization failed: Communication",
        ),
        (Error::EmptyHistory, "calibration error: empty history"),
        (Error::InvalidConfig, "invalid configuration"),
    ];
    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_error_is_std_error() {
    fn assert_std_error<E: std::error::Error>(_: &E) {}
    assert_std_error(&Error::<MockError>::WorkerSpawn);
}
