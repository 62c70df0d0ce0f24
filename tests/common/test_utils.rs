//! Test utilities and helper functions

use crate::common::mock_interface::MockBus;
use mpu6050_attitude::{
    CalibrationConfig, FilterConfig, Mpu6050Driver, Sampler, SensorState,
};

/// Raw accelerometer value for 1 g at ±2 g full scale
pub const ONE_G_RAW: i16 = 16384;

/// Create a mock driver for testing
/// Returns (driver, bus) where bus is a clone that shares state with the driver
pub fn create_mock_driver() -> (Mpu6050Driver<MockBus>, MockBus) {
    let bus = MockBus::new();
    let bus_clone = bus.clone();
    let driver = Mpu6050Driver::new(bus).expect("Failed to create mock driver");
    (driver, bus_clone)
}

/// Create a sampler over a mock bus that can be ticked by hand
pub fn create_mock_sampler(
    filter: FilterConfig,
    calibration: CalibrationConfig,
) -> (Sampler<MockBus>, MockBus) {
    let (driver, bus) = create_mock_driver();
    let sampler = Sampler::new(driver, SensorState::new(filter, calibration));
    (sampler, bus)
}

/// Sampler with default filter and calibration settings
#[allow(dead_code)]
pub fn create_default_sampler() -> (Sampler<MockBus>, MockBus) {
    create_mock_sampler(FilterConfig::default(), CalibrationConfig::default())
}

/// Run `count` fast ticks
#[allow(dead_code)]
pub fn run_ticks(sampler: &mut Sampler<MockBus>, count: usize) {
    for _ in 0..count {
        sampler.fast_tick();
    }
}

/// Assert that two floating point values are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
