//! Unit tests for configuration validation

use crate::common::MockBus;
use mpu6050_attitude::filter::MAX_SAMPLE_PERIOD;
use mpu6050_attitude::{
    AttitudeSensor, CalibrationConfig, DeviceConfig, Error, FilterConfig, SamplerConfig,
    SensorConfig,
};
use std::time::Duration;

fn rejected(config: SensorConfig) {
    let bus = MockBus::new();
    let result = AttitudeSensor::with_config(bus.clone(), config);
    assert!(
        matches!(result, Err(Error::InvalidConfig)),
        "Configuration should be rejected: {:?}",
        config
    );
    assert!(
        bus.operations().is_empty(),
        "Rejected configuration must not touch the bus"
    );
}

#[test]
fn test_defaults() {
    let config = SensorConfig::default();
    assert!(config.is_valid());

    assert_eq!(config.device, DeviceConfig::default());
    assert_eq!(config.device.address, 0x68);
    assert_eq!(config.filter.alpha, 0.98);
    assert_eq!(config.filter.sample_period, 1.0 / 2000.0);
    assert_eq!(config.filter.heading_gain, 3.428_571_428_57);
    assert_eq!(config.calibration, CalibrationConfig::default());
    assert_eq!(config.sampler.poll_interval, Duration::from_micros(500));
    assert_eq!(config.sampler.calibration_interval, Duration::from_secs(60));
}

#[test]
fn test_alpha_bounds() {
    for alpha in [0.0, 0.5, 1.0] {
        let filter = FilterConfig {
            alpha,
            ..FilterConfig::default()
        };
        assert!(filter.is_valid(), "alpha {} should be accepted", alpha);
    }
    for alpha in [-0.01, 1.01, f64::NAN] {
        rejected(SensorConfig {
            filter: FilterConfig {
                alpha,
                ..FilterConfig::default()
            },
            ..SensorConfig::default()
        });
    }
}

#[test]
fn test_sample_period_bounds() {
    let at_max = FilterConfig {
        sample_period: MAX_SAMPLE_PERIOD,
        ..FilterConfig::default()
    };
    assert!(at_max.is_valid());

    for sample_period in [0.0, -0.001, MAX_SAMPLE_PERIOD * 2.0, f64::INFINITY, f64::NAN] {
        rejected(SensorConfig {
            filter: FilterConfig {
                sample_period,
                ..FilterConfig::default()
            },
            ..SensorConfig::default()
        });
    }
}

#[test]
fn test_heading_gain_must_be_finite() {
    rejected(SensorConfig {
        filter: FilterConfig {
            heading_gain: f64::INFINITY,
            ..FilterConfig::default()
        },
        ..SensorConfig::default()
    });
}

#[test]
fn test_heading_gain_bounded_by_single_wrap() {
    // Gain large enough for one update to turn more than a full revolution
    let config = SensorConfig {
        filter: FilterConfig {
            heading_gain: 1e4,
            ..FilterConfig::default()
        },
        ..SensorConfig::default()
    };
    assert!(config.filter.max_heading_step() >= 360.0);
    rejected(config);

    let negative = FilterConfig {
        heading_gain: -1e4,
        ..FilterConfig::default()
    };
    assert!(!negative.is_valid());
}

#[test]
fn test_zero_intervals_rejected() {
    rejected(SensorConfig {
        sampler: SamplerConfig {
            poll_interval: Duration::ZERO,
            ..SamplerConfig::default()
        },
        ..SensorConfig::default()
    });
    rejected(SensorConfig {
        sampler: SamplerConfig {
            calibration_interval: Duration::ZERO,
            ..SamplerConfig::default()
        },
        ..SensorConfig::default()
    });
}
