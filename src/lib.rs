#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

extern crate alloc;

pub mod calibration;
pub mod device;
pub mod filter;
pub mod interface;
pub mod registers;
pub mod sensors;
pub mod state;

#[cfg(feature = "std")]
pub mod sampler;

// Re-export main types
pub use calibration::{
    CalibrationConfig, CalibrationPolicy, CalibrationTracker, EmptyHistory, HistoryWindow,
    RestingOffsets,
};
pub use device::{DeviceConfig, Mpu6050Driver};
pub use filter::{AttitudeFilter, FilterConfig};
pub use interface::{I2cInterface, RegisterBus};
pub use sensors::{AccelDataG, AccelFullScale, GyroDataDps, GyroFullScale};
pub use state::{SampleStats, SensorState};

#[cfg(feature = "std")]
pub use sampler::{AttitudeSensor, Sampler, SamplerConfig, SensorConfig};

/// MPU-6050 I2C address when AD0 pin is low (default: 0x68)
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;

/// MPU-6050 I2C address when AD0 pin is high (alternative: 0x69)
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Driver errors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A sample register read failed
    BusRead(E),
    /// A wake-up or configuration write failed during start-up
    DeviceInit(E),
    /// Calibration was requested before any pitch/roll sample was recorded
    EmptyHistory,
    /// Invalid configuration parameter
    InvalidConfig,
    /// The sampling worker thread could not be started
    #[cfg(feature = "std")]
    WorkerSpawn,
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BusRead(e) => write!(f, "bus read failed: {e:?}"),
            Self::DeviceInit(e) => write!(f, "device initialization failed: {e:?}"),
            Self::EmptyHistory => f.write_str("calibration error: empty history"),
            Self::InvalidConfig => f.write_str("invalid configuration"),
            #[cfg(feature = "std")]
            Self::WorkerSpawn => f.write_str("failed to spawn sampling worker"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for Error<E> {}
