//! Sensor modules for the MPU-6050
//!
//! This module provides the full-scale ranges and physical-unit sample types
//! for each sensor in the MPU-6050:
//! - Accelerometer (3-axis, g)
//! - Gyroscope (3-axis, °/s)
//!
//! Reading is performed through methods on `Mpu6050Driver`.

pub mod accelerometer;
pub mod gyroscope;

// Re-export main types
pub use accelerometer::{AccelDataG, AccelFullScale};
pub use gyroscope::{GyroDataDps, GyroFullScale};

/// Inverse of the raw-to-physical conversion, saturating at the i16 range
#[allow(clippy::cast_possible_truncation)]
fn physical_to_raw(value: f32, sensitivity: f32) -> i16 {
    let scaled = libm::roundf(value * sensitivity);
    // Clamped value is guaranteed to fit in i16
    scaled.clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

/// Raw/physical conversions shared by the three-axis sample types
macro_rules! three_axis_conversions {
    ($ty:ident, $unit:literal) => {
        impl $ty {
            #[doc = concat!("Scale raw register values into ", $unit)]
            ///
            /// `sensitivity` is in LSB per unit, as returned by the matching
            /// full-scale range.
            #[must_use]
            pub fn from_raw(raw_x: i16, raw_y: i16, raw_z: i16, sensitivity: f32) -> Self {
                Self {
                    x: f32::from(raw_x) / sensitivity,
                    y: f32::from(raw_y) / sensitivity,
                    z: f32::from(raw_z) / sensitivity,
                }
            }

            /// Nearest raw register values, saturating outside the i16 range
            #[must_use]
            pub fn to_raw(&self, sensitivity: f32) -> (i16, i16, i16) {
                (
                    $crate::sensors::physical_to_raw(self.x, sensitivity),
                    $crate::sensors::physical_to_raw(self.y, sensitivity),
                    $crate::sensors::physical_to_raw(self.z, sensitivity),
                )
            }

            /// Euclidean norm of the vector
            #[must_use]
            pub fn magnitude(&self) -> f32 {
                libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
            }
        }
    };
}

pub(crate) use three_axis_conversions;
