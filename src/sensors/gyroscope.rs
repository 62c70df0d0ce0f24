//! Gyroscope ranges and samples

/// LSB per °/s, indexed by `FS_SEL`
const LSB_PER_DPS: [f32; 4] = [131.0, 65.5, 32.8, 16.4];

/// Gyroscope full-scale range (`FS_SEL` in `GYRO_CONFIG`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroFullScale {
    /// ±250 °/s
    #[default]
    Dps250 = 0,
    /// ±500 °/s
    Dps500 = 1,
    /// ±1000 °/s
    Dps1000 = 2,
    /// ±2000 °/s
    Dps2000 = 3,
}

impl GyroFullScale {
    /// Conversion constant in LSB/(°/s)
    #[must_use]
    pub const fn sensitivity(self) -> f32 {
        LSB_PER_DPS[self as usize]
    }

    /// Upper bound of the range in °/s
    #[must_use]
    pub const fn range_dps(self) -> u16 {
        250 << (self as u16)
    }
}

/// Angular rate in degrees per second
///
/// `x` drives pitch and `y` drives roll in the attitude filter; `z` feeds the
/// heading estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroDataDps {
    /// X axis
    pub x: f32,
    /// Y axis
    pub y: f32,
    /// Z axis
    pub z: f32,
}

super::three_axis_conversions!(GyroDataDps, "°/s");
