//! Accelerometer ranges and samples

/// LSB per g, indexed by `AFS_SEL`
const LSB_PER_G: [f32; 4] = [16384.0, 8192.0, 4096.0, 2048.0];

/// Accelerometer full-scale range (`AFS_SEL` in `ACCEL_CONFIG`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelFullScale {
    /// ±2 g
    #[default]
    G2 = 0,
    /// ±4 g
    G4 = 1,
    /// ±8 g
    G8 = 2,
    /// ±16 g
    G16 = 3,
}

impl AccelFullScale {
    /// Conversion constant in LSB/g
    #[must_use]
    pub const fn sensitivity(self) -> f32 {
        LSB_PER_G[self as usize]
    }

    /// Upper bound of the range in g
    #[must_use]
    pub const fn range_g(self) -> u8 {
        2 << (self as u8)
    }
}

/// Specific force in g
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelDataG {
    /// X axis
    pub x: f32,
    /// Y axis
    pub y: f32,
    /// Z axis (+1 g when lying flat, face up)
    pub z: f32,
}

super::three_axis_conversions!(AccelDataG, "g");
