//! Complementary attitude filter
//!
//! Blends integrated gyro rate (fast, drifts) with accelerometer tilt (noisy,
//! drift-free) into pitch and roll, and integrates a heading estimate from the
//! out-of-plane gyro axis.
//!
//! All angles are in degrees. Pitch rate is taken from `gyro.x` and roll rate
//! from `gyro.y`; this mapping follows the sensor mount and must not change.
//!
//! The integration step `sample_period` is a fixed constant (1/2000 s by
//! default) and is not derived from the sampling loop's poll
//! interval. Changing the poll interval therefore changes the effective filter
//! gain and heading-rate scaling; set [`FilterConfig::sample_period`] alongside
//! it if that matters.

use crate::sensors::{AccelDataG, GyroDataDps};

const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Default complementary filter coefficient (weight given to the gyro path)
pub const DEFAULT_ALPHA: f64 = 0.98;

/// Default integration step in seconds (2 kHz)
pub const DEFAULT_SAMPLE_PERIOD: f64 = 1.0 / 2000.0;

/// Default empirical gain applied to the heading-rate angle
pub const DEFAULT_HEADING_GAIN: f64 = 3.428_571_428_57;

/// Upper bound on [`FilterConfig::sample_period`]
pub const MAX_SAMPLE_PERIOD: f64 = 0.5;

/// Largest heading-rate angle, in degrees (`atan2` is bounded by ±π/2 here)
const MAX_HEADING_ANGLE: f64 = 90.0;

/// Complementary filter configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterConfig {
    /// Weight of the gyro-integrated estimate, in [0, 1]
    pub alpha: f64,
    /// Integration step in seconds, in (0, `MAX_SAMPLE_PERIOD`]
    pub sample_period: f64,
    /// Empirical gain on the heading-rate angle
    pub heading_gain: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            sample_period: DEFAULT_SAMPLE_PERIOD,
            heading_gain: DEFAULT_HEADING_GAIN,
        }
    }
}

impl FilterConfig {
    /// Largest heading change a single update can produce, in degrees
    #[must_use]
    pub fn max_heading_step(&self) -> f64 {
        self.sample_period * MAX_HEADING_ANGLE * self.heading_gain.abs()
    }

    /// Check that every parameter is finite and in range
    ///
    /// The heading step per update must stay below one revolution, so a
    /// single ±360 correction always lands back in [0, 360).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.alpha)
            && self.sample_period.is_finite()
            && self.sample_period > 0.0
            && self.sample_period <= MAX_SAMPLE_PERIOD
            && self.heading_gain.is_finite()
            && self.max_heading_step() < 360.0
    }
}

/// Pitch and roll implied by the gravity vector alone, in degrees
#[must_use]
pub fn accel_tilt(accel: &AccelDataG) -> (f64, f64) {
    let (x, y, z) = (f64::from(accel.x), f64::from(accel.y), f64::from(accel.z));
    let pitch = libm::atan2(y, libm::hypot(x, z)) * RAD_TO_DEG;
    let roll = -libm::atan2(x, libm::hypot(y, z)) * RAD_TO_DEG;
    (pitch, roll)
}

/// Normalize any finite heading into [0, 360)
#[must_use]
pub fn normalize_heading(heading: f64) -> f64 {
    let mut wrapped = libm::fmod(heading, 360.0);
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    // A tiny negative remainder rounds up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap a heading that is at most one revolution out of range
fn wrap_once(mut heading: f64) -> f64 {
    if heading < 0.0 {
        heading += 360.0;
    }
    if heading >= 360.0 {
        heading -= 360.0;
    }
    heading
}

/// Complementary filter state
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttitudeFilter {
    config: FilterConfig,
    pitch: f64,
    roll: f64,
    heading: f64,
}

impl Default for AttitudeFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl AttitudeFilter {
    /// Create a filter at zero pitch, roll and heading
    #[must_use]
    pub const fn new(config: FilterConfig) -> Self {
        Self {
            config,
            pitch: 0.0,
            roll: 0.0,
            heading: 0.0,
        }
    }

    /// Filter configuration
    #[must_use]
    pub const fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Fused pitch in degrees (no resting offset applied)
    #[must_use]
    pub const fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Fused roll in degrees (no resting offset applied)
    #[must_use]
    pub const fn roll(&self) -> f64 {
        self.roll
    }

    /// Integrated heading in degrees, in [0, 360)
    #[must_use]
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    /// Overwrite the heading, normalizing it into [0, 360)
    ///
    /// Returns `false` and keeps the current heading if `heading` is not
    /// finite.
    pub fn set_heading(&mut self, heading: f64) -> bool {
        if !heading.is_finite() {
            return false;
        }
        self.heading = normalize_heading(heading);
        true
    }

    /// Run one filter step and return the new `(pitch, roll)`
    ///
    /// ```text
    /// pitch' = α·(T·gyro.x + pitch) + (1−α)·pitch_accel
    /// roll'  = α·(T·gyro.y + roll)  + (1−α)·roll_accel
    /// ```
    ///
    /// The heading is then advanced by `T · rate`, where
    /// `rate = −(atan2(gyro.z, hypot(pitch', roll')) · heading_gain)` in
    /// degrees. This heading rate is an empirical approximation, not a yaw
    /// integration; it is reproduced as-is.
    pub fn update(&mut self, gyro: &GyroDataDps, accel: &AccelDataG) -> (f64, f64) {
        let FilterConfig {
            alpha,
            sample_period,
            heading_gain,
        } = self.config;

        let (pitch_accel, roll_accel) = accel_tilt(accel);

        let pitch_rate = f64::from(gyro.x);
        let roll_rate = f64::from(gyro.y);

        self.pitch =
            alpha * (sample_period * pitch_rate + self.pitch) + (1.0 - alpha) * pitch_accel;
        self.roll = alpha * (sample_period * roll_rate + self.roll) + (1.0 - alpha) * roll_accel;

        let f = libm::atan2(f64::from(gyro.z), libm::hypot(self.pitch, self.roll));
        let heading_rate = -(f * heading_gain) * RAD_TO_DEG;
        self.heading = wrap_once(self.heading + sample_period * heading_rate);

        (self.pitch, self.roll)
    }
}
