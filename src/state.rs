//! Shared sensor state
//!
//! [`SensorState`] is everything the sampling loop mutates and callers read:
//! the latest readings, the complementary filter, the calibration tracker and
//! some bookkeeping counters. One fast tick is applied as a single
//! [`apply_sample`](SensorState::apply_sample) call, so whoever guards the
//! state with a lock publishes ticks atomically.

use crate::calibration::{CalibrationConfig, CalibrationTracker, EmptyHistory, RestingOffsets};
use crate::filter::{normalize_heading, AttitudeFilter, FilterConfig};
use crate::sensors::{AccelDataG, GyroDataDps};

/// Lowest gain accepted by [`SensorState::adjust_heading`]
pub const MIN_HEADING_GAIN: f64 = 0.001;

/// Sampling counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleStats {
    /// Filter updates applied
    pub ticks: u64,
    /// Gyroscope reads that failed (stale reading reused)
    pub gyro_read_failures: u64,
    /// Accelerometer reads that failed (stale reading reused)
    pub accel_read_failures: u64,
    /// Successful calibrations
    pub calibrations: u64,
}

/// Attitude engine state
#[derive(Debug, Clone, Default)]
pub struct SensorState {
    gyro_reading: GyroDataDps,
    accel_reading: AccelDataG,
    filter: AttitudeFilter,
    tracker: CalibrationTracker,
    stats: SampleStats,
}

impl SensorState {
    /// Create a level, uncalibrated state with empty history
    #[must_use]
    pub fn new(filter: FilterConfig, calibration: CalibrationConfig) -> Self {
        Self {
            gyro_reading: GyroDataDps::default(),
            accel_reading: AccelDataG::default(),
            filter: AttitudeFilter::new(filter),
            tracker: CalibrationTracker::new(calibration),
            stats: SampleStats::default(),
        }
    }

    /// Apply one fast tick
    ///
    /// `None` means the corresponding read failed this tick: the previous
    /// reading is kept and the failure is counted. The filter runs either way,
    /// and the new pitch/roll are appended to the calibration history.
    pub fn apply_sample(&mut self, gyro: Option<GyroDataDps>, accel: Option<AccelDataG>) {
        match gyro {
            Some(reading) => self.gyro_reading = reading,
            None => self.stats.gyro_read_failures += 1,
        }
        match accel {
            Some(reading) => self.accel_reading = reading,
            None => self.stats.accel_read_failures += 1,
        }

        let (pitch, roll) = self.filter.update(&self.gyro_reading, &self.accel_reading);
        self.tracker.record(pitch, roll);
        self.stats.ticks += 1;
    }

    /// Recompute the resting offsets from the recorded history
    ///
    /// # Errors
    ///
    /// Returns [`EmptyHistory`] if no tick has been applied yet.
    pub fn calibrate(&mut self) -> Result<RestingOffsets, EmptyHistory> {
        let offsets = self.tracker.calibrate()?;
        self.stats.calibrations += 1;
        Ok(offsets)
    }

    /// Pitch and roll with the resting offsets removed, in degrees
    #[must_use]
    pub fn pitch_and_roll(&self) -> (f64, f64) {
        let offsets = self.tracker.offsets();
        (
            self.filter.pitch() - offsets.pitch,
            self.filter.roll() - offsets.roll,
        )
    }

    /// Pitch with the resting offset removed, in degrees
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.pitch_and_roll().0
    }

    /// Roll with the resting offset removed, in degrees
    #[must_use]
    pub fn roll(&self) -> f64 {
        self.pitch_and_roll().1
    }

    /// Heading in degrees, in [0, 360)
    #[must_use]
    pub const fn heading(&self) -> f64 {
        self.filter.heading()
    }

    /// Replace the heading with an external reference (e.g. GPS true heading)
    ///
    /// The value is normalized into [0, 360). A non-finite value is ignored.
    pub fn reset_heading(&mut self, heading: f64) {
        if !self.filter.set_heading(heading) {
            #[cfg(feature = "std")]
            log::warn!("ignored heading reset to non-finite value {heading}");
        }
    }

    /// Move the heading part of the way toward an external reference
    ///
    /// `gain` is clamped to `[MIN_HEADING_GAIN, 1]`; a gain of 1 is a full
    /// reset. The correction always takes the shorter way around the circle.
    /// A non-finite target is ignored.
    pub fn adjust_heading(&mut self, target: f64, gain: f64) {
        if !target.is_finite() {
            #[cfg(feature = "std")]
            log::warn!("ignored heading adjustment toward non-finite target {target}");
            return;
        }
        let gain = if gain.is_nan() {
            MIN_HEADING_GAIN
        } else {
            gain.clamp(MIN_HEADING_GAIN, 1.0)
        };
        let target = normalize_heading(target);
        let current = self.filter.heading();

        let mut difference = current - target;
        if difference > 180.0 {
            difference -= 360.0;
        } else if difference < -180.0 {
            difference += 360.0;
        }

        self.filter.set_heading(current - difference * gain);

        #[cfg(feature = "std")]
        log::debug!(
            "adjusted heading: old {current:.3} target {target:.3} new {:.3}",
            self.filter.heading()
        );
    }

    /// Most recent gyroscope and accelerometer readings
    #[must_use]
    pub const fn latest_readings(&self) -> (GyroDataDps, AccelDataG) {
        (self.gyro_reading, self.accel_reading)
    }

    /// Current resting offsets
    #[must_use]
    pub const fn resting_offsets(&self) -> RestingOffsets {
        self.tracker.offsets()
    }

    /// Whether a calibration has completed
    #[must_use]
    pub const fn is_calibrated(&self) -> bool {
        self.tracker.is_calibrated()
    }

    /// Complementary filter (fused values without resting offsets)
    #[must_use]
    pub const fn filter(&self) -> &AttitudeFilter {
        &self.filter
    }

    /// Calibration tracker
    #[must_use]
    pub const fn tracker(&self) -> &CalibrationTracker {
        &self.tracker
    }

    /// Sampling counters
    #[must_use]
    pub const fn stats(&self) -> SampleStats {
        self.stats
    }
}
