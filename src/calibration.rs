//! Resting-bias calibration
//!
//! The tracker records every fused `(pitch, roll)` pair and, when asked,
//! averages them into resting offsets. The averaging window is assumed to
//! cover a level, stationary pose; the offsets are later subtracted from the
//! reported attitude.

use alloc::collections::VecDeque;
use core::num::NonZeroUsize;

use crate::Error;

/// When the sampling loop recalibrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationPolicy {
    /// Calibrate once after the first calibration interval, then never again
    #[default]
    Once,
    /// Recalibrate at every calibration interval
    Periodic,
}

/// How much pitch/roll history is retained for averaging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HistoryWindow {
    /// Keep every sample ever recorded
    #[default]
    Unbounded,
    /// Keep only the most recent `n` samples (ring buffer)
    Recent(NonZeroUsize),
}

/// Calibration configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationConfig {
    /// Recalibration policy
    pub policy: CalibrationPolicy,
    /// History retention
    pub window: HistoryWindow,
}

/// Offsets subtracted from the fused pitch and roll, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RestingOffsets {
    /// Pitch offset in degrees
    pub pitch: f64,
    /// Roll offset in degrees
    pub roll: f64,
}

/// Calibration was attempted before any sample was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmptyHistory;

impl<E> From<EmptyHistory> for Error<E> {
    fn from(_: EmptyHistory) -> Self {
        Self::EmptyHistory
    }
}

/// Pitch/roll history and the resting offsets computed from it
#[derive(Debug, Clone, Default)]
pub struct CalibrationTracker {
    config: CalibrationConfig,
    // Stored as pairs so the pitch and roll histories can never differ in length
    history: VecDeque<(f64, f64)>,
    offsets: RestingOffsets,
    calibrated: bool,
}

impl CalibrationTracker {
    /// Create an empty, uncalibrated tracker
    #[must_use]
    pub fn new(config: CalibrationConfig) -> Self {
        let history = match config.window {
            HistoryWindow::Unbounded => VecDeque::new(),
            HistoryWindow::Recent(capacity) => VecDeque::with_capacity(capacity.get()),
        };
        Self {
            config,
            history,
            offsets: RestingOffsets::default(),
            calibrated: false,
        }
    }

    /// Calibration configuration
    #[must_use]
    pub const fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Append one fused sample, evicting the oldest if the window is full
    pub fn record(&mut self, pitch: f64, roll: f64) {
        if let HistoryWindow::Recent(capacity) = self.config.window {
            while self.history.len() >= capacity.get() {
                self.history.pop_front();
            }
        }
        self.history.push_back((pitch, roll));
    }

    /// Number of retained samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// True when no sample has been retained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Retained pitch history, oldest first
    pub fn pitch_history(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().map(|&(pitch, _)| pitch)
    }

    /// Retained roll history, oldest first
    pub fn roll_history(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().map(|&(_, roll)| roll)
    }

    /// Current resting offsets (zero until the first calibration)
    #[must_use]
    pub const fn offsets(&self) -> RestingOffsets {
        self.offsets
    }

    /// Whether a calibration has completed
    #[must_use]
    pub const fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Whether the periodic slow tick should still run calibration
    #[must_use]
    pub const fn is_due(&self) -> bool {
        match self.config.policy {
            CalibrationPolicy::Once => !self.calibrated,
            CalibrationPolicy::Periodic => true,
        }
    }

    /// Set the resting offsets to the mean of the retained history
    ///
    /// The history itself is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyHistory`] if no sample has been recorded; the previous
    /// offsets are kept.
    #[allow(clippy::cast_precision_loss)]
    pub fn calibrate(&mut self) -> Result<RestingOffsets, EmptyHistory> {
        if self.history.is_empty() {
            return Err(EmptyHistory);
        }

        let count = self.history.len() as f64;
        let (pitch_sum, roll_sum) = self
            .history
            .iter()
            .fold((0.0, 0.0), |(p, r), &(pitch, roll)| (p + pitch, r + roll));

        self.offsets = RestingOffsets {
            pitch: pitch_sum / count,
            roll: roll_sum / count,
        };
        self.calibrated = true;
        Ok(self.offsets)
    }
}
