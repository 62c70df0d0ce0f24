//! Periodic sampling loop and the public sensor handle
//!
//! A single worker thread owns the bus. Every fast tick it reads both sensors
//! (outside the lock) and then publishes the whole tick into the shared
//! [`SensorState`] under one lock acquisition. A slower tick runs the resting
//! calibration.
//!
//! ```ignore
//! let sensor = AttitudeSensor::new(I2cInterface::new(i2c))?;
//! let (pitch, roll) = sensor.pitch_and_roll();
//! ```

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::calibration::{CalibrationConfig, RestingOffsets};
use crate::device::{DeviceConfig, Mpu6050Driver};
use crate::filter::FilterConfig;
use crate::interface::RegisterBus;
use crate::sensors::{AccelDataG, GyroDataDps};
use crate::state::{SampleStats, SensorState};
use crate::Error;

/// Default fast-tick period (2 kHz)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_micros(500);

/// Default slow-tick (calibration) period
pub const DEFAULT_CALIBRATION_INTERVAL: Duration = Duration::from_secs(60);

const WORKER_NAME: &str = "mpu6050-sampler";

/// Sampling loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Period of the fast tick (read sensors, run the filter)
    ///
    /// This is independent of [`FilterConfig::sample_period`]; see the
    /// [`filter`](crate::filter) module docs.
    pub poll_interval: Duration,
    /// Period of the slow tick (calibration)
    pub calibration_interval: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            calibration_interval: DEFAULT_CALIBRATION_INTERVAL,
        }
    }
}

impl SamplerConfig {
    /// Both periods must be non-zero
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !self.poll_interval.is_zero() && !self.calibration_interval.is_zero()
    }
}

/// Complete configuration for [`AttitudeSensor`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorConfig {
    /// Device address and full-scale ranges
    pub device: DeviceConfig,
    /// Complementary filter parameters
    pub filter: FilterConfig,
    /// Calibration policy and history window
    pub calibration: CalibrationConfig,
    /// Sampling loop timing
    pub sampler: SamplerConfig,
}

impl SensorConfig {
    /// Check every nested configuration
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.filter.is_valid() && self.sampler.is_valid()
    }
}

fn lock(state: &Mutex<SensorState>) -> MutexGuard<'_, SensorState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Next deadline after `previous`, skipping every period already missed
///
/// `None` means the deadline is past the end of the clock's range.
fn next_deadline(previous: Instant, period: Duration, now: Instant) -> Option<Instant> {
    let next = previous.checked_add(period)?;
    if next > now {
        return Some(next);
    }
    let behind = now.duration_since(next).as_nanos();
    let skipped = behind / period.as_nanos().max(1) + 1;
    log::trace!("sampler fell behind, skipping {skipped} tick(s)");
    match u32::try_from(skipped)
        .ok()
        .and_then(|skipped| period.checked_mul(skipped))
    {
        Some(skip) => next.checked_add(skip),
        None => now.checked_add(period),
    }
}

/// Tick logic of the sampling loop
///
/// Owns the driver and a handle to the shared state. [`AttitudeSensor`] runs
/// one of these on its worker thread; it can also be driven by hand.
pub struct Sampler<B> {
    driver: Mpu6050Driver<B>,
    state: Arc<Mutex<SensorState>>,
}

impl<B: RegisterBus> Sampler<B> {
    /// Wrap an initialized driver and a starting state
    pub fn new(driver: Mpu6050Driver<B>, state: SensorState) -> Self {
        Self {
            driver,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Handle to the state this sampler publishes into
    #[must_use]
    pub fn shared_state(&self) -> Arc<Mutex<SensorState>> {
        Arc::clone(&self.state)
    }

    /// Copy of the current state, history included
    #[must_use]
    pub fn snapshot(&self) -> SensorState {
        lock(&self.state).clone()
    }

    /// Read both sensors and run one filter step
    ///
    /// A failed read keeps the previous reading for that sensor; the two reads
    /// fail independently.
    pub fn fast_tick(&mut self) {
        let gyro = match self.driver.read_gyroscope() {
            Ok(reading) => Some(reading),
            Err(e) => {
                log::trace!("gyroscope {e}");
                None
            }
        };
        let accel = match self.driver.read_accelerometer() {
            Ok(reading) => Some(reading),
            Err(e) => {
                log::trace!("accelerometer {e}");
                None
            }
        };

        lock(&self.state).apply_sample(gyro, accel);
    }

    /// Run calibration if the policy still wants it
    ///
    /// Returns whether further slow ticks are needed.
    pub fn slow_tick(&mut self) -> bool {
        let mut state = lock(&self.state);
        if !state.tracker().is_due() {
            return false;
        }

        match state.calibrate() {
            Ok(offsets) => log::info!(
                "calibrated from {} samples: pitch offset {:.3}, roll offset {:.3}",
                state.tracker().len(),
                offsets.pitch,
                offsets.roll
            ),
            Err(_) => log::warn!("calibration skipped: no samples recorded yet"),
        }
        state.tracker().is_due()
    }

    /// Consume the sampler and return the driver
    pub fn into_driver(self) -> Mpu6050Driver<B> {
        self.driver
    }

    fn run(mut self, stop: &Receiver<()>, config: SamplerConfig) -> Mpu6050Driver<B> {
        let SamplerConfig {
            poll_interval,
            calibration_interval,
        } = config;

        let start = Instant::now();
        let mut next_fast = start.checked_add(poll_interval);
        let mut next_slow = start.checked_add(calibration_interval);
        if next_fast.is_none() || next_slow.is_none() {
            log::warn!("sampler interval beyond clock range, that tick never runs");
        }

        loop {
            let deadline = match (next_fast, next_slow) {
                (Some(fast), Some(slow)) => Some(fast.min(slow)),
                (fast, slow) => fast.or(slow),
            };
            let received = match deadline {
                Some(deadline) => {
                    stop.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => stop.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            let now = Instant::now();
            if let Some(fast) = next_fast.filter(|fast| now >= *fast) {
                self.fast_tick();
                next_fast = next_deadline(fast, poll_interval, now);
            }
            if let Some(slow) = next_slow.filter(|slow| now >= *slow) {
                next_slow = if self.slow_tick() {
                    next_deadline(slow, calibration_interval, now)
                } else {
                    log::debug!("calibration complete, slow tick disabled");
                    None
                };
            }
        }

        self.driver
    }
}

struct Worker<B> {
    stop: Sender<()>,
    handle: JoinHandle<Mpu6050Driver<B>>,
}

/// Running attitude sensor
///
/// Construction wakes and configures the device and starts the sampling
/// thread. All accessors are safe to call from any thread. Dropping the
/// handle stops the thread.
pub struct AttitudeSensor<B: RegisterBus> {
    state: Arc<Mutex<SensorState>>,
    worker: Option<Worker<B>>,
}

impl<B> AttitudeSensor<B>
where
    B: RegisterBus + Send + 'static,
{
    /// Start a sensor with the default configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceInit`] if bringing the device up fails, or
    /// [`Error::WorkerSpawn`] if the sampling thread cannot be started.
    pub fn new(bus: B) -> Result<Self, Error<B::Error>> {
        Self::with_config(bus, SensorConfig::default())
    }

    /// Start a sensor
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` is rejected (nothing is
    /// written to the bus in that case), [`Error::DeviceInit`] if bringing the
    /// device up fails, or [`Error::WorkerSpawn`] if the sampling thread cannot
    /// be started.
    pub fn with_config(bus: B, config: SensorConfig) -> Result<Self, Error<B::Error>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfig);
        }

        let driver = Mpu6050Driver::with_config(bus, config.device)?;
        let sampler = Sampler::new(
            driver,
            SensorState::new(config.filter, config.calibration),
        );
        let state = sampler.shared_state();

        let (stop, stop_rx) = mpsc::channel();
        let sampler_config = config.sampler;
        let handle = thread::Builder::new()
            .name(WORKER_NAME.into())
            .spawn(move || sampler.run(&stop_rx, sampler_config))
            .map_err(|e| {
                log::error!("failed to spawn {WORKER_NAME}: {e}");
                Error::WorkerSpawn
            })?;

        log::info!(
            "sampling started at {:#04x}: poll every {:?}, calibrate every {:?}",
            config.device.address,
            config.sampler.poll_interval,
            config.sampler.calibration_interval
        );

        Ok(Self {
            state,
            worker: Some(Worker { stop, handle }),
        })
    }
}

impl<B: RegisterBus> AttitudeSensor<B> {
    /// Pitch and roll in degrees, resting offsets removed
    ///
    /// Both values come from the same tick.
    #[must_use]
    pub fn pitch_and_roll(&self) -> (f64, f64) {
        lock(&self.state).pitch_and_roll()
    }

    /// Pitch in degrees, resting offset removed
    #[must_use]
    pub fn pitch(&self) -> f64 {
        lock(&self.state).pitch()
    }

    /// Roll in degrees, resting offset removed
    #[must_use]
    pub fn roll(&self) -> f64 {
        lock(&self.state).roll()
    }

    /// Heading in degrees, in [0, 360)
    #[must_use]
    pub fn heading(&self) -> f64 {
        lock(&self.state).heading()
    }

    /// Overwrite the heading with an external reference, normalized into [0, 360)
    pub fn reset_heading(&self, heading: f64) {
        lock(&self.state).reset_heading(heading);
    }

    /// Nudge the heading toward an external reference
    ///
    /// See [`SensorState::adjust_heading`].
    pub fn adjust_heading(&self, target: f64, gain: f64) {
        lock(&self.state).adjust_heading(target, gain);
    }

    /// Most recent gyroscope (°/s) and accelerometer (g) readings
    #[must_use]
    pub fn latest_readings(&self) -> (GyroDataDps, AccelDataG) {
        lock(&self.state).latest_readings()
    }

    /// Calibrate now from the history recorded so far
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyHistory`] if no tick has completed yet.
    pub fn calibrate_now(&self) -> Result<RestingOffsets, Error<B::Error>> {
        let offsets = lock(&self.state).calibrate()?;
        log::info!(
            "calibrated on demand: pitch offset {:.3}, roll offset {:.3}",
            offsets.pitch,
            offsets.roll
        );
        Ok(offsets)
    }

    /// Whether a calibration has completed
    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        lock(&self.state).is_calibrated()
    }

    /// Offsets currently subtracted from pitch and roll
    #[must_use]
    pub fn resting_offsets(&self) -> RestingOffsets {
        lock(&self.state).resting_offsets()
    }

    /// Sampling counters
    #[must_use]
    pub fn stats(&self) -> SampleStats {
        lock(&self.state).stats()
    }

    /// Whether the sampling thread is still owned by this handle
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Stop the sampling thread and wait for it to finish
    ///
    /// Returns the driver on the first call. Later calls do nothing and
    /// return `None`. The last published values stay readable afterwards.
    pub fn close(&mut self) -> Option<Mpu6050Driver<B>> {
        let Worker { stop, handle } = self.worker.take()?;
        // The worker may already have exited; a closed channel is fine
        let _ = stop.send(());

        match handle.join() {
            Ok(driver) => {
                log::info!("sampling stopped after {} ticks", self.stats().ticks);
                Some(driver)
            }
            Err(_) => {
                log::error!("{WORKER_NAME} panicked");
                None
            }
        }
    }
}

impl<B: RegisterBus> Drop for AttitudeSensor<B> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
