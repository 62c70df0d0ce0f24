//! High-level driver API for the MPU-6050
//!
//! This module wakes and configures the MPU-6050 and reads its gyroscope and
//! accelerometer in physical units. It is the raw sample reader the attitude
//! engine is built on; it holds no fusion state of its own.

use crate::interface::{BusRegisters, RegisterBus};
use crate::registers::{
    Mpu6050 as RegisterDevice, ACCEL_XOUT_H, ACCEL_YOUT_H, ACCEL_ZOUT_H, GYRO_XOUT_H,
    GYRO_YOUT_H, GYRO_ZOUT_H,
};
use crate::sensors::{AccelDataG, AccelFullScale, GyroDataDps, GyroFullScale};
use crate::{Error, I2C_ADDRESS_AD0_LOW};

/// Accelerometer data (raw 16-bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelData {
    /// X-axis acceleration (raw)
    pub x: i16,
    /// Y-axis acceleration (raw)
    pub y: i16,
    /// Z-axis acceleration (raw)
    pub z: i16,
}

/// Gyroscope data (raw 16-bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroData {
    /// X-axis rotation (raw)
    pub x: i16,
    /// Y-axis rotation (raw)
    pub y: i16,
    /// Z-axis rotation (raw)
    pub z: i16,
}

/// Device-level configuration applied at start-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// I2C device address (0x68 with AD0 low, 0x69 with AD0 high)
    pub address: u8,
    /// Gyroscope full-scale range; selects the °/s conversion constant
    pub gyro_full_scale: GyroFullScale,
    /// Accelerometer full-scale range; selects the g conversion constant
    pub accel_full_scale: AccelFullScale,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: I2C_ADDRESS_AD0_LOW,
            gyro_full_scale: GyroFullScale::Dps250,
            accel_full_scale: AccelFullScale::G2,
        }
    }
}

/// Main driver for the MPU-6050
pub struct Mpu6050Driver<B> {
    device: RegisterDevice<BusRegisters<B>>,
    config: DeviceConfig,
}

impl<B> Mpu6050Driver<B>
where
    B: RegisterBus,
{
    /// Create a driver with the default configuration and bring the device up
    ///
    /// Equivalent to [`with_config`](Self::with_config) with
    /// [`DeviceConfig::default()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceInit`] if the wake-up or a configuration write
    /// fails.
    pub fn new(bus: B) -> Result<Self, Error<B::Error>> {
        Self::with_config(bus, DeviceConfig::default())
    }

    /// Create a driver and bring the device up
    ///
    /// Clears the sleep bit in `PWR_MGMT_1` (the MPU-6050 powers on asleep),
    /// then writes the gyroscope and accelerometer full-scale ranges. A failed
    /// write aborts construction: a range that silently failed to apply would
    /// corrupt every later physical-unit conversion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceInit`] if any start-up write fails.
    pub fn with_config(bus: B, config: DeviceConfig) -> Result<Self, Error<B::Error>> {
        let device = RegisterDevice::new(BusRegisters::new(bus, config.address));
        let mut driver = Self { device, config };
        driver.init()?;
        Ok(driver)
    }

    fn init(&mut self) -> Result<(), Error<B::Error>> {
        // Wake up, internal 8MHz oscillator
        self.device
            .pwr_mgmt_1()
            .write(|w| {
                w.set_sleep(false);
                w.set_clksel(0);
            })
            .map_err(Error::DeviceInit)?;

        let gyro_full_scale = self.config.gyro_full_scale;
        self.device
            .gyro_config()
            .write(|w| {
                w.set_fs_sel(gyro_full_scale as u8);
            })
            .map_err(Error::DeviceInit)?;

        let accel_full_scale = self.config.accel_full_scale;
        self.device
            .accel_config()
            .write(|w| {
                w.set_afs_sel(accel_full_scale as u8);
            })
            .map_err(Error::DeviceInit)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "MPU-6050 at {=u8:#x} awake: gyro ±{}°/s, accel ±{}g",
            self.config.address,
            gyro_full_scale.range_dps(),
            accel_full_scale.range_g()
        );

        Ok(())
    }

    /// Configuration the device was brought up with
    #[must_use]
    pub const fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Read gyroscope data
    ///
    /// Returns raw 16-bit values for X, Y, Z axes, one word read per axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusRead`] if any of the three reads fails; nothing is
    /// returned for the axes that did succeed.
    pub fn read_gyro(&mut self) -> Result<GyroData, Error<B::Error>> {
        let x = self.read_word(GYRO_XOUT_H)?;
        let y = self.read_word(GYRO_YOUT_H)?;
        let z = self.read_word(GYRO_ZOUT_H)?;
        Ok(GyroData { x, y, z })
    }

    /// Read accelerometer data
    ///
    /// Returns raw 16-bit values for X, Y, Z axes, one word read per axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusRead`] if any of the three reads fails.
    pub fn read_accel(&mut self) -> Result<AccelData, Error<B::Error>> {
        let x = self.read_word(ACCEL_XOUT_H)?;
        let y = self.read_word(ACCEL_YOUT_H)?;
        let z = self.read_word(ACCEL_ZOUT_H)?;
        Ok(AccelData { x, y, z })
    }

    /// Read gyroscope data in degrees per second
    ///
    /// # Example
    ///
    /// ```ignore
    /// let gyro = imu.read_gyroscope()?;
    /// println!("X: {}°/s, Y: {}°/s, Z: {}°/s", gyro.x, gyro.y, gyro.z);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusRead`] if communication with the device fails.
    pub fn read_gyroscope(&mut self) -> Result<GyroDataDps, Error<B::Error>> {
        let raw = self.read_gyro()?;
        let sensitivity = self.config.gyro_full_scale.sensitivity();
        Ok(GyroDataDps::from_raw(raw.x, raw.y, raw.z, sensitivity))
    }

    /// Read accelerometer data in g
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusRead`] if communication with the device fails.
    pub fn read_accelerometer(&mut self) -> Result<AccelDataG, Error<B::Error>> {
        let raw = self.read_accel()?;
        let sensitivity = self.config.accel_full_scale.sensitivity();
        Ok(AccelDataG::from_raw(raw.x, raw.y, raw.z, sensitivity))
    }

    /// Consume the driver and return the bus
    pub fn release(self) -> B {
        self.device.interface.release()
    }

    fn read_word(&mut self, register: u8) -> Result<i16, Error<B::Error>> {
        self.device
            .interface
            .read_word(register)
            .map_err(Error::BusRead)
    }
}
