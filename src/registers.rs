//! Register definitions for the MPU-6050
//!
//! Only the configuration registers the attitude engine touches are modelled
//! here. The MPU-6050 has a flat register space (no bank switching), so every
//! register lives at its datasheet address.
//!
//! Sensor output registers are big-endian word pairs (`*_OUT_H` followed by
//! `*_OUT_L`) and are read directly through [`RegisterBus::read_word`]; their
//! addresses are exported as plain constants below.
//!
//! [`RegisterBus::read_word`]: crate::interface::RegisterBus::read_word

device_driver::create_device!(
    device_name: Mpu6050,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        /// GYRO_CONFIG - Gyroscope Configuration (0x1B)
        register GyroConfig {
            const ADDRESS = 0x1B;
            const SIZE_BITS = 8;

            reserved_2_0: uint = 0..3,
            /// Full-scale range select (0=±250, 1=±500, 2=±1000, 3=±2000 °/s)
            fs_sel: uint = 3..5,
            /// Z-axis self-test
            zg_st: bool = 5,
            /// Y-axis self-test
            yg_st: bool = 6,
            /// X-axis self-test
            xg_st: bool = 7,
        },

        /// ACCEL_CONFIG - Accelerometer Configuration (0x1C)
        register AccelConfig {
            const ADDRESS = 0x1C;
            const SIZE_BITS = 8;

            reserved_2_0: uint = 0..3,
            /// Full-scale range select (0=±2g, 1=±4g, 2=±8g, 3=±16g)
            afs_sel: uint = 3..5,
            /// Z-axis self-test
            za_st: bool = 5,
            /// Y-axis self-test
            ya_st: bool = 6,
            /// X-axis self-test
            xa_st: bool = 7,
        },

        /// PWR_MGMT_1 - Power Management 1 (0x6B)
        register PwrMgmt1 {
            const ADDRESS = 0x6B;
            const SIZE_BITS = 8;

            /// Clock source select (0=internal 8MHz, 1=PLL with X gyro reference)
            clksel: uint = 0..3,
            /// Temperature sensor disable
            temp_dis: bool = 3,
            reserved_4: uint = 4..5,
            /// Cycle between sleep and single-sample wake
            cycle: bool = 5,
            /// Sleep mode enable (set after power-on)
            sleep: bool = 6,
            /// Device reset
            device_reset: bool = 7,
        },
    }
);

/// ACCEL_XOUT_H - first byte of the X-axis acceleration word
pub const ACCEL_XOUT_H: u8 = 0x3B;
/// ACCEL_YOUT_H - first byte of the Y-axis acceleration word
pub const ACCEL_YOUT_H: u8 = 0x3D;
/// ACCEL_ZOUT_H - first byte of the Z-axis acceleration word
pub const ACCEL_ZOUT_H: u8 = 0x3F;

/// GYRO_XOUT_H - first byte of the X-axis angular rate word
pub const GYRO_XOUT_H: u8 = 0x43;
/// GYRO_YOUT_H - first byte of the Y-axis angular rate word
pub const GYRO_YOUT_H: u8 = 0x45;
/// GYRO_ZOUT_H - first byte of the Z-axis angular rate word
pub const GYRO_ZOUT_H: u8 = 0x47;
