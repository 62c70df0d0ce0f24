//! Bus interface implementations for the MPU-6050
//!
//! The attitude engine needs exactly two bus capabilities: write one byte to a
//! device register, and read one signed big-endian word starting at a device
//! register. [`RegisterBus`] captures that contract; [`I2cInterface`]
//! implements it over any `embedded-hal` I2C bus.
//!
//! [`BusRegisters`] adapts a [`RegisterBus`] to the `device-driver`
//! [`RegisterInterface`] so the typed register map in
//! [`registers`](crate::registers) can drive it.

use crate::I2C_ADDRESS_AD0_LOW;

use device_driver::RegisterInterface;

/// Register-addressed bus capability consumed by the driver
///
/// Every operation names the device address explicitly so a single bus can be
/// shared by several peripherals.
pub trait RegisterBus {
    /// Error reported by the underlying transport
    type Error: core::fmt::Debug;

    /// Write a single byte to `register` of the device at `address`
    ///
    /// # Errors
    ///
    /// Returns the transport error if the write is not acknowledged.
    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Read the big-endian signed word stored at `register` and `register + 1`
    ///
    /// # Errors
    ///
    /// Returns the transport error if the read fails.
    fn read_word(&mut self, address: u8, register: u8) -> Result<i16, Self::Error>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    type Error = B::Error;

    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_byte(address, register, value)
    }

    fn read_word(&mut self, address: u8, register: u8) -> Result<i16, Self::Error> {
        (**self).read_word(address, register)
    }
}

/// I2C interface for the MPU-6050
pub struct I2cInterface<I2C> {
    i2c: I2C,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::new(i2c);
    /// let sensor = AttitudeSensor::new(interface)?;
    /// ```
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterBus for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
    E: core::fmt::Debug,
{
    type Error = E;

    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(address, &[register, value])
    }

    fn read_word(&mut self, address: u8, register: u8) -> Result<i16, Self::Error> {
        let mut buffer = [0u8; 2];
        self.i2c.write_read(address, &[register], &mut buffer)?;
        Ok(i16::from_be_bytes(buffer))
    }
}

/// Binds a [`RegisterBus`] to one device address
///
/// Implements [`RegisterInterface`] on top of the byte-write/word-read
/// capability: multi-byte writes are issued one register at a time, and reads
/// are assembled from word reads (a lone trailing byte takes the high half of
/// the word, which is the addressed register itself).
pub struct BusRegisters<B> {
    bus: B,
    address: u8,
}

impl<B> BusRegisters<B> {
    /// Bind `bus` to the device at `address`
    pub const fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    /// Bind `bus` to the default device address (0x68, AD0 pin LOW)
    pub const fn default_address(bus: B) -> Self {
        Self::new(bus, I2C_ADDRESS_AD0_LOW)
    }

    /// Device address this interface talks to
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Mutable access to the underlying bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consume the interface and return the bus
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: RegisterBus> BusRegisters<B> {
    /// Read one signed word from `register` of the bound device
    ///
    /// # Errors
    ///
    /// Returns the transport error if the read fails.
    pub fn read_word(&mut self, register: u8) -> Result<i16, B::Error> {
        self.bus.read_word(self.address, register)
    }

    /// Write one byte to `register` of the bound device
    ///
    /// # Errors
    ///
    /// Returns the transport error if the write fails.
    pub fn write_byte(&mut self, register: u8, value: u8) -> Result<(), B::Error> {
        self.bus.write_byte(self.address, register, value)
    }
}

impl<B: RegisterBus> RegisterInterface for BusRegisters<B> {
    type Error = B::Error;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len()
        let mut register = address;
        for chunk in read_data.chunks_mut(2) {
            let [high, low] = self.read_word(register)?.to_be_bytes();
            chunk[0] = high;
            if let Some(byte) = chunk.get_mut(1) {
                *byte = low;
            }
            register = register.wrapping_add(2);
        }
        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len()
        let mut register = address;
        for &value in write_data {
            self.write_byte(register, value)?;
            register = register.wrapping_add(1);
        }
        Ok(())
    }
}
