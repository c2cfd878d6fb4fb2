//! Bus interface implementations for the MPU-9250 host
//!
//! These are the transport for everything the driver does: the AK8963 is only
//! reachable through host registers, so a relayed magnetometer access is a
//! handful of host register writes followed by a block read of the staging
//! registers. Both interfaces implement `device_driver::RegisterInterface`;
//! register addresses are single bytes and data is at most 24 bytes
//! (the size of the `EXT_SENS_DATA` window).

use crate::{Error, I2C_ADDRESS_AD0_HIGH, I2C_ADDRESS_AD0_LOW};
use device_driver::RegisterInterface;

/// Largest write payload: register address plus the staging window size
const MAX_TRANSFER: usize = 25;

/// I2C interface for the MPU-9250
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface at 0x68 (AD0 pin LOW)
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut mag = Ak8963Driver::new(interface);
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS_AD0_LOW,
        }
    }

    /// Create a new I2C interface at 0x69 (AD0 pin HIGH)
    pub const fn alternative(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS_AD0_HIGH,
        }
    }

    /// Create a new I2C interface with a custom host address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Host address used for every transaction
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_TRANSFER];
        buffer[0] = address;
        let len = write_data.len().min(MAX_TRANSFER - 1);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address, &buffer[..=len])
    }
}

/// SPI interface for the MPU-9250
///
/// Chip select is owned by the `SpiDevice` implementation, e.g.
/// `embedded_hal_bus::spi::ExclusiveDevice`. The MPU-9250 SPI clock must stay
/// at or below 1 MHz for register writes.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Create a new SPI interface with the given SPI device
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Consume the interface and return the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> RegisterInterface for SpiInterface<SPI>
where
    SPI: embedded_hal::spi::SpiDevice<Error = E>,
{
    type Error = Error<E>;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        // MSB set selects a read
        let mut operations = [
            embedded_hal::spi::Operation::Write(&[address | 0x80]),
            embedded_hal::spi::Operation::Read(read_data),
        ];

        self.spi.transaction(&mut operations).map_err(Error::Bus)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_TRANSFER];
        buffer[0] = address & 0x7F;
        let len = write_data.len().min(MAX_TRANSFER - 1);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.spi.write(&buffer[..=len]).map_err(Error::Bus)
    }
}
