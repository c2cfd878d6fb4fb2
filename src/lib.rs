#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod calibration;
pub mod config;
pub mod device;
pub mod init;
pub mod interface;
pub mod magnetometer;
pub mod registers;
pub mod scaling;

// Re-export main types
pub use calibration::{CalibrationStore, CalibrationValues};
pub use config::{
    ConfigError, ConfigWarnings, DebugOverride, EffectiveParameters, MagConfig, MagSettings,
    TimingSafety,
};
pub use device::Ak8963Driver;
pub use init::{InitError, InitState, InitStep};
pub use interface::{I2cInterface, SpiInterface};
pub use magnetometer::{MagDataUT, MagMode, MagResolution, MagStatus, RawSample, ScaledSample};
pub use scaling::scale_sample;

/// MPU-9250 I2C address when AD0 pin is low (default: 0x68)
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;

/// MPU-9250 I2C address when AD0 pin is high (alternative: 0x69)
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Host `WHO_AM_I` value of the MPU-9250
pub const WHO_AM_I_MPU9250: u8 = 0x71;

/// Host `WHO_AM_I` value of the MPU-9255
pub const WHO_AM_I_MPU9255: u8 = 0x73;

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the host
    Bus(E),
    /// Configuration rejected before any bus access
    Config(ConfigError),
    /// Transport failure while running the initialization sequence
    Init(InitError<E>),
    /// Operation requires a successfully initialized magnetometer
    NotInitialized,
    /// Unexpected host `WHO_AM_I` value (contains the actual value read)
    InvalidDevice(u8),
    /// Unexpected AK8963 `WIA` value (contains the actual value read)
    InvalidMagnetometer(u8),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus error: {e:?}"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Init(e) => write!(f, "{e}"),
            Self::NotInitialized => f.write_str("magnetometer not initialized"),
            Self::InvalidDevice(id) => write!(f, "unexpected host WHO_AM_I 0x{id:02X}"),
            Self::InvalidMagnetometer(id) => write!(f, "unexpected AK8963 WIA 0x{id:02X}"),
        }
    }
}
