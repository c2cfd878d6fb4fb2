//! AK8963 magnetometer types and register constants
//!
//! The AK8963 sits on the MPU-9250 auxiliary bus at a fixed address. Its
//! registers are never accessed directly; the constants here are the values the
//! relay programs into the host's slave 0 registers.

use crate::ConfigError;

/// AK8963 magnetometer I2C address on the auxiliary bus
pub const AK8963_I2C_ADDRESS: u8 = 0x0C;

/// AK8963 device ID register (`WIA`)
pub const AK8963_REG_WIA: u8 = 0x00;

/// Expected `WIA` value
pub const AK8963_WIA_VALUE: u8 = 0x48;

/// AK8963 Status 1 register address (first byte of a sample poll)
pub const AK8963_REG_ST1: u8 = 0x02;

/// AK8963 measurement data start register (HXL)
pub const AK8963_REG_HXL: u8 = 0x03;

/// AK8963 Status 2 register address (reading it releases the data latch)
pub const AK8963_REG_ST2: u8 = 0x09;

/// AK8963 Control 1 register address (mode and output resolution)
pub const AK8963_REG_CNTL1: u8 = 0x0A;

/// AK8963 Control 2 register address (soft reset)
pub const AK8963_REG_CNTL2: u8 = 0x0B;

/// AK8963 X-axis sensitivity adjustment (first of three fuse ROM bytes)
pub const AK8963_REG_ASAX: u8 = 0x10;

/// `CNTL2` soft reset command
pub const AK8963_CNTL2_SRST: u8 = 0x01;

/// `CNTL1` fuse ROM access mode
///
/// Exposes the ASA bytes. Only reachable from power-down and must return to
/// power-down before any other mode.
pub const AK8963_MODE_FUSE_ROM: u8 = 0x0F;

/// Bytes polled per sample: ST1, HXL..HZH, ST2
pub const SAMPLE_POLL_LEN: u8 = AK8963_REG_ST2 - AK8963_REG_ST1 + 1;

/// Offset of HXL within a staged sample poll
pub const SAMPLE_DATA_OFFSET: usize = (AK8963_REG_HXL - AK8963_REG_ST1) as usize;

/// Magnetometer operating mode
///
/// Fuse ROM access is deliberately absent: it is only entered by the
/// initialization sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagMode {
    /// Power-down mode
    PowerDown = 0x00,
    /// Single measurement mode
    Single = 0x01,
    /// Continuous measurement mode 1 (8 Hz)
    Continuous8Hz = 0x02,
    /// External trigger measurement mode
    ExternalTrigger = 0x04,
    /// Continuous measurement mode 2 (100 Hz)
    Continuous100Hz = 0x06,
    /// Self-test mode
    SelfTest = 0x08,
}

impl TryFrom<u8> for MagMode {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::PowerDown),
            0x01 => Ok(Self::Single),
            0x02 => Ok(Self::Continuous8Hz),
            0x04 => Ok(Self::ExternalTrigger),
            0x06 => Ok(Self::Continuous100Hz),
            0x08 => Ok(Self::SelfTest),
            other => Err(ConfigError::InvalidMode(other)),
        }
    }
}

/// Magnetometer output resolution (`CNTL1` bit 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagResolution {
    /// 14-bit output, 0.6 µT/LSB
    Bits14 = 0,
    /// 16-bit output, 0.15 µT/LSB
    Bits16 = 1,
}

impl TryFrom<u8> for MagResolution {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Bits14),
            1 => Ok(Self::Bits16),
            other => Err(ConfigError::InvalidScale(other)),
        }
    }
}

/// `CNTL1` value selecting `mode` at `resolution`
#[must_use]
pub const fn cntl1_value(mode: MagMode, resolution: MagResolution) -> u8 {
    ((resolution as u8) << 4) | mode as u8
}

/// AK8963 Status 1 byte as staged by the host relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagStatus(u8);

impl MagStatus {
    /// Wrap a raw ST1 value
    #[must_use]
    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// DRDY: a new sample is available
    #[must_use]
    pub const fn data_ready(self) -> bool {
        self.0 & 0x01 != 0
    }

    /// DOR: a sample was skipped before being read
    #[must_use]
    pub const fn data_overrun(self) -> bool {
        self.0 & 0x02 != 0
    }
}

/// Raw magnetometer counts (signed 16-bit, little-endian on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// X-axis magnetic field (raw)
    pub x: i16,
    /// Y-axis magnetic field (raw)
    pub y: i16,
    /// Z-axis magnetic field (raw)
    pub z: i16,
}

impl RawSample {
    /// Parse HXL, HXH, HYL, HYH, HZL, HZH
    #[must_use]
    pub const fn from_le_bytes(data: [u8; 6]) -> Self {
        Self {
            x: i16::from_le_bytes([data[0], data[1]]),
            y: i16::from_le_bytes([data[2], data[3]]),
            z: i16::from_le_bytes([data[4], data[5]]),
        }
    }
}

/// Calibrated magnetometer sample in µT×10
///
/// Fixed point with one decimal digit: `482` means 48.2 µT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaledSample {
    /// X-axis magnetic field in µT×10
    pub x: i32,
    /// Y-axis magnetic field in µT×10
    pub y: i32,
    /// Z-axis magnetic field in µT×10
    pub z: i32,
}

impl ScaledSample {
    /// Convert to floating point microteslas
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_micro_tesla(&self) -> MagDataUT {
        MagDataUT {
            x: self.x as f32 / 10.0,
            y: self.y as f32 / 10.0,
            z: self.z as f32 / 10.0,
        }
    }
}

/// Magnetometer data in microteslas (µT)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagDataUT {
    /// X-axis magnetic field in µT
    pub x: f32,
    /// Y-axis magnetic field in µT
    pub y: f32,
    /// Z-axis magnetic field in µT
    pub z: f32,
}

impl MagDataUT {
    /// Magnitude of the field vector in µT
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}
