//! Factory sensitivity adjustment (ASA) values
//!
//! The AK8963 carries one trim byte per axis in fuse ROM. Each is turned into a
//! multiplicative adjustment:
//!
//! ```text
//! adjustment = (trim - 128) / 256 + 1
//! ```
//!
//! giving a range of 0.5 (trim 0) to 1.49609375 (trim 255).

use crate::Error;

/// Per-axis sensitivity adjustment for one initialization session
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationValues {
    trim: [u8; 3],
    x: f32,
    y: f32,
    z: f32,
}

impl CalibrationValues {
    /// Build the adjustments from the three fuse ROM bytes (ASAX, ASAY, ASAZ)
    #[must_use]
    pub fn from_trim(trim: [u8; 3]) -> Self {
        Self {
            trim,
            x: adjustment(trim[0]),
            y: adjustment(trim[1]),
            z: adjustment(trim[2]),
        }
    }

    /// X-axis adjustment factor
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Y-axis adjustment factor
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Z-axis adjustment factor
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Adjustment factors as `[x, y, z]`
    #[must_use]
    pub const fn factors(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Trim bytes the factors were derived from
    #[must_use]
    pub const fn trim(&self) -> [u8; 3] {
        self.trim
    }
}

impl Default for CalibrationValues {
    /// Neutral adjustment (trim 128 on every axis)
    fn default() -> Self {
        Self::from_trim([128; 3])
    }
}

fn adjustment(trim: u8) -> f32 {
    (f32::from(trim) - 128.0) / 256.0 + 1.0
}

/// Holder for the calibration of the current session
///
/// Empty until an initialization run completes. Values are only ever replaced
/// as a whole; a failed or restarted run leaves it empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibrationStore {
    values: Option<CalibrationValues>,
}

impl CalibrationStore {
    /// Empty store
    #[must_use]
    pub const fn new() -> Self {
        Self { values: None }
    }

    /// Current calibration
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] if no run has completed.
    pub fn get<E>(&self) -> Result<CalibrationValues, Error<E>> {
        match self.values {
            Some(values) => Ok(values),
            None => Err(Error::NotInitialized),
        }
    }

    /// Replace the held calibration in one step
    pub const fn replace(&mut self, values: CalibrationValues) {
        self.values = Some(values);
    }

    /// Drop the held calibration
    pub const fn clear(&mut self) {
        self.values = None;
    }
}
