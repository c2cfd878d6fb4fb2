//! Magnetometer configuration and its validation
//!
//! A [`MagConfig`] is the typed form of what a configuration file provides: the
//! standard [`MagSettings`] plus an optional [`DebugOverride`]. It is resolved
//! exactly once, before any bus traffic, into an immutable
//! [`EffectiveParameters`] value that the initialization sequence consumes.
//!
//! Resolution fails closed: an out-of-range or unsafe value is an error and is
//! never replaced by a default.
//!
//! # Example
//!
//! ```
//! use ak8963::{DebugOverride, MagConfig, MagSettings, TimingSafety};
//!
//! let params = MagConfig::new(MagSettings::default()).resolve()?;
//! assert_eq!(params.write_delay_ms(), 50);
//! assert_eq!(params.timing(), TimingSafety::Nominal);
//!
//! // Faster bring-up is only possible with an explicit opt-in
//! let fast = MagConfig::new(MagSettings::default())
//!     .with_debug(DebugOverride::write_delay(10).with_unsafe_timing(true))
//!     .resolve()?;
//! assert_eq!(fast.timing(), TimingSafety::Unsafe);
//! # Ok::<(), ak8963::ConfigError>(())
//! ```

use core::ops::RangeInclusive;
use core::time::Duration;

use crate::magnetometer::{MagMode, MagResolution};

/// Accepted standard write settle delay in milliseconds
pub const WRITE_DELAY_RANGE_MS: RangeInclusive<u32> = 1..=200;

/// Accepted standard read delay in milliseconds
pub const READ_DELAY_RANGE_MS: RangeInclusive<u32> = 1..=50;

/// Accepted debug override write settle delay in milliseconds
pub const OVERRIDE_WRITE_DELAY_RANGE_MS: RangeInclusive<u32> = 1..=500;

/// Accepted debug override read delay in milliseconds
pub const OVERRIDE_READ_DELAY_RANGE_MS: RangeInclusive<u32> = 1..=100;

/// Hardware-recommended minimum write settle delay
pub const MIN_SAFE_WRITE_DELAY_MS: u32 = 50;

/// Largest sample rate divider (`I2C_MST_DLY` is 5 bits, capped at 15)
pub const MAX_SAMPLE_RATE_DIVIDER: u8 = 15;

/// Configuration rejected by [`MagConfig::resolve`]
///
/// Each variant carries the rejected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Standard write delay outside 1..=200 ms
    WriteDelayOutOfRange(u32),
    /// Standard read delay outside 1..=50 ms
    ReadDelayOutOfRange(u32),
    /// Scale is neither 0 (14-bit) nor 1 (16-bit)
    InvalidScale(u8),
    /// Mode is not one of the selectable AK8963 modes
    InvalidMode(u8),
    /// Sample rate divider above 15
    SampleRateDividerOutOfRange(u8),
    /// Override write delay outside 1..=500 ms
    OverrideWriteDelayOutOfRange(u32),
    /// Override read delay outside 1..=100 ms
    OverrideReadDelayOutOfRange(u32),
    /// Effective write delay below the 50 ms floor without the unsafe opt-in
    UnsafeWriteDelay(u32),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WriteDelayOutOfRange(ms) => write!(f, "write delay {ms} ms outside 1..=200 ms"),
            Self::ReadDelayOutOfRange(ms) => write!(f, "read delay {ms} ms outside 1..=50 ms"),
            Self::InvalidScale(scale) => write!(f, "scale {scale} is not 0 or 1"),
            Self::InvalidMode(mode) => write!(f, "mode 0x{mode:02X} is not a valid AK8963 mode"),
            Self::SampleRateDividerOutOfRange(div) => {
                write!(f, "sample rate divider {div} above 15")
            }
            Self::OverrideWriteDelayOutOfRange(ms) => {
                write!(f, "override write delay {ms} ms outside 1..=500 ms")
            }
            Self::OverrideReadDelayOutOfRange(ms) => {
                write!(f, "override read delay {ms} ms outside 1..=100 ms")
            }
            Self::UnsafeWriteDelay(ms) => write!(
                f,
                "write delay {ms} ms below the {MIN_SAFE_WRITE_DELAY_MS} ms floor without unsafe override"
            ),
        }
    }
}

/// Standard magnetometer settings
///
/// Raw numeric fields mirror the configuration source so that invalid values
/// can be reported rather than being unrepresentable at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagSettings {
    /// Settle time after each relayed write (ms)
    pub write_delay_ms: u32,
    /// Time allowed for a relayed read to complete (ms)
    pub read_delay_ms: u32,
    /// Output resolution: 0 = 14-bit, 1 = 16-bit
    pub scale: u8,
    /// AK8963 `CNTL1` mode bits
    pub mode: u8,
    /// Relay poll decimation relative to the host sample rate (0-15)
    pub sample_rate_divider: u8,
}

impl Default for MagSettings {
    /// 50 ms write delay, 10 ms read delay, 16-bit, continuous 100 Hz, divider 0
    fn default() -> Self {
        Self {
            write_delay_ms: MIN_SAFE_WRITE_DELAY_MS,
            read_delay_ms: 10,
            scale: MagResolution::Bits16 as u8,
            mode: MagMode::Continuous100Hz as u8,
            sample_rate_divider: 0,
        }
    }
}

impl MagSettings {
    /// Default timing with the given mode and resolution
    #[must_use]
    pub fn new(mode: MagMode, resolution: MagResolution) -> Self {
        Self {
            mode: mode as u8,
            scale: resolution as u8,
            ..Self::default()
        }
    }
}

/// Debug timing override
///
/// Unset delays fall through to the standard settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebugOverride {
    /// Replacement write settle delay (ms)
    pub write_delay_ms: Option<u32>,
    /// Replacement read delay (ms)
    pub read_delay_ms: Option<u32>,
    /// Allow a write delay below the hardware floor
    pub unsafe_timing: bool,
}

impl DebugOverride {
    /// Override only the write delay
    #[must_use]
    pub const fn write_delay(ms: u32) -> Self {
        Self {
            write_delay_ms: Some(ms),
            read_delay_ms: None,
            unsafe_timing: false,
        }
    }

    /// Override only the read delay
    #[must_use]
    pub const fn read_delay(ms: u32) -> Self {
        Self {
            write_delay_ms: None,
            read_delay_ms: Some(ms),
            unsafe_timing: false,
        }
    }

    /// Set the unsafe timing opt-in
    #[must_use]
    pub const fn with_unsafe_timing(mut self, unsafe_timing: bool) -> Self {
        self.unsafe_timing = unsafe_timing;
        self
    }
}

/// Complete configuration input: standard settings plus optional override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagConfig {
    /// Standard settings
    pub settings: MagSettings,
    /// Debug override, if any
    pub debug: Option<DebugOverride>,
}

/// Whether a session was resolved with hardware-safe timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingSafety {
    /// Write delay at or above the 50 ms floor
    Nominal,
    /// Write delay below the floor through the unsafe override
    Unsafe,
}

/// Non-fatal findings of [`MagConfig::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigWarnings {
    /// Effective write delay is below the recommended 50 ms
    pub write_delay_below_recommended: bool,
    /// The unsafe timing opt-in was set
    pub unsafe_override: bool,
}

impl ConfigWarnings {
    /// No warning was raised
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.write_delay_below_recommended && !self.unsafe_override
    }
}

/// Validated, immutable parameters for one magnetometer session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EffectiveParameters {
    write_delay_ms: u32,
    read_delay_ms: u32,
    resolution: MagResolution,
    mode: MagMode,
    sample_rate_divider: u8,
    warnings: ConfigWarnings,
    timing: TimingSafety,
}

impl EffectiveParameters {
    /// Settle time after each relayed write (ms)
    #[must_use]
    pub const fn write_delay_ms(&self) -> u32 {
        self.write_delay_ms
    }

    /// Time allowed for a relayed read (ms)
    #[must_use]
    pub const fn read_delay_ms(&self) -> u32 {
        self.read_delay_ms
    }

    /// Settle time after each relayed write
    #[must_use]
    pub const fn write_delay(&self) -> Duration {
        Duration::from_millis(self.write_delay_ms as u64)
    }

    /// Time allowed for a relayed read
    #[must_use]
    pub const fn read_delay(&self) -> Duration {
        Duration::from_millis(self.read_delay_ms as u64)
    }

    /// Output resolution
    #[must_use]
    pub const fn resolution(&self) -> MagResolution {
        self.resolution
    }

    /// Operating mode selected after calibration
    #[must_use]
    pub const fn mode(&self) -> MagMode {
        self.mode
    }

    /// Relay poll decimation
    #[must_use]
    pub const fn sample_rate_divider(&self) -> u8 {
        self.sample_rate_divider
    }

    /// Warnings raised during resolution
    #[must_use]
    pub const fn warnings(&self) -> ConfigWarnings {
        self.warnings
    }

    /// Timing safety of this parameter set
    #[must_use]
    pub const fn timing(&self) -> TimingSafety {
        self.timing
    }
}

impl MagConfig {
    /// Configuration without a debug override
    #[must_use]
    pub const fn new(settings: MagSettings) -> Self {
        Self {
            settings,
            debug: None,
        }
    }

    /// Attach a debug override
    #[must_use]
    pub const fn with_debug(mut self, debug: DebugOverride) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Validate and resolve into [`EffectiveParameters`]
    ///
    /// Override values take precedence over standard values. The 50 ms floor
    /// applies to the resolved write delay and can only be crossed with
    /// [`DebugOverride::unsafe_timing`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking the standard settings
    /// first, then the override, then the safety floor.
    pub fn resolve(&self) -> Result<EffectiveParameters, ConfigError> {
        let s = &self.settings;

        if !WRITE_DELAY_RANGE_MS.contains(&s.write_delay_ms) {
            return Err(ConfigError::WriteDelayOutOfRange(s.write_delay_ms));
        }
        if !READ_DELAY_RANGE_MS.contains(&s.read_delay_ms) {
            return Err(ConfigError::ReadDelayOutOfRange(s.read_delay_ms));
        }
        let resolution = MagResolution::try_from(s.scale)?;
        let mode = MagMode::try_from(s.mode)?;
        if s.sample_rate_divider > MAX_SAMPLE_RATE_DIVIDER {
            return Err(ConfigError::SampleRateDividerOutOfRange(
                s.sample_rate_divider,
            ));
        }

        let mut write_delay_ms = s.write_delay_ms;
        let mut read_delay_ms = s.read_delay_ms;
        let mut unsafe_timing = false;

        if let Some(debug) = &self.debug {
            if let Some(ms) = debug.write_delay_ms {
                if !OVERRIDE_WRITE_DELAY_RANGE_MS.contains(&ms) {
                    return Err(ConfigError::OverrideWriteDelayOutOfRange(ms));
                }
                write_delay_ms = ms;
            }
            if let Some(ms) = debug.read_delay_ms {
                if !OVERRIDE_READ_DELAY_RANGE_MS.contains(&ms) {
                    return Err(ConfigError::OverrideReadDelayOutOfRange(ms));
                }
                read_delay_ms = ms;
            }
            unsafe_timing = debug.unsafe_timing;
        }

        let below_floor = write_delay_ms < MIN_SAFE_WRITE_DELAY_MS;
        if below_floor && !unsafe_timing {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "AK8963 config: write delay {=u32} ms below {=u32} ms floor",
                write_delay_ms,
                MIN_SAFE_WRITE_DELAY_MS
            );
            return Err(ConfigError::UnsafeWriteDelay(write_delay_ms));
        }

        let warnings = ConfigWarnings {
            write_delay_below_recommended: below_floor,
            unsafe_override: unsafe_timing,
        };

        #[cfg(feature = "defmt")]
        if below_floor {
            defmt::warn!(
                "AK8963 config: unsafe write delay {=u32} ms accepted by debug override",
                write_delay_ms
            );
        }

        Ok(EffectiveParameters {
            write_delay_ms,
            read_delay_ms,
            resolution,
            mode,
            sample_rate_divider: s.sample_rate_divider,
            warnings,
            timing: if below_floor {
                TimingSafety::Unsafe
            } else {
                TimingSafety::Nominal
            },
        })
    }
}
