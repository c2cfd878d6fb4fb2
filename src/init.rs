//! Initialization sequence states
//!
//! The bring-up is a strict linear walk:
//!
//! ```text
//! Idle → Reset → PowerDown1 → FuseMode → ReadCalibration → PowerDown2
//!      → SetMode → ConfigureContinuousRead → Ready
//! ```
//!
//! A transport failure in any step ends the walk in `Failed`. There is no
//! resume: the next attempt starts again from `Idle`, because the AK8963 state
//! after a partial sequence is unknown.

/// One action step of the initialization sequence, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    /// Prepare the host relay and soft-reset the AK8963 (`CNTL2.SRST`)
    Reset,
    /// Enter power-down before fuse ROM access
    PowerDown1,
    /// Enter fuse ROM access mode
    FuseMode,
    /// Read the three ASA trim bytes
    ReadCalibration,
    /// Return to power-down, required after fuse ROM access
    PowerDown2,
    /// Select the measurement mode and resolution
    SetMode,
    /// Program the host relay to poll the sample registers
    ConfigureContinuousRead,
}

impl InitStep {
    /// All steps in execution order
    pub const SEQUENCE: [Self; 7] = [
        Self::Reset,
        Self::PowerDown1,
        Self::FuseMode,
        Self::ReadCalibration,
        Self::PowerDown2,
        Self::SetMode,
        Self::ConfigureContinuousRead,
    ];

    /// Step name as used in logs and errors
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reset => "Reset",
            Self::PowerDown1 => "PowerDown1",
            Self::FuseMode => "FuseMode",
            Self::ReadCalibration => "ReadCalibration",
            Self::PowerDown2 => "PowerDown2",
            Self::SetMode => "SetMode",
            Self::ConfigureContinuousRead => "ConfigureContinuousRead",
        }
    }

    /// Whether this step ends with a read settle wait instead of a write settle
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::ReadCalibration)
    }
}

impl core::fmt::Display for InitStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the driver is in the initialization state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitState {
    /// Nothing attempted, or a new attempt is about to start
    #[default]
    Idle,
    /// Executing `step`
    Running(InitStep),
    /// Calibrated and continuously sampling
    Ready,
    /// Transport failure in `step`; restart from `Idle` to recover
    Failed(InitStep),
}

impl InitState {
    /// Whether the magnetometer can be sampled
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Transport failure during a specific initialization step
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitError<E> {
    /// Step that was executing
    pub step: InitStep,
    /// Underlying transport error
    pub cause: E,
}

impl<E: core::fmt::Debug> core::fmt::Display for InitError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "initialization failed in {}: {:?}", self.step, self.cause)
    }
}
