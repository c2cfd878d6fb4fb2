//! Raw count to µT×10 conversion
//!
//! `scaled = raw × adjustment × gain(resolution, axis)`, evaluated in `f32`
//! and rounded to the nearest integer. The product of the full `i16` range, the
//! largest adjustment and the 14-bit gain is about ±294 000, so the result is
//! carried in `i32`.

use crate::calibration::CalibrationValues;
use crate::magnetometer::{MagResolution, RawSample, ScaledSample};

/// µT×10 per LSB for 14-bit output (0.6 µT/LSB), per axis
pub const GAIN_14_BIT: [f32; 3] = [6.0, 6.0, 6.0];

/// µT×10 per LSB for 16-bit output (0.15 µT/LSB), per axis
pub const GAIN_16_BIT: [f32; 3] = [1.5, 1.5, 1.5];

/// Per-axis gain for `resolution`, as `[x, y, z]`
#[must_use]
pub const fn gain(resolution: MagResolution) -> [f32; 3] {
    match resolution {
        MagResolution::Bits14 => GAIN_14_BIT,
        MagResolution::Bits16 => GAIN_16_BIT,
    }
}

/// Convert one raw sample to calibrated µT×10
///
/// Pure; every `i16` input is valid.
#[must_use]
pub fn scale_sample(
    raw: RawSample,
    calibration: &CalibrationValues,
    resolution: MagResolution,
) -> ScaledSample {
    let [gx, gy, gz] = gain(resolution);
    ScaledSample {
        x: scale_axis(raw.x, calibration.x(), gx),
        y: scale_axis(raw.y, calibration.y(), gy),
        z: scale_axis(raw.z, calibration.z(), gz),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn scale_axis(raw: i16, adjustment: f32, gain: f32) -> i32 {
    // |value| < 300_000
    libm::roundf(f32::from(raw) * adjustment * gain) as i32
}
