//! Axis normalization.
//!
//! A raw ADC reading is centered, the dead zone is cut out, and the
//! remaining travel is scaled linearly onto `-100..=100`.

use wrist_types::input::AXIS_MAX;

/// Calibration for one stick axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisCalibration {
    pub center: u16,
    pub dead_zone: u16,
    pub raw_max: u16,
    pub invert: bool,
}

impl AxisCalibration {
    /// Normalize a raw reading. Readings past `raw_max` are clamped first.
    pub fn normalize(&self, raw: u16) -> i8 {
        normalize_axis(
            raw.min(self.raw_max),
            self.center,
            self.dead_zone,
            self.invert,
        )
    }
}

/// Map a raw reading onto `-100..=100`.
///
/// Readings within `dead_zone` of `center` yield exactly 0. Outside it the
/// magnitude is reduced by the dead-zone width so the output starts at 0 at
/// the dead-zone edge and reaches 100 one full half-span away.
pub fn normalize_axis(raw: u16, center: u16, dead_zone: u16, invert: bool) -> i8 {
    let centered = i32::from(raw) - i32::from(center);
    let dz = i32::from(dead_zone);
    if centered.abs() < dz {
        return 0;
    }
    let shrunk = if centered > 0 {
        centered - dz
    } else {
        centered + dz
    };
    let span = (i32::from(center) - dz).max(1);
    let max = i32::from(AXIS_MAX);
    let mut normalized = (shrunk * max / span).clamp(-max, max);
    if invert {
        normalized = -normalized;
    }
    normalized as i8
}

/// Average several raw reads of one axis to knock down ADC noise.
///
/// An empty slice reads as 0.
pub fn oversample(reads: &[u16]) -> u16 {
    if reads.is_empty() {
        return 0;
    }
    let sum: u32 = reads.iter().map(|&r| u32::from(r)).sum();
    (sum / reads.len() as u32) as u16
}
