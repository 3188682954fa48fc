// Sample conditioning - DC removal, clamping and axis remapping
//
// Converts one raw PPG/accelerometer sample into the estimation engine's
// input domain:
//
// 1. DC removal: filtered = (ppg - mean) * 256, clamped to the engine's
//    valid range
// 2. Running mean update: mean' = (mean*7 + ppg) >> 3, a first-order IIR
//    with decay 7/8
// 3. Raw clamp: the unfiltered value clamped to the same range, kept for
//    diagnostics only
// 4. Axis remap: sensor axes (1 g = 8192) into the engine's wrist-frame
//    convention (1 g = 256) via negate-then-shift
//
// All shifts are arithmetic, so negative operands floor toward negative
// infinity. This is deliberate: it matches the device's two's-complement
// arithmetic and affects the mean and axis values at boundary points.

use crate::config::FilterConfig;
use crate::types::AccelVector;

/// Result of conditioning one raw sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conditioned {
    /// Mean-removed, scaled and clamped PPG value
    pub filtered: i32,
    /// Updated running mean to carry into the next sample
    pub new_mean: i32,
    /// Raw PPG value clamped to the engine range (diagnostics only)
    pub raw_clamped: i32,
    /// Acceleration remapped into the engine's axis convention and scale
    pub accel: AccelVector,
}

/// Condition one raw sample against the current running mean.
///
/// When `reseed` is set the mean is seeded from this sample before
/// filtering, so the first sample of a worn session filters to zero and
/// becomes the DC baseline.
pub fn condition(
    ppg_value: i32,
    sensor_accel: AccelVector,
    mean: i32,
    reseed: bool,
    filter: &FilterConfig,
) -> Conditioned {
    let mean = if reseed { ppg_value } else { mean };

    let filtered = clamp(
        (ppg_value - mean).saturating_mul(256),
        filter.value_min,
        filter.value_max,
    );
    let new_mean = (mean * 7 + ppg_value) >> 3;
    let raw_clamped = clamp(ppg_value, filter.value_min, filter.value_max);

    Conditioned {
        filtered,
        new_mean,
        raw_clamped,
        accel: remap_acceleration(sensor_accel),
    }
}

/// Remap sensor acceleration into the engine's wrist frame.
///
/// Engine x is perpendicular to the forearm (sensor -y), engine y runs
/// along the forearm (sensor -x), engine z points into the palm (sensor z).
/// The >>5 converts the sensor's 1 g = 8192 scale to the engine's
/// 1 g = 256. Negation happens before the shift.
pub fn remap_acceleration(sensor: AccelVector) -> AccelVector {
    AccelVector {
        x: (-sensor.y) >> 5,
        y: (-sensor.x) >> 5,
        z: sensor.z >> 5,
    }
}

fn clamp(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
