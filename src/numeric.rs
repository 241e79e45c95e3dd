//! Rounding and tolerance helpers shared by the gradient and line stages.

/// Rounds to the nearest integer, away from zero at the halfway point.
#[inline]
pub fn round_to_i32(value: f64) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

/// Snaps a value to the nearest multiple of `precision`.
///
/// Used to bucket Hough angles so that pixels on the same pixelated line
/// converge on the same accumulator cell despite per-pixel noise.
#[inline]
pub fn quantize(value: f64, precision: f64) -> f64 {
    f64::from(round_to_i32(value / precision)) * precision
}

#[inline]
pub fn ints_close(a: i32, b: i32, resolution: i32) -> bool {
    (a - b).abs() <= resolution
}

#[inline]
pub fn floats_close(a: f64, b: f64, resolution: f64) -> bool {
    (a - b).abs() <= resolution
}
