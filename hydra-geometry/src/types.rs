//! Scalar type and angle helpers shared across the hydra workspace.

use core::f64::consts::TAU;

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

/// Convenience alias for all coordinates and numeric values.
pub type Scalar = f64;

/// Tolerance for floating-point comparisons.
pub const EPSILON: Scalar = 1e-9;

/// Number of drawing units per hyperbolic unit of length.
pub const DEFAULT_SCALE: Scalar = 15.0;

/// Default number of samples used to draw a curve.
pub const DEFAULT_RESOLUTION: usize = 100;

/// Upper bound on the sample resolution.
pub const MAX_RESOLUTION: usize = 100_000;

// ---------------------------------------------------------------------------
// Angles
// ---------------------------------------------------------------------------

/// Normalize an angle into `[0, 2π)`.
#[inline]
#[must_use]
pub fn normalize_angle(angle: Scalar) -> Scalar {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Angular distance between two angles, in `[0, π]`.
#[inline]
#[must_use]
pub fn angular_distance(a: Scalar, b: Scalar) -> Scalar {
    let delta = normalize_angle(a - b);
    delta.min(TAU - delta)
}

/// Linear interpolation between `a` and `b`.
#[inline]
#[must_use]
pub fn lerp(a: Scalar, b: Scalar, t: Scalar) -> Scalar {
    (b - a).mul_add(t, a)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
