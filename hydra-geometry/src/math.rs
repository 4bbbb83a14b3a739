//! Numeric primitives used by the drawing built-ins.
//!
//! `theta` is the law of cosines of hyperbolic geometry solved for an
//! angle; the random-number helpers are a small xorshift generator so
//! that runs can be reproduced from a seed.

use crate::types::{EPSILON, Scalar};

/// Angle at the origin of a hyperbolic triangle.
///
/// The other two vertices lie at distances `r1` and `r2` from the origin
/// and at distance `big_r` from each other. Returns `None` when no such
/// triangle exists or the angle is numerically undefined (a vertex at the
/// origin, or a cosine outside `[-1, 1]`).
#[must_use]
pub fn theta(r1: Scalar, r2: Scalar, big_r: Scalar) -> Option<Scalar> {
    let denominator = r1.sinh() * r2.sinh();
    if denominator.abs() < EPSILON {
        return None;
    }
    let cos = r1.cosh().mul_add(r2.cosh(), -big_r.cosh()) / denominator;
    // degenerate triangles land a hair outside the domain
    if !cos.is_finite() || cos.abs() > 1.0 + 1e-9 {
        return None;
    }
    Some(cos.clamp(-1.0, 1.0).acos())
}

/// Uniform random deviate in [0, x).
///
/// Uses a simple xorshift for reproducibility. The `seed` is mutated and
/// must not be zero.
pub fn uniform_deviate(x: Scalar, seed: &mut u64) -> Scalar {
    *seed ^= *seed << 13;
    *seed ^= *seed >> 7;
    *seed ^= *seed << 17;
    #[allow(clippy::cast_precision_loss)]
    let frac = (*seed >> 11) as Scalar / (1u64 << 53) as Scalar;
    frac * x
}

/// Uniform random number in `[from, to]`.
pub fn uniform_in(from: Scalar, to: Scalar, seed: &mut u64) -> Scalar {
    from + uniform_deviate(to - from, seed)
}

/// Turn an arbitrary value into a usable xorshift seed.
#[must_use]
pub const fn seed_from(value: u64) -> u64 {
    // splitmix64 finalizer; zero is the one seed xorshift cannot leave
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    if z == 0 { 1 } else { z }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
