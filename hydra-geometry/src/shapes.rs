//! Sampled paths for the basic hyperbolic shapes.
//!
//! Each shape is sampled in the standard position of a [`Frame`], where it
//! has a simple description, and mapped back into the plane.

use core::f64::consts::TAU;

use crate::canvas::Path;
use crate::frame::Frame;
use crate::polar::Pol;
use crate::types::{Scalar, lerp};

/// Evenly spaced parameters `0, 1/n, ..., 1` for `n = resolution`.
pub fn sample_parameters(resolution: usize) -> impl Iterator<Item = Scalar> {
    let n = resolution.max(1);
    (0..=n).map(move |i| fraction(i, n))
}

#[allow(clippy::cast_precision_loss)]
fn fraction(i: usize, n: usize) -> Scalar {
    i as Scalar / n as Scalar
}

/// A closed path approximating the circle of hyperbolic `radius` about
/// `center`.
#[must_use]
pub fn circle_path(center: Pol, radius: Scalar, resolution: usize) -> Path {
    let frame = Frame::centered_at(center);
    let n = resolution.max(3);
    let points = (0..n)
        .map(|i| frame.from_standard(Pol::new(radius, TAU * fraction(i, n))))
        .collect();
    Path::from_points(points, true)
}

/// An open path along the circle of hyperbolic `radius` about `center`,
/// from angle `from` to angle `to`.
///
/// Angles are measured at the centre, starting from the direction pointing
/// away from the origin.
#[must_use]
pub fn arc_path(center: Pol, radius: Scalar, from: Scalar, to: Scalar, resolution: usize) -> Path {
    let frame = Frame::centered_at(center);
    let points = sample_parameters(resolution)
        .map(|t| frame.from_standard(Pol::new(radius, lerp(from, to, t))))
        .collect();
    Path::from_points(points, false)
}

/// The geodesic segment from `from` to `to`.
#[must_use]
pub fn line_path(from: Pol, to: Pol, resolution: usize) -> Path {
    let (frame, length) = Frame::along(from, to);
    let points = sample_parameters(resolution)
        .map(|t| frame.offset_point(length * t, 0.0))
        .collect();
    Path::from_points(points, false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
