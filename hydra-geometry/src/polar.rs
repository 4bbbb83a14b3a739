//! Points of the hyperbolic plane in native polar coordinates.
//!
//! A [`Pol`] stores the hyperbolic distance to the origin (`r`) and the
//! angle around it (`phi`). Rotations about the origin only touch the
//! angle; translations along the x-axis are computed on the hyperboloid
//! model, where they are linear boosts.

use std::fmt;

use core::f64::consts::PI;

use kurbo::Point;

use crate::types::{EPSILON, Scalar, angular_distance, normalize_angle};

/// A point given by its radial and angular coordinate.
///
/// The angular coordinate is always kept in `[0, 2π)` and the radial
/// coordinate is never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pol {
    /// Hyperbolic distance to the origin.
    pub r: Scalar,
    /// Angle around the origin, in radians.
    pub phi: Scalar,
}

impl Pol {
    /// The origin of the plane.
    pub const ORIGIN: Self = Self { r: 0.0, phi: 0.0 };

    /// Create a point, normalizing the angle.
    ///
    /// A negative radius is reflected through the origin.
    #[must_use]
    pub fn new(r: Scalar, phi: Scalar) -> Self {
        if r < 0.0 {
            Self {
                r: -r,
                phi: normalize_angle(phi + PI),
            }
        } else {
            Self {
                r,
                phi: normalize_angle(phi),
            }
        }
    }

    /// Interpret `(x, y)` as Euclidean coordinates of the native model.
    #[must_use]
    pub fn from_euclidean(x: Scalar, y: Scalar) -> Self {
        let r = x.hypot(y);
        if r < EPSILON {
            return Self::ORIGIN;
        }
        Self::new(r, y.atan2(x))
    }

    /// Euclidean coordinates of the point, multiplied by `scale`.
    #[must_use]
    pub fn to_euclidean(self, scale: Scalar) -> Point {
        let (sin, cos) = self.phi.sin_cos();
        Point::new(scale * self.r * cos, scale * self.r * sin)
    }

    /// Rotate the point about the origin.
    #[must_use]
    pub fn rotated_by(self, angle: Scalar) -> Self {
        Self::new(self.r, self.phi + angle)
    }

    /// Translate the point along the x-axis.
    ///
    /// A positive `distance` moves the origin to `(distance, 0)`; points
    /// off the axis move along the hypercycles of the translation.
    #[must_use]
    pub fn translated_horizontally_by(self, distance: Scalar) -> Self {
        if distance == 0.0 {
            return self;
        }
        // the boost leaves x2 unchanged and the time component is implied
        let (x0, x1, x2) = self.to_hyperboloid();
        let x1 = distance.sinh().mul_add(x0, distance.cosh() * x1);
        Self::from_hyperboloid(x1, x2)
    }

    /// Hyperbolic distance between two points.
    #[must_use]
    pub fn distance_to(self, other: Self) -> Scalar {
        let delta = angular_distance(self.phi, other.phi);
        let cosh_d = (self.r.cosh() * other.r.cosh())
            - (self.r.sinh() * other.r.sinh() * delta.cos());
        // rounding can push the argument just below 1 for nearby points
        cosh_d.max(1.0).acosh()
    }

    fn to_hyperboloid(self) -> (Scalar, Scalar, Scalar) {
        let sinh = self.r.sinh();
        let (sin, cos) = self.phi.sin_cos();
        (self.r.cosh(), sinh * cos, sinh * sin)
    }

    fn from_hyperboloid(x1: Scalar, x2: Scalar) -> Self {
        let r = x1.hypot(x2).asinh();
        if r < EPSILON {
            return Self::ORIGIN;
        }
        Self::new(r, x2.atan2(x1))
    }
}

impl Default for Pol {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Pol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pol({:.6}, {:.6})", self.r, self.phi)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
