//! Frames of reference built from hyperbolic isometries.
//!
//! A [`Frame`] maps a chosen point to the origin and a chosen direction
//! onto the positive x-axis. Curves are easy to sample in that standard
//! position and are mapped back afterwards.

use core::f64::consts::FRAC_PI_2;

use crate::polar::Pol;
use crate::types::Scalar;

/// An orientation-preserving isometry given as rotate, translate, rotate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Angular coordinate of the frame's centre.
    rotation: Scalar,
    /// Radial coordinate of the frame's centre.
    shift: Scalar,
    /// Direction, at the centre, that becomes the positive x-axis.
    alignment: Scalar,
}

impl Frame {
    /// The frame centred at `center`, whose x-axis points away from the
    /// origin (or along the global x-axis when `center` is the origin).
    #[must_use]
    pub const fn centered_at(center: Pol) -> Self {
        Self {
            rotation: center.phi,
            shift: center.r,
            alignment: 0.0,
        }
    }

    /// The frame centred at `from` whose x-axis passes through `to`.
    ///
    /// Returns the frame and the distance from `from` to `to`.
    #[must_use]
    pub fn along(from: Pol, to: Pol) -> (Self, Scalar) {
        let base = Self::centered_at(from);
        let target = base.to_standard(to);
        let frame = Self {
            alignment: target.phi,
            ..base
        };
        (frame, target.r)
    }

    /// Map a point of the plane into standard position.
    #[must_use]
    pub fn to_standard(&self, p: Pol) -> Pol {
        p.rotated_by(-self.rotation)
            .translated_horizontally_by(-self.shift)
            .rotated_by(-self.alignment)
    }

    /// Map a point in standard position back into the plane.
    #[must_use]
    pub fn from_standard(&self, p: Pol) -> Pol {
        p.rotated_by(self.alignment)
            .translated_horizontally_by(self.shift)
            .rotated_by(self.rotation)
    }

    /// The point at arc length `along` on the frame's x-axis, offset by the
    /// signed perpendicular distance `offset` (positive to the left).
    #[must_use]
    pub fn offset_point(&self, along: Scalar, offset: Scalar) -> Pol {
        let lifted = Pol::new(offset, FRAC_PI_2);
        self.from_standard(lifted.translated_horizontally_by(along))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
