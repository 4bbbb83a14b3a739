//! Axis-aligned bounding boxes of drawings, in drawing units.

use kurbo::Point;

use crate::canvas::Canvas;
use crate::types::Scalar;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: Scalar,
    pub min_y: Scalar,
    pub max_x: Scalar,
    pub max_y: Scalar,
}

impl BoundingBox {
    /// An empty (inverted) bounding box.
    pub const EMPTY: Self = Self {
        min_x: Scalar::INFINITY,
        min_y: Scalar::INFINITY,
        max_x: Scalar::NEG_INFINITY,
        max_y: Scalar::NEG_INFINITY,
    };

    /// Check if this bounding box is valid (non-empty).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    #[must_use]
    pub fn width(&self) -> Scalar {
        if self.is_valid() {
            self.max_x - self.min_x
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn height(&self) -> Scalar {
        if self.is_valid() {
            self.max_y - self.min_y
        } else {
            0.0
        }
    }

    /// Expand to include a point.
    pub fn include_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Expand to include a disc.
    pub fn include_disc(&mut self, center: Point, radius: Scalar) {
        self.include_point(Point::new(center.x - radius, center.y - radius));
        self.include_point(Point::new(center.x + radius, center.y + radius));
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Bounding box of everything on the canvas, after scaling.
#[must_use]
pub fn canvas_bbox(canvas: &Canvas) -> BoundingBox {
    let mut bb = BoundingBox::EMPTY;
    for path in &canvas.paths {
        for p in &path.points {
            bb.include_point(p.to_euclidean(canvas.scale));
        }
    }
    for mark in &canvas.marks {
        bb.include_disc(mark.center.to_euclidean(canvas.scale), mark.radius * canvas.scale);
    }
    bb
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
