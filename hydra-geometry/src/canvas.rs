//! The drawing surface.
//!
//! A [`Canvas`] accumulates sampled paths and marks. It knows nothing about
//! file formats; the render crate turns it into SVG or Ipe.

use crate::error::GeometryError;
use crate::polar::Pol;
use crate::types::{DEFAULT_RESOLUTION, DEFAULT_SCALE, MAX_RESOLUTION, Scalar};

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// A polyline through sampled points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub points: Vec<Pol>,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

impl Path {
    /// An empty open path.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            points: Vec::new(),
            closed: false,
        }
    }

    /// A path through `points`.
    #[must_use]
    pub const fn from_points(points: Vec<Pol>, closed: bool) -> Self {
        Self { points, closed }
    }

    pub fn push(&mut self, point: Pol) {
        self.points.push(point);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

/// A dot drawn at a point. The radius is in hyperbolic units and is
/// rendered as a Euclidean disc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    pub center: Pol,
    pub radius: Scalar,
    pub filled: bool,
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Everything drawn so far, plus the sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub paths: Vec<Path>,
    pub marks: Vec<Mark>,
    /// Number of samples used per curve.
    resolution: usize,
    /// Drawing units per hyperbolic unit.
    pub scale: Scalar,
}

impl Canvas {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            paths: Vec::new(),
            marks: Vec::new(),
            resolution: DEFAULT_RESOLUTION,
            scale: DEFAULT_SCALE,
        }
    }

    /// Add a path. Empty paths are ignored.
    pub fn add_path(&mut self, path: Path) {
        if !path.is_empty() {
            self.paths.push(path);
        }
    }

    pub fn add_mark(&mut self, center: Pol, radius: Scalar, filled: bool) {
        self.marks.push(Mark {
            center,
            radius,
            filled,
        });
    }

    /// Remove all paths and marks. Settings are kept.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.marks.clear();
    }

    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Set the sample resolution. Fractional values are rounded up.
    ///
    /// # Errors
    ///
    /// Fails for non-positive or non-finite values and for values above
    /// [`MAX_RESOLUTION`].
    pub fn set_resolution(&mut self, samples: Scalar) -> Result<(), GeometryError> {
        if !samples.is_finite() || samples <= 0.0 {
            return Err(GeometryError::InvalidResolution(samples));
        }
        #[allow(clippy::cast_precision_loss)]
        let max = MAX_RESOLUTION as Scalar;
        if samples > max {
            return Err(GeometryError::ResolutionTooLarge(samples));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = samples.ceil() as usize;
        self.resolution = rounded;
        Ok(())
    }

    /// Whether nothing has been drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.marks.is_empty()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_defaults() {
        let canvas = Canvas::new();
        assert!(canvas.is_empty());
        assert_eq!(canvas.resolution(), DEFAULT_RESOLUTION);
        assert!((canvas.scale - DEFAULT_SCALE).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_paths_are_dropped() {
        let mut canvas = Canvas::new();
        canvas.add_path(Path::new());
        assert!(canvas.paths.is_empty());
        canvas.add_path(Path::from_points(vec![Pol::ORIGIN], false));
        assert_eq!(canvas.paths.len(), 1);
    }

    #[test]
    fn clear_keeps_resolution() {
        let mut canvas = Canvas::new();
        canvas.set_resolution(12.0).expect("valid resolution");
        canvas.add_mark(Pol::ORIGIN, 0.1, true);
        canvas.add_path(Path::from_points(vec![Pol::ORIGIN, Pol::new(1.0, 0.0)], false));
        canvas.clear();
        assert!(canvas.is_empty());
        assert_eq!(canvas.resolution(), 12);
    }

    #[test]
    fn resolution_rounds_up() {
        let mut canvas = Canvas::new();
        canvas.set_resolution(2.2).expect("valid resolution");
        assert_eq!(canvas.resolution(), 3);
    }

    #[test]
    fn resolution_rejects_non_positive() {
        let mut canvas = Canvas::new();
        assert_eq!(
            canvas.set_resolution(0.0),
            Err(GeometryError::InvalidResolution(0.0))
        );
        assert!(canvas.set_resolution(-5.0).is_err());
        assert!(canvas.set_resolution(f64::NAN).is_err());
        assert!(canvas.set_resolution(1e9).is_err());
        assert_eq!(canvas.resolution(), DEFAULT_RESOLUTION);
    }
}
