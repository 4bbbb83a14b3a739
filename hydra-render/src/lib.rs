//! Encoders that turn a hydra [`Canvas`] into a drawing file.
//!
//! Two formats are supported, chosen by file extension:
//! - **SVG**, built with the `svg` crate. Canvas coordinates have Y pointing
//!   up; SVG has Y pointing down, so Y is negated per coordinate.
//! - **Ipe** XML, written directly (see [`ipe`]).
//!
//! Path data is built as raw `d` strings to keep `f64` precision.

pub mod ipe;

use std::fmt::Write;

use kurbo::Point;
use svg::Document;
use svg::node::element::{Circle, Group, Path as SvgPath};

use hydra_geometry::bbox::{BoundingBox, canvas_bbox};
use hydra_geometry::canvas::{Canvas, Mark, Path};
use hydra_geometry::types::Scalar;

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// A supported output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Svg,
    Ipe,
}

impl Format {
    /// Pick the format from a file name's extension (case-insensitive).
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "ipe" | "xml" => Some(Self::Ipe),
            _ => None,
        }
    }

    /// The canonical file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Ipe => "ipe",
        }
    }
}

/// Options controlling the output.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Extra margin around the bounding box (in drawing units). Default: 5.0.
    pub margin: Scalar,
    /// Number of decimal places for coordinates. Default: 4.
    pub precision: usize,
    /// Stroke width of paths and mark outlines. Default: 0.4.
    pub stroke_width: Scalar,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            margin: 5.0,
            precision: 4,
            stroke_width: 0.4,
        }
    }
}

/// Encode the canvas in the given format.
#[must_use]
pub fn render(canvas: &Canvas, format: Format, opts: &RenderOptions) -> String {
    match format {
        Format::Svg => render_svg(canvas, opts).to_string(),
        Format::Ipe => ipe::render_ipe(canvas, opts),
    }
}

/// Encode the canvas in the format implied by `file_name`.
///
/// Returns `None` if the extension is not recognised.
#[must_use]
pub fn render_for_file(canvas: &Canvas, file_name: &str) -> Option<String> {
    let format = Format::from_file_name(file_name)?;
    Some(render(canvas, format, &RenderOptions::default()))
}

// ---------------------------------------------------------------------------
// SVG
// ---------------------------------------------------------------------------

/// Render a [`Canvas`] to an SVG [`Document`].
///
/// The `viewBox` is derived from the canvas's bounding box plus the
/// margin.
#[must_use]
pub fn render_svg(canvas: &Canvas, opts: &RenderOptions) -> Document {
    let bb = canvas_bbox(canvas);
    let mut group = Group::new();
    for path in &canvas.paths {
        group = group.add(render_path(path, canvas.scale, opts));
    }
    for mark in &canvas.marks {
        group = group.add(render_mark(mark, canvas.scale, opts));
    }
    build_document(&bb, opts, group)
}

/// Render a sampled path to an SVG `<path>` element.
fn render_path(path: &Path, scale: Scalar, opts: &RenderOptions) -> SvgPath {
    SvgPath::new()
        .set("d", path_to_d(path, scale, opts.precision))
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", fmt_scalar(opts.stroke_width, opts.precision))
        .set("stroke-linejoin", "round")
}

/// Render a mark to an SVG `<circle>` element.
fn render_mark(mark: &Mark, scale: Scalar, opts: &RenderOptions) -> Circle {
    let c = mark.center.to_euclidean(scale);
    let circle = Circle::new()
        .set("cx", fmt_scalar(c.x, opts.precision))
        .set("cy", fmt_scalar(-c.y, opts.precision))
        .set("r", fmt_scalar(mark.radius * scale, opts.precision))
        .set("stroke", "black")
        .set("stroke-width", fmt_scalar(opts.stroke_width, opts.precision));
    if mark.filled {
        circle.set("fill", "black")
    } else {
        circle.set("fill", "none")
    }
}

/// Convert a path to an SVG `d` string (`M`, `L`, and `Z` for closed paths).
fn path_to_d(path: &Path, scale: Scalar, precision: usize) -> String {
    let mut d = String::new();
    for (i, p) in path.points.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        let e = p.to_euclidean(scale);
        write_point(&mut d, Point::new(e.x, -e.y), precision);
    }
    if path.closed && !path.points.is_empty() {
        d.push('Z');
    }
    d
}

/// Append `x,y` to a `d` string.
fn write_point(d: &mut String, p: Point, precision: usize) {
    let _ = write!(
        d,
        "{},{}",
        fmt_scalar(p.x, precision),
        fmt_scalar(p.y, precision)
    );
}

/// Format a scalar with the given precision, stripping trailing zeros.
pub(crate) fn fmt_scalar(v: Scalar, precision: usize) -> String {
    let s = format!("{v:.precision$}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        s
    };
    if s == "-0" { "0".to_owned() } else { s }
}

/// Build the final SVG [`Document`].
///
/// The `viewBox` negates the Y range of the bounding box: SVG
/// `min_y = -bb.max_y`.
fn build_document(bb: &BoundingBox, opts: &RenderOptions, content: Group) -> Document {
    let m = opts.margin;

    let (vb_x, vb_y, vb_w, vb_h) = if bb.is_valid() {
        (
            bb.min_x - m,
            -bb.max_y - m,
            2.0f64.mul_add(m, bb.width()),
            2.0f64.mul_add(m, bb.height()),
        )
    } else {
        (0.0, 0.0, 100.0, 100.0)
    };

    Document::new()
        .set("xmlns", "http://www.w3.org/2000/svg")
        .set(
            "viewBox",
            format!(
                "{} {} {} {}",
                fmt_scalar(vb_x, opts.precision),
                fmt_scalar(vb_y, opts.precision),
                fmt_scalar(vb_w, opts.precision),
                fmt_scalar(vb_h, opts.precision),
            ),
        )
        .set("width", format!("{}pt", fmt_scalar(vb_w, opts.precision)))
        .set("height", format!("{}pt", fmt_scalar(vb_h, opts.precision)))
        .add(content)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
