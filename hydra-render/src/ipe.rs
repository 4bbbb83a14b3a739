//! Ipe XML encoder.
//!
//! Ipe stores paths as a sequence of drawing operators after their
//! coordinates: `x y m` moves, `x y l` draws a line, `h` closes the path,
//! and `rx 0 0 ry x y e` is an ellipse. Ipe's Y axis points up, like the
//! canvas, so no flip is needed; drawings are centred on an A4 page.

use std::fmt::Write;

use kurbo::Point;

use hydra_geometry::canvas::{Canvas, Mark, Path};
use hydra_geometry::types::Scalar;

use crate::{RenderOptions, fmt_scalar};

/// Centre of the default Ipe page (A4, in PostScript points).
const PAGE_CENTER: Point = Point::new(297.5, 421.0);

const HEADER: &str = "<?xml version=\"1.0\"?>\n\
<!DOCTYPE ipe SYSTEM \"ipe.dtd\">\n\
<ipe version=\"70206\" creator=\"hydra\">\n\
<ipestyle name=\"basic\">\n\
</ipestyle>\n\
<page>\n\
<layer name=\"alpha\"/>\n\
<view layers=\"alpha\" active=\"alpha\"/>\n";

const FOOTER: &str = "</page>\n</ipe>\n";

/// Render a [`Canvas`] as an Ipe document.
#[must_use]
pub fn render_ipe(canvas: &Canvas, opts: &RenderOptions) -> String {
    let mut out = String::from(HEADER);
    for mark in &canvas.marks {
        write_mark(&mut out, mark, canvas.scale, opts.precision);
    }
    for path in &canvas.paths {
        write_path(&mut out, path, canvas.scale, opts.precision);
    }
    out.push_str(FOOTER);
    out
}

fn page_point(p: Point) -> Point {
    Point::new(p.x + PAGE_CENTER.x, p.y + PAGE_CENTER.y)
}

fn write_path(out: &mut String, path: &Path, scale: Scalar, precision: usize) {
    if path.is_empty() {
        return;
    }
    out.push_str("<path stroke=\"black\">\n");
    for (i, p) in path.points.iter().enumerate() {
        let e = page_point(p.to_euclidean(scale));
        let op = if i == 0 { 'm' } else { 'l' };
        let _ = writeln!(
            out,
            "{} {} {op}",
            fmt_scalar(e.x, precision),
            fmt_scalar(e.y, precision)
        );
    }
    if path.closed {
        out.push_str("h\n");
    }
    out.push_str("</path>\n");
}

fn write_mark(out: &mut String, mark: &Mark, scale: Scalar, precision: usize) {
    let c = page_point(mark.center.to_euclidean(scale));
    let r = fmt_scalar(mark.radius * scale, precision);
    out.push_str("<path stroke=\"black\"");
    if mark.filled {
        out.push_str(" fill=\"black\"");
    }
    let _ = write!(
        out,
        ">\n{r} 0 0 {r} {} {} e\n</path>\n",
        fmt_scalar(c.x, precision),
        fmt_scalar(c.y, precision)
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hydra_geometry::polar::Pol;

    #[test]
    fn empty_canvas_is_a_valid_document() {
        let doc = render_ipe(&Canvas::new(), &RenderOptions::default());
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("<page>"));
        assert!(doc.ends_with("</page>\n</ipe>\n"));
    }

    #[test]
    fn path_operators() {
        let mut canvas = Canvas::new();
        canvas.scale = 1.0;
        canvas.add_path(Path::from_points(vec![Pol::ORIGIN, Pol::new(2.0, 0.0)], true));
        let doc = render_ipe(&canvas, &RenderOptions::default());
        assert!(doc.contains("297.5 421 m\n"), "missing move: {doc}");
        assert!(doc.contains("299.5 421 l\n"), "missing line: {doc}");
        assert!(doc.contains("h\n</path>"), "closed path should end with h: {doc}");
    }

    #[test]
    fn open_path_has_no_close_operator() {
        let mut canvas = Canvas::new();
        canvas.add_path(Path::from_points(vec![Pol::ORIGIN, Pol::new(1.0, 1.0)], false));
        let doc = render_ipe(&canvas, &RenderOptions::default());
        assert!(!doc.contains("h\n"), "unexpected close: {doc}");
    }

    #[test]
    fn filled_mark_is_ellipse() {
        let mut canvas = Canvas::new();
        canvas.scale = 10.0;
        canvas.add_mark(Pol::ORIGIN, 0.5, true);
        let doc = render_ipe(&canvas, &RenderOptions::default());
        assert!(doc.contains("fill=\"black\""), "mark should be filled: {doc}");
        assert!(doc.contains("5 0 0 5 297.5 421 e"), "bad ellipse: {doc}");
    }
}
