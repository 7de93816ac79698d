//! Region outline files: MetaMorph `.rgn` text, ImageJ `.roi` binary, SVG export.
//!
//! Policy
//! - Readers never fail hard: unreadable files yield an empty list and
//!   malformed records are skipped, each with a `warn!`.
//! - Rectangles and ellipses are converted to polygons on import;
//!   ellipses use `cfg::ELLIPSE_SAMPLES` vertices.
//! - Export always writes polygons.

use std::path::Path;

use crate::region::cfg::ELLIPSE_SAMPLES;
use crate::region::{Point, Region, Rgb};

mod imagej;
mod metamorph;
mod svg;

pub use imagej::{parse_imagej_roi, read_imagej_roi};
pub use metamorph::{format_metamorph, parse_metamorph, read_metamorph, write_metamorph};
pub use svg::format_svg;

/// One imported outline; `color` is set when the format carries one.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    pub points: Vec<Point>,
    pub color: Option<Rgb>,
}

impl Outline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points, color: None }
    }

    /// Region with this outline and color, cached geometry computed.
    pub fn into_region(self, name: impl Into<String>) -> Region {
        let mut r = Region::from_points(name, &self.points);
        if let Some(c) = self.color {
            r.set_color(c);
        }
        r
    }
}

/// Read outlines from `path`: `.roi` as ImageJ, anything else as MetaMorph.
pub fn read_regions(path: impl AsRef<Path>) -> Vec<Outline> {
    let path = path.as_ref();
    let is_roi = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("roi"));
    if is_roi {
        read_imagej_roi(path).into_iter().collect()
    } else {
        read_metamorph(path)
    }
}

/// Polygon approximation of the ellipse inscribed in the box
/// `[origin, origin + size]`, counterclockwise from angle 0.
pub(crate) fn ellipse_in_box(origin: Point, size: Point) -> Vec<Point> {
    let half = size * 0.5;
    let center = origin + half;
    (0..ELLIPSE_SAMPLES)
        .map(|k| {
            let th = k as f64 / ELLIPSE_SAMPLES as f64 * std::f64::consts::TAU;
            center + Point::new(half.x * th.cos(), half.y * th.sin())
        })
        .collect()
}

/// Corners of the box `[origin, origin + size]`, counterclockwise.
pub(crate) fn rect_in_box(origin: Point, size: Point) -> Vec<Point> {
    vec![
        origin,
        origin + Point::new(size.x, 0.0),
        origin + size,
        origin + Point::new(0.0, size.y),
    ]
}
