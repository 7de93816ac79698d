//! Slice-level polygon primitives shared by `Region`, the boundary physics and
//! the two-polygon intersection.
//!
//! Conventions
//! - A polygon is a closed vertex loop; edge `i` runs from `pts[i]` to
//!   `pts[(i + 1) % n]`.
//! - Edge parameter `t` is half-open (`0 <= t < 1`), so a ray through a shared
//!   vertex is counted exactly once.

use super::cfg::RAY_DIRECTION;
use super::types::Point;

#[inline]
pub(crate) fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Start point and direction vector of edge `i`.
#[inline]
pub(crate) fn edge(pts: &[Point], i: usize) -> (Point, Point) {
    let a = pts[i];
    let b = pts[(i + 1) % pts.len()];
    (a, b - a)
}

/// Solve `origin + u·dir = start + t·e` for `(t, u)` by Cramer's rule.
///
/// Returns `None` when the lines are parallel (zero determinant).
#[inline]
pub(crate) fn solve_lines(origin: Point, dir: Point, start: Point, e: Point) -> Option<(f64, f64)> {
    let det = cross(dir, e);
    if det == 0.0 {
        return None;
    }
    let w = origin - start;
    Some((cross(dir, w) / det, cross(e, w) / det))
}

/// Arithmetic mean of the vertices; `None` for an empty polygon.
pub fn barycenter(pts: &[Point]) -> Option<Point> {
    if pts.is_empty() {
        return None;
    }
    let sum = pts.iter().fold(Point::zeros(), |acc, p| acc + p);
    Some(sum / pts.len() as f64)
}

/// `max_i |p_i - center|²`; 0 for an empty polygon.
pub fn radius_squared(pts: &[Point], center: Point) -> f64 {
    pts.iter()
        .map(|p| (p - center).norm_squared())
        .fold(0.0, f64::max)
}

/// Shoelace area `|Σ (x_{i-1} y_i - x_i y_{i-1})| / 2`. Valid for simple polygons.
pub fn surface(pts: &[Point]) -> f64 {
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n).map(|i| cross(pts[(i + n - 1) % n], pts[i])).sum();
    twice.abs() * 0.5
}

/// Ray-parity test without the bounding-circle pre-reject.
pub fn parity_contains(pts: &[Point], p: Point) -> bool {
    let dir = Point::new(RAY_DIRECTION.0, RAY_DIRECTION.1);
    let mut inside = false;
    for i in 0..pts.len() {
        let (start, e) = edge(pts, i);
        if let Some((t, u)) = solve_lines(p, dir, start, e) {
            if (0.0..1.0).contains(&t) && u >= 0.0 {
                inside = !inside;
            }
        }
    }
    inside
}

/// Squared distance from `p` to the segment `start + [0,1]·e`.
pub(crate) fn segment_distance_squared(p: Point, start: Point, e: Point) -> f64 {
    let len2 = e.norm_squared();
    if len2 == 0.0 {
        return (p - start).norm_squared();
    }
    let s = ((p - start).dot(&e) / len2).clamp(0.0, 1.0);
    (start + e * s - p).norm_squared()
}

/// Bounding circle around the barycenter, used as a containment pre-reject.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub center: Point,
    pub radius_squared: f64,
}

impl Bounds {
    /// Fresh bounds of a non-empty polygon.
    pub fn of(pts: &[Point]) -> Option<Self> {
        let center = barycenter(pts)?;
        Some(Self {
            center,
            radius_squared: radius_squared(pts, center),
        })
    }

    /// `true` when `p` cannot be inside: `|p - center|² >= radius²`.
    #[inline]
    pub fn rejects(&self, p: Point) -> bool {
        (p - self.center).norm_squared() >= self.radius_squared
    }

    /// Containment with the fast reject in front of the parity test.
    #[inline]
    pub fn contains(&self, pts: &[Point], p: Point) -> bool {
        !self.rejects(p) && parity_contains(pts, p)
    }
}
