//! Overlap polygon of two simple, consistently wound regions.
//!
//! Walk B's outline. B vertices inside A are kept, and every crossing of a B
//! edge with A's boundary is emitted. Between an exit hit (B leaves A) and the
//! following entry hit, the overlap follows A's boundary. Both walking
//! directions along A are tested against B and exactly one must lie inside B.
//! Otherwise the result is reported as ambiguous.
//!
//! Inputs are assumed to be in general position. Edges of B collinear with
//! edges of A are skipped as parallel and vertices lying on A's boundary may
//! classify either way, so outlines sharing grid lines (pixel ROIs) often
//! come back as `Overlap::Ambiguous`.
//!
//! Bounds for both polygons are computed fresh here; the regions' cached
//! geometry is not consulted.

use super::boundary::ray_cast;
use super::model::Region;
use super::polygon::Bounds;
use super::types::Point;

/// Provenance of an overlap vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexKind {
    /// Vertex of B lying inside A.
    Inside,
    /// Crossing of a B edge with A's edge `edge`.
    Intersection { edge: usize },
    /// Vertex of A lying inside B.
    External,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaggedVertex {
    pub point: Point,
    pub kind: VertexKind,
}

/// Outcome of the two-polygon intersection.
#[derive(Clone, Debug, PartialEq)]
pub enum Overlap {
    Polygon(Vec<TaggedVertex>),
    /// Disjoint, degenerate or fewer than three vertices.
    Empty,
    /// The A-boundary arc between an exit and the next entry cannot be chosen:
    /// both (`both_inside`) or neither walking direction lies inside B.
    Ambiguous {
        exit_edge: usize,
        entry_edge: usize,
        both_inside: bool,
    },
}

impl Overlap {
    pub fn into_points(self) -> Option<Vec<Point>> {
        match self {
            Overlap::Polygon(v) => Some(v.into_iter().map(|t| t.point).collect()),
            _ => None,
        }
    }
}

/// Which way(s) along A connect an exit hit to the next entry hit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ArcChoice {
    /// A-vertex indices to insert, in walking order.
    Unique(Vec<usize>),
    Both,
    Neither,
}

/// Hit on A's boundary emitted while walking B.
#[derive(Clone, Copy, Debug)]
struct Hit {
    edge: usize,
    exit: bool,
}

/// A-vertex indices strictly between edges `from` and `to`, walking forward
/// (`from + 1 ..= to`) or backward (`from ..= to + 1`).
fn arc(n: usize, from: usize, to: usize, forward: bool) -> Vec<usize> {
    let mut out = Vec::new();
    if forward {
        let mut i = (from + 1) % n;
        loop {
            out.push(i);
            if i == to {
                break;
            }
            i = (i + 1) % n;
        }
    } else {
        let stop = (to + 1) % n;
        let mut i = from;
        loop {
            out.push(i);
            if i == stop {
                break;
            }
            i = (i + n - 1) % n;
        }
    }
    out
}

/// Choose the arc of A from `exit_edge` to `entry_edge` that lies inside B.
///
/// On the same edge the candidates are the straight connection (no vertex)
/// and the full loop around A; the loop is only a candidate when every
/// vertex of A is inside B.
pub(crate) fn choose_arc(pa: &[Point], pb: &[Point], bb: &Bounds, exit_edge: usize, entry_edge: usize) -> ArcChoice {
    let inside_b = |i: &usize| bb.contains(pb, pa[*i]);
    if exit_edge == entry_edge {
        return if (0..pa.len()).all(|i| inside_b(&i)) {
            ArcChoice::Both
        } else {
            ArcChoice::Unique(Vec::new())
        };
    }
    let fwd = arc(pa.len(), exit_edge, entry_edge, true);
    let bwd = arc(pa.len(), exit_edge, entry_edge, false);
    match (fwd.iter().all(inside_b), bwd.iter().all(inside_b)) {
        (true, false) => ArcChoice::Unique(fwd),
        (false, true) => ArcChoice::Unique(bwd),
        (true, true) => ArcChoice::Both,
        (false, false) => ArcChoice::Neither,
    }
}

fn tagged(pts: &[Point], kind: VertexKind) -> Vec<TaggedVertex> {
    pts.iter().map(|&point| TaggedVertex { point, kind }).collect()
}

/// Overlap of the outlines `pa` (A) and `pb` (B).
pub fn overlap_points(pa: &[Point], pb: &[Point]) -> Overlap {
    let (Some(ba), Some(bb)) = (Bounds::of(pa), Bounds::of(pb)) else {
        return Overlap::Empty;
    };
    if pa == pb {
        return if pa.len() >= 3 {
            Overlap::Polygon(tagged(pa, VertexKind::Inside))
        } else {
            Overlap::Empty
        };
    }

    let n = pb.len();
    let inside: Vec<bool> = pb.iter().map(|&v| ba.contains(pa, v)).collect();

    let mut walk: Vec<(Point, Option<Hit>)> = Vec::new();
    for k in 0..n {
        let (p, q) = (pb[k], pb[(k + 1) % n]);
        if inside[k] {
            walk.push((p, None));
        }
        let mut state = inside[k];
        let mut origin = p;
        let mut avoid = None;
        // a segment meets each edge of A at most once
        for _ in 0..pa.len() {
            let rest = q - origin;
            let hit = match ray_cast(pa, origin, rest, avoid).nearest {
                Some(h) if h.u <= 1.0 => h,
                _ => break,
            };
            origin += rest * hit.u;
            walk.push((
                origin,
                Some(Hit {
                    edge: hit.edge,
                    exit: state,
                }),
            ));
            state = !state;
            avoid = Some(hit.edge);
        }
    }

    if walk.is_empty() {
        // B never enters A: the overlap is A itself if A sits inside B.
        return if pa.len() >= 3 && pa.iter().all(|&v| bb.contains(pb, v)) {
            Overlap::Polygon(tagged(pa, VertexKind::External))
        } else {
            Overlap::Empty
        };
    }

    let m = walk.len();
    let mut out: Vec<TaggedVertex> = Vec::with_capacity(m);
    for j in 0..m {
        let (point, hit) = walk[j];
        out.push(TaggedVertex {
            point,
            kind: match hit {
                Some(h) => VertexKind::Intersection { edge: h.edge },
                None => VertexKind::Inside,
            },
        });
        let (Some(exit), (_, Some(entry))) = (hit, walk[(j + 1) % m]) else {
            continue;
        };
        if !exit.exit || entry.exit {
            continue;
        }
        match choose_arc(pa, pb, &bb, exit.edge, entry.edge) {
            ArcChoice::Unique(idx) => out.extend(idx.into_iter().map(|i| TaggedVertex {
                point: pa[i],
                kind: VertexKind::External,
            })),
            choice => {
                let both_inside = choice == ArcChoice::Both;
                tracing::warn!(
                    exit_edge = exit.edge,
                    entry_edge = entry.edge,
                    both_inside,
                    "ambiguous boundary arc in region intersection"
                );
                return Overlap::Ambiguous {
                    exit_edge: exit.edge,
                    entry_edge: entry.edge,
                    both_inside,
                };
            }
        }
    }

    if out.len() < 3 {
        return Overlap::Empty;
    }
    Overlap::Polygon(out)
}

/// Detailed overlap of two regions (A = `a`, B = `b`).
pub fn overlap(a: &Region, b: &Region) -> Overlap {
    overlap_points(&a.points(), &b.points())
}

/// Overlap outline of `a` and `b`, `None` when there is no usable overlap.
pub fn intersection_region(a: &Region, b: &Region) -> Option<Vec<Point>> {
    overlap(a, b).into_points()
}
