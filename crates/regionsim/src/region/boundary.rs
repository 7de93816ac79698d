//! Particle/boundary interaction: ray casts against the outline, permeable
//! crossing and specular reflection.
//!
//! One `reflect` call resolves only the first obstruction on the segment
//! `[r, r + dr]`. `resolve_step` is the caller loop that feeds the residual
//! displacement and the edge to avoid back in.

use rand::Rng;

use super::cfg::{PARAM_EPS, SAFETY_MARGIN};
use super::model::Region;
use super::polygon::{edge, solve_lines};
use super::types::Point;

/// Nearest forward hit of a ray on the outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeHit {
    /// Ray parameter: the hit is at `origin + u·displacement`.
    pub u: f64,
    pub edge: usize,
}

/// Two-bit crossing code of a ray cast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CrossingCode {
    /// Odd number of valid edge crossings: the origin is inside.
    pub odd_parity: bool,
    /// Some valid crossing has `u == 0`: the origin lies on an edge.
    pub on_edge: bool,
}

impl CrossingCode {
    /// bit 0: parity, bit 1: on-edge.
    pub fn bits(self) -> u8 {
        u8::from(self.odd_parity) | (u8::from(self.on_edge) << 1)
    }
}

/// Result of `intersect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayCast {
    pub nearest: Option<EdgeHit>,
    pub crossing: CrossingCode,
}

impl RayCast {
    #[inline]
    pub fn found(&self) -> bool {
        self.nearest.is_some()
    }
}

/// What happened to the particle during one `reflect` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryEvent {
    /// No edge on the way; the step completed.
    Free,
    Crossed { edge: usize },
    Reflected { edge: usize },
}

/// Outcome of one `reflect` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounce {
    pub r_end: Point,
    /// Residual displacement for the next call (zero after a free step).
    pub dr_end: Point,
    pub edge_to_avoid: Option<usize>,
    pub event: BoundaryEvent,
}

/// Cast the ray `origin + u·displacement` (`u >= 0`) against every edge.
///
/// All valid crossings (`0 <= t < 1`, `u >= 0`) feed the parity bit, including
/// `edge_to_avoid`. The nearest hit ignores `edge_to_avoid` and the trivial
/// hit at the origin (`u <= PARAM_EPS`). Parallel edges are skipped.
pub fn ray_cast(pts: &[Point], origin: Point, displacement: Point, edge_to_avoid: Option<usize>) -> RayCast {
    let mut crossing = CrossingCode::default();
    let mut nearest: Option<EdgeHit> = None;
    for i in 0..pts.len() {
        let (start, e) = edge(pts, i);
        let Some((t, u)) = solve_lines(origin, displacement, start, e) else {
            continue;
        };
        if !(0.0..1.0).contains(&t) || u < 0.0 {
            continue;
        }
        crossing.odd_parity = !crossing.odd_parity;
        if u == 0.0 {
            crossing.on_edge = true;
        }
        if Some(i) != edge_to_avoid && u > PARAM_EPS && nearest.map_or(true, |h| u < h.u) {
            nearest = Some(EdgeHit { u, edge: i });
        }
    }
    RayCast { nearest, crossing }
}

/// Nearest edge strictly inside the segment (`0 < t < 1`, `0 < u < 1`).
fn first_obstruction(pts: &[Point], r: Point, dr: Point, edge_to_avoid: Option<usize>) -> Option<EdgeHit> {
    let mut best: Option<EdgeHit> = None;
    for i in 0..pts.len() {
        if Some(i) == edge_to_avoid {
            continue;
        }
        let (start, e) = edge(pts, i);
        let Some((t, u)) = solve_lines(r, dr, start, e) else {
            continue;
        };
        if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 && best.map_or(true, |h| u < h.u) {
            best = Some(EdgeHit { u, edge: i });
        }
    }
    best
}

/// Mirror `d` about the unit tangent `t_hat`: `2 (d·t̂) t̂ - d`.
///
/// The tangential component is kept and the normal component flips sign.
#[inline]
pub fn mirror_about_tangent(d: Point, t_hat: Point) -> Point {
    t_hat * (2.0 * d.dot(&t_hat)) - d
}

/// Summary of a fully resolved step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepTrace {
    pub position: Point,
    /// Displacement left over when the event limit was hit (zero otherwise).
    pub residual: Point,
    pub reflections: usize,
    pub crossings: usize,
    pub last_edge: Option<usize>,
}

impl Region {
    /// Ray cast of `origin + u·displacement` against this outline.
    pub fn intersect(&self, origin: Point, displacement: Point, edge_to_avoid: Option<usize>) -> RayCast {
        self.with_points(|pts| ray_cast(pts, origin, displacement, edge_to_avoid))
    }

    /// Move a particle along `dr_start` until the first edge, then cross it
    /// with probability `crossing_probability` or bounce off it.
    ///
    /// - no obstruction: `r_end = r_start + (1 - SAFETY_MARGIN)·dr_start`,
    ///   zero residual, no edge to avoid;
    /// - crossing (`draw < p`): stop on the edge, residual `(1 - u)·dr_start`;
    /// - reflection: stop at `(1 - SAFETY_MARGIN)·u`, residual is the unused
    ///   displacement mirrored about the edge tangent.
    ///
    /// Exactly one uniform draw in `[0, 1)` is taken per obstruction, so
    /// `p = 1` always crosses and `p = 0` always reflects.
    pub fn reflect<R: Rng + ?Sized>(
        &self,
        r_start: Point,
        dr_start: Point,
        edge_to_avoid: Option<usize>,
        rng: &mut R,
        crossing_probability: f64,
    ) -> Bounce {
        let found = self.with_points(|pts| {
            first_obstruction(pts, r_start, dr_start, edge_to_avoid).map(|h| (h, edge(pts, h.edge).1))
        });
        let Some((hit, edge_vec)) = found else {
            return Bounce {
                r_end: r_start + dr_start * (1.0 - SAFETY_MARGIN),
                dr_end: Point::zeros(),
                edge_to_avoid: None,
                event: BoundaryEvent::Free,
            };
        };
        let draw: f64 = rng.gen();
        if draw < crossing_probability {
            return Bounce {
                r_end: r_start + dr_start * hit.u,
                dr_end: dr_start * (1.0 - hit.u),
                edge_to_avoid: Some(hit.edge),
                event: BoundaryEvent::Crossed { edge: hit.edge },
            };
        }
        let u = (1.0 - SAFETY_MARGIN) * hit.u;
        let unused = dr_start * (1.0 - u);
        Bounce {
            r_end: r_start + dr_start * u,
            dr_end: mirror_about_tangent(unused, edge_vec.normalize()),
            edge_to_avoid: Some(hit.edge),
            event: BoundaryEvent::Reflected { edge: hit.edge },
        }
    }

    /// Run `reflect` until the displacement is used up or `max_events`
    /// boundary events (crossings plus reflections) happened.
    pub fn resolve_step<R: Rng + ?Sized>(
        &self,
        start: Point,
        displacement: Point,
        rng: &mut R,
        crossing_probability: f64,
        max_events: usize,
    ) -> StepTrace {
        let mut trace = StepTrace {
            position: start,
            residual: displacement,
            reflections: 0,
            crossings: 0,
            last_edge: None,
        };
        let mut avoid = None;
        loop {
            let b = self.reflect(trace.position, trace.residual, avoid, rng, crossing_probability);
            trace.position = b.r_end;
            trace.residual = b.dr_end;
            avoid = b.edge_to_avoid;
            match b.event {
                BoundaryEvent::Free => return trace,
                BoundaryEvent::Crossed { edge } => {
                    trace.crossings += 1;
                    trace.last_edge = Some(edge);
                }
                BoundaryEvent::Reflected { edge } => {
                    trace.reflections += 1;
                    trace.last_edge = Some(edge);
                }
            }
            if trace.crossings + trace.reflections >= max_events {
                tracing::trace!(events = max_events, "step truncated at event limit");
                return trace;
            }
        }
    }
}
