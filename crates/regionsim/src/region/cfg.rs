//! Fixed numerical constants for boundary interaction (internal).
//!
//! Policy
//! - Constants, not knobs: nothing here is configurable per call.

/// Fraction of the step withheld in front of a boundary (and on free steps),
/// so a particle never lands exactly on an edge.
pub const SAFETY_MARGIN: f64 = 0.20;

/// Ray direction used by the parity test; never parallel to axis-aligned edges.
pub const RAY_DIRECTION: (f64, f64) = (0.5, 0.5);

/// Ray parameters at or below this value count as the trivial hit at the origin.
pub(crate) const PARAM_EPS: f64 = 1e-12;

/// Number of vertices used to synthesize ellipses from bounding boxes.
pub const ELLIPSE_SAMPLES: usize = 50;
