//! Polygonal compartments and particle/boundary physics.
//!
//! Purpose
//! - `Region`: a closed vertex loop in a shared `MultiVecStore`, cached
//!   bounding geometry, display attributes and per-species kinetics.
//! - Boundary interaction (`intersect`, `reflect`) for the particle stepper.
//! - Two-polygon overlap for composing compartments.
//!
//! Assumptions
//! - Outlines are simple and consistently wound; nothing here normalizes
//!   winding or repairs self-intersections.
//! - Cached scalars are refreshed by the caller (`update_geometry`).
//!
//! Layout
//! - `polygon.rs`: slice-level primitives (shoelace, parity test, bounds).
//! - `model.rs`: `Region` state, vertex edits, cached geometry, species table.
//! - `boundary.rs`: ray casts, crossing/reflection, the step loop.
//! - `clip.rs`: overlap polygon.

pub mod cfg;
mod boundary;
mod clip;
mod model;
pub mod polygon;
mod types;

pub use boundary::{
    mirror_about_tangent, ray_cast, Bounce, BoundaryEvent, CrossingCode, EdgeHit, RayCast, StepTrace,
};
pub use clip::{intersection_region, overlap, overlap_points, Overlap, TaggedVertex, VertexKind};
pub use model::Region;
pub use polygon::Bounds;
pub use types::{DynamicParams, Point, Rgb, SpeciesId};

#[cfg(test)]
mod tests_boundary;
#[cfg(test)]
mod tests_clip;
