//! Polygonal compartments for 2D single-particle diffusion simulations.
//!
//! Layers
//! - `multivec`: many variable-length sequences packed into one contiguous
//!   buffer, so every region outline can be uploaded or scanned in bulk.
//! - `region`: the `Region` compartment (outline, cached geometry, display
//!   attributes, per-species kinetics), particle/boundary interaction and
//!   two-polygon overlap.
//! - `io`: MetaMorph and ImageJ outline import, MetaMorph and SVG export.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Numeric constants live in `region::cfg` and are not per-call knobs.

pub mod io;
pub mod multivec;
pub mod region;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;
pub use region::{Point, Region};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::io::{read_regions, Outline};
    pub use crate::multivec::{shared_store, MultiVecStore, SeqHandle, SeqId, SharedStore};
    pub use crate::region::{
        intersection_region, overlap, BoundaryEvent, DynamicParams, Overlap, Point, Region, Rgb,
        SpeciesId, StepTrace,
    };
    pub use nalgebra::Vector2 as Vec2;
}
