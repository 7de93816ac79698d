//! `Region`: one polygonal compartment stored in a shared `MultiVecStore`.
//!
//! Cached scalars (barycenter, radius², surface) are NOT maintained on vertex
//! edits. Callers re-run the matching `compute_*` (or `update_geometry`) after
//! mutating the outline; `is_inside` trusts the cached bounding circle.

use std::collections::HashMap;

use crate::multivec::{shared_store, SeqHandle, SharedStore};

use super::polygon::{self, edge, segment_distance_squared, Bounds};
use super::types::{DynamicParams, Point, Rgb, SpeciesId};

/// Polygonal compartment with display attributes and per-species kinetics.
#[derive(Debug)]
pub struct Region {
    name: String,
    color: Rgb,
    highlight_color: Rgb,
    points: SeqHandle<Point>,
    barycenter: Point,
    radius_squared: f64,
    surface: f64,
    params: HashMap<SpeciesId, DynamicParams>,
}

impl Region {
    /// Empty region backed by its own private store.
    pub fn new(name: impl Into<String>) -> Self {
        Self::new_in(&shared_store(), name)
    }

    /// Empty region whose outline lives in `store`.
    pub fn new_in(store: &SharedStore<Point>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Rgb::new(255, 255, 0),
            highlight_color: Rgb::new(255, 0, 0),
            points: SeqHandle::acquire(store),
            barycenter: Point::zeros(),
            radius_squared: 0.0,
            surface: 0.0,
            params: HashMap::new(),
        }
    }

    /// Region pre-seeded with `pts`, cached geometry computed.
    pub fn from_points(name: impl Into<String>, pts: &[Point]) -> Self {
        Self::from_points_in(&shared_store(), name, pts)
    }

    pub fn from_points_in(store: &SharedStore<Point>, name: impl Into<String>, pts: &[Point]) -> Self {
        let mut r = Self::new_in(store, name);
        r.add_points(pts);
        r.update_geometry();
        r
    }

    pub fn store(&self) -> &SharedStore<Point> {
        self.points.store()
    }

    // ---- display -------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, c: Rgb) {
        self.color = c;
    }

    pub fn highlight_color(&self) -> Rgb {
        self.highlight_color
    }

    pub fn set_highlight_color(&mut self, c: Rgb) {
        self.highlight_color = c;
    }

    // ---- vertex edits --------------------------------------------------

    pub fn add_point(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn add_points(&mut self, pts: &[Point]) {
        self.points.extend_from_slice(pts);
    }

    /// Insert before vertex `pos`; no-op past the end.
    pub fn insert_point(&mut self, pos: usize, p: Point) -> bool {
        self.points.insert(pos, p)
    }

    pub fn remove_point(&mut self, idx: usize) -> bool {
        self.points.erase(idx)
    }

    pub fn clear_region(&mut self) {
        self.points.clear();
    }

    pub fn set_point(&mut self, idx: usize, p: Point) -> bool {
        self.points.set(idx, p)
    }

    pub fn point(&self, idx: usize) -> Option<Point> {
        self.points.get(idx)
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Owned copy of the outline.
    pub fn points(&self) -> Vec<Point> {
        self.points.to_vec()
    }

    /// Borrow the outline under the store lock.
    pub fn with_points<R>(&self, f: impl FnOnce(&[Point]) -> R) -> R {
        self.points.with_slice(f)
    }

    /// Move every vertex by `delta`. Cached geometry is shifted too.
    pub fn translate(&mut self, delta: Point) {
        self.points.with_mut_slice(|pts| pts.iter_mut().for_each(|p| *p += delta));
        self.barycenter += delta;
    }

    /// Same ordered vertex list.
    pub fn same_outline(&self, other: &Region) -> bool {
        // copy first: nested read guards on one RwLock may deadlock
        let mine = self.points();
        other.with_points(|theirs| mine.as_slice() == theirs)
    }

    // ---- derived geometry ----------------------------------------------

    pub fn compute_barycenter(&mut self) {
        match self.with_points(polygon::barycenter) {
            Some(c) => self.barycenter = c,
            None => tracing::error!(region = %self.name, "barycenter of an empty region"),
        }
    }

    /// Approximate bounding circle around the cached barycenter.
    pub fn compute_radius_squared(&mut self) {
        if self.is_empty() {
            tracing::error!(region = %self.name, "bounding radius of an empty region");
            return;
        }
        let c = self.barycenter;
        self.radius_squared = self.with_points(|pts| polygon::radius_squared(pts, c));
    }

    pub fn compute_surface(&mut self) {
        self.surface = self.with_points(polygon::surface);
    }

    /// Barycenter, then radius², then surface.
    pub fn update_geometry(&mut self) {
        self.compute_barycenter();
        self.compute_radius_squared();
        self.compute_surface();
    }

    pub fn barycenter(&self) -> Point {
        self.barycenter
    }

    pub fn radius_squared(&self) -> f64 {
        self.radius_squared
    }

    pub fn surface(&self) -> f64 {
        self.surface
    }

    pub(crate) fn bounds(&self) -> Bounds {
        Bounds {
            center: self.barycenter,
            radius_squared: self.radius_squared,
        }
    }

    /// Point-in-polygon via the cached bounding circle and a ray-parity test.
    pub fn is_inside(&self, p: Point) -> bool {
        let b = self.bounds();
        self.with_points(|pts| b.contains(pts, p))
    }

    /// Largest squared radius around `p` that no edge intrudes into, and
    /// whether `p` is inside.
    ///
    /// This is the boundary clearance of `p`, the squared distance to the
    /// nearest point of any edge segment. It is not the distance to the
    /// infinite edge lines: the perpendicular foot is used only when it falls
    /// on the edge, else the nearest endpoint. The minimum over all edges is
    /// returned (`f64::INFINITY` without edges).
    pub fn maximum_radius_squared(&self, p: Point) -> (f64, bool) {
        let inside = self.is_inside(p);
        let r2 = self.with_points(|pts| {
            (0..pts.len())
                .map(|i| {
                    let (start, e) = edge(pts, i);
                    segment_distance_squared(p, start, e)
                })
                .fold(f64::INFINITY, f64::min)
        });
        (r2, inside)
    }

    // ---- species parameters --------------------------------------------

    /// Register `species` with default parameters. Returns false (and keeps the
    /// existing record) when it was already registered.
    pub fn add_dynamic_param(&mut self, species: SpeciesId) -> bool {
        if self.params.contains_key(&species) {
            return false;
        }
        self.params.insert(species, DynamicParams::default());
        true
    }

    pub fn insert_dynamic_param(&mut self, species: SpeciesId, params: DynamicParams) {
        self.params.insert(species, params);
    }

    pub fn remove_dynamic_param(&mut self, species: SpeciesId) -> Option<DynamicParams> {
        self.params.remove(&species)
    }

    pub fn has_dynamic_param(&self, species: SpeciesId) -> bool {
        self.params.contains_key(&species)
    }

    /// Registered species, unordered.
    pub fn species(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        self.params.keys().copied()
    }

    pub fn try_param(&self, species: SpeciesId) -> Option<&DynamicParams> {
        self.params.get(&species)
    }

    /// Parameters of a registered species.
    ///
    /// # Panics
    /// If `species` was never registered with `add_dynamic_param`.
    pub fn param(&self, species: SpeciesId) -> &DynamicParams {
        match self.params.get(&species) {
            Some(p) => p,
            None => panic!("species {:?} is not registered on region {:?}", species, self.name),
        }
    }

    /// # Panics
    /// If `species` was never registered with `add_dynamic_param`.
    pub fn param_mut(&mut self, species: SpeciesId) -> &mut DynamicParams {
        match self.params.get_mut(&species) {
            Some(p) => p,
            None => panic!("species {:?} is not registered on region {:?}", species, self.name),
        }
    }

    pub fn increment_trapped(&mut self, species: SpeciesId) {
        self.param_mut(species).nb_trapped_particles += 1;
    }

    pub fn decrement_trapped(&mut self, species: SpeciesId) {
        let p = self.param_mut(species);
        p.nb_trapped_particles = p.nb_trapped_particles.saturating_sub(1);
    }

    /// Crossing probability for a particle leaving (`from_inside`) or entering.
    pub fn crossing_probability(&self, species: SpeciesId, from_inside: bool) -> f64 {
        let p = self.param(species);
        if from_inside {
            p.p_crossing_in_to_out
        } else {
            p.p_crossing_out_to_in
        }
    }
}

/// Deep copy into a fresh sequence of the same store.
impl Clone for Region {
    fn clone(&self) -> Self {
        let pts = self.points();
        Self {
            name: self.name.clone(),
            color: self.color,
            highlight_color: self.highlight_color,
            points: SeqHandle::from_slice(self.store(), &pts),
            barycenter: self.barycenter,
            radius_squared: self.radius_squared,
            surface: self.surface,
            params: self.params.clone(),
        }
    }
}
