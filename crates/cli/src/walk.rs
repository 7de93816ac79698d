//! Demo random walk of one particle inside a region.
//!
//! Gaussian steps (`sigma` per axis) are resolved against the outline with
//! `Region::resolve_step`. Without a species the flat `crossing_probability`
//! applies in both directions; with one, the species' in-to-out or out-to-in
//! probability is picked from the side the step starts on.

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::Normal;
use regionsim::region::{DynamicParams, Point, Region, SpeciesId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Walk parameters, loadable from JSON; missing keys take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkCfg {
    pub steps: usize,
    pub sigma: f64,
    pub crossing_probability: f64,
    pub max_bounces: usize,
    pub seed: u64,
    /// Species whose registered parameters supply the crossing probabilities.
    pub species: Option<u32>,
}

impl Default for WalkCfg {
    fn default() -> Self {
        Self {
            steps: 1000,
            sigma: 0.05,
            crossing_probability: 0.0,
            max_bounces: 32,
            seed: 0,
            species: None,
        }
    }
}

impl WalkCfg {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading walk config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing walk config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.crossing_probability) {
            bail!(
                "crossing probability {} is outside [0, 1]",
                self.crossing_probability
            );
        }
        if self.max_bounces == 0 {
            bail!("max_bounces must be positive");
        }
        Ok(())
    }
}

/// Command-line overrides; `None` keeps the configured value.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub steps: Option<usize>,
    pub sigma: Option<f64>,
    pub crossing_probability: Option<f64>,
    pub max_bounces: Option<usize>,
    pub seed: Option<u64>,
    pub species: Option<u32>,
}

impl Overrides {
    pub fn apply(&self, cfg: &mut WalkCfg) {
        if let Some(v) = self.steps {
            cfg.steps = v;
        }
        if let Some(v) = self.sigma {
            cfg.sigma = v;
        }
        if let Some(v) = self.crossing_probability {
            cfg.crossing_probability = v;
        }
        if let Some(v) = self.max_bounces {
            cfg.max_bounces = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if self.species.is_some() {
            cfg.species = self.species;
        }
    }
}

/// Species parameter file: a JSON object keyed by species id, e.g.
/// `{"1": {"d": 0.1, "p_crossing_in_to_out": 0.2}}`.
pub fn load_species_params(path: &Path) -> Result<HashMap<SpeciesId, DynamicParams>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading species parameters {}", path.display()))?;
    let raw: HashMap<u32, DynamicParams> = serde_json::from_str(&text)
        .with_context(|| format!("parsing species parameters {}", path.display()))?;
    Ok(raw.into_iter().map(|(k, v)| (SpeciesId(k), v)).collect())
}

#[derive(Clone, Debug, Serialize)]
pub struct Trajectory {
    pub region: String,
    pub start: [f64; 2],
    /// Position after each step.
    pub positions: Vec<[f64; 2]>,
    pub reflections: usize,
    pub crossings: usize,
    /// Steps cut short by the bounce limit.
    pub truncated_steps: usize,
    /// Share of recorded positions inside the region.
    pub inside_fraction: f64,
}

/// Parse `x,y`.
pub fn parse_point(s: &str) -> Result<[f64; 2], String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok([x, y])
}

/// Run the walk from `start` (the region's barycenter when `None`).
pub fn simulate(region: &Region, start: Option<Point>, cfg: &WalkCfg) -> Result<Trajectory> {
    cfg.validate()?;
    let species = cfg.species.map(SpeciesId);
    if let Some(s) = species {
        if !region.has_dynamic_param(s) {
            bail!("species {} has no parameters on region {}", s.0, region.name());
        }
    }
    let normal = Normal::new(0.0, cfg.sigma).with_context(|| format!("invalid sigma {}", cfg.sigma))?;
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let start = start.unwrap_or_else(|| region.barycenter());

    let mut pos = start;
    let mut traj = Trajectory {
        region: region.name().to_string(),
        start: [start.x, start.y],
        positions: Vec::with_capacity(cfg.steps),
        reflections: 0,
        crossings: 0,
        truncated_steps: 0,
        inside_fraction: 0.0,
    };
    let mut inside = 0usize;
    for _ in 0..cfg.steps {
        let dr = Point::new(rng.sample(normal), rng.sample(normal));
        let p = match species {
            Some(s) => region.crossing_probability(s, region.is_inside(pos)),
            None => cfg.crossing_probability,
        };
        let step = region.resolve_step(pos, dr, &mut rng, p, cfg.max_bounces);
        pos = step.position;
        traj.reflections += step.reflections;
        traj.crossings += step.crossings;
        if step.residual != Point::zeros() {
            traj.truncated_steps += 1;
        }
        if region.is_inside(pos) {
            inside += 1;
        }
        traj.positions.push([pos.x, pos.y]);
    }
    if cfg.steps > 0 {
        traj.inside_fraction = inside as f64 / cfg.steps as f64;
    }
    tracing::debug!(
        steps = cfg.steps,
        reflections = traj.reflections,
        crossings = traj.crossings,
        "walk finished"
    );
    Ok(traj)
}
