//! Value types attached to regions: display colors and per-species kinetics.

use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A 2D coordinate (also used for displacements).
pub type Point = Vector2<f64>;

/// Opaque chemical-species identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub u32);

/// 8-bit RGB display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Windows COLORREF packing `r | g << 8 | b << 16`.
    pub fn to_colorref(self) -> u32 {
        u32::from(self.r) | (u32::from(self.g) << 8) | (u32::from(self.b) << 16)
    }

    pub fn from_colorref(v: u32) -> Self {
        Self {
            r: (v & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: ((v >> 16) & 0xff) as u8,
        }
    }
}

/// `#rrggbb`
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Diffusion and trapping parameters of one species inside one region.
///
/// Units follow the simulator: `d`, `d_trapped` in µm²/s, rates in 1/s,
/// `site_density` in sites/µm². The crossing probabilities are per boundary
/// encounter, in [0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicParams {
    pub d: f64,
    pub d_trapped: f64,
    pub is_a_compartment: bool,
    pub is_d_distributed: bool,
    pub is_trapping_enabled: bool,
    pub are_sites_abundant: bool,
    pub site_density: f64,
    pub kon_abundant: f64,
    pub kon_non_abundant: f64,
    pub koff: f64,
    pub nb_trapped_particles: u64,
    pub poisson_mean: f64,
    pub p_crossing_in_to_out: f64,
    pub p_crossing_out_to_in: f64,
}

impl Default for DynamicParams {
    fn default() -> Self {
        Self {
            d: 0.0,
            d_trapped: 0.0,
            is_a_compartment: false,
            is_d_distributed: false,
            is_trapping_enabled: false,
            are_sites_abundant: false,
            site_density: 0.0,
            kon_abundant: 0.0,
            kon_non_abundant: 0.0,
            koff: 0.0,
            nb_trapped_particles: 0,
            poisson_mean: 0.0,
            // fully permeable until configured
            p_crossing_in_to_out: 1.0,
            p_crossing_out_to_in: 1.0,
        }
    }
}
