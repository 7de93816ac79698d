use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use regionsim::io::{format_svg, read_regions, write_metamorph, Outline};
use regionsim::region::{overlap, Overlap, Point, Region};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod walk;

use provenance::Payload;
use walk::{Overrides, WalkCfg};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Region inspection, overlap and random-walk runner")]
struct Cmd {
    /// Optional VK ticket UUID; propagated to outputs and logs
    #[arg(long)]
    vk: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print a JSON summary of every region in a MetaMorph or ImageJ file
    Info {
        #[arg(long)]
        input: PathBuf,
    },
    /// Write the overlap of the first region of two files as MetaMorph text
    Clip {
        #[arg(long)]
        a: PathBuf,
        #[arg(long)]
        b: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Render regions as SVG outlines
    Svg {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 512.0)]
        width: f64,
        #[arg(long, default_value_t = 512.0)]
        height: f64,
    },
    /// Random walk of one particle in the first region of a file
    Walk {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// JSON walk config; flags below override its values
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        steps: Option<usize>,
        #[arg(long)]
        sigma: Option<f64>,
        /// Crossing probability per boundary encounter
        #[arg(long)]
        p: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        max_bounces: Option<usize>,
        /// JSON species parameters registered on the region
        #[arg(long)]
        params: Option<PathBuf>,
        /// Species whose crossing probabilities replace `--p`
        #[arg(long)]
        species: Option<u32>,
        /// Start position `x,y`; defaults to the barycenter
        #[arg(long, value_parser = walk::parse_point, allow_hyphen_values = true)]
        start: Option<[f64; 2]>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Info { input } => info(&input),
        Action::Clip { a, b, out } => clip(&a, &b, &out, cmd.vk),
        Action::Svg {
            input,
            out,
            width,
            height,
        } => svg(&input, &out, width, height),
        Action::Walk {
            input,
            out,
            config,
            steps,
            sigma,
            p,
            seed,
            max_bounces,
            params,
            species,
            start,
        } => {
            let overrides = Overrides {
                steps,
                sigma,
                crossing_probability: p,
                max_bounces,
                seed,
                species,
            };
            let sources = WalkSources {
                input: &input,
                config: config.as_deref(),
                params: params.as_deref(),
            };
            run_walk(&sources, &out, &overrides, start, cmd.vk)
        }
        Action::Report => report(cmd.vk),
    }
}

/// All regions of `path`, named `<file stem>#<index>`; errors when there are none.
fn load_regions(path: &Path) -> Result<Vec<Region>> {
    let outlines: Vec<Outline> = read_regions(path);
    if outlines.is_empty() {
        bail!("no regions found in {}", path.display());
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "region".to_string());
    tracing::info!(path = %path.display(), count = outlines.len(), "regions loaded");
    Ok(outlines
        .into_iter()
        .enumerate()
        .map(|(k, o)| o.into_region(format!("{stem}#{k}")))
        .collect())
}

fn first_region(path: &Path) -> Result<Region> {
    load_regions(path)?
        .into_iter()
        .next()
        .with_context(|| format!("no regions found in {}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}

fn xy(p: Point) -> [f64; 2] {
    [p.x, p.y]
}

fn info(input: &Path) -> Result<()> {
    let summary: Vec<_> = load_regions(input)?
        .iter()
        .map(|r| {
            serde_json::json!({
                "name": r.name(),
                "vertices": r.len(),
                "barycenter": xy(r.barycenter()),
                "radius_squared": r.radius_squared(),
                "surface": r.surface(),
                "color": r.color().to_string(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn clip(a: &Path, b: &Path, out: &Path, vk: Option<String>) -> Result<()> {
    let (ra, rb) = (first_region(a)?, first_region(b)?);
    tracing::info!(a = ra.name(), b = rb.name(), "clip");
    let pts: Vec<Point> = match overlap(&ra, &rb) {
        Overlap::Polygon(v) => v.into_iter().map(|t| t.point).collect(),
        Overlap::Empty => bail!("{} and {} do not overlap", ra.name(), rb.name()),
        Overlap::Ambiguous {
            exit_edge,
            entry_edge,
            both_inside,
        } => bail!(
            "overlap of {} and {} is ambiguous between edges {exit_edge} and {entry_edge} (both directions inside: {both_inside})",
            ra.name(),
            rb.name()
        ),
    };
    let mut result = Region::from_points(format!("{}&{}", ra.name(), rb.name()), &pts);
    result.set_color(ra.color());
    ensure_parent(out)?;
    write_metamorph(out, std::slice::from_ref(&result))
        .with_context(|| format!("writing {}", out.display()))?;
    let params = serde_json::json!({
        "vertices": result.len(),
        "surface": result.surface(),
    });
    provenance::write_sidecar(
        out,
        Payload::new("clip", params)
            .with_inputs([a.display().to_string(), b.display().to_string()])
            .with_vk(vk),
    )?;
    Ok(())
}

fn svg(input: &Path, out: &Path, width: f64, height: f64) -> Result<()> {
    let regions = load_regions(input)?;
    ensure_parent(out)?;
    std::fs::write(out, format_svg(&regions, width, height))
        .with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(out = %out.display(), regions = regions.len(), "svg written");
    Ok(())
}

/// Files a walk reads from.
struct WalkSources<'a> {
    input: &'a Path,
    config: Option<&'a Path>,
    params: Option<&'a Path>,
}

fn run_walk(
    src: &WalkSources<'_>,
    out: &Path,
    overrides: &Overrides,
    start: Option<[f64; 2]>,
    vk: Option<String>,
) -> Result<()> {
    let mut cfg = match src.config {
        Some(path) => WalkCfg::load(path)?,
        None => WalkCfg::default(),
    };
    overrides.apply(&mut cfg);
    let mut region = first_region(src.input)?;
    if let Some(path) = src.params {
        for (species, params) in walk::load_species_params(path)? {
            region.insert_dynamic_param(species, params);
        }
    }
    tracing::info!(region = region.name(), ?cfg, "walk");
    let traj = walk::simulate(&region, start.map(|[x, y]| Point::new(x, y)), &cfg)?;

    ensure_parent(out)?;
    std::fs::write(out, serde_json::to_vec_pretty(&traj)?)
        .with_context(|| format!("writing {}", out.display()))?;
    provenance::write_sidecar(
        out,
        Payload::new("walk", serde_json::to_value(&cfg)?)
            .with_inputs(
                [Some(src.input), src.config, src.params]
                    .into_iter()
                    .flatten()
                    .map(|p| p.display().to_string()),
            )
            .with_vk(vk),
    )?;
    Ok(())
}

fn report(vk: Option<String>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&provenance::summary(vk.as_deref()))?);
    Ok(())
}
