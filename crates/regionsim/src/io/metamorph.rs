//! MetaMorph region text (`.rgn`).
//!
//! One region per line, comma-separated fields `<key> <values…>`:
//! `0` shape type (1 rect, 3 polygon, 5 ellipse), `1` COLORREF, `2 x y`
//! origin, `6` geometry (polygon: `n x1 y1 … xn yn`, rect/ellipse: `w h`).
//! Keys 3, 4, 5 and 7 are written with fixed values and ignored on read.

use std::path::Path;

use super::{ellipse_in_box, rect_in_box, Outline};
use crate::region::{Point, Region, Rgb};

const SHAPE_RECT: u32 = 1;
const SHAPE_POLYGON: u32 = 3;
const SHAPE_ELLIPSE: u32 = 5;

#[derive(Default)]
struct Record {
    shape: Option<u32>,
    color: Option<u32>,
    origin: Option<Point>,
    geometry: Vec<f64>,
}

fn parse_record(line: &str) -> Result<Record, String> {
    let mut rec = Record::default();
    for field in line.split(',') {
        let mut tok = field.split_whitespace();
        let Some(key) = tok.next() else {
            continue;
        };
        let key: u32 = key.parse().map_err(|_| format!("bad field key {key:?}"))?;
        let vals = tok
            .map(|t| t.parse::<f64>().map_err(|_| format!("bad number {t:?} in field {key}")))
            .collect::<Result<Vec<_>, _>>()?;
        match key {
            0 => rec.shape = vals.first().map(|&v| v as u32),
            1 => rec.color = vals.first().map(|&v| v as u32),
            2 => {
                if let [x, y, ..] = vals[..] {
                    rec.origin = Some(Point::new(x, y));
                }
            }
            6 => rec.geometry = vals,
            _ => {}
        }
    }
    Ok(rec)
}

fn record_points(rec: &Record) -> Result<Vec<Point>, String> {
    let shape = rec.shape.ok_or("missing shape type")?;
    match shape {
        SHAPE_POLYGON => {
            let (&n, coords) = rec.geometry.split_first().ok_or("missing polygon geometry")?;
            let available = coords.len() / 2;
            if !(n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= available as f64) {
                return Err(format!("polygon declares {n} vertices, has {available}"));
            }
            let n = n as usize;
            Ok(coords[..2 * n].chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect())
        }
        SHAPE_RECT | SHAPE_ELLIPSE => {
            let origin = rec.origin.ok_or("missing origin")?;
            let [w, h, ..] = rec.geometry[..] else {
                return Err("missing box size".into());
            };
            let size = Point::new(w, h);
            Ok(if shape == SHAPE_RECT {
                rect_in_box(origin, size)
            } else {
                ellipse_in_box(origin, size)
            })
        }
        other => Err(format!("unsupported shape type {other}")),
    }
}

/// Parse MetaMorph region text. Malformed lines are skipped.
pub fn parse_metamorph(text: &str) -> Vec<Outline> {
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(line).and_then(|rec| Ok((record_points(&rec)?, rec.color))) {
            Ok((points, color)) => out.push(Outline {
                points,
                color: color.map(Rgb::from_colorref),
            }),
            Err(e) => tracing::warn!(line = lineno + 1, error = %e, "skipping metamorph record"),
        }
    }
    out
}

pub fn read_metamorph(path: impl AsRef<Path>) -> Vec<Outline> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => parse_metamorph(&text),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read metamorph file");
            Vec::new()
        }
    }
}

/// One polygon record per region, colored with the region's display color.
pub fn format_metamorph(regions: &[Region]) -> String {
    let mut s = String::new();
    for r in regions {
        let pts = r.points();
        let origin = pts.first().copied().unwrap_or_else(Point::zeros);
        s.push_str(&format!(
            "0 {SHAPE_POLYGON}, 1 {}, 2 {} {}, 3 0, 4 0, 5 1, 6 {}",
            r.color().to_colorref(),
            origin.x,
            origin.y,
            pts.len()
        ));
        for p in &pts {
            s.push_str(&format!(" {} {}", p.x, p.y));
        }
        s.push_str(", 7 1\n");
    }
    s
}

pub fn write_metamorph(path: impl AsRef<Path>, regions: &[Region]) -> std::io::Result<()> {
    std::fs::write(path, format_metamorph(regions))
}
