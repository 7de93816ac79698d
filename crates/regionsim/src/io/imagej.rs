//! ImageJ `.roi` reader (polygon, rectangle and oval ROIs).
//!
//! Big-endian header: magic `Iout`, type at byte 6, bounding box
//! top/left/bottom/right at 8/10/12/14, vertex count at 16. Polygon
//! coordinates start at byte 64: `n` x offsets then `n` y offsets, relative
//! to the box's left/top corner.

use std::path::Path;

use super::{ellipse_in_box, rect_in_box, Outline};
use crate::region::Point;

const MAGIC: &[u8; 4] = b"Iout";
const HEADER_LEN: usize = 64;
const TYPE_POLYGON: u16 = 0;
const TYPE_RECT: u16 = 256;
const TYPE_OVAL: u16 = 512;

fn be_u16(b: &[u8], at: usize) -> Option<u16> {
    let s = b.get(at..at + 2)?;
    Some(u16::from_be_bytes([s[0], s[1]]))
}

fn be_i16(b: &[u8], at: usize) -> Option<i16> {
    be_u16(b, at).map(|v| v as i16)
}

fn decode(bytes: &[u8]) -> Result<Vec<Point>, &'static str> {
    if bytes.len() < HEADER_LEN || &bytes[..4] != MAGIC {
        return Err("not an ImageJ roi");
    }
    let short = |at| be_i16(bytes, at).map(f64::from).ok_or("truncated header");
    let kind = be_u16(bytes, 6).ok_or("truncated header")?;
    let (top, left, bottom, right) = (short(8)?, short(10)?, short(12)?, short(14)?);
    let origin = Point::new(left, top);
    let size = Point::new(right - left, bottom - top);
    match kind {
        TYPE_RECT => Ok(rect_in_box(origin, size)),
        TYPE_OVAL => Ok(ellipse_in_box(origin, size)),
        TYPE_POLYGON => {
            let n = usize::from(be_u16(bytes, 16).ok_or("truncated header")?);
            let ys_at = HEADER_LEN + 2 * n;
            (0..n)
                .map(|k| -> Result<Point, &'static str> {
                    let x = be_i16(bytes, HEADER_LEN + 2 * k).ok_or("truncated coordinates")?;
                    let y = be_i16(bytes, ys_at + 2 * k).ok_or("truncated coordinates")?;
                    Ok(origin + Point::new(f64::from(x), f64::from(y)))
                })
                .collect()
        }
        _ => Err("unsupported roi type"),
    }
}

/// Decode one ROI; `None` (with a warning) when the bytes are not usable.
pub fn parse_imagej_roi(bytes: &[u8]) -> Option<Outline> {
    match decode(bytes) {
        Ok(points) => Some(Outline::new(points)),
        Err(e) => {
            tracing::warn!(error = e, len = bytes.len(), "skipping imagej roi");
            None
        }
    }
}

pub fn read_imagej_roi(path: impl AsRef<Path>) -> Option<Outline> {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) => parse_imagej_roi(&bytes),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read roi file");
            None
        }
    }
}
