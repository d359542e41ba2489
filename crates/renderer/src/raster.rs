//! Rasterization of a gridded field into an RGBA map image.
//!
//! The output is always drawn north-up regardless of the latitude order
//! in the source grid, and is resampled to the requested frame width
//! with nearest-neighbor lookup. Height follows the geographic aspect
//! ratio of the grid.

use rayon::prelude::*;

use crate::colormap::Colormap;
use crate::error::{RenderError, Result};

/// Fill color for cells without data.
pub const MISSING_COLOR: (u8, u8, u8, u8) = (210, 210, 210, 255);

/// Rasterized field plus the value range used for color scaling.
pub struct FieldImage {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
    /// Finite `(min, max)` of the source values, when any exist.
    pub value_range: Option<(f32, f32)>,
}

pub fn rasterize_field(
    values: &[f32],
    grid_width: usize,
    grid_height: usize,
    latitudes: &[f64],
    longitudes: &[f64],
    frame_width: usize,
    colormap: &Colormap,
) -> Result<FieldImage> {
    if frame_width == 0 {
        return Err(RenderError::invalid_dimensions("frame width must be > 0"));
    }
    if grid_width == 0 || grid_height == 0 {
        return Err(RenderError::invalid_dimensions(format!(
            "empty grid: {}x{}",
            grid_width, grid_height
        )));
    }
    if values.len() != grid_width * grid_height {
        return Err(RenderError::invalid_dimensions(format!(
            "expected {} values for a {}x{} grid, got {}",
            grid_width * grid_height,
            grid_width,
            grid_height,
            values.len()
        )));
    }
    if latitudes.len() != grid_height || longitudes.len() != grid_width {
        return Err(RenderError::invalid_dimensions(format!(
            "coordinate lengths {}x{} do not match grid {}x{}",
            longitudes.len(),
            latitudes.len(),
            grid_width,
            grid_height
        )));
    }

    // Row 0 of the source grid may be either pole. Flip when it is south.
    let north_first = match (latitudes.first(), latitudes.last()) {
        (Some(first), Some(last)) => first >= last,
        _ => true,
    };

    let width = frame_width;
    let height = image_height(frame_width, latitudes, longitudes);

    let value_range = finite_range(values);

    let mut pixels = vec![0u8; width * height * 4];
    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let sy = ((y as f64 + 0.5) * grid_height as f64 / height as f64) as usize;
            let mut src_row = sy.min(grid_height - 1);
            if !north_first {
                src_row = grid_height - 1 - src_row;
            }
            for x in 0..width {
                let sx = ((x as f64 + 0.5) * grid_width as f64 / width as f64) as usize;
                let src_col = sx.min(grid_width - 1);
                let v = values[src_row * grid_width + src_col];
                let (r, g, b, a) = if v.is_finite() {
                    let t = match value_range {
                        Some((lo, hi)) if hi > lo => (v - lo) / (hi - lo),
                        _ => 0.5,
                    };
                    let c = colormap.sample(t);
                    (c.r, c.g, c.b, c.a)
                } else {
                    MISSING_COLOR
                };
                let idx = x * 4;
                row[idx] = r;
                row[idx + 1] = g;
                row[idx + 2] = b;
                row[idx + 3] = a;
            }
        });

    Ok(FieldImage {
        pixels,
        width,
        height,
        value_range,
    })
}

/// Height that keeps the geographic aspect ratio of the grid. Grids
/// with a degenerate extent fall back to a half-width band.
fn image_height(frame_width: usize, latitudes: &[f64], longitudes: &[f64]) -> usize {
    let lat_span = match (latitudes.first(), latitudes.last()) {
        (Some(a), Some(b)) => (a - b).abs(),
        _ => 0.0,
    };
    let lon_span = match (longitudes.first(), longitudes.last()) {
        (Some(a), Some(b)) => (a - b).abs(),
        _ => 0.0,
    };
    if lat_span > f64::EPSILON && lon_span > f64::EPSILON {
        ((frame_width as f64 * lat_span / lon_span).round() as usize).max(1)
    } else {
        (frame_width / 2).max(1)
    }
}

fn finite_range(values: &[f32]) -> Option<(f32, f32)> {
    let mut range: Option<(f32, f32)> = None;
    for &v in values {
        if !v.is_finite() {
            continue;
        }
        range = Some(match range {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    range
}
