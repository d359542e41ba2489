//! Figure composition: map, axes, colorbar and title on one canvas.
//!
//! Mirrors the layout of a typical quick-look plot: the rasterized
//! field sits inside axis margins, a vertical colorbar with the field
//! caption hangs on the right, and the title runs across the top.

use tracing::debug;

use crate::canvas::{Canvas, Color};
use crate::coastline::draw_coastlines;
use crate::colormap::Colormap;
use crate::error::Result;
use crate::glyphs::{draw_text, draw_text_vertical, text_width};
use crate::raster::rasterize_field;

const LEFT_MARGIN: usize = 64;
const RIGHT_MARGIN: usize = 92;
const TOP_MARGIN: usize = 30;
const BOTTOM_MARGIN: usize = 36;

const TICK_LEN: i64 = 4;
const BAR_GAP: usize = 10;
const BAR_WIDTH: usize = 16;
const TITLE_SCALE: usize = 2;

const INK: Color = Color::rgb(30, 30, 30);
const COAST: Color = Color::rgb(40, 40, 40);

/// Rendering options for [`render_figure`].
#[derive(Debug, Clone)]
pub struct FigureOptions {
    /// Pixel width of the map area.
    pub frame_width: usize,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self { frame_width: 400 }
    }
}

/// Renders a complete figure for one field slice.
///
/// `caption` annotates the colorbar, `title` runs across the top. The
/// returned canvas is ready for PNG encoding.
#[allow(clippy::too_many_arguments)]
pub fn render_figure(
    values: &[f32],
    grid_width: usize,
    grid_height: usize,
    latitudes: &[f64],
    longitudes: &[f64],
    colormap: &Colormap,
    caption: &str,
    title: &str,
    options: &FigureOptions,
) -> Result<Canvas> {
    let image = rasterize_field(
        values,
        grid_width,
        grid_height,
        latitudes,
        longitudes,
        options.frame_width,
        colormap,
    )?;

    let map_x = LEFT_MARGIN as i64;
    let map_y = TOP_MARGIN as i64;
    let map_w = image.width;
    let map_h = image.height;
    let fig_w = LEFT_MARGIN + map_w + RIGHT_MARGIN;
    let fig_h = TOP_MARGIN + map_h + BOTTOM_MARGIN;

    let mut canvas = Canvas::new(fig_w, fig_h, Color::WHITE);
    canvas.blit(LEFT_MARGIN, TOP_MARGIN, &image.pixels, map_w, map_h);

    let lat_range = axis_range(latitudes);
    let lon_range = axis_range(longitudes);
    draw_coastlines(
        &mut canvas, map_x, map_y, map_w, map_h, lat_range, lon_range, COAST,
    );
    canvas.draw_rect_outline(map_x, map_y, map_w, map_h, INK);

    draw_lon_axis(&mut canvas, map_x, map_y, map_w, map_h, longitudes);
    draw_lat_axis(&mut canvas, map_x, map_y, map_h, latitudes);
    draw_colorbar(
        &mut canvas,
        map_x + map_w as i64 + BAR_GAP as i64,
        map_y,
        map_h,
        colormap,
        image.value_range,
        caption,
    );

    let title_w = text_width(title, TITLE_SCALE);
    let title_x = (fig_w.saturating_sub(title_w) / 2) as i64;
    draw_text(&mut canvas, title_x, 8, title, TITLE_SCALE, INK);

    debug!(
        "rendered {}x{} figure with colormap {}",
        fig_w,
        fig_h,
        colormap.name()
    );
    Ok(canvas)
}

fn axis_range(coords: &[f64]) -> (f64, f64) {
    match (coords.first(), coords.last()) {
        (Some(&a), Some(&b)) => (a.min(b), a.max(b)),
        _ => (0.0, 0.0),
    }
}

fn draw_lon_axis(
    canvas: &mut Canvas,
    map_x: i64,
    map_y: i64,
    map_w: usize,
    map_h: usize,
    longitudes: &[f64],
) {
    let axis_y = map_y + map_h as i64 - 1;
    let (first, last) = match (longitudes.first(), longitudes.last()) {
        (Some(&a), Some(&b)) => (a, b),
        _ => return,
    };
    let span = last - first;
    let (lo, hi) = (first.min(last), first.max(last));
    let ticks = nice_ticks(lo, hi, 5);
    let step = tick_step(&ticks);
    for v in ticks {
        let t = if span.abs() > f64::EPSILON {
            (v - first) / span
        } else {
            0.5
        };
        if !(0.0..=1.0).contains(&t) {
            continue;
        }
        let x = map_x + (t * (map_w as f64 - 1.0)).round() as i64;
        canvas.vline(x, axis_y + 1, axis_y + TICK_LEN, INK);
        let label = format_tick(v, step);
        let lx = x - text_width(&label, 1) as i64 / 2;
        draw_text(canvas, lx, axis_y + TICK_LEN + 4, &label, 1, INK);
    }
    let name_y = axis_y + TICK_LEN + 4 + 7 + 6;
    let name_x = map_x + map_w as i64 / 2 - text_width("lon", 1) as i64 / 2;
    draw_text(canvas, name_x, name_y, "lon", 1, INK);
}

fn draw_lat_axis(canvas: &mut Canvas, map_x: i64, map_y: i64, map_h: usize, latitudes: &[f64]) {
    let (lo, hi) = axis_range(latitudes);
    if (hi - lo).abs() <= f64::EPSILON {
        return;
    }
    let ticks = nice_ticks(lo, hi, 5);
    let step = tick_step(&ticks);
    for v in ticks {
        let t = (hi - v) / (hi - lo);
        if !(0.0..=1.0).contains(&t) {
            continue;
        }
        let y = map_y + (t * (map_h as f64 - 1.0)).round() as i64;
        canvas.hline(y, map_x - TICK_LEN, map_x - 1, INK);
        let label = format_tick(v, step);
        let lx = map_x - TICK_LEN - 4 - text_width(&label, 1) as i64;
        draw_text(canvas, lx, y - 3, &label, 1, INK);
    }
    let name_run = text_width("lat", 1) as i64;
    let name_y = map_y + map_h as i64 / 2 + name_run / 2;
    draw_text_vertical(canvas, 6, name_y, "lat", 1, INK);
}

fn draw_colorbar(
    canvas: &mut Canvas,
    bar_x: i64,
    bar_y: i64,
    bar_h: usize,
    colormap: &Colormap,
    value_range: Option<(f32, f32)>,
    caption: &str,
) {
    let denom = (bar_h.saturating_sub(1)).max(1) as f32;
    for row in 0..bar_h {
        let t = 1.0 - row as f32 / denom;
        let color = colormap.sample(t);
        canvas.hline(
            bar_y + row as i64,
            bar_x,
            bar_x + BAR_WIDTH as i64 - 1,
            color,
        );
    }
    canvas.draw_rect_outline(bar_x, bar_y, BAR_WIDTH, bar_h, INK);

    let label_x = bar_x + BAR_WIDTH as i64 + TICK_LEN + 3;
    if let Some((lo, hi)) = value_range {
        let ticks = nice_ticks(lo as f64, hi as f64, 5);
        let step = tick_step(&ticks);
        for v in ticks {
            let t = if hi > lo {
                (v - lo as f64) / (hi - lo) as f64
            } else {
                0.5
            };
            if !(0.0..=1.0).contains(&t) {
                continue;
            }
            let y = bar_y + ((1.0 - t) * (bar_h as f64 - 1.0)).round() as i64;
            canvas.hline(y, bar_x + BAR_WIDTH as i64, bar_x + BAR_WIDTH as i64 + TICK_LEN, INK);
            draw_text(canvas, label_x, y - 3, &format_tick(v, step), 1, INK);
        }
    }

    // Caption reads bottom-up beside the tick labels.
    let caption_x = label_x + 40 + 4;
    let run = text_width(caption, 1) as i64;
    let caption_y = bar_y + bar_h as i64 / 2 + run / 2;
    draw_text_vertical(canvas, caption_x, caption_y, caption, 1, INK);
}

/// Round tick positions covering `[min, max]` with roughly `target`
/// steps, using a 1/2/5 progression.
fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if (max - min).abs() <= f64::EPSILON {
        return vec![min];
    }
    let (lo, hi) = if min < max { (min, max) } else { (max, min) };
    let step = nice_step((hi - lo) / target.max(1) as f64);
    let mut v = (lo / step).ceil() * step;
    let mut out = Vec::new();
    while v <= hi + step * 1e-6 {
        out.push(if v.abs() < step * 1e-9 { 0.0 } else { v });
        v += step;
    }
    out
}

fn nice_step(raw: f64) -> f64 {
    let mag = 10f64.powf(raw.abs().log10().floor());
    let norm = raw / mag;
    let factor = if norm < 1.5 {
        1.0
    } else if norm < 3.5 {
        2.0
    } else if norm < 7.5 {
        5.0
    } else {
        10.0
    };
    factor * mag
}

fn tick_step(ticks: &[f64]) -> f64 {
    if ticks.len() >= 2 {
        (ticks[1] - ticks[0]).abs()
    } else {
        1.0
    }
}

fn format_tick(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{:.0}", value)
    } else if step >= 0.1 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_grid() -> (Vec<f32>, Vec<f64>, Vec<f64>) {
        let lats: Vec<f64> = vec![75.0, 45.0, 15.0, -15.0, -45.0, -75.0];
        let lons: Vec<f64> = vec![0.0, 60.0, 120.0, 180.0, 240.0, 300.0];
        let values: Vec<f32> = (0..36).map(|i| i as f32).collect();
        (values, lats, lons)
    }

    #[test]
    fn test_figure_dimensions_follow_frame_width() {
        let (values, lats, lons) = test_grid();
        let cmap = Colormap::by_name("viridis").unwrap();
        let canvas = render_figure(
            &values,
            6,
            6,
            &lats,
            &lons,
            &cmap,
            "2 metre temperature (K)",
            "Average annual 2 metre temperature on 2023",
            &FigureOptions::default(),
        )
        .unwrap();
        // Map is 400 wide; lat span 150 over lon span 300 gives 200 high.
        assert_eq!(canvas.width(), LEFT_MARGIN + 400 + RIGHT_MARGIN);
        assert_eq!(canvas.height(), TOP_MARGIN + 200 + BOTTOM_MARGIN);
    }

    #[test]
    fn test_title_band_is_drawn() {
        let (values, lats, lons) = test_grid();
        let cmap = Colormap::by_name("coolwarm").unwrap();
        let canvas = render_figure(
            &values,
            6,
            6,
            &lats,
            &lons,
            &cmap,
            "t2m (K)",
            "Average annual t2m on 1979",
            &FigureOptions::default(),
        )
        .unwrap();
        let mut dark = 0;
        for y in 0..TOP_MARGIN {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) == Some(INK) {
                    dark += 1;
                }
            }
        }
        assert!(dark > 50, "title not drawn: {} pixels", dark);
    }

    #[test]
    fn test_colorbar_spans_the_ramp() {
        let (values, lats, lons) = test_grid();
        let cmap = Colormap::by_name("viridis").unwrap();
        let canvas = render_figure(
            &values,
            6,
            6,
            &lats,
            &lons,
            &cmap,
            "t2m (K)",
            "Average annual t2m on 1979",
            &FigureOptions::default(),
        )
        .unwrap();
        let bar_x = LEFT_MARGIN + 400 + BAR_GAP + BAR_WIDTH / 2;
        let top = canvas.pixel(bar_x, TOP_MARGIN + 2).unwrap();
        let bottom = canvas.pixel(bar_x, TOP_MARGIN + 200 - 3).unwrap();
        let high = cmap.sample(1.0);
        let low = cmap.sample(0.0);
        // Top of the bar is near the high end, bottom near the low end.
        assert!((top.r as i32 - high.r as i32).abs() < 30);
        assert!((bottom.b as i32 - low.b as i32).abs() < 30);
        assert_ne!((top.r, top.g, top.b), (bottom.r, bottom.g, bottom.b));
    }

    #[test]
    fn test_single_cell_grid_still_renders() {
        let cmap = Colormap::by_name("Blues").unwrap();
        let canvas = render_figure(
            &[3.0],
            1,
            1,
            &[0.0],
            &[0.0],
            &cmap,
            "x",
            "Average annual x on 2000",
            &FigureOptions::default(),
        )
        .unwrap();
        assert_eq!(canvas.width(), LEFT_MARGIN + 400 + RIGHT_MARGIN);
        assert_eq!(canvas.height(), TOP_MARGIN + 200 + BOTTOM_MARGIN);
    }

    #[test]
    fn test_nice_ticks_use_round_steps() {
        let ticks = nice_ticks(0.0, 100.0, 5);
        assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);

        let ticks = nice_ticks(-90.0, 90.0, 5);
        assert!(ticks.contains(&0.0));
        assert!(ticks.iter().all(|t| t.abs() <= 90.0));

        let ticks = nice_ticks(250.0, 251.0, 5);
        assert!(ticks.len() >= 4 && ticks.len() <= 7);
    }

    #[test]
    fn test_format_tick_precision_tracks_step() {
        assert_eq!(format_tick(240.0, 20.0), "240");
        assert_eq!(format_tick(0.25, 0.25), "0.2");
        assert_eq!(format_tick(0.04, 0.02), "0.04");
    }
}
