//! Coastline overlay drawn on top of the rasterized field.
//!
//! Ships a coarse set of continental outlines as `(lon, lat)` polylines
//! so the map reads as a map without pulling in shapefile tooling. The
//! outlines are in degrees with longitudes in `[-180, 180]`; drawing
//! normalizes them into the longitude range of the store, which for the
//! ERA5 grids runs `0..360`.

use crate::canvas::{Canvas, Color};

#[rustfmt::skip]
const AMERICAS: &[(f32, f32)] = &[
    (-168.0, 65.0), (-166.0, 60.0), (-158.0, 58.0), (-152.0, 60.0), (-145.0, 60.0),
    (-135.0, 58.0), (-130.0, 54.0), (-125.0, 48.0), (-124.0, 40.0), (-117.0, 33.0),
    (-110.0, 23.0), (-105.0, 20.0), (-95.0, 16.0), (-90.0, 14.0), (-85.0, 10.0),
    (-79.0, 9.0), (-78.0, 2.0), (-80.0, -5.0), (-76.0, -14.0), (-70.0, -18.0),
    (-70.0, -30.0), (-72.0, -40.0), (-74.0, -50.0), (-68.0, -55.0), (-64.0, -48.0),
    (-62.0, -39.0), (-58.0, -34.0), (-48.0, -28.0), (-40.0, -22.0), (-35.0, -9.0),
    (-44.0, -3.0), (-50.0, 0.0), (-52.0, 5.0), (-61.0, 9.0), (-64.0, 11.0),
    (-72.0, 12.0), (-78.0, 9.0), (-81.0, 9.0), (-83.0, 15.0), (-88.0, 16.0),
    (-91.0, 19.0), (-97.0, 26.0), (-94.0, 30.0), (-89.0, 30.0), (-84.0, 30.0),
    (-81.0, 25.0), (-80.0, 27.0), (-76.0, 35.0), (-74.0, 40.0), (-70.0, 43.0),
    (-66.0, 45.0), (-60.0, 47.0), (-65.0, 50.0), (-60.0, 53.0), (-64.0, 60.0),
    (-68.0, 59.0), (-78.0, 62.0), (-85.0, 66.0), (-95.0, 69.0), (-110.0, 68.0),
    (-125.0, 70.0), (-140.0, 69.0), (-155.0, 71.0), (-165.0, 68.0), (-168.0, 65.0),
];

#[rustfmt::skip]
const EURASIA_AFRICA: &[(f32, f32)] = &[
    (-9.0, 36.0), (-9.0, 43.0), (-2.0, 44.0), (0.0, 46.0), (-5.0, 48.0),
    (-2.0, 50.0), (3.0, 52.0), (8.0, 54.0), (8.0, 57.0), (12.0, 56.0),
    (18.0, 55.0), (22.0, 59.0), (24.0, 65.0), (20.0, 70.0), (28.0, 71.0),
    (40.0, 68.0), (45.0, 68.0), (60.0, 69.0), (75.0, 72.0), (90.0, 75.0),
    (105.0, 77.0), (115.0, 74.0), (130.0, 72.0), (142.0, 72.0), (155.0, 70.0),
    (170.0, 68.0), (178.0, 66.0), (175.0, 62.0), (162.0, 58.0), (158.0, 53.0),
    (142.0, 52.0), (135.0, 44.0), (128.0, 40.0), (122.0, 38.0), (120.0, 32.0),
    (122.0, 26.0), (115.0, 22.0), (110.0, 20.0), (108.0, 12.0), (104.0, 8.0),
    (100.0, 8.0), (98.0, 12.0), (95.0, 16.0), (90.0, 22.0), (88.0, 21.0),
    (85.0, 13.0), (77.0, 8.0), (72.0, 20.0), (67.0, 24.0), (60.0, 25.0),
    (57.0, 27.0), (52.0, 26.0), (48.0, 30.0), (44.0, 12.0), (51.0, 12.0),
    (44.0, 11.0), (40.0, -2.0), (38.0, -15.0), (35.0, -20.0), (33.0, -26.0),
    (28.0, -33.0), (20.0, -35.0), (17.0, -29.0), (12.0, -18.0), (9.0, -8.0),
    (9.0, 0.0), (6.0, 4.0), (0.0, 5.0), (-8.0, 4.0), (-13.0, 9.0),
    (-17.0, 15.0), (-16.0, 20.0), (-10.0, 28.0), (-6.0, 34.0), (-9.0, 36.0),
];

#[rustfmt::skip]
const GREENLAND: &[(f32, f32)] = &[
    (-45.0, 60.0), (-52.0, 64.0), (-54.0, 68.0), (-50.0, 72.0), (-40.0, 76.0),
    (-30.0, 80.0), (-20.0, 78.0), (-22.0, 72.0), (-25.0, 68.0), (-38.0, 62.0),
    (-45.0, 60.0),
];

#[rustfmt::skip]
const AUSTRALIA: &[(f32, f32)] = &[
    (115.0, -35.0), (114.0, -28.0), (113.0, -22.0), (118.0, -18.0), (125.0, -14.0),
    (132.0, -11.0), (136.0, -12.0), (140.0, -17.0), (143.0, -14.0), (146.0, -19.0),
    (150.0, -25.0), (153.0, -30.0), (150.0, -37.0), (144.0, -38.0), (138.0, -35.0),
    (130.0, -32.0), (124.0, -33.0), (118.0, -35.0), (115.0, -35.0),
];

#[rustfmt::skip]
const ANTARCTICA: &[(f32, f32)] = &[
    (-180.0, -78.0), (-150.0, -76.0), (-120.0, -73.0), (-90.0, -72.0), (-60.0, -68.0),
    (-30.0, -70.0), (0.0, -70.0), (30.0, -68.0), (60.0, -67.0), (90.0, -66.0),
    (120.0, -66.0), (150.0, -70.0), (180.0, -78.0),
];

#[rustfmt::skip]
const BRITISH_ISLES: &[(f32, f32)] = &[
    (-5.0, 50.0), (-3.0, 53.0), (-5.0, 57.0), (-3.0, 58.0), (0.0, 53.0),
    (1.0, 51.0), (-5.0, 50.0),
];

#[rustfmt::skip]
const MADAGASCAR: &[(f32, f32)] = &[
    (44.0, -12.0), (50.0, -16.0), (47.0, -25.0), (44.0, -22.0), (44.0, -12.0),
];

#[rustfmt::skip]
const JAPAN: &[(f32, f32)] = &[
    (130.0, 31.0), (133.0, 34.0), (137.0, 35.0), (140.0, 36.0), (141.0, 40.0),
    (142.0, 44.0), (145.0, 44.0), (141.0, 39.0), (140.0, 35.0), (135.0, 33.0),
    (130.0, 31.0),
];

#[rustfmt::skip]
const NEW_GUINEA: &[(f32, f32)] = &[
    (131.0, -1.0), (136.0, -2.0), (141.0, -3.0), (147.0, -6.0), (150.0, -10.0),
    (143.0, -8.0), (138.0, -7.0), (134.0, -4.0), (131.0, -1.0),
];

#[rustfmt::skip]
const MARITIME_SE_ASIA: &[(f32, f32)] = &[
    (95.0, 5.0), (102.0, -4.0), (106.0, -6.0), (110.0, -7.0), (116.0, -4.0),
    (119.0, 1.0), (117.0, 5.0), (110.0, 7.0), (102.0, 6.0), (95.0, 5.0),
];

const COASTLINES: &[&[(f32, f32)]] = &[
    AMERICAS,
    EURASIA_AFRICA,
    GREENLAND,
    AUSTRALIA,
    ANTARCTICA,
    BRITISH_ISLES,
    MADAGASCAR,
    JAPAN,
    NEW_GUINEA,
    MARITIME_SE_ASIA,
];

/// Draws the built-in outlines into the map rectangle, clipped to it.
///
/// `lat_range` and `lon_range` give the geographic extent of the map as
/// `(min, max)` in the store's coordinate convention.
#[allow(clippy::too_many_arguments)]
pub fn draw_coastlines(
    canvas: &mut Canvas,
    map_x: i64,
    map_y: i64,
    map_w: usize,
    map_h: usize,
    lat_range: (f64, f64),
    lon_range: (f64, f64),
    color: Color,
) {
    if map_w == 0 || map_h == 0 {
        return;
    }
    let (lat_min, lat_max) = lat_range;
    let (lon_min, lon_max) = lon_range;
    let lat_span = lat_max - lat_min;
    let lon_span = lon_max - lon_min;
    if lat_span <= f64::EPSILON || lon_span <= f64::EPSILON {
        return;
    }

    let clip = (map_x, map_y, map_x + map_w as i64 - 1, map_y + map_h as i64 - 1);
    let seam = map_w as i64 / 2;

    for line in COASTLINES {
        for pair in line.windows(2) {
            let (x0, y0) = project(pair[0], map_x, map_y, map_w, map_h, lat_max, lat_span, lon_min, lon_span);
            let (x1, y1) = project(pair[1], map_x, map_y, map_w, map_h, lat_max, lat_span, lon_min, lon_span);
            // Segments that jump across the longitude seam would smear
            // a line across the whole map.
            if (x1 - x0).abs() > seam {
                continue;
            }
            canvas.draw_line_clipped(x0, y0, x1, y1, color, clip);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn project(
    point: (f32, f32),
    map_x: i64,
    map_y: i64,
    map_w: usize,
    map_h: usize,
    lat_max: f64,
    lat_span: f64,
    lon_min: f64,
    lon_span: f64,
) -> (i64, i64) {
    let (lon, lat) = (point.0 as f64, point.1 as f64);
    let mut l = lon;
    while l < lon_min {
        l += 360.0;
    }
    while l >= lon_min + 360.0 {
        l -= 360.0;
    }
    let x = map_x + ((l - lon_min) / lon_span * (map_w as f64 - 1.0)).round() as i64;
    let y = map_y + ((lat_max - lat) / lat_span * (map_h as f64 - 1.0)).round() as i64;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_black(canvas: &Canvas, rect: (usize, usize, usize, usize)) -> usize {
        let (rx, ry, rw, rh) = rect;
        let mut inside = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) == Some(Color::BLACK) {
                    let in_rect = x >= rx && x < rx + rw && y >= ry && y < ry + rh;
                    assert!(in_rect, "coastline pixel escaped the map at {},{}", x, y);
                    inside += 1;
                }
            }
        }
        inside
    }

    #[test]
    fn test_global_view_draws_inside_the_map_only() {
        let mut canvas = Canvas::new(500, 300, Color::WHITE);
        draw_coastlines(
            &mut canvas,
            50,
            40,
            400,
            200,
            (-90.0, 90.0),
            (-180.0, 180.0),
            Color::BLACK,
        );
        let drawn = count_black(&canvas, (50, 40, 400, 200));
        assert!(drawn > 500, "expected a visible overlay, got {} pixels", drawn);
    }

    #[test]
    fn test_zero_to_360_longitudes_still_draw_the_americas() {
        // In a 0..360 store the Americas live in the right half.
        let mut canvas = Canvas::new(400, 200, Color::WHITE);
        draw_coastlines(
            &mut canvas,
            0,
            0,
            400,
            200,
            (-90.0, 90.0),
            (0.0, 360.0),
            Color::BLACK,
        );
        let mut right_half = 0;
        for y in 0..200 {
            for x in 200..400 {
                if canvas.pixel(x, y) == Some(Color::BLACK) {
                    right_half += 1;
                }
            }
        }
        assert!(right_half > 100, "americas missing: {} pixels", right_half);
    }

    #[test]
    fn test_regional_window_clips_to_bounds() {
        let mut canvas = Canvas::new(200, 200, Color::WHITE);
        draw_coastlines(
            &mut canvas,
            20,
            20,
            100,
            100,
            (40.0, 60.0),
            (-10.0, 10.0),
            Color::BLACK,
        );
        // Only asserts containment; the window catches the British Isles.
        let drawn = count_black(&canvas, (20, 20, 100, 100));
        assert!(drawn > 0);
    }

    #[test]
    fn test_degenerate_extent_is_a_no_op() {
        let mut canvas = Canvas::new(100, 100, Color::WHITE);
        draw_coastlines(
            &mut canvas,
            0,
            0,
            100,
            100,
            (10.0, 10.0),
            (-180.0, 180.0),
            Color::BLACK,
        );
        assert_eq!(count_black(&canvas, (0, 0, 0, 0)), 0);
    }
}
