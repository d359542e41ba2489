//! End-to-end render tests against a local fixture store.

use tempfile::TempDir;
use test_utils::{coarse_latitudes, coarse_longitudes, write_era5_store, VariableSpec};
use zarr_dataset::open_path;

use dashboard::render::render_view;
use renderer::FigureOptions;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

fn fixture_store() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_era5_store(
        dir.path(),
        1940..=1944,
        &coarse_latitudes(),
        &coarse_longitudes(),
        &[VariableSpec::temperature("t2m")],
    )
    .unwrap();
    dir
}

fn png_dimensions(png: &[u8]) -> (u32, u32) {
    // IHDR is always the first chunk: width and height are the first
    // two big-endian words of its payload.
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    (width, height)
}

#[test]
fn test_render_produces_png_with_resolved_bounds() {
    let dir = fixture_store();
    let dataset = open_path(dir.path()).unwrap();

    let view = render_view(&dataset, "t2m", 1942, "viridis", &FigureOptions::default()).unwrap();

    assert_eq!(view.year_bounds, (1940, 1944));
    assert_eq!(view.variable, "t2m");
    assert_eq!(view.year, 1942);
    assert_eq!(view.colormap, "viridis");
    assert_eq!(view.label, "2 metre temperature (K)");
    assert_eq!(view.title, "Average annual 2 metre temperature on 1942");
    assert_eq!(&view.png[..8], &PNG_SIGNATURE);
}

#[test]
fn test_figure_dimensions_follow_the_frame_width_and_aspect() {
    let dir = fixture_store();
    let dataset = open_path(dir.path()).unwrap();

    let view = render_view(&dataset, "t2m", 1940, "viridis", &FigureOptions::default()).unwrap();

    // 400px map, 150/300 degree aspect, plus the fixed margins.
    let (width, height) = png_dimensions(&view.png);
    assert_eq!(width, 64 + 400 + 92);
    assert_eq!(height, 30 + 200 + 36);
}

#[test]
fn test_years_outside_the_archive_render_a_boundary_slice() {
    let dir = fixture_store();
    let dataset = open_path(dir.path()).unwrap();
    let options = FigureOptions::default();

    let early = render_view(&dataset, "t2m", 1890, "viridis", &options).unwrap();
    assert_eq!(early.year_bounds, (1940, 1944));
    // The title keeps the requested year even when the slice is clamped.
    assert_eq!(early.title, "Average annual 2 metre temperature on 1890");
    assert!(!early.png.is_empty());

    let late = render_view(&dataset, "t2m", 2050, "viridis", &options).unwrap();
    assert!(!late.png.is_empty());
}

#[test]
fn test_unknown_variable_is_an_error() {
    let dir = fixture_store();
    let dataset = open_path(dir.path()).unwrap();

    let err = render_view(&dataset, "sst", 1942, "viridis", &FigureOptions::default())
        .err()
        .map(|e| format!("{:#}", e))
        .unwrap();
    assert!(err.contains("sst"), "unexpected error: {}", err);
}

#[test]
fn test_unknown_colormap_is_an_error() {
    let dir = fixture_store();
    let dataset = open_path(dir.path()).unwrap();

    let err = render_view(&dataset, "t2m", 1942, "magma", &FigureOptions::default())
        .err()
        .map(|e| format!("{:#}", e))
        .unwrap();
    assert!(err.contains("unknown colormap"), "unexpected error: {}", err);
}
