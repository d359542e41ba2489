//! Builders for small on-disk Zarr stores shaped like the ERA5 annual-mean
//! collections: `time`/`latitude`/`longitude` coordinate arrays plus one or
//! more data variables with display attributes.

use std::path::Path;
use std::sync::Arc;

use zarrs::array::{ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

/// CF encoding used by every fixture store.
pub const TIME_UNITS: &str = "days since 1900-01-01";
pub const TIME_CALENDAR: &str = "noleap";

/// Mid-year day offset used for annual-mean timestamps.
pub const MID_YEAR_DAY: f64 = 182.0;

/// A data variable to include in a fixture store.
pub struct VariableSpec {
    pub name: &'static str,
    pub long_name: Option<&'static str>,
    pub units: Option<&'static str>,
    /// Whether the variable has a leading time dimension.
    pub with_time: bool,
    /// Cell value generator: (time index, latitude row, longitude column).
    pub value: fn(usize, usize, usize) -> f32,
}

impl VariableSpec {
    /// A 3-D temperature-like variable with both display attributes.
    pub fn temperature(name: &'static str) -> Self {
        Self {
            name,
            long_name: Some("2 metre temperature"),
            units: Some("K"),
            with_time: true,
            value: |t, row, col| 250.0 + t as f32 + (row * 10 + col) as f32 * 0.1,
        }
    }
}

/// A small global latitude coordinate, north first (descending, as ERA5
/// stores it).
pub fn coarse_latitudes() -> Vec<f64> {
    vec![75.0, 45.0, 15.0, -15.0, -45.0, -75.0]
}

/// A small 0..360 longitude coordinate.
pub fn coarse_longitudes() -> Vec<f64> {
    vec![0.0, 60.0, 120.0, 180.0, 240.0, 300.0]
}

/// Write a fixture store under `path` covering `years` (inclusive), with
/// annual samples timestamped mid-year.
pub fn write_era5_store(
    path: &Path,
    years: std::ops::RangeInclusive<i32>,
    latitudes: &[f64],
    longitudes: &[f64],
    variables: &[VariableSpec],
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(path)?;
    let store = Arc::new(FilesystemStore::new(path)?);

    let time_values: Vec<f64> = years
        .clone()
        .map(|y| f64::from(y - 1900) * 365.0 + MID_YEAR_DAY)
        .collect();

    write_coordinate(
        &store,
        "time",
        &time_values,
        &[
            ("units", serde_json::json!(TIME_UNITS)),
            ("calendar", serde_json::json!(TIME_CALENDAR)),
            ("long_name", serde_json::json!("time")),
        ],
    )?;
    write_coordinate(
        &store,
        "latitude",
        latitudes,
        &[
            ("units", serde_json::json!("degrees_north")),
            ("long_name", serde_json::json!("latitude")),
        ],
    )?;
    write_coordinate(
        &store,
        "longitude",
        longitudes,
        &[
            ("units", serde_json::json!("degrees_east")),
            ("long_name", serde_json::json!("longitude")),
        ],
    )?;

    let steps = time_values.len();
    for spec in variables {
        write_variable(&store, spec, steps, latitudes.len(), longitudes.len())?;
    }

    Ok(())
}

fn write_coordinate(
    store: &Arc<FilesystemStore>,
    name: &str,
    values: &[f64],
    attrs: &[(&str, serde_json::Value)],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut attributes = serde_json::Map::new();
    attributes.insert(
        "_ARRAY_DIMENSIONS".to_string(),
        serde_json::json!([name]),
    );
    for (key, value) in attrs {
        attributes.insert((*key).to_string(), value.clone());
    }

    let array = ArrayBuilder::new(
        vec![values.len() as u64],
        DataType::Float64,
        vec![values.len() as u64].try_into()?,
        FillValue::from(f64::NAN),
    )
    .attributes(attributes)
    .build(store.clone(), &format!("/{}", name))?;
    array.store_metadata()?;

    let subset = ArraySubset::new_with_ranges(&[0..values.len() as u64]);
    array.store_array_subset_elements(&subset, values)?;
    Ok(())
}

fn write_variable(
    store: &Arc<FilesystemStore>,
    spec: &VariableSpec,
    steps: usize,
    nlat: usize,
    nlon: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut attributes = serde_json::Map::new();
    if spec.with_time {
        attributes.insert(
            "_ARRAY_DIMENSIONS".to_string(),
            serde_json::json!(["time", "latitude", "longitude"]),
        );
    } else {
        attributes.insert(
            "_ARRAY_DIMENSIONS".to_string(),
            serde_json::json!(["latitude", "longitude"]),
        );
    }
    if let Some(long_name) = spec.long_name {
        attributes.insert("long_name".to_string(), serde_json::json!(long_name));
    }
    if let Some(units) = spec.units {
        attributes.insert("units".to_string(), serde_json::json!(units));
    }

    let (shape, chunks) = if spec.with_time {
        (
            vec![steps as u64, nlat as u64, nlon as u64],
            vec![1, nlat as u64, nlon as u64],
        )
    } else {
        (
            vec![nlat as u64, nlon as u64],
            vec![nlat as u64, nlon as u64],
        )
    };

    let array = ArrayBuilder::new(
        shape.clone(),
        DataType::Float32,
        chunks.try_into()?,
        FillValue::from(f32::NAN),
    )
    .attributes(attributes)
    .build(store.clone(), &format!("/{}", spec.name))?;
    array.store_metadata()?;

    let data = fill_values(spec, steps, nlat, nlon);
    let ranges: Vec<std::ops::Range<u64>> = shape.iter().map(|n| 0..*n).collect();
    let subset = ArraySubset::new_with_ranges(&ranges);
    array.store_array_subset_elements(&subset, &data)?;
    Ok(())
}

fn fill_values(spec: &VariableSpec, steps: usize, nlat: usize, nlon: usize) -> Vec<f32> {
    let time_count = if spec.with_time { steps } else { 1 };
    let mut data = Vec::with_capacity(time_count * nlat * nlon);
    for t in 0..time_count {
        for row in 0..nlat {
            for col in 0..nlon {
                data.push((spec.value)(t, row, col));
            }
        }
    }
    data
}
