//! The opened dataset: coordinates plus on-demand variable access.

use std::sync::Arc;

use zarrs::array::{Array, DataType};
use zarrs::array_subset::ArraySubset;
use zarrs::storage::ReadableStorageTraits;

use dash_common::TimeAxis;

use crate::error::{DatasetError, Result};

/// Accepted names for each coordinate array, probed in order.
const TIME_NAMES: &[&str] = &["time"];
const LAT_NAMES: &[&str] = &["latitude", "lat"];
const LON_NAMES: &[&str] = &["longitude", "lon"];

/// An opened Zarr collection with decoded coordinate arrays.
///
/// Data variables are not listed from the store (plain HTTP stores cannot be
/// listed); they are opened by name, with names supplied by the catalog.
pub struct ZarrDataset<S: ReadableStorageTraits + Send + Sync + 'static> {
    storage: Arc<S>,
    time: TimeAxis,
    time_name: String,
    latitudes: Vec<f64>,
    lat_name: String,
    longitudes: Vec<f64>,
    lon_name: String,
}

impl<S: ReadableStorageTraits + Send + Sync + 'static> ZarrDataset<S> {
    /// Open a store and read its coordinate arrays.
    ///
    /// The time coordinate must carry a CF `units` attribute; `calendar` is
    /// honored when present and defaults to the standard calendar.
    pub fn open(storage: Arc<S>) -> Result<Self> {
        let (time_name, time_array) = open_coordinate(&storage, TIME_NAMES)?;
        let (lat_name, lat_array) = open_coordinate(&storage, LAT_NAMES)?;
        let (lon_name, lon_array) = open_coordinate(&storage, LON_NAMES)?;

        let time_values = read_coordinate_values(&time_array)?;
        let latitudes = read_coordinate_values(&lat_array)?;
        let longitudes = read_coordinate_values(&lon_array)?;

        let units = string_attribute(&time_array, "units").ok_or_else(|| {
            DatasetError::MissingAttribute(format!("units on '{}'", time_name))
        })?;
        let calendar = string_attribute(&time_array, "calendar");
        let time = TimeAxis::new(time_values, &units, calendar.as_deref())?;

        tracing::debug!(
            time_steps = time.len(),
            lat = latitudes.len(),
            lon = longitudes.len(),
            calendar = ?time.calendar(),
            "opened dataset"
        );

        Ok(Self {
            storage,
            time,
            time_name,
            latitudes,
            lat_name,
            longitudes,
            lon_name,
        })
    }

    pub fn time(&self) -> &TimeAxis {
        &self.time
    }

    /// Latitude values in storage order (typically descending, north first).
    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    /// Longitude values in storage order.
    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    /// Open a data variable by name and read its display attributes.
    pub fn variable(&self, name: &str) -> Result<DataField<S>> {
        let path = format!("/{}", name.trim_start_matches('/'));
        let array = Array::open(self.storage.clone(), &path).map_err(|e| {
            DatasetError::VariableNotFound {
                name: name.to_string(),
                detail: e.to_string(),
            }
        })?;
        let long_name = string_attribute(&array, "long_name");
        let units = string_attribute(&array, "units");
        let dims = dimension_names(&array);
        Ok(DataField {
            array,
            name: name.to_string(),
            long_name,
            units,
            dims,
        })
    }

    /// Read the 2-D lon/lat slice of `field` at `time_index`.
    ///
    /// Three-dimensional variables are sliced along the time axis;
    /// two-dimensional variables (no time axis) are read whole and the index
    /// is ignored. Values equal to the array's fill value come back as NaN.
    pub fn read_time_slice(&self, field: &DataField<S>, time_index: usize) -> Result<FieldSlice> {
        let shape = field.array.shape();
        let (subset, height, width) = match shape.len() {
            3 => {
                field.check_dims(&[&self.time_name, &self.lat_name, &self.lon_name])?;
                if time_index as u64 >= shape[0] {
                    return Err(DatasetError::read_failed(format!(
                        "time index {} out of range for '{}' ({} steps)",
                        time_index, field.name, shape[0]
                    )));
                }
                let t = time_index as u64;
                (
                    ArraySubset::new_with_ranges(&[t..t + 1, 0..shape[1], 0..shape[2]]),
                    shape[1] as usize,
                    shape[2] as usize,
                )
            }
            2 => {
                field.check_dims(&[&self.lat_name, &self.lon_name])?;
                (
                    ArraySubset::new_with_ranges(&[0..shape[0], 0..shape[1]]),
                    shape[0] as usize,
                    shape[1] as usize,
                )
            }
            n => {
                return Err(DatasetError::unsupported_layout(format!(
                    "variable '{}' has {} dimensions, expected 2 or 3",
                    field.name, n
                )))
            }
        };

        if height != self.latitudes.len() || width != self.longitudes.len() {
            return Err(DatasetError::unsupported_layout(format!(
                "variable '{}' is {}x{}, coordinates are {}x{}",
                field.name,
                height,
                width,
                self.latitudes.len(),
                self.longitudes.len()
            )));
        }

        let mut values = read_f32_elements(&field.array, &subset)?;
        if let Some(fill) = fill_value_f32(&field.array) {
            if !fill.is_nan() {
                for v in values.iter_mut() {
                    if *v == fill {
                        *v = f32::NAN;
                    }
                }
            }
        }

        tracing::debug!(
            variable = %field.name,
            time_index,
            height,
            width,
            "read time slice"
        );

        Ok(FieldSlice {
            values,
            width,
            height,
        })
    }
}

/// A data variable opened from the store.
pub struct DataField<S: ReadableStorageTraits + Send + Sync + 'static> {
    array: Array<S>,
    name: String,
    long_name: Option<String>,
    units: Option<String>,
    dims: Option<Vec<String>>,
}

impl<S: ReadableStorageTraits + Send + Sync + 'static> DataField<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn shape(&self) -> &[u64] {
        self.array.shape()
    }

    /// Validate declared dimension names against the expected order.
    ///
    /// Stores without the dimension-name attribute are accepted positionally.
    fn check_dims(&self, expected: &[&str]) -> Result<()> {
        let Some(dims) = &self.dims else {
            return Ok(());
        };
        if dims.len() == expected.len() && dims.iter().zip(expected).all(|(d, e)| d == e) {
            Ok(())
        } else {
            Err(DatasetError::unsupported_layout(format!(
                "variable '{}' has dimensions {:?}, expected {:?}",
                self.name, dims, expected
            )))
        }
    }
}

/// Try each candidate name and return the first array that opens.
fn open_coordinate<S: ReadableStorageTraits + Send + Sync + 'static>(
    storage: &Arc<S>,
    names: &[&str],
) -> Result<(String, Array<S>)> {
    for name in names {
        let path = format!("/{}", name);
        if let Ok(array) = Array::open(storage.clone(), &path) {
            return Ok(((*name).to_string(), array));
        }
    }
    Err(DatasetError::MissingCoordinate(names.join("/")))
}

/// Read a 1-D coordinate array as f64, whatever its stored element type.
fn read_coordinate_values<S: ReadableStorageTraits + Send + Sync + 'static>(
    array: &Array<S>,
) -> Result<Vec<f64>> {
    let shape = array.shape();
    if shape.len() != 1 {
        return Err(DatasetError::unsupported_layout(format!(
            "coordinate array has {} dimensions, expected 1",
            shape.len()
        )));
    }
    let subset = ArraySubset::new_with_ranges(&[0..shape[0]]);
    match array.data_type() {
        DataType::Float64 => array
            .retrieve_array_subset_elements::<f64>(&subset)
            .map_err(|e| DatasetError::read_failed(e.to_string())),
        DataType::Float32 => array
            .retrieve_array_subset_elements::<f32>(&subset)
            .map(|v| v.into_iter().map(f64::from).collect())
            .map_err(|e| DatasetError::read_failed(e.to_string())),
        DataType::Int64 => array
            .retrieve_array_subset_elements::<i64>(&subset)
            .map(|v| v.into_iter().map(|x| x as f64).collect())
            .map_err(|e| DatasetError::read_failed(e.to_string())),
        DataType::Int32 => array
            .retrieve_array_subset_elements::<i32>(&subset)
            .map(|v| v.into_iter().map(f64::from).collect())
            .map_err(|e| DatasetError::read_failed(e.to_string())),
        other => Err(DatasetError::UnsupportedDataType(format!(
            "coordinate type {:?}",
            other
        ))),
    }
}

/// Read subset elements as f32, accepting f32 and f64 arrays.
fn read_f32_elements<S: ReadableStorageTraits + Send + Sync + 'static>(
    array: &Array<S>,
    subset: &ArraySubset,
) -> Result<Vec<f32>> {
    match array.data_type() {
        DataType::Float32 => array
            .retrieve_array_subset_elements::<f32>(subset)
            .map_err(|e| DatasetError::read_failed(e.to_string())),
        DataType::Float64 => array
            .retrieve_array_subset_elements::<f64>(subset)
            .map(|v| v.into_iter().map(|x| x as f32).collect())
            .map_err(|e| DatasetError::read_failed(e.to_string())),
        other => Err(DatasetError::UnsupportedDataType(format!(
            "variable type {:?}",
            other
        ))),
    }
}

/// Fill value as f32, when the element type has one this reader understands.
fn fill_value_f32<S: ReadableStorageTraits + Send + Sync + 'static>(
    array: &Array<S>,
) -> Option<f32> {
    let bytes = array.fill_value().as_ne_bytes();
    match array.data_type() {
        DataType::Float32 => bytes.try_into().ok().map(f32::from_ne_bytes),
        DataType::Float64 => bytes.try_into().ok().map(|b| f64::from_ne_bytes(b) as f32),
        _ => None,
    }
}

fn string_attribute<S: ReadableStorageTraits + Send + Sync + 'static>(
    array: &Array<S>,
    name: &str,
) -> Option<String> {
    array
        .attributes()
        .get(name)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Declared dimension names (the xarray `_ARRAY_DIMENSIONS` attribute).
fn dimension_names<S: ReadableStorageTraits + Send + Sync + 'static>(
    array: &Array<S>,
) -> Option<Vec<String>> {
    let dims = array.attributes().get("_ARRAY_DIMENSIONS")?.as_array()?;
    dims.iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// A single 2-D slice of a variable, row-major with latitude rows in the
/// coordinate array's storage order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlice {
    pub values: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl FieldSlice {
    /// Finite minimum and maximum of the slice, ignoring NaN cells.
    pub fn finite_range(&self) -> Option<(f32, f32)> {
        let mut range: Option<(f32, f32)> = None;
        for v in &self.values {
            if v.is_finite() {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
                    None => (*v, *v),
                });
            }
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_range_skips_nan() {
        let slice = FieldSlice {
            values: vec![f32::NAN, 2.0, -1.0, 5.0, f32::NAN],
            width: 5,
            height: 1,
        };
        assert_eq!(slice.finite_range(), Some((-1.0, 5.0)));
    }

    #[test]
    fn test_finite_range_all_nan() {
        let slice = FieldSlice {
            values: vec![f32::NAN; 4],
            width: 2,
            height: 2,
        };
        assert_eq!(slice.finite_range(), None);
    }
}
