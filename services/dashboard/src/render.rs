//! The render function: current control values in, rendered view out.
//!
//! Stateless between calls. Everything the rest of the service needs
//! from a render, including the year bounds resolved from the data,
//! comes back in the result; the caller decides what to do with it.

use anyhow::{anyhow, Context, Result};
use tracing::{debug, instrument};

use dash_common::{field_label, figure_title};
use renderer::{encode_rgba, render_figure, Colormap, FigureOptions};
use zarr_dataset::{ReadableStorageTraits, ZarrDataset};

/// One completed render.
#[derive(Debug, Clone)]
pub struct RenderedView {
    pub png: Vec<u8>,
    pub label: String,
    pub title: String,
    /// Min/max calendar year present in the dataset's time coordinate.
    /// The session loop applies these to the year slider bounds.
    pub year_bounds: (i32, i32),
    pub variable: String,
    pub year: i32,
    pub colormap: String,
}

#[instrument(skip(dataset, options))]
pub fn render_view<S>(
    dataset: &ZarrDataset<S>,
    variable: &str,
    year: i32,
    colormap: &str,
    options: &FigureOptions,
) -> Result<RenderedView>
where
    S: ReadableStorageTraits + Send + Sync + 'static,
{
    let year_bounds = dataset
        .time()
        .year_bounds()
        .ok_or_else(|| anyhow!("dataset time coordinate is empty"))?;

    // Years outside the available range resolve to a boundary slice.
    let time_index = dataset
        .time()
        .nearest_index_to_year_start(year)
        .ok_or_else(|| anyhow!("dataset time coordinate is empty"))?;

    let field = dataset
        .variable(variable)
        .with_context(|| format!("opening variable {}", variable))?;
    let slice = dataset
        .read_time_slice(&field, time_index)
        .with_context(|| format!("reading {} at time index {}", variable, time_index))?;

    let label = field_label(field.long_name(), field.units(), variable);
    let title = figure_title(field.long_name(), variable, year);

    let cmap =
        Colormap::by_name(colormap).ok_or_else(|| anyhow!("unknown colormap {}", colormap))?;

    let canvas = render_figure(
        &slice.values,
        slice.width,
        slice.height,
        dataset.latitudes(),
        dataset.longitudes(),
        &cmap,
        &label,
        &title,
        options,
    )?;
    let png = encode_rgba(canvas.pixels(), canvas.width(), canvas.height())?;

    debug!(
        "rendered {} for year {} at time index {} ({} bytes)",
        variable,
        year,
        time_index,
        png.len()
    );

    Ok(RenderedView {
        png,
        label,
        title,
        year_bounds,
        variable: variable.to_string(),
        year,
        colormap: colormap.to_string(),
    })
}
