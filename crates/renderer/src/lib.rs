//! Figure rendering for gridded climate fields.
//!
//! Produces the dashboard's map view:
//! - Rasterized lon/lat field colored by a named colormap
//! - Coastline overlay
//! - Axes, colorbar and title drawn with a built-in bitmap face
//! - RGBA PNG encoding

pub mod canvas;
pub mod coastline;
pub mod colormap;
pub mod error;
pub mod figure;
pub mod glyphs;
pub mod png;
pub mod raster;

pub use canvas::{Canvas, Color};
pub use colormap::{colormap_names, Colormap, COLORMAP_NAMES};
pub use error::{RenderError, Result};
pub use figure::{render_figure, FigureOptions};
pub use png::encode_rgba;
pub use raster::{rasterize_field, FieldImage, MISSING_COLOR};
