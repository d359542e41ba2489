//! Common types and utilities shared across the ERA5 dashboard crates.

pub mod label;
pub mod time;

pub use label::{display_name, field_label, figure_title};
pub use time::{CfCalendar, TimeAxis, TimeParseError, TimeUnit};
