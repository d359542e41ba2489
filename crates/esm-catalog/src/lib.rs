//! Client for intake-ESM style dataset catalogs.
//!
//! A catalog is a remote JSON descriptor pointing at a CSV index whose rows
//! describe the available datasets (variable, frequency, asset path). This
//! crate fetches both documents and exposes the index as a queryable table.

pub mod client;
pub mod descriptor;
pub mod error;
pub mod table;

pub use client::EsmCatalog;
pub use descriptor::{AssetSpec, ColumnAttribute, EsmDescriptor};
pub use error::{CatalogError, Result};
pub use table::CatalogTable;
