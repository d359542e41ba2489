//! Lazy access to CF-style Zarr stores.
//!
//! A store is opened once and held for the process lifetime: coordinate
//! arrays (time, latitude, longitude) are read eagerly, data variables are
//! opened by name on demand and read one time-slice at a time. Works over
//! any storage that implements the synchronous storage traits; constructors
//! are provided for local paths and plain HTTP stores.

pub mod dataset;
pub mod error;
pub mod storage;

pub use dataset::{DataField, FieldSlice, ZarrDataset};
pub use error::{DatasetError, Result};
pub use storage::{open_http, open_path, HttpZarrStorage, TokioBlockOn};
// Storage trait bound needed by callers generic over the store.
pub use zarrs::storage::ReadableStorageTraits;
