//! Shared test fixtures for the dashboard workspace.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod zarr;

// Re-export commonly used items at the crate root
pub use zarr::*;
