//! Storage constructors for remote and local stores.

use std::path::Path;
use std::sync::Arc;

use object_store::http::{HttpBuilder, HttpStore};
use zarrs::storage::storage_adapter::async_to_sync::{
    AsyncToSyncBlockOn, AsyncToSyncStorageAdapter,
};
use zarrs_filesystem::FilesystemStore;
use zarrs_object_store::AsyncObjectStore;

use crate::dataset::ZarrDataset;
use crate::error::{DatasetError, Result};

/// Drives the async object_store backends from the blocking array API.
#[derive(Debug, Clone)]
pub struct TokioBlockOn(tokio::runtime::Handle);

impl TokioBlockOn {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self(handle)
    }
}

impl AsyncToSyncBlockOn for TokioBlockOn {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}

/// A plain HTTP(S) store exposed through the synchronous storage traits.
pub type HttpZarrStorage = AsyncToSyncStorageAdapter<AsyncObjectStore<HttpStore>, TokioBlockOn>;

/// Open a dataset from an HTTP(S) Zarr store URL.
///
/// Reads on the returned dataset block the calling thread while the runtime
/// behind `handle` performs the fetch; call from a dedicated thread or a
/// blocking task, never from an async context.
pub fn open_http(url: &str, handle: tokio::runtime::Handle) -> Result<ZarrDataset<HttpZarrStorage>> {
    let store = HttpBuilder::new()
        .with_url(url)
        .build()
        .map_err(|e| DatasetError::storage(format!("{}: {}", url, e)))?;
    let storage = Arc::new(AsyncToSyncStorageAdapter::new(
        Arc::new(AsyncObjectStore::new(store)),
        TokioBlockOn::new(handle),
    ));
    tracing::debug!(url, "opening http zarr store");
    ZarrDataset::open(storage)
}

/// Open a dataset from a store on the local filesystem.
pub fn open_path(path: &Path) -> Result<ZarrDataset<FilesystemStore>> {
    let store = FilesystemStore::new(path)
        .map_err(|e| DatasetError::storage(format!("{}: {}", path.display(), e)))?;
    ZarrDataset::open(Arc::new(store))
}
