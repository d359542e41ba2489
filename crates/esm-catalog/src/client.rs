//! Fetching and opening remote catalogs.

use reqwest::{Client, Url};
use tracing::instrument;

use crate::descriptor::EsmDescriptor;
use crate::error::{CatalogError, Result};
use crate::table::CatalogTable;

/// An opened catalog: descriptor plus the parsed CSV index.
#[derive(Debug, Clone)]
pub struct EsmCatalog {
    url: Url,
    descriptor: EsmDescriptor,
    table: CatalogTable,
}

impl EsmCatalog {
    /// Fetch the descriptor at `url`, then the CSV index it names, and parse
    /// both. Relative `catalog_file` locations resolve against the
    /// descriptor URL.
    #[instrument(skip(client))]
    pub async fn open(client: &Client, url: &str) -> Result<Self> {
        let descriptor_url =
            Url::parse(url).map_err(|e| CatalogError::invalid_url(format!("{}: {}", url, e)))?;

        let descriptor: EsmDescriptor = client
            .get(descriptor_url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::fetch(format!("descriptor request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| CatalogError::fetch(format!("descriptor request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| CatalogError::descriptor(e.to_string()))?;

        let index_url = resolve_index_url(&descriptor_url, &descriptor.catalog_file)?;
        tracing::debug!(
            catalog = descriptor.id.as_deref().unwrap_or("<unnamed>"),
            index = %index_url,
            "fetching catalog index"
        );

        let index_text = client
            .get(index_url)
            .send()
            .await
            .map_err(|e| CatalogError::fetch(format!("index request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| CatalogError::fetch(format!("index request failed: {}", e)))?
            .text()
            .await
            .map_err(|e| CatalogError::fetch(format!("index body read failed: {}", e)))?;

        let table = CatalogTable::from_csv(&index_text)?;
        tracing::debug!(rows = table.len(), columns = table.columns().len(), "catalog index loaded");

        Ok(Self {
            url: descriptor_url,
            descriptor,
            table,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn descriptor(&self) -> &EsmDescriptor {
        &self.descriptor
    }

    /// The full index table.
    pub fn table(&self) -> &CatalogTable {
        &self.table
    }

    /// Distinct values of the `variable` column, first-seen order. These
    /// become the variable selector's options.
    pub fn variables(&self) -> Result<Vec<String>> {
        self.table.distinct("variable")
    }

    /// Filter the index by column equality predicates.
    pub fn search(&self, predicates: &[(&str, &str)]) -> Result<CatalogTable> {
        self.table.search(predicates)
    }
}

/// Resolve the index location from the descriptor's `catalog_file` field.
fn resolve_index_url(descriptor_url: &Url, catalog_file: &str) -> Result<Url> {
    if let Ok(absolute) = Url::parse(catalog_file) {
        return Ok(absolute);
    }
    descriptor_url
        .join(catalog_file)
        .map_err(|e| CatalogError::invalid_url(format!("{}: {}", catalog_file, e)))
}
