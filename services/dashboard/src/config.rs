//! Service configuration assembled from CLI flags and environment.

use anyhow::{bail, Result};
use clap::ValueEnum;

use compute_cluster::{ClusterSpec, GatewayOptions, PbsOptions};

/// ERA5 annual-means catalog published alongside the Pythia cookbooks.
pub const DEFAULT_CATALOG_URL: &str =
    "https://data.rda.ucar.edu/pythia_era5_24/pythia_intake_catalogs/era5_catalog.json";

/// Annual-mean 2 metre temperature store, 1940-2023.
pub const DEFAULT_STORE_URL: &str =
    "https://data.rda.ucar.edu/pythia_era5_24/annual_means/temp_2m_annual_1940_2023.zarr";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClusterBackend {
    Local,
    Pbs,
    Gateway,
}

/// Resolved configuration for one dashboard run.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub listen: String,
    pub catalog_url: String,
    pub store_url: String,
    pub backend: ClusterBackend,
    pub workers: usize,
    pub pbs: PbsOptions,
    pub gateway_url: Option<String>,
    pub gateway_token: Option<String>,
}

impl DashboardConfig {
    /// Cluster construction parameters for the selected backend.
    ///
    /// The gateway backend requires a base URL; everything else has
    /// usable defaults.
    pub fn cluster_spec(&self) -> Result<ClusterSpec> {
        match self.backend {
            ClusterBackend::Local => Ok(ClusterSpec::Local {
                workers: self.workers,
            }),
            ClusterBackend::Pbs => Ok(ClusterSpec::Pbs {
                workers: self.workers,
                options: self.pbs.clone(),
            }),
            ClusterBackend::Gateway => {
                let Some(base_url) = self.gateway_url.clone() else {
                    bail!("gateway backend selected but no gateway URL configured");
                };
                Ok(ClusterSpec::Gateway {
                    workers: self.workers,
                    options: GatewayOptions {
                        base_url,
                        token: self.gateway_token.clone(),
                    },
                })
            }
        }
    }

    /// True when the store URL is remote rather than a local path.
    pub fn store_is_remote(&self) -> bool {
        self.store_url.starts_with("http://") || self.store_url.starts_with("https://")
    }
}
