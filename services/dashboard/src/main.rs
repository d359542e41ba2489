//! ERA5 dashboard server.
//!
//! Serves an interactive view of the ERA5 annual-mean archive: a
//! catalog-driven variable selector, a year slider, a colormap picker,
//! and the rendered global map, backed by a single session loop and a
//! provisioned compute cluster.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use compute_cluster::PbsOptions;
use dashboard::config::{ClusterBackend, DashboardConfig, DEFAULT_CATALOG_URL, DEFAULT_STORE_URL};
use dashboard::session::{self, ViewState};
use dashboard::state::AppState;
use esm_catalog::EsmCatalog;

/// ERA5 dashboard server
#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Interactive dashboard over the ERA5 annual-mean archive")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8090", env = "DASH_LISTEN_ADDR")]
    listen: String,

    /// Intake-ESM catalog descriptor URL
    #[arg(long, default_value = DEFAULT_CATALOG_URL, env = "DASH_CATALOG_URL")]
    catalog_url: String,

    /// Zarr store URL, or a local store path
    #[arg(long, default_value = DEFAULT_STORE_URL, env = "DASH_STORE_URL")]
    store_url: String,

    /// Compute cluster backend
    #[arg(long, value_enum, default_value = "local", env = "DASH_CLUSTER")]
    cluster: ClusterBackend,

    /// Worker count for the selected backend
    #[arg(long, default_value = "8", env = "DASH_WORKERS")]
    workers: usize,

    /// PBS queue for worker jobs
    #[arg(long, default_value = "casper", env = "DASH_PBS_QUEUE")]
    pbs_queue: String,

    /// PBS walltime per worker job
    #[arg(long, default_value = "0:10:00", env = "DASH_PBS_WALLTIME")]
    pbs_walltime: String,

    /// PBS memory per worker job
    #[arg(long, default_value = "4GB", env = "DASH_PBS_MEMORY")]
    pbs_memory: String,

    /// Dask gateway base URL (required for the gateway backend)
    #[arg(long, env = "DASH_GATEWAY_URL")]
    gateway_url: Option<String>,

    /// Dask gateway bearer token
    #[arg(long, env = "DASH_GATEWAY_TOKEN")]
    gateway_token: Option<String>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of tokio worker threads
    #[arg(long, env = "DASH_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

impl Args {
    fn into_config(self) -> DashboardConfig {
        DashboardConfig {
            listen: self.listen,
            catalog_url: self.catalog_url,
            store_url: self.store_url,
            backend: self.cluster,
            workers: self.workers,
            pbs: PbsOptions {
                queue: self.pbs_queue,
                walltime: self.pbs_walltime,
                memory: self.pbs_memory,
                ..PbsOptions::default()
            },
            gateway_url: self.gateway_url,
            gateway_token: self.gateway_token,
        }
    }
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .expect("Failed to create Tokio runtime");

    runtime.block_on(async move {
        run_server(args).await;
    });
}

async fn run_server(args: Args) {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting dashboard server");

    let config = args.into_config();
    let listen = config.listen.clone();

    let state = match init(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to start dashboard: {:#}", e);
            std::process::exit(1);
        }
    };

    let app = dashboard::router(state);

    // Parse listen address
    let addr: SocketAddr = listen.parse().expect("Invalid listen address");

    info!("Dashboard listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server failed");
}

/// Provisions the cluster, opens catalog and store, starts the session
/// loop, and waits for the first rendered view.
async fn init(config: DashboardConfig) -> Result<Arc<AppState>> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("building HTTP client")?;

    let catalog = EsmCatalog::open(&http, &config.catalog_url)
        .await
        .context("opening catalog")?;
    let variables = catalog.variables().context("reading catalog variables")?;
    if variables.is_empty() {
        bail!("catalog lists no variables");
    }
    info!(
        catalog = %catalog.url(),
        variables = variables.len(),
        "catalog loaded"
    );

    let cluster = Arc::new(
        config
            .cluster_spec()?
            .provision()
            .await
            .context("provisioning compute cluster")?,
    );
    let cluster_description = cluster.describe();
    info!(cluster = %cluster_description, "compute cluster ready");

    let (events_tx, events_rx) = mpsc::channel(64);
    let (views_tx, views_rx) = watch::channel(Arc::new(ViewState::empty()));

    // Store metadata reads block, so the open runs off the runtime and
    // the dataset stays on the session thread for its whole life.
    let session = if config.store_is_remote() {
        let url = config.store_url.clone();
        let handle = Handle::current();
        let cluster = cluster.clone();
        tokio::task::spawn_blocking(move || {
            let dataset = zarr_dataset::open_http(&url, handle).context("opening zarr store")?;
            session::spawn(dataset, variables, cluster, events_rx, views_tx)
        })
        .await
        .context("store open task failed")??
    } else {
        let path = PathBuf::from(&config.store_url);
        let cluster = cluster.clone();
        tokio::task::spawn_blocking(move || {
            let dataset = zarr_dataset::open_path(&path).context("opening zarr store")?;
            session::spawn(dataset, variables, cluster, events_rx, views_tx)
        })
        .await
        .context("store open task failed")??
    };

    // A render failure ends the session loop; take the service down with it.
    tokio::task::spawn_blocking(move || match session.join() {
        Ok(Ok(())) => info!("session loop finished"),
        Ok(Err(e)) => {
            tracing::error!("session loop failed: {:#}", e);
            std::process::exit(1);
        }
        Err(_) => {
            tracing::error!("session thread panicked");
            std::process::exit(1);
        }
    });

    // Block startup until the initial view is published.
    let mut first = views_rx.clone();
    first
        .changed()
        .await
        .map_err(|_| anyhow!("session loop exited before the first render"))?;
    info!("initial view rendered");

    Ok(Arc::new(AppState {
        events: events_tx,
        views: views_rx,
        cluster: cluster_description,
    }))
}
