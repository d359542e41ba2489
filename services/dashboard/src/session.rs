//! The session loop: one thread owning all mutable view state.
//!
//! HTTP handlers never render. They enqueue control events on a bounded
//! channel; this loop applies each event, renders synchronously, applies
//! the year bounds the render resolved, and publishes the result on a
//! watch channel. Renders are strictly serialized, so the published view
//! always reflects the most recently completed render.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use anyhow::{anyhow, Result};
use bytes::Bytes;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use compute_cluster::ClusterHandle;
use renderer::FigureOptions;
use zarr_dataset::{ReadableStorageTraits, ZarrDataset};

use crate::controls::{ControlEvent, ControlsState, ControlsView};
use crate::render::render_view;

/// Latest completed view, published to the HTTP surface.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub controls: ControlsView,
    pub label: String,
    pub title: String,
    pub png: Bytes,
}

impl ViewState {
    /// Placeholder carried by the watch channel before the first render.
    pub fn empty() -> Self {
        Self {
            controls: ControlsView::empty(),
            label: String::new(),
            title: String::new(),
            png: Bytes::new(),
        }
    }
}

/// Spawns the session thread. The initial render runs before any event
/// is consumed, so the first published view appears without input.
pub fn spawn<S>(
    dataset: ZarrDataset<S>,
    variable_options: Vec<String>,
    cluster: Arc<ClusterHandle>,
    events: mpsc::Receiver<ControlEvent>,
    views: watch::Sender<Arc<ViewState>>,
) -> Result<JoinHandle<Result<()>>>
where
    S: ReadableStorageTraits + Send + Sync + 'static,
{
    std::thread::Builder::new()
        .name("dashboard-session".to_string())
        .spawn(move || run(dataset, variable_options, cluster, events, views))
        .map_err(|e| anyhow!("could not spawn session thread: {}", e))
}

fn run<S>(
    dataset: ZarrDataset<S>,
    variable_options: Vec<String>,
    cluster: Arc<ClusterHandle>,
    mut events: mpsc::Receiver<ControlEvent>,
    views: watch::Sender<Arc<ViewState>>,
) -> Result<()>
where
    S: ReadableStorageTraits + Send + Sync + 'static,
{
    if variable_options.is_empty() {
        return Err(anyhow!("no selectable variables"));
    }
    let bounds = dataset
        .time()
        .year_bounds()
        .ok_or_else(|| anyhow!("dataset time coordinate is empty"))?;
    let mut controls = ControlsState::new(variable_options, bounds);
    let options = FigureOptions::default();
    let mut seq: u64 = 0;

    render_and_publish(&dataset, &cluster, &mut controls, &options, &mut seq, &views)?;

    while let Some(event) = events.blocking_recv() {
        debug!("applying control event {:?}", event);
        controls.apply(event);
        render_and_publish(&dataset, &cluster, &mut controls, &options, &mut seq, &views)?;
    }
    info!("control channel closed; session loop ending");
    Ok(())
}

fn render_and_publish<S>(
    dataset: &ZarrDataset<S>,
    cluster: &ClusterHandle,
    controls: &mut ControlsState,
    options: &FigureOptions,
    seq: &mut u64,
    views: &watch::Sender<Arc<ViewState>>,
) -> Result<()>
where
    S: ReadableStorageTraits + Send + Sync + 'static,
{
    let started = Instant::now();
    let view = cluster.run(|| {
        render_view(
            dataset,
            &controls.variable,
            controls.year,
            &controls.colormap,
            options,
        )
    })?;
    controls.apply_bounds(view.year_bounds);
    *seq += 1;
    info!(
        "rendered view {} ({} year {} colormap {}) in {:?}",
        seq, view.variable, view.year, view.colormap, started.elapsed()
    );
    let state = ViewState {
        controls: controls.view(*seq),
        label: view.label,
        title: view.title,
        png: Bytes::from(view.png),
    };
    views
        .send(Arc::new(state))
        .map_err(|_| anyhow!("all view receivers dropped"))?;
    Ok(())
}
