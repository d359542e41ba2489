//! Shared application state for the HTTP surface.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::controls::ControlEvent;
use crate::session::ViewState;

/// Handler-facing state: channel endpoints plus static metadata.
///
/// All mutable view state lives on the session thread; handlers write
/// by enqueueing events and read through the watch channel.
pub struct AppState {
    pub events: mpsc::Sender<ControlEvent>,
    pub views: watch::Receiver<Arc<ViewState>>,
    /// Human-readable description of the provisioned cluster.
    pub cluster: String,
}

impl AppState {
    pub fn latest_view(&self) -> Arc<ViewState> {
        self.views.borrow().clone()
    }
}
