//! Interactive dashboard over the ERA5 annual-mean archive.
//!
//! A single session loop owns the dataset and renders one view at a
//! time; the HTTP surface enqueues control changes and serves the
//! latest completed figure.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod controls;
pub mod handlers;
pub mod page;
pub mod render;
pub mod session;
pub mod state;

pub use config::{ClusterBackend, DashboardConfig};
pub use controls::{ControlEvent, ControlsState, ControlsView};
pub use render::{render_view, RenderedView};
pub use session::ViewState;
pub use state::AppState;

/// Builds the dashboard router with the standard middleware stack.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/view.png", get(handlers::view_handler))
        .route("/api/controls", get(handlers::controls_handler))
        .route("/api/controls/variable", post(handlers::set_variable_handler))
        .route("/api/controls/year", post(handlers::set_year_handler))
        .route("/api/controls/colormap", post(handlers::set_colormap_handler))
        .route("/health", get(handlers::health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
