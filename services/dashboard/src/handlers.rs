//! HTTP handlers for the dashboard surface.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::controls::{ControlEvent, ControlsView};
use crate::page;
use crate::state::AppState;

/// GET / - the dashboard page.
pub async fn index_handler() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

/// GET /view.png - latest completed rendered view.
pub async fn view_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let view = state.latest_view();
    if view.png.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "no view rendered yet"})),
        )
            .into_response();
    }
    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        view.png.clone(),
    )
        .into_response()
}

/// GET /api/controls - current controls state and view sequence.
pub async fn controls_handler(Extension(state): Extension<Arc<AppState>>) -> Json<ControlsView> {
    Json(state.latest_view().controls.clone())
}

#[derive(Debug, Deserialize)]
pub struct TextValue {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct YearValue {
    pub value: i32,
}

/// POST /api/controls/variable
pub async fn set_variable_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<TextValue>,
) -> Response {
    enqueue(&state, ControlEvent::Variable(body.value)).await
}

/// POST /api/controls/year
pub async fn set_year_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<YearValue>,
) -> Response {
    enqueue(&state, ControlEvent::Year(body.value)).await
}

/// POST /api/controls/colormap
pub async fn set_colormap_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<TextValue>,
) -> Response {
    enqueue(&state, ControlEvent::Colormap(body.value)).await
}

async fn enqueue(state: &AppState, event: ControlEvent) -> Response {
    let (control, value) = match &event {
        ControlEvent::Variable(v) => ("variable", json!(v)),
        ControlEvent::Year(y) => ("year", json!(y)),
        ControlEvent::Colormap(c) => ("colormap", json!(c)),
    };
    debug!("enqueueing {} change: {}", control, value);
    let ack = json!({"accepted": true, "control": control, "value": value});
    match state.events.send(event).await {
        Ok(()) => (StatusCode::ACCEPTED, Json(ack)).into_response(),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "session loop is not running"})),
        )
            .into_response(),
    }
}

/// GET /health - liveness probe.
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "dashboard",
        "version": env!("CARGO_PKG_VERSION"),
        "cluster": state.cluster,
        "view_seq": state.latest_view().controls.view_seq,
    }))
}
