//! Session loop and HTTP surface tests over a local fixture store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tempfile::TempDir;
use tokio::sync::{mpsc, watch};
use tower::ServiceExt;

use compute_cluster::{ClusterHandle, ClusterSpec};
use dashboard::controls::ControlEvent;
use dashboard::session::{self, ViewState};
use dashboard::state::AppState;
use test_utils::{coarse_latitudes, coarse_longitudes, write_era5_store, VariableSpec};
use zarr_dataset::open_path;

fn fixture_store() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_era5_store(
        dir.path(),
        1940..=1944,
        &coarse_latitudes(),
        &coarse_longitudes(),
        &[VariableSpec::temperature("t2m")],
    )
    .unwrap();
    dir
}

struct Session {
    _store: TempDir,
    events: mpsc::Sender<ControlEvent>,
    views: watch::Receiver<Arc<ViewState>>,
    handle: std::thread::JoinHandle<anyhow::Result<()>>,
    cluster: Arc<ClusterHandle>,
}

async fn start_session() -> Session {
    let store = fixture_store();
    let dataset = open_path(store.path()).unwrap();
    let cluster = Arc::new(
        ClusterSpec::Local { workers: 2 }
            .provision()
            .await
            .unwrap(),
    );
    let (events_tx, events_rx) = mpsc::channel(8);
    let (views_tx, views_rx) = watch::channel(Arc::new(ViewState::empty()));
    let handle = session::spawn(
        dataset,
        vec!["t2m".to_string()],
        cluster.clone(),
        events_rx,
        views_tx,
    )
    .unwrap();
    Session {
        _store: store,
        events: events_tx,
        views: views_rx,
        handle,
        cluster,
    }
}

/// Waits until the published view reaches `seq`. The watch channel
/// coalesces, so intermediate sequences may never be observed.
async fn view_at(views: &mut watch::Receiver<Arc<ViewState>>, seq: u64) -> Arc<ViewState> {
    loop {
        {
            let view = views.borrow_and_update().clone();
            if view.controls.view_seq >= seq {
                return view;
            }
        }
        views.changed().await.unwrap();
    }
}

async fn join(handle: std::thread::JoinHandle<anyhow::Result<()>>) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || handle.join().unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_initial_view_is_published_without_input() {
    let mut session = start_session().await;

    let view = view_at(&mut session.views, 1).await;
    assert_eq!(view.controls.view_seq, 1);
    assert_eq!(view.controls.variable, "t2m");
    assert_eq!(view.controls.year_min, 1940);
    assert_eq!(view.controls.year_max, 1944);
    // The first render shows the newest year in the archive.
    assert_eq!(view.controls.year, 1944);
    assert_eq!(view.controls.colormap, "viridis");
    assert_eq!(view.title, "Average annual 2 metre temperature on 1944");
    assert!(!view.png.is_empty());

    drop(session.events);
    join(session.handle).await.unwrap();
}

#[tokio::test]
async fn test_control_events_drive_new_views() {
    let mut session = start_session().await;
    view_at(&mut session.views, 1).await;

    session.events.send(ControlEvent::Year(1941)).await.unwrap();
    let view = view_at(&mut session.views, 2).await;
    assert_eq!(view.controls.year, 1941);
    assert_eq!(view.title, "Average annual 2 metre temperature on 1941");

    session
        .events
        .send(ControlEvent::Colormap("coolwarm".to_string()))
        .await
        .unwrap();
    let view = view_at(&mut session.views, 3).await;
    assert_eq!(view.controls.colormap, "coolwarm");
    // The year selection survives the colormap change.
    assert_eq!(view.controls.year, 1941);

    drop(session.events);
    join(session.handle).await.unwrap();
}

#[tokio::test]
async fn test_render_failure_ends_the_session() {
    let mut session = start_session().await;
    view_at(&mut session.views, 1).await;

    session
        .events
        .send(ControlEvent::Variable("missing".to_string()))
        .await
        .unwrap();

    let result = join(session.handle).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_http_surface_serves_the_session() {
    let mut session = start_session().await;
    view_at(&mut session.views, 1).await;

    let state = Arc::new(AppState {
        events: session.events.clone(),
        views: session.views.clone(),
        cluster: session.cluster.describe(),
    });
    let app = dashboard::router(state);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/controls")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let controls: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(controls["variable"], "t2m");
    assert_eq!(controls["year_min"], 1940);
    assert_eq!(controls["year_max"], 1944);
    assert_eq!(controls["view_seq"], 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/view.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/controls/year")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"value": 1940}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // The accepted change flows through the session loop to a new view.
    let view = view_at(&mut session.views, 2).await;
    assert_eq!(view.controls.year, 1940);
}
