//! HTTP server implementation
//!
//! Implements:
//! - Media API (GET /api/blob-media)
//! - Display page (GET /)
//! - Health check (GET /health)
//!
//! Each request is independent and stateless: the shared [`AppState`] holds
//! only the lister handle and the start timestamp. The listing call is the
//! single awaited network operation per request; there is no retry at any
//! layer.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::blobstore::ObjectLister;
use crate::media;
use crate::site::{self, PageView};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Blob store lister (trait object so tests can substitute a stub)
    pub lister: Arc<dyn ObjectLister>,
    /// Server start time (Unix timestamp)
    pub start_time: i64,
}

/// Create the HTTP router with all endpoints.
pub fn create_router(lister: Arc<dyn ObjectLister>) -> Router {
    let state = AppState {
        lister,
        start_time: chrono::Utc::now().timestamp(),
    };

    Router::new()
        .route("/", get(page_handler))
        .route("/api/blob-media", get(blob_media_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// GET /api/blob-media - List and classify stored media.
///
/// Success: 200 with `{ images: [{url, pathname}], videos: [{url, pathname}] }`.
/// Any listing failure collapses to a flat 500 with a static message; no
/// partial results are returned.
async fn blob_media_handler(State(state): State<AppState>) -> Response {
    match state.lister.list().await {
        Ok(objects) => {
            let library = media::classify(objects);
            debug!(
                target: "blobstore",
                images = library.images.len(),
                videos = library.videos.len(),
                "media listing classified"
            );
            (StatusCode::OK, Json(library)).into_response()
        }
        Err(e) => {
            warn!(target: "blobstore", error = %e, "blob listing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Error fetching media" })),
            )
                .into_response()
        }
    }
}

/// GET / - The display page.
///
/// Issues exactly one listing call per page view. A listing failure is
/// recorded to the log and the page renders without media sections; the
/// visitor never sees the error.
async fn page_handler(State(state): State<AppState>) -> Response {
    let view = match state.lister.list().await {
        Ok(objects) => PageView::new(media::classify(objects)),
        Err(e) => {
            warn!(target: "site", error = %e, "blob listing failed; rendering page without media");
            PageView::empty()
        }
    };

    Html(site::render_page(&view)).into_response()
}

/// GET /health - Lightweight liveness probe.
async fn health_handler(State(state): State<AppState>) -> Response {
    let uptime = chrono::Utc::now().timestamp() - state.start_time;
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "uptimeSeconds": uptime,
        })),
    )
        .into_response()
}
