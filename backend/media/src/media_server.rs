//! Stored image server: serves uploaded and enhanced images over HTTP.
//!
//! Provides a simple Axum router that serves files by name from one
//! directory, with content-type and disposition headers.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::{path::PathBuf, sync::Arc};
use tokio::fs;
use tracing::{debug, warn};

use crate::mime_detect::{detect_mime_type, is_inline_safe};

/// State shared by image server routes.
#[derive(Clone)]
pub struct MediaServerState {
    pub media_dir: Arc<PathBuf>,
}

/// Build the image server router for `media_dir`.
///
/// Mount under a prefix, e.g. `/static/uploads`:
///   GET /static/uploads/:filename : serve a stored image
pub fn media_router(media_dir: PathBuf) -> Router {
    let state = MediaServerState {
        media_dir: Arc::new(media_dir),
    };
    Router::new()
        .route("/:filename", get(serve_media))
        .with_state(state)
}

/// A single path component: not empty, not `.` or `..`, no separators.
fn is_plain_file_name(name: &str) -> bool {
    !matches!(name, "" | "." | "..") && !name.contains(['/', '\\'])
}

/// GET /:filename: read a stored image from disk.
async fn serve_media(
    Path(filename): Path<String>,
    State(state): State<MediaServerState>,
) -> Response {
    if !is_plain_file_name(&filename) {
        warn!(filename = %filename, "Rejected suspicious media path");
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    }

    let path = state.media_dir.join(&filename);
    debug!(path = %path.display(), "Serving media file");

    match fs::read(&path).await {
        Ok(bytes) => {
            let mime = detect_mime_type(&path);
            let disposition = if is_inline_safe(mime) { "inline" } else { "attachment" };
            // Client-supplied names may contain bytes that are not valid in a header.
            let disposition = HeaderValue::from_str(&format!("{disposition}; filename=\"{filename}\""))
                .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static(mime)),
                    (header::CONTENT_DISPOSITION, disposition),
                    (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Media file not found").into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read media file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read media").into_response()
        }
    }
}
