//! Public evaluation page and the upload endpoint.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use smilecheck_core::{Notice, SmileError};
use smilecheck_media::{detect_mime_type, is_image};
use smilecheck_pipeline::UploadedFile;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::flash::{clear_cookie, has_flash_cookie};
use crate::render;
use crate::server::GatewayState;

/// Multipart field carrying the photo.
pub const UPLOAD_FIELD: &str = "smile_photo";

/// Render `html`, expiring the flash cookie whenever the request sent one.
pub(crate) fn html_response(html: String, flashed: bool) -> Response {
    if flashed {
        ([(header::SET_COOKIE, clear_cookie())], Html(html)).into_response()
    } else {
        Html(html).into_response()
    }
}

/// GET /
pub async fn index(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let notices = state.flash.read(&headers);
    let evaluation = state.pipeline.current_state().await?;
    Ok(html_response(render::index_page(&evaluation, &notices), has_flash_cookie(&headers)))
}

/// POST /upload
pub async fn upload(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(&mut multipart).await?;

    if let Some(file) = upload.as_ref().filter(|f| f.is_present()) {
        let mime = detect_mime_type(Path::new(&file.display_name()));
        if !is_image(mime) {
            warn!(filename = %file.filename, mime, "Upload does not look like an image");
        }
    }

    match state.pipeline.handle_upload(upload).await {
        Ok(report) => {
            info!(file = %report.storage_name, notices = report.notices.len(), "Upload evaluated");
            Ok(state.flash.redirect(&headers, "/", report.notices))
        }
        Err(SmileError::Validation(message)) => {
            Ok(state.flash.redirect(&headers, "/", vec![Notice::error(message)]))
        }
        Err(err) => Err(err.into()),
    }
}

/// The `smile_photo` part, if the form carried one. Other parts are drained.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<UploadedFile>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some(UploadedFile::new(filename, bytes.to_vec()));
    }
    Ok(upload)
}
