//! Main HTTP server.
//!
//! Routes the evaluation page, the upload endpoint, the backend panel, the
//! static image directories, and a JSON health probe.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use smilecheck_media::media_router;
use smilecheck_pipeline::EvaluationPipeline;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::backend_panel;
use crate::evaluation;
use crate::flash::FlashSigner;

pub const SERVICE_NAME: &str = "smilecheck";

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<EvaluationPipeline>,
    pub flash: FlashSigner,
}

impl GatewayState {
    pub fn new(pipeline: EvaluationPipeline, secret_key: &str) -> Result<Self> {
        Ok(Self { pipeline: Arc::new(pipeline), flash: FlashSigner::new(secret_key)? })
    }
}

/// Handler for `GET /api/health`.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Build the full application router. Request bodies above
/// `max_upload_bytes` are rejected.
pub fn build_router(state: GatewayState, max_upload_bytes: usize) -> Router {
    let layout = state.pipeline.layout().clone();

    Router::new()
        .route("/", get(evaluation::index))
        .route("/upload", post(evaluation::upload))
        .route("/backend", get(backend_panel::panel))
        .route("/backend/prompts", post(backend_panel::update_prompts))
        .route("/api/health", get(health))
        .with_state(state)
        .nest("/static/uploads", media_router(layout.uploads_dir()))
        .nest("/static/enhanced", media_router(layout.enhanced_dir()))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Starts the HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState, max_upload_bytes: usize) -> Result<()> {
    let app = build_router(state, max_upload_bytes);

    let listener = TcpListener::bind(&addr).await?;
    info!("SmileCheck listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::FLASH_COOKIE;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use image::{ImageFormat, Rgb, RgbImage};
    use smilecheck_core::{EvaluationState, PromptSet};
    use smilecheck_media::FilterEnhancer;
    use smilecheck_pipeline::{StaticLayout, MISSING_FILE_MESSAGE, UPLOAD_SUCCESS_MESSAGE};
    use smilecheck_store::{load_prompts, load_state, save_prompts, DocumentStore, InMemoryStore};
    use smilecheck_understanding::SeededVisionAnalyzer;
    use std::io::Cursor;
    use std::path::Path;
    use tower::ServiceExt;

    const BOUNDARY: &str = "smilecheck-test-boundary";

    fn app(root: &Path, store: Arc<dyn DocumentStore>) -> Router {
        let pipeline = EvaluationPipeline::new(
            store,
            Arc::new(SeededVisionAnalyzer::new()),
            Arc::new(FilterEnhancer::new()),
            StaticLayout::new(root),
        );
        build_router(GatewayState::new(pipeline, "test-secret").unwrap(), 1024 * 1024)
    }

    fn png_bytes() -> Vec<u8> {
        let img = RgbImage::from_fn(8, 8, |x, y| Rgb([220, (x * 20) as u8, (y * 20) as u8]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    fn multipart_request(filename: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"smile_photo\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    fn flash_cookie(resp: &Response) -> String {
        let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let resp = app(dir.path(), Arc::new(InMemoryStore::new()))
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], SERVICE_NAME);
    }

    #[tokio::test]
    async fn upload_persists_state_and_flashes_success() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        let router = app(dir.path(), store.clone());

        let resp = router.clone().oneshot(multipart_request("smile.png", &png_bytes())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/");
        let cookie = flash_cookie(&resp);
        assert!(cookie.starts_with(FLASH_COOKIE));

        let state = load_state(store.as_ref()).await.unwrap();
        assert_eq!(state.structured_findings.as_ref().unwrap().findings.len(), 3);
        let corrected = state.corrected_image_path.clone().unwrap();

        let page = router
            .clone()
            .oneshot(Request::get("/").header(header::COOKIE, &cookie).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        assert!(page.headers()[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));
        let html = body_text(page).await;
        assert!(html.contains(UPLOAD_SUCCESS_MESSAGE));
        assert!(html.contains(&format!("/static/{corrected}")));

        let image = router
            .oneshot(Request::get(format!("/static/{corrected}")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(image.status(), StatusCode::OK);
        assert_eq!(image.headers()[header::CONTENT_TYPE], "image/png");
    }

    #[tokio::test]
    async fn upload_without_file_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        let router = app(dir.path(), store.clone());

        let resp = router.clone().oneshot(multipart_request("", b"")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(load_state(store.as_ref()).await.unwrap(), EvaluationState::default());

        let page = router
            .oneshot(
                Request::get("/")
                    .header(header::COOKIE, flash_cookie(&resp))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(body_text(page).await.contains(MISSING_FILE_MESSAGE));
    }

    #[tokio::test]
    async fn prompt_form_replaces_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        save_prompts(store.as_ref(), &PromptSet::new("old", "old")).await.unwrap();
        let router = app(dir.path(), store.clone());

        let resp = router
            .clone()
            .oneshot(
                Request::post("/backend/prompts")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("analysis_prompt=+verificar+gengiva+"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/backend");

        let prompts = load_prompts(store.as_ref()).await.unwrap();
        assert_eq!(prompts.analysis_prompt, "verificar gengiva");
        assert_eq!(prompts.enhancement_prompt, "");

        let page = router
            .oneshot(
                Request::get("/backend")
                    .header(header::COOKIE, flash_cookie(&resp))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(page).await;
        assert!(html.contains("verificar gengiva</textarea>"));
        assert!(html.contains("Prompts atualizados."));
    }

    #[tokio::test]
    async fn unverifiable_flash_cookie_is_expired() {
        let dir = tempfile::tempdir().unwrap();
        let router = app(dir.path(), Arc::new(InMemoryStore::new()));
        let foreign = FlashSigner::new("previous-process-secret")
            .unwrap()
            .encode(&[smilecheck_core::Notice::success("stale")]);

        for uri in ["/", "/backend"] {
            let page = router
                .clone()
                .oneshot(
                    Request::get(uri)
                        .header(header::COOKIE, format!("{FLASH_COOKIE}={foreign}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(page.status(), StatusCode::OK);
            assert!(page.headers()[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));
            assert!(!body_text(page).await.contains("stale"));
        }

        let plain = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(plain.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn media_routes_reject_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let resp = app(dir.path(), Arc::new(InMemoryStore::new()))
            .oneshot(Request::get("/static/uploads/nope.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
