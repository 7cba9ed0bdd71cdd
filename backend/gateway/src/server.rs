//! Main HTTP Gateway Server.
//!
//! Routing, shared state, body limits, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use inkforge_core::{CONVERT_PATH, HEALTH_PATH, PdfOptions, PdfRenderer};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::convert_api;
use crate::health_api;
use crate::pipeline::ConversionService;

pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub service: ConversionService,
    pub started: Instant,
}

impl GatewayState {
    pub fn new(renderer: Arc<dyn PdfRenderer>, pdf_options: PdfOptions) -> Self {
        Self { service: ConversionService::new(renderer, pdf_options), started: Instant::now() }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub max_body_bytes: usize,
    /// Allow any origin; needed when a browser client is served from elsewhere.
    pub cors: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self { max_body_bytes: DEFAULT_MAX_BODY_BYTES, cors: true }
    }
}

pub fn build_router(state: GatewayState, options: &GatewayOptions) -> Router {
    let router = Router::new()
        .route(CONVERT_PATH, post(convert_api::convert))
        .route(HEALTH_PATH, get(health_api::get_health))
        .layer(DefaultBodyLimit::max(options.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if options.cors { router.layer(CorsLayer::permissive()) } else { router }
}

/// Starts the gateway and serves until Ctrl+C or SIGTERM.
#[instrument(skip(state, options))]
pub async fn start_server(
    addr: SocketAddr,
    state: GatewayState,
    options: GatewayOptions,
) -> Result<()> {
    let app = build_router(state, &options);

    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use inkforge_core::ConvertError;
    use serde_json::Value;
    use tower::ServiceExt;

    const FAKE_PDF: &[u8] = b"%PDF-1.7\n%fake\n%%EOF";

    #[derive(Default)]
    struct CapturingRenderer {
        html: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PdfRenderer for CapturingRenderer {
        fn name(&self) -> &str {
            "capture"
        }

        async fn render(&self, html: &str, _: &PdfOptions) -> Result<Vec<u8>, ConvertError> {
            self.html.lock().unwrap().push(html.to_string());
            Ok(FAKE_PDF.to_vec())
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl PdfRenderer for FailingRenderer {
        fn name(&self) -> &str {
            "failing"
        }

        async fn render(&self, _: &str, _: &PdfOptions) -> Result<Vec<u8>, ConvertError> {
            Err(ConvertError::BrowserLaunch("/usr/bin/chromium: not found".into()))
        }
    }

    /// Blocks longer than its render timeout allows, like a page that never
    /// finishes loading.
    struct StuckRenderer;

    #[async_trait]
    impl PdfRenderer for StuckRenderer {
        fn name(&self) -> &str {
            "stuck"
        }

        async fn render(&self, _: &str, _: &PdfOptions) -> Result<Vec<u8>, ConvertError> {
            inkforge_browser::run_blocking(Duration::from_millis(50), || {
                std::thread::sleep(Duration::from_millis(500));
                Ok(FAKE_PDF.to_vec())
            })
            .await
        }
    }

    fn app_with(renderer: Arc<dyn PdfRenderer>, options: GatewayOptions) -> Router {
        build_router(GatewayState::new(renderer, PdfOptions::a4()), &options)
    }

    fn convert_request(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(CONVERT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn converts_markdown_to_pdf_attachment() {
        let renderer = Arc::new(CapturingRenderer::default());
        let app = app_with(renderer.clone(), GatewayOptions::default());

        let body = serde_json::json!({
            "markdown": "# Title\n\nSome **bold** text.\n\n```js\nconst x = 1;\n```"
        });
        let response = app.oneshot(convert_request(body.to_string())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=output.pdf"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let html = renderer.html.lock().unwrap();
        assert_eq!(html.len(), 1);
        assert!(html[0].contains("<h1>Title</h1>"));
        assert!(html[0].contains("<strong>bold</strong>"));
        assert!(html[0].contains("language-js"));
        assert!(html[0].contains("<style>"));
    }

    #[tokio::test]
    async fn empty_markdown_still_produces_a_pdf() {
        let app = app_with(Arc::new(CapturingRenderer::default()), GatewayOptions::default());
        let response = app.oneshot(convert_request(r#"{"markdown":""}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_non_string_markdown() {
        let app = app_with(Arc::new(CapturingRenderer::default()), GatewayOptions::default());
        let response = app.oneshot(convert_request(r#"{"markdown":123}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, serde_json::json!({"error": "Invalid markdown input"}));
    }

    #[tokio::test]
    async fn rejects_missing_field_and_malformed_json() {
        for body in [r#"{"text":"hello"}"#, "{not json", ""] {
            let app = app_with(Arc::new(CapturingRenderer::default()), GatewayOptions::default());
            let response = app.oneshot(convert_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
            assert_eq!(json_body(response).await["error"], "Invalid markdown input");
        }
    }

    #[tokio::test]
    async fn renderer_failure_hides_the_cause() {
        let app = app_with(Arc::new(FailingRenderer), GatewayOptions::default());
        let response = app.oneshot(convert_request(r##"{"markdown":"# Hi"}"##)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body, serde_json::json!({"error": "Failed to generate PDF"}));
        assert!(!body.to_string().contains("chromium"));
    }

    #[tokio::test]
    async fn render_timeout_is_a_generic_500() {
        let app = app_with(Arc::new(StuckRenderer), GatewayOptions::default());
        let response = app.oneshot(convert_request(r##"{"markdown":"# Hi"}"##)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body, serde_json::json!({"error": "Failed to generate PDF"}));
        assert!(!body.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let options = GatewayOptions { max_body_bytes: 64, cors: false };
        let app = app_with(Arc::new(CapturingRenderer::default()), options);
        let markdown = "a".repeat(1024);
        let body = serde_json::json!({ "markdown": markdown }).to_string();
        let response = app.oneshot(convert_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn identical_requests_render_identical_html() {
        let renderer = Arc::new(CapturingRenderer::default());
        let app = app_with(renderer.clone(), GatewayOptions::default());
        let body = r#"{"markdown":"| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done"}"#;

        for _ in 0..2 {
            let response = app.clone().oneshot(convert_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let html = renderer.html.lock().unwrap();
        assert_eq!(html.len(), 2);
        assert_eq!(html[0], html[1]);
        assert!(html[0].contains("<table>"));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app_with(Arc::new(FailingRenderer), GatewayOptions::default());
        let request = Request::builder().uri(HEALTH_PATH).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "inkforge");
        assert_eq!(body["renderer"], "failing");
    }
}
