//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router around the site handler
//! - Wire up middleware (request ID, tracing, timeout, redirects, client script)
//! - Bind server to listener and shut down gracefully
//! - Serve page data, or forward external passthroughs upstream

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::cms::Cms;
use crate::config::CmsConfig;
use crate::editor::QueryParams;
use crate::http::middleware::clientjs::ClientJsServer;
use crate::http::middleware::{clientjs_middleware, redirect_middleware};
use crate::http::request::{self, Passthrough, RequestIdExt};
use crate::http::response;
use crate::http::upstream::Upstream;
use crate::observability::ErrorReporter;
use crate::routing::RedirectRouter;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub cms: Cms,
    pub redirects: Option<RedirectRouter>,
    pub clientjs: ClientJsServer,
    pub upstream: Upstream,
    pub reporter: Arc<dyn ErrorReporter>,
}

impl AppState {
    pub fn new(config: &CmsConfig, reporter: Arc<dyn ErrorReporter>) -> Self {
        let redirects = config
            .redirects
            .enabled
            .then(|| RedirectRouter::new(config.redirect_file(), reporter.clone()));

        Self {
            cms: Cms::new(config, reporter.clone()),
            redirects,
            clientjs: ClientJsServer::from_config(&config.editor),
            upstream: Upstream::new(Duration::from_secs(config.timeouts.upstream_secs)),
            reporter,
        }
    }
}

/// HTTP server hosting the CMS layer.
pub struct HttpServer {
    router: Router,
    config: CmsConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: CmsConfig, reporter: Arc<dyn ErrorReporter>) -> Self {
        let state = AppState::new(&config, reporter);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Requests pass request-id, trace, timeout, redirects and the client
    /// script before reaching the site handler.
    #[allow(deprecated)]
    pub fn build_router(config: &CmsConfig, state: AppState) -> Router {
        Router::new()
            .fallback(site_handler)
            .layer(middleware::from_fn_with_state(state.clone(), clientjs_middleware))
            .layer(middleware::from_fn_with_state(state.clone(), redirect_middleware))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(request::set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |req: &Request<Body>| {
                            tracing::info_span!(
                                "request",
                                method = %req.method(),
                                uri = %req.uri(),
                                request_id = %req.request_id()
                            )
                        },
                    ))
                    .layer(request::propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// The assembled router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            content_path = %self.config.content.path.display(),
            redirects = self.config.redirects.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CmsConfig {
        &self.config
    }
}

/// Everything the middleware did not answer: external passthroughs go
/// upstream, all other paths get their page data as JSON.
async fn site_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    if req
        .extensions()
        .get::<Passthrough>()
        .is_some_and(|pt| pt.external)
    {
        return state.upstream.forward(req).await;
    }

    let request_id = req.request_id().to_string();
    let url = req.uri().path().to_string();
    let params = QueryParams::from_uri(req.uri());
    let cms = state.cms.clone();

    match tokio::task::spawn_blocking(move || cms.get_page(&url, &params)).await {
        Ok(page) => response::page(&page),
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Page load failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Resolve once the shutdown broadcast fires or its sender is dropped.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::CollectingReporter;
    use axum::http::header::{CONTENT_TYPE, LOCATION};
    use http_body_util::BodyExt;
    use std::fs;
    use tower::ServiceExt;

    fn server(dir: &std::path::Path) -> HttpServer {
        let mut config = CmsConfig::default();
        config.content.path = dir.to_path_buf();
        config.editor.server_urls = vec!["*".into()];
        HttpServer::new(config, CollectingReporter::new())
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_page_data_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("test.html"), r#"{"title":"Test","content":{"body":"<p>x</p>"}}"#)
            .unwrap();

        let response = server(dir.path()).router().oneshot(get("/test.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert!(response.headers().contains_key("x-request-id"));

        let page = json(response).await;
        assert_eq!(page["title"], "Test");
        assert_eq!(page["content"]["body"], "<p>x</p>");
        assert_eq!(page["editor_script"], "");
    }

    #[tokio::test]
    async fn test_editor_request_gets_script_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("test.html"), r#"{"title":"Test"}"#).unwrap();

        let response = server(dir.path())
            .router()
            .oneshot(get("/test.html?jshcms_token=t&jshcms_url=%2F%2Fcms.server%2F"))
            .await
            .unwrap();
        let page = json(response).await;
        assert_eq!(page["title"], "");
        assert_eq!(
            page["editor_script"],
            r#"<script type="text/javascript" src="//cms.server/js/jsHarmonyCMS.js"></script>"#
        );
    }

    #[tokio::test]
    async fn test_redirect_runs_before_site() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("jshcms_redirects.json"),
            r#"[{"redirect_url_type":"EXACT","redirect_url":"/old","redirect_http_code":"301","redirect_dest":"/new"}]"#,
        )
        .unwrap();

        let response = server(dir.path()).router().oneshot(get("/old")).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/new");
    }

    #[tokio::test]
    async fn test_passthrough_serves_destination_page() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("jshcms_redirects.json"),
            r#"[{"redirect_url_type":"EXACT","redirect_url":"/alias","redirect_http_code":"PASSTHRU","redirect_dest":"/real.html"}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("real.html"), r#"{"title":"Real"}"#).unwrap();

        let response = server(dir.path()).router().oneshot(get("/alias")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["title"], "Real");
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::builder()
            .uri("/")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();

        let response = server(dir.path()).router().oneshot(req).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_redirects_disabled() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("jshcms_redirects.json"),
            r#"[{"redirect_url_type":"EXACT","redirect_url":"/old","redirect_http_code":"301","redirect_dest":"/new"}]"#,
        )
        .unwrap();
        let mut config = CmsConfig::default();
        config.content.path = dir.path().to_path_buf();
        config.redirects.enabled = false;

        let response = HttpServer::new(config, CollectingReporter::new())
            .router()
            .oneshot(get("/old"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
