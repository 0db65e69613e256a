//! Serves the in-page editor launcher script at a fixed virtual path.

use std::path::PathBuf;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::config::EditorConfig;
use crate::error::CmsError;
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::ErrorReporter;

/// The launcher script's virtual path and the file behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientJsServer {
    path: String,
    file: PathBuf,
}

impl ClientJsServer {
    pub fn new(path: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: file.into(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.clientjs_path.clone(), config.clientjs_file.clone())
    }

    /// Exact match only; no prefix or query handling.
    pub fn serves(&self, path: &str) -> bool {
        path == self.path
    }

    /// Read the script fresh. An unreadable file is reported and served empty.
    pub async fn respond(&self, reporter: &dyn ErrorReporter) -> Response {
        let body = match tokio::fs::read(&self.file).await {
            Ok(body) => body,
            Err(source) => {
                reporter.report(&CmsError::Io {
                    path: self.file.clone(),
                    source,
                });
                Vec::new()
            }
        };
        response::javascript(body)
    }
}

pub async fn clientjs_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.clientjs.serves(req.uri().path()) {
        return next.run(req).await;
    }
    state.clientjs.respond(state.reporter.as_ref()).await
}
