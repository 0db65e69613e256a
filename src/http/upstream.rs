//! Forwarding of passthrough requests to another host.
//!
//! # Responsibilities
//! - Send a request already rewritten to an absolute URI to its host
//! - Rewrite the Host header to the upstream authority
//! - Map transport failures and timeouts to 502
//!
//! # Design Decisions
//! - One pooled client shared by all requests
//! - `http` and `https` destinations share one connector; TLS is rustls
//!   with the bundled webpki roots
//! - Response bodies are streamed back, not buffered

use std::time::Duration;

use axum::body::Body;
use axum::http::header::HOST;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::http::request::RequestIdExt;

/// Pooled HTTP client for passthrough destinations on other hosts.
#[derive(Clone)]
pub struct Upstream {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    timeout: Duration,
}

impl Upstream {
    pub fn new(timeout: Duration) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client, timeout }
    }

    /// Forward `req` to the host named in its URI.
    pub async fn forward(&self, mut req: Request<Body>) -> Response {
        let request_id = req.request_id().to_string();
        let uri = req.uri().clone();

        let Some(authority) = uri.authority() else {
            tracing::error!(request_id = %request_id, uri = %uri, "Passthrough target has no host");
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        };
        if let Ok(host) = HeaderValue::from_str(authority.as_str()) {
            req.headers_mut().insert(HOST, host);
        }

        tracing::debug!(request_id = %request_id, uri = %uri, "Forwarding passthrough upstream");

        match tokio::time::timeout(self.timeout, self.client.request(req)).await {
            Ok(Ok(response)) => into_response(response),
            Ok(Err(e)) => {
                tracing::error!(request_id = %request_id, uri = %uri, error = %e, "Upstream error");
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
            Err(_) => {
                tracing::error!(
                    request_id = %request_id,
                    uri = %uri,
                    timeout = ?self.timeout,
                    "Upstream timed out"
                );
                (StatusCode::BAD_GATEWAY, "Upstream request timed out").into_response()
            }
        }
    }
}

/// Stream the upstream body back without buffering it.
fn into_response(response: hyper::Response<Incoming>) -> Response {
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::new(body))
}

impl std::fmt::Debug for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upstream")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
