//! Request-side types and helpers.
//!
//! # Responsibilities
//! - Request ID generation and propagation (`x-request-id`, UUID v4)
//! - Rewriting a request for a passthrough redirect
//! - Marking rewritten requests so the site handler knows where they go
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A passthrough replaces path and query wholesale; the client's original
//!   query string is not carried over

use axum::http::header::HOST;
use axum::http::uri::PathAndQuery;
use axum::http::{Request, Uri};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::error::{CmsError, CmsResult};
use crate::routing::router::{fully_qualified, is_fully_qualified};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that assigns a UUID request ID when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Read access to the request ID.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Request extension set when a redirect rule rewrote the request in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passthrough {
    /// Absolute URL now being served.
    pub url: String,
    /// True when the destination is on another host.
    pub external: bool,
}

/// Rewrite `req` to serve `destination` and tag it with [`Passthrough`].
///
/// On error the request is left untouched.
pub fn rewrite_passthrough<B>(req: &mut Request<B>, destination: &str) -> CmsResult<Passthrough> {
    let invalid = || CmsError::InvalidDestination(destination.to_string());

    let external = is_fully_qualified(destination);
    let scheme = req.uri().scheme_str().unwrap_or("http").to_string();
    let host = request_host(req).unwrap_or("localhost").to_string();
    let url = fully_qualified(destination, &scheme, &host)?;
    let target: Uri = url.parse().map_err(|_| invalid())?;

    let mut parts = req.uri().clone().into_parts();
    parts.path_and_query = Some(
        target
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/")),
    );
    if external {
        parts.scheme = target.scheme().cloned();
        parts.authority = target.authority().cloned();
    }
    *req.uri_mut() = Uri::from_parts(parts).map_err(|_| invalid())?;

    let passthrough = Passthrough { url, external };
    req.extensions_mut().insert(passthrough.clone());
    Ok(passthrough)
}

/// Host the client addressed: absolute-form URI first, then the Host header.
fn request_host<B>(req: &Request<B>) -> Option<&str> {
    req.uri()
        .authority()
        .map(|a| a.as_str())
        .or_else(|| req.headers().get(HOST).and_then(|v| v.to_str().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> Request<()> {
        Request::builder()
            .uri(uri)
            .header(HOST, "localhost:3000")
            .body(())
            .unwrap()
    }

    #[test]
    fn test_relative_passthrough_replaces_path_and_query() {
        let mut req = request("/proxy?keep=no");
        let pt = rewrite_passthrough(&mut req, "/random_numbers").unwrap();

        assert_eq!(req.uri(), "/random_numbers");
        assert_eq!(pt.url, "http://localhost:3000/random_numbers");
        assert!(!pt.external);
        assert_eq!(req.extensions().get::<Passthrough>(), Some(&pt));
    }

    #[test]
    fn test_relative_passthrough_keeps_destination_query() {
        let mut req = request("/proxy?keep=no");
        rewrite_passthrough(&mut req, "/search?q=cms").unwrap();
        assert_eq!(req.uri().path(), "/search");
        assert_eq!(req.uri().query(), Some("q=cms"));
    }

    #[test]
    fn test_external_passthrough_sets_authority() {
        let mut req = request("/remote");
        let pt = rewrite_passthrough(&mut req, "https://cms.example.com:8443/page?x=1").unwrap();

        assert!(pt.external);
        assert_eq!(req.uri().scheme_str(), Some("https"));
        assert_eq!(req.uri().authority().unwrap().as_str(), "cms.example.com:8443");
        assert_eq!(req.uri().path_and_query().unwrap().as_str(), "/page?x=1");
    }

    #[test]
    fn test_invalid_destination_leaves_request() {
        let mut req = Request::builder()
            .uri("/proxy")
            .header(HOST, "bad host")
            .body(())
            .unwrap();
        let err = rewrite_passthrough(&mut req, "/x").unwrap_err();

        assert_eq!(err.kind(), "invalid_destination");
        assert_eq!(req.uri(), "/proxy");
        assert!(req.extensions().get::<Passthrough>().is_none());
    }

    #[test]
    fn test_request_id_default() {
        let req = request("/");
        assert_eq!(req.request_id(), "unknown");
    }
}
