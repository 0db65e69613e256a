//! Response construction.
//!
//! # Responsibilities
//! - Redirect responses (status, Location, Content-Type, empty body)
//! - The client script response
//! - JSON page-data responses

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{CmsError, CmsResult};
use crate::http::mime;
use crate::page::Page;

/// Empty-bodied redirect to `location`, typed by the destination's extension.
pub fn redirect(status: StatusCode, location: &str) -> CmsResult<Response> {
    let value = HeaderValue::from_str(location)
        .map_err(|_| CmsError::InvalidDestination(location.to_string()))?;

    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response.headers_mut().insert(LOCATION, value);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(mime::from_url(location)));
    Ok(response)
}

/// `200 application/javascript`.
pub fn javascript(body: Vec<u8>) -> Response {
    (
        [(CONTENT_TYPE, HeaderValue::from_static(mime::types::JAVASCRIPT))],
        body,
    )
        .into_response()
}

/// `200 application/json` with the serialized page.
pub fn page(page: &Page) -> Response {
    Json(page).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_headers() {
        let response = redirect(StatusCode::MOVED_PERMANENTLY, "/random_numbers").unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/random_numbers");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/octet-stream");

        let response = redirect(StatusCode::FOUND, "/new/page.html").unwrap();
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
    }

    #[test]
    fn test_redirect_rejects_unencodable_location() {
        let err = redirect(StatusCode::FOUND, "/line\nbreak").unwrap_err();
        assert_eq!(err.kind(), "invalid_destination");
    }

    #[test]
    fn test_javascript_content_type() {
        let response = javascript(b"x()".to_vec());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/javascript");
    }
}
