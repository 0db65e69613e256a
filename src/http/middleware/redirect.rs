//! Redirect table middleware.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → RedirectRouter::evaluate (blocking pool, file read per request)
//!     → Redirect:      301/302 + Location, request ends here
//!     → Passthrough:   URI rewritten + Passthrough extension → next layer
//!     → UnknownAction: already reported → next layer unchanged
//!     → NoMatch:       next layer unchanged
//! ```
//!
//! Any failure while executing an outcome is reported and the original
//! request continues to the next layer.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::{rewrite_passthrough, RequestIdExt};
use crate::http::response;
use crate::http::server::AppState;
use crate::routing::Outcome;

pub async fn redirect_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(router) = state.redirects.clone() else {
        return next.run(req).await;
    };

    let path = req.uri().path().to_string();
    let outcome = match tokio::task::spawn_blocking(move || router.evaluate(&path)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(request_id = %req.request_id(), error = %e, "Redirect evaluation failed");
            Outcome::NoMatch
        }
    };

    match outcome {
        Outcome::Redirect { status, location } => match response::redirect(status, &location) {
            Ok(response) => {
                tracing::info!(
                    request_id = %req.request_id(),
                    path = %req.uri().path(),
                    status = status.as_u16(),
                    location = %location,
                    "Redirecting"
                );
                response
            }
            Err(e) => {
                state.reporter.report(&e);
                next.run(req).await
            }
        },
        Outcome::Passthrough { destination } => {
            match rewrite_passthrough(&mut req, &destination) {
                Ok(passthrough) => tracing::debug!(
                    request_id = %req.request_id(),
                    url = %passthrough.url,
                    external = passthrough.external,
                    "Passthrough"
                ),
                Err(e) => state.reporter.report(&e),
            }
            next.run(req).await
        }
        Outcome::UnknownAction { .. } | Outcome::NoMatch => next.run(req).await,
    }
}
