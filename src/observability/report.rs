//! Error reporting port.
//!
//! Components that swallow recoverable failures (missing files, bad JSON,
//! unknown redirect codes) hand them to an [`ErrorReporter`] first. The
//! reporter is chosen once at startup and passed to each component as
//! `Arc<dyn ErrorReporter>`.

use std::sync::{Arc, Mutex};

use crate::error::CmsError;
use crate::observability::metrics;

/// Sink for recoverable errors.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &CmsError);
}

/// Reports through `tracing` and the error counter.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn shared() -> Arc<dyn ErrorReporter> {
        Arc::new(Self)
    }
}

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &CmsError) {
        metrics::record_error(error.kind());
        match error {
            // Missing content is routine (unpublished URLs, no redirect table).
            CmsError::Io { .. } if error.kind() == "not_found" => {
                tracing::debug!(kind = error.kind(), error = %error, "CMS resource not found");
            }
            _ => tracing::error!(kind = error.kind(), error = %error, "CMS error"),
        }
    }
}

/// A reported error, flattened so it can be inspected after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedError {
    pub kind: &'static str,
    pub message: String,
}

/// Keeps every reported error in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: Mutex<Vec<ReportedError>>,
}

impl CollectingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything reported so far.
    pub fn errors(&self) -> Vec<ReportedError> {
        self.errors
            .lock()
            .map(|errors| errors.clone())
            .unwrap_or_default()
    }

    /// Kinds of everything reported so far, in order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.errors().into_iter().map(|e| e.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.errors().is_empty()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, error: &CmsError) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(ReportedError {
                kind: error.kind(),
                message: error.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_reporter_keeps_order() {
        let reporter = CollectingReporter::new();
        reporter.report(&CmsError::InvalidUrl("::".into()));
        reporter.report(&CmsError::UnknownRedirectCode("303".into()));

        assert_eq!(reporter.kinds(), vec!["invalid_url", "unknown_redirect_code"]);
        assert!(reporter.errors()[1].message.contains("303"));
    }

    #[test]
    fn test_tracing_reporter_is_silent_without_subscriber() {
        // No subscriber or recorder installed: must not panic.
        TracingReporter.report(&CmsError::EscapesRoot("/../etc".into()));
    }
}
