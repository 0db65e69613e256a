//! Redirect table evaluation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::StatusCode;
use url::{Position, Url};

use crate::error::{CmsError, CmsResult};
use crate::observability::{metrics, ErrorReporter};
use crate::routing::matcher::UrlMatcher;
use crate::routing::rule::{load_rules, HttpAction, RedirectRule};

/// Result of running a request path through the redirect table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Answer with a 301/302 and `Location: location`.
    Redirect { status: StatusCode, location: String },
    /// Serve `destination` in place of the requested URL.
    Passthrough { destination: String },
    /// A rule matched but its action code is not one we execute.
    UnknownAction { code: String },
    NoMatch,
}

/// Evaluates the redirect table published at a fixed path.
#[derive(Clone)]
pub struct RedirectRouter {
    rules_path: PathBuf,
    reporter: Arc<dyn ErrorReporter>,
}

impl RedirectRouter {
    pub fn new(rules_path: impl Into<PathBuf>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            rules_path: rules_path.into(),
            reporter,
        }
    }

    pub fn rules_path(&self) -> &Path {
        &self.rules_path
    }

    /// Match `path` against the table, re-reading the file first.
    ///
    /// An unreadable or malformed table is reported and treated as empty.
    pub fn evaluate(&self, path: &str) -> Outcome {
        match load_rules(&self.rules_path) {
            Ok(rules) => evaluate_rules(&rules, path, self.reporter.as_ref()),
            Err(e) => {
                self.reporter.report(&e);
                Outcome::NoMatch
            }
        }
    }
}

impl std::fmt::Debug for RedirectRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectRouter")
            .field("rules_path", &self.rules_path)
            .finish_non_exhaustive()
    }
}

/// Match `path` against an already loaded table. First match wins.
pub fn evaluate_rules(rules: &[RedirectRule], path: &str, reporter: &dyn ErrorReporter) -> Outcome {
    for rule in rules {
        let matcher = match UrlMatcher::compile(rule) {
            Ok(matcher) => matcher,
            Err(e) => {
                reporter.report(&e);
                continue;
            }
        };
        if !matcher.matches(path) {
            continue;
        }

        let destination = matcher.destination(path, &rule.destination).into_owned();
        metrics::record_redirect(rule.http_action.label());
        tracing::debug!(
            path = %path,
            destination = %destination,
            action = rule.http_action.label(),
            "Redirect rule matched"
        );

        return match &rule.http_action {
            HttpAction::PermanentRedirect => Outcome::Redirect {
                status: StatusCode::MOVED_PERMANENTLY,
                location: destination,
            },
            HttpAction::TemporaryRedirect => Outcome::Redirect {
                status: StatusCode::FOUND,
                location: destination,
            },
            HttpAction::Passthrough => Outcome::Passthrough { destination },
            HttpAction::Unknown(code) => {
                reporter.report(&CmsError::UnknownRedirectCode(code.clone()));
                Outcome::UnknownAction { code: code.clone() }
            }
        };
    }
    Outcome::NoMatch
}

/// True if `destination` names its own scheme and host.
pub fn is_fully_qualified(destination: &str) -> bool {
    Url::parse(destination).is_ok_and(|url| url.has_host())
}

/// Absolute form of a passthrough destination.
///
/// Relative destinations are resolved against `scheme://host/` and always
/// carry an explicit port. Fully-qualified destinations are returned as-is.
pub fn fully_qualified(destination: &str, scheme: &str, host: &str) -> CmsResult<String> {
    if is_fully_qualified(destination) {
        return Ok(destination.to_string());
    }

    let invalid = || CmsError::InvalidDestination(destination.to_string());
    let base = Url::parse(&format!("{scheme}://{host}/")).map_err(|_| invalid())?;
    let url = base.join(destination).map_err(|_| invalid())?;
    let port = url.port_or_known_default().ok_or_else(invalid)?;

    Ok(format!(
        "{}://{}:{}{}",
        url.scheme(),
        &url[Position::BeforeHost..Position::AfterHost],
        port,
        &url[Position::BeforePath..]
    ))
}
