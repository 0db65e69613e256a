//! Recoverable errors raised while serving CMS content.
//!
//! None of these ever reach a client. Request-path entry points hand them to
//! an [`ErrorReporter`](crate::observability::report::ErrorReporter) and fall
//! back to an empty page, an empty rule table, or the unmodified request.

use std::path::PathBuf;

/// Result alias for CMS operations.
pub type CmsResult<T> = Result<T, CmsError>;

/// Errors produced by page loading, URL resolution and redirect handling.
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    /// A content or redirect file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A content or redirect file is not valid JSON (or not the expected shape).
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A requested URL could not be parsed.
    #[error("invalid url {0:?}")]
    InvalidUrl(String),

    /// A requested path climbs above the content root.
    #[error("path {0:?} escapes the content root")]
    EscapesRoot(String),

    /// A redirect rule carries a pattern that is not a valid regular expression.
    #[error("invalid redirect pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A redirect rule carries an action code other than 301, 302 or PASSTHRU.
    #[error("redirect code unknown: {0:?}")]
    UnknownRedirectCode(String),

    /// A redirect destination cannot be turned into a request target.
    #[error("invalid redirect destination {0:?}")]
    InvalidDestination(String),
}

impl CmsError {
    /// Short, stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CmsError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                "not_found"
            }
            CmsError::Io { .. } => "io",
            CmsError::Json { .. } => "json",
            CmsError::InvalidUrl(_) => "invalid_url",
            CmsError::EscapesRoot(_) => "escapes_root",
            CmsError::InvalidPattern { .. } => "invalid_pattern",
            CmsError::UnknownRedirectCode(_) => "unknown_redirect_code",
            CmsError::InvalidDestination(_) => "invalid_destination",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_distinguishes_missing_files() {
        let missing = CmsError::Io {
            path: PathBuf::from("/nope"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let denied = CmsError::Io {
            path: PathBuf::from("/secret"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(missing.kind(), "not_found");
        assert_eq!(denied.kind(), "io");
    }

    #[test]
    fn test_unknown_code_message() {
        let err = CmsError::UnknownRedirectCode("303".into());
        assert_eq!(err.to_string(), "redirect code unknown: \"303\"");
    }
}
