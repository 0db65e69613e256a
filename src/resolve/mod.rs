//! URL resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Requested URL (absolute or root-relative)
//!     → extract path (query and fragment dropped)
//!     → note trailing slash
//!     → percent-decode
//!     → normalize (collapse `.`/`..`, duplicate slashes)
//!     → join onto content root
//!     → strategy.rs (Strict | DefaultDocument | closure)
//!     → ordered candidate files
//! ```
//!
//! # Design Decisions
//! - Pure: no filesystem access happens here
//! - A `..` that would climb above the content root rejects the URL
//! - The trailing-slash flag is captured before normalization strips it

pub mod strategy;

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use axum::http::Uri;
use percent_encoding::percent_decode_str;

use crate::error::{CmsError, CmsResult};

pub use strategy::{DefaultDocument, Resolution, Strict};

/// A requested path after sanitization, rooted in the content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedPath {
    pub path: PathBuf,
    pub trailing_slash: bool,
}

/// Resolve a URL to the ordered list of files that may hold its page.
pub fn resolve(
    content_root: &Path,
    url: &str,
    strategy: &dyn Resolution,
) -> CmsResult<Vec<PathBuf>> {
    let sanitized = sanitize(content_root, url)?;
    Ok(strategy.resolve(&sanitized.path, sanitized.trailing_slash))
}

/// Map a URL onto a path under `content_root`.
pub fn sanitize(content_root: &Path, url: &str) -> CmsResult<SanitizedPath> {
    let raw = url_path(url)?;
    let trailing_slash = raw.ends_with('/');
    let decoded = percent_decode_str(&raw).decode_utf8_lossy();

    let mut path = content_root.to_path_buf();
    for segment in normalize_segments(&decoded)? {
        path.push(segment);
    }

    Ok(SanitizedPath {
        path,
        trailing_slash,
    })
}

/// Extract the raw (still percent-encoded) path component of a URL.
fn url_path(url: &str) -> CmsResult<Cow<'_, str>> {
    let absolute = if url.starts_with("//") {
        Some(Cow::Owned(format!("http:{url}")))
    } else if url.contains("://") {
        Some(Cow::Borrowed(url))
    } else {
        None
    };

    match absolute {
        Some(absolute) => {
            let uri: Uri = absolute
                .parse()
                .map_err(|_| CmsError::InvalidUrl(url.to_string()))?;
            Ok(Cow::Owned(uri.path().to_string()))
        }
        None => {
            let end = url.find(['?', '#']).unwrap_or(url.len());
            Ok(Cow::Borrowed(&url[..end]))
        }
    }
}

/// Split a decoded path into clean segments.
fn normalize_segments(decoded: &str) -> CmsResult<Vec<&str>> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(CmsError::EscapesRoot(decoded.to_string()));
                }
            }
            other => segments.push(other),
        }
    }
    Ok(segments)
}
