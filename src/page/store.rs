//! Loads published page data from the local filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::error::{CmsError, CmsResult};
use crate::observability::ErrorReporter;
use crate::page::model::Page;
use crate::resolve::{self, DefaultDocument, Resolution};

/// Finds and reads the page for a URL.
///
/// Implementations must be total: a page that cannot be found or read comes
/// back as [`Page::empty`].
pub trait PageLoader: Send + Sync {
    fn load(&self, url: &str) -> Page;
}

/// Reads JSON page files from a content directory.
#[derive(Clone)]
pub struct FsPageStore {
    content_root: PathBuf,
    resolution: Arc<dyn Resolution>,
    reporter: Arc<dyn ErrorReporter>,
}

impl FsPageStore {
    /// Store using `index.html` as the default document.
    pub fn new(content_root: impl Into<PathBuf>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self::with_resolution(
            content_root,
            Arc::new(DefaultDocument::new("index.html")),
            reporter,
        )
    }

    pub fn with_resolution(
        content_root: impl Into<PathBuf>,
        resolution: Arc<dyn Resolution>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            content_root: content_root.into(),
            resolution,
            reporter,
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Candidate files for a URL, in the order they are tried.
    pub fn resolve(&self, url: &str) -> CmsResult<Vec<PathBuf>> {
        resolve::resolve(&self.content_root, url, self.resolution.as_ref())
    }

    fn try_load(&self, url: &str) -> CmsResult<Page> {
        for path in self.resolve(url)? {
            if !is_file(&path) {
                continue;
            }
            tracing::debug!(url = %url, path = %path.display(), "Loading CMS page");
            match load_file(&path) {
                // Unreadable: report it and try the next candidate.
                Err(e @ CmsError::Io { .. }) => self.reporter.report(&e),
                other => return other.map(Page::new),
            }
        }
        tracing::debug!(url = %url, "No CMS page found");
        Ok(Page::empty())
    }
}

impl PageLoader for FsPageStore {
    fn load(&self, url: &str) -> Page {
        self.try_load(url).unwrap_or_else(|e| {
            self.reporter.report(&e);
            Page::empty()
        })
    }
}

impl std::fmt::Debug for FsPageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsPageStore")
            .field("content_root", &self.content_root)
            .finish_non_exhaustive()
    }
}

/// Stat failures (missing file, unreadable parent) count as "not a file".
fn is_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Read and parse a page file.
pub fn load_file(path: &Path) -> CmsResult<Value> {
    let bytes = fs::read(path).map_err(|source| CmsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CmsError::Json {
        path: path.to_path_buf(),
        source,
    })
}
