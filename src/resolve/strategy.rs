//! Resolution strategies: how a sanitized path becomes candidate files.

use std::path::{Path, PathBuf};

/// Turns a sanitized, content-rooted path into candidate files, tried in order.
///
/// `trailing_slash` reports whether the requested URL ended in `/` before
/// normalization removed it. Any `Fn(&Path, bool) -> Vec<PathBuf>` closure
/// is a strategy too.
pub trait Resolution: Send + Sync {
    fn resolve(&self, path: &Path, trailing_slash: bool) -> Vec<PathBuf>;
}

impl<F> Resolution for F
where
    F: Fn(&Path, bool) -> Vec<PathBuf> + Send + Sync,
{
    fn resolve(&self, path: &Path, trailing_slash: bool) -> Vec<PathBuf> {
        self(path, trailing_slash)
    }
}

/// Try the given path and no others.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

impl Resolution for Strict {
    fn resolve(&self, path: &Path, _trailing_slash: bool) -> Vec<PathBuf> {
        vec![path.to_path_buf()]
    }
}

/// Try a default document (e.g. `index.html`) for directory-like URLs.
#[derive(Debug, Clone)]
pub struct DefaultDocument {
    document: String,
}

impl DefaultDocument {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }
}

impl Resolution for DefaultDocument {
    fn resolve(&self, path: &Path, trailing_slash: bool) -> Vec<PathBuf> {
        let with_document = path.join(&self.document);
        if trailing_slash {
            return vec![with_document];
        }

        let url_ext = path.extension();
        let default_ext = Path::new(&self.document).extension();
        match (url_ext, default_ext) {
            (Some(a), Some(b)) if a == b => vec![path.to_path_buf()],
            _ => vec![path.to_path_buf(), with_document],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict() {
        assert_eq!(
            Strict.resolve(Path::new("/root/test"), true),
            vec![PathBuf::from("/root/test")]
        );
    }

    #[test]
    fn test_default_document_trailing_slash() {
        let strategy = DefaultDocument::new("index.html");
        assert_eq!(
            strategy.resolve(Path::new("/root/test"), true),
            vec![PathBuf::from("/root/test/index.html")]
        );
    }

    #[test]
    fn test_default_document_extension_mismatch() {
        let strategy = DefaultDocument::new("index.html");
        assert_eq!(
            strategy.resolve(Path::new("/root/test"), false),
            vec![
                PathBuf::from("/root/test"),
                PathBuf::from("/root/test/index.html")
            ]
        );
        assert_eq!(
            strategy.resolve(Path::new("/root/data.json"), false),
            vec![
                PathBuf::from("/root/data.json"),
                PathBuf::from("/root/data.json/index.html")
            ]
        );
    }

    #[test]
    fn test_default_document_extension_match() {
        let strategy = DefaultDocument::new("index.html");
        assert_eq!(
            strategy.resolve(Path::new("/root/test.html"), false),
            vec![PathBuf::from("/root/test.html")]
        );
    }

    #[test]
    fn test_default_document_without_extension() {
        let strategy = DefaultDocument::new("index");
        assert_eq!(
            strategy.resolve(Path::new("/root/test.html"), false),
            vec![
                PathBuf::from("/root/test.html"),
                PathBuf::from("/root/test.html/index")
            ]
        );
    }

    #[test]
    fn test_closure_strategy() {
        let json_only = |path: &Path, _: bool| vec![path.with_extension("json")];
        assert_eq!(
            json_only.resolve(Path::new("/root/page"), false),
            vec![PathBuf::from("/root/page.json")]
        );
    }
}
