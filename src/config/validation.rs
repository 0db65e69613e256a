//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, virtual paths and parameter names
//! - Check that allow-listed CMS origins parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CmsConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::{Component, Path};

use crate::config::schema::{CmsConfig, ResolutionConfig};
use crate::editor::gate::parse_origin;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("editor.clientjs_path must start with '/', got {0:?}")]
    InvalidClientJsPath(String),

    #[error("content.resolution.document must not be empty")]
    EmptyDefaultDocument,

    #[error("content.resolution.document must be a bare file name, got {0:?}")]
    InvalidDefaultDocument(String),

    #[error("{0} must not be empty")]
    EmptyParam(&'static str),

    #[error("editor.server_urls: cannot parse {0:?}")]
    InvalidServerUrl(String),
}

/// The default document is joined onto already-sanitized paths, so it must
/// stay inside the directory it is joined to.
fn is_bare_file_name(document: &str) -> bool {
    if document.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(document).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &CmsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if !config.editor.clientjs_path.starts_with('/') {
        errors.push(ValidationError::InvalidClientJsPath(
            config.editor.clientjs_path.clone(),
        ));
    }

    if let ResolutionConfig::DefaultDocument { document } = &config.content.resolution {
        if document.trim().is_empty() {
            errors.push(ValidationError::EmptyDefaultDocument);
        } else if !is_bare_file_name(document) {
            errors.push(ValidationError::InvalidDefaultDocument(document.clone()));
        }
    }

    if config.editor.token_param.is_empty() {
        errors.push(ValidationError::EmptyParam("editor.token_param"));
    }
    if config.editor.url_param.is_empty() {
        errors.push(ValidationError::EmptyParam("editor.url_param"));
    }

    for url in &config.editor.server_urls {
        if url.is_empty() || url == "*" {
            continue;
        }
        if parse_origin(url).is_none() {
            errors.push(ValidationError::InvalidServerUrl(url.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&CmsConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = CmsConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.editor.clientjs_path = "editor.js".into();
        config.editor.token_param = String::new();
        config.content.resolution = ResolutionConfig::DefaultDocument {
            document: " ".into(),
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::EmptyDefaultDocument));
        assert!(errors.contains(&ValidationError::EmptyParam("editor.token_param")));
    }

    #[test]
    fn test_default_document_must_stay_in_directory() {
        for bad in ["/etc/x.json", "../x", "..", ".", "sub/index.html", "a\\b"] {
            let mut config = CmsConfig::default();
            config.content.resolution = ResolutionConfig::DefaultDocument {
                document: bad.into(),
            };
            assert_eq!(
                validate_config(&config),
                Err(vec![ValidationError::InvalidDefaultDocument(bad.into())]),
                "{bad}"
            );
        }

        let mut config = CmsConfig::default();
        config.content.resolution = ResolutionConfig::DefaultDocument {
            document: "index.html".into(),
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = CmsConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_server_urls() {
        let mut config = CmsConfig::default();
        config.editor.server_urls = vec![
            "*".into(),
            "".into(),
            "//cms.server".into(),
            "https://cms.example.com:8081/".into(),
        ];
        assert!(validate_config(&config).is_ok());

        config.editor.server_urls.push("http://bad host/".into());
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidServerUrl("http://bad host/".into())])
        );
    }
}
