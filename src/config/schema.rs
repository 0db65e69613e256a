//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the CMS
//! router. All types derive Serde traits for deserialization from config
//! files, and every field has a default so an empty file is valid.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::resolve::{DefaultDocument, Resolution, Strict};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct CmsConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Published content location and URL resolution.
    pub content: ContentConfig,

    /// In-page editor integration.
    pub editor: EditorConfig,

    /// Redirect table.
    pub redirects: RedirectConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl CmsConfig {
    /// Path of the redirect table, falling back to the file the CMS publishes
    /// next to the content.
    pub fn redirect_file(&self) -> PathBuf {
        self.redirects
            .file
            .clone()
            .unwrap_or_else(|| self.content.path.join("jshcms_redirects.json"))
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Published content configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding the published CMS page files.
    pub path: PathBuf,

    /// How a URL is turned into candidate files.
    pub resolution: ResolutionConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            resolution: ResolutionConfig::default(),
        }
    }
}

/// URL resolution strategy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionConfig {
    /// Only the exact path.
    Strict,
    /// The exact path, then the default document inside it.
    DefaultDocument {
        #[serde(default = "default_document")]
        document: String,
    },
}

fn default_document() -> String {
    "index.html".to_string()
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        ResolutionConfig::DefaultDocument {
            document: default_document(),
        }
    }
}

impl ResolutionConfig {
    /// Build the configured strategy.
    pub fn build(&self) -> Arc<dyn Resolution> {
        match self {
            ResolutionConfig::Strict => Arc::new(Strict),
            ResolutionConfig::DefaultDocument { document } => {
                Arc::new(DefaultDocument::new(document.clone()))
            }
        }
    }
}

/// In-page editor configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// CMS origins allowed to open the editor; `*` allows any.
    pub server_urls: Vec<String>,

    /// Virtual path serving the editor launcher script.
    pub clientjs_path: String,

    /// File served at `clientjs_path`.
    pub clientjs_file: PathBuf,

    /// Query parameter carrying the editor token.
    pub token_param: String,

    /// Query parameter carrying the CMS origin.
    pub url_param: String,

    /// Access key for remote template integrations.
    pub access_key: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            server_urls: Vec::new(),
            clientjs_path: "/.jsHarmonyCms/jsHarmonyCmsEditor.js".to_string(),
            clientjs_file: PathBuf::from("clientjs/jsHarmonyCmsEditor.min.js"),
            token_param: "jshcms_token".to_string(),
            url_param: "jshcms_url".to_string(),
            access_key: String::new(),
        }
    }
}

/// Redirect table configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RedirectConfig {
    /// Apply the redirect table.
    pub enabled: bool,

    /// Redirect table file; defaults to `<content.path>/jshcms_redirects.json`.
    pub file: Option<PathBuf>,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Timeout for forwarding a passthrough request upstream, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
