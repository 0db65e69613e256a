//! Editor mode detection and CMS origin allow-listing.

use axum::http::Uri;

use crate::config::schema::EditorConfig;
use crate::editor::params::QueryParams;
use crate::editor::scripting;

/// Decides whether a request was opened from the CMS editor, and whether the
/// CMS that opened it may load its editor script into the page.
#[derive(Debug, Clone)]
pub struct EditorGate {
    server_urls: Vec<String>,
    token_param: String,
    url_param: String,
}

impl EditorGate {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            server_urls: config.server_urls.clone(),
            token_param: config.token_param.clone(),
            url_param: config.url_param.clone(),
        }
    }

    /// Gate over an explicit allow-list with the default parameter names.
    pub fn with_server_urls<I, S>(server_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(&EditorConfig {
            server_urls: server_urls.into_iter().map(Into::into).collect(),
            ..EditorConfig::default()
        })
    }

    pub fn server_urls(&self) -> &[String] {
        &self.server_urls
    }

    /// True if the editor token parameter is present and non-empty.
    ///
    /// The token itself is not validated here.
    pub fn is_in_editor(&self, params: &QueryParams) -> bool {
        params
            .get(&self.token_param)
            .is_some_and(|token| !token.is_empty())
    }

    /// Script tag loading the editor from the requesting CMS, or `''` when not
    /// in editor mode or when that CMS is not allow-listed.
    pub fn editor_script(&self, params: &QueryParams) -> String {
        if !self.is_in_editor(params) {
            return String::new();
        }
        match params.get(&self.url_param) {
            Some(cms_server_url) if self.url_allowed(cms_server_url) => {
                scripting::editor_script(cms_server_url)
            }
            _ => String::new(),
        }
    }

    pub fn url_allowed(&self, cms_server_url: &str) -> bool {
        url_allowed(cms_server_url, &self.server_urls)
    }
}

/// The parts of a URL compared by the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
}

/// Parse an absolute (`https://host:port/path`), scheme-relative
/// (`//host/path`) or path-only URL. Ports are kept exactly as written.
pub fn parse_origin(url: &str) -> Option<Origin> {
    let (uri, scheme_relative) = match url.strip_prefix("//") {
        Some(rest) => (format!("http://{rest}").parse::<Uri>().ok()?, true),
        None => (url.parse::<Uri>().ok()?, false),
    };

    let path = match uri.path() {
        "" => "/".to_string(),
        path => path.to_string(),
    };

    Some(Origin {
        scheme: if scheme_relative {
            None
        } else {
            uri.scheme_str().map(str::to_string)
        },
        host: uri.host().map(str::to_string),
        port: uri.port_u16(),
        path,
    })
}

/// Check a CMS URL against an allow-list.
///
/// `*` admits any parsable URL. Otherwise an entry matches when its scheme
/// (if it has one), host and port equal the candidate's, ignoring case, and
/// the candidate's path starts with the entry's. Blank entries are skipped.
pub fn url_allowed<S: AsRef<str>>(cms_server_url: &str, allow_list: &[S]) -> bool {
    let Some(current) = parse_origin(cms_server_url) else {
        return false;
    };

    allow_list
        .iter()
        .map(AsRef::as_ref)
        .filter(|entry| !entry.is_empty())
        .any(|entry| entry == "*" || parse_origin(entry).is_some_and(|rule| matches(&current, &rule)))
}

fn matches(current: &Origin, rule: &Origin) -> bool {
    if rule.scheme.is_some() && !same(&current.scheme, &rule.scheme) {
        return false;
    }
    same(&current.host, &rule.host)
        && current.port == rule.port
        && current.path.starts_with(&rule.path)
}

fn same(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}
