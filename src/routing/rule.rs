//! Redirect table entries as published by the CMS.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CmsError, CmsResult};

/// How a rule's `redirect_url` is compared against the request path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MatchType {
    Exact,
    ExactIgnoreCase,
    Begins,
    BeginsIgnoreCase,
    Regex,
    RegexIgnoreCase,
    /// Anything else. Never matches.
    Unknown(String),
}

impl From<String> for MatchType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "EXACT" => MatchType::Exact,
            "EXACTICASE" => MatchType::ExactIgnoreCase,
            "BEGINS" => MatchType::Begins,
            "BEGINSICASE" => MatchType::BeginsIgnoreCase,
            "REGEX" => MatchType::Regex,
            "REGEXICASE" => MatchType::RegexIgnoreCase,
            _ => MatchType::Unknown(value),
        }
    }
}

impl Default for MatchType {
    fn default() -> Self {
        MatchType::Unknown(String::new())
    }
}

/// What to do with a matching request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawCode")]
pub enum HttpAction {
    /// `301`
    PermanentRedirect,
    /// `302`
    TemporaryRedirect,
    /// `PASSTHRU`: serve the destination without telling the client.
    Passthrough,
    Unknown(String),
}

impl HttpAction {
    pub fn label(&self) -> &'static str {
        match self {
            HttpAction::PermanentRedirect => "301",
            HttpAction::TemporaryRedirect => "302",
            HttpAction::Passthrough => "passthrough",
            HttpAction::Unknown(_) => "unknown",
        }
    }
}

impl Default for HttpAction {
    fn default() -> Self {
        HttpAction::Unknown(String::new())
    }
}

/// `redirect_http_code` is published as a string, but hand-written tables
/// often use a bare number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCode {
    Text(String),
    Number(i64),
    Other(serde_json::Value),
}

impl From<RawCode> for HttpAction {
    fn from(raw: RawCode) -> Self {
        let code = match raw {
            RawCode::Text(text) => text,
            RawCode::Number(n) => n.to_string(),
            RawCode::Other(value) => value.to_string(),
        };
        match code.as_str() {
            "301" => HttpAction::PermanentRedirect,
            "302" => HttpAction::TemporaryRedirect,
            "PASSTHRU" => HttpAction::Passthrough,
            _ => HttpAction::Unknown(code),
        }
    }
}

/// One entry of the redirect table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct RedirectRule {
    #[serde(rename = "redirect_url_type", default)]
    pub url_match_type: MatchType,

    /// Rules without a pattern never match.
    #[serde(rename = "redirect_url", default)]
    pub url_pattern: Option<String>,

    #[serde(rename = "redirect_http_code", default)]
    pub http_action: HttpAction,

    #[serde(rename = "redirect_dest", default)]
    pub destination: String,
}

/// Read the ordered redirect table from `path`.
pub fn load_rules(path: &Path) -> CmsResult<Vec<RedirectRule>> {
    let bytes = fs::read(path).map_err(|source| CmsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CmsError::Json {
        path: path.to_path_buf(),
        source,
    })
}
