//! Redirect URL matching.
//!
//! # Responsibilities
//! - Compile a rule's `redirect_url` into a predicate over the request path
//! - Compute the destination for a matching path
//!
//! # Design Decisions
//! - Exact and prefix comparisons are literal; the ICASE variants lowercase
//!   both sides
//! - Regex search is unanchored, as published patterns carry their own `^`/`$`
//! - Regex destinations substitute the first match only, leaving the rest of
//!   the path in place

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

use crate::error::{CmsError, CmsResult};
use crate::routing::rule::{MatchType, RedirectRule};

/// Compiled URL predicate of one redirect rule.
#[derive(Debug, Clone)]
pub enum UrlMatcher {
    Exact(String),
    /// Pattern stored lowercased.
    ExactIgnoreCase(String),
    Begins(String),
    /// Pattern stored lowercased.
    BeginsIgnoreCase(String),
    Regex(Regex),
    /// Unknown match type or missing pattern.
    Never,
}

impl UrlMatcher {
    pub fn compile(rule: &RedirectRule) -> CmsResult<Self> {
        let Some(pattern) = rule.url_pattern.as_deref() else {
            return Ok(UrlMatcher::Never);
        };

        Ok(match &rule.url_match_type {
            MatchType::Exact => UrlMatcher::Exact(pattern.to_string()),
            MatchType::ExactIgnoreCase => UrlMatcher::ExactIgnoreCase(pattern.to_lowercase()),
            MatchType::Begins => UrlMatcher::Begins(pattern.to_string()),
            MatchType::BeginsIgnoreCase => UrlMatcher::BeginsIgnoreCase(pattern.to_lowercase()),
            MatchType::Regex => UrlMatcher::Regex(compile_regex(pattern, false)?),
            MatchType::RegexIgnoreCase => UrlMatcher::Regex(compile_regex(pattern, true)?),
            MatchType::Unknown(_) => UrlMatcher::Never,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            UrlMatcher::Exact(pattern) => path == pattern,
            UrlMatcher::ExactIgnoreCase(pattern) => path.to_lowercase() == *pattern,
            UrlMatcher::Begins(pattern) => path.starts_with(pattern.as_str()),
            UrlMatcher::BeginsIgnoreCase(pattern) => {
                path.to_lowercase().starts_with(pattern.as_str())
            }
            UrlMatcher::Regex(regex) => regex.is_match(path),
            UrlMatcher::Never => false,
        }
    }

    /// Destination for a path this matcher accepted.
    ///
    /// Non-regex rules redirect to `template` verbatim.
    pub fn destination<'a>(&self, path: &'a str, template: &'a str) -> Cow<'a, str> {
        match self {
            UrlMatcher::Regex(regex) => {
                let expansion = translate_template(template);
                Cow::Owned(regex.replacen(path, 1, expansion.as_str()).into_owned())
            }
            _ => Cow::Borrowed(template),
        }
    }
}

fn compile_regex(pattern: &str, case_insensitive: bool) -> CmsResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| CmsError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Rewrite a destination template into `regex` replacement syntax.
///
/// `$1` becomes `${1}` so a following letter is not read as part of the
/// group name. `${name}` and `$$` pass through. Any other `$` is literal.
fn translate_template(template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 4);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('{') => out.push('$'),
            Some(d) if d.is_ascii_digit() => {
                out.push_str("${");
                while let Some(d) = chars.next_if(char::is_ascii_digit) {
                    out.push(d);
                }
                out.push('}');
            }
            _ => out.push_str("$$"),
        }
    }
    out
}
