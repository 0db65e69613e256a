//! Redirect subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → rule.rs (load jshcms_redirects.json, fresh on every request)
//!     → matcher.rs (compile and evaluate each rule's URL predicate)
//!     → router.rs (first match wins, destination computed)
//!     → Return: Outcome (Redirect | Passthrough | UnknownAction | NoMatch)
//! ```
//!
//! # Design Decisions
//! - No cached rule table: a republished file takes effect on the next request
//! - Ordered rules, first match wins
//! - Evaluation is total: file and pattern errors are reported and skipped
//! - Executing an outcome against HTTP lives in `http::middleware::redirect`

pub mod matcher;
pub mod router;
pub mod rule;

pub use matcher::UrlMatcher;
pub use router::{fully_qualified, Outcome, RedirectRouter};
pub use rule::{load_rules, HttpAction, MatchType, RedirectRule};
