//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (redirect, page load and error counters)
//!     → report.rs (recoverable CmsError values)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Errors are reported through an injected port, never a global
//! - Request ID flows through every log line via the trace span
//! - Metrics are cheap (atomic increments) and safe to call with no recorder

pub mod logging;
pub mod metrics;
pub mod report;

pub use report::{CollectingReporter, ErrorReporter, TracingReporter};
