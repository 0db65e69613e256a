//! In-page editor integration.
//!
//! # Data Flow
//! ```text
//! Request query string
//!     → params.rs (decode)
//!     → gate.rs (token present? CMS origin allow-listed?)
//!     → scripting.rs (script tag with the escaped origin)
//! ```
//!
//! # Design Decisions
//! - A rejected origin yields an empty script, never an error
//! - Ports are compared as written; no default-port inference
//! - Every externally supplied value is escaped before it reaches HTML

pub mod gate;
pub mod params;
pub mod scripting;

pub use gate::{url_allowed, EditorGate};
pub use params::QueryParams;
