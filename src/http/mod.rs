//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request-id, trace, timeout)
//!     → middleware/redirect.rs (redirect table: answer, rewrite, or pass on)
//!     → middleware/clientjs.rs (editor launcher script)
//!     → server.rs site handler
//!         → upstream.rs (external passthrough)
//!         → Cms::get_page → response.rs (page data as JSON)
//! ```

pub mod middleware;
pub mod mime;
pub mod request;
pub mod response;
pub mod server;
pub mod upstream;

pub use request::{Passthrough, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
