//! CMS request layer.
//!
//! Serves pages published by a CMS as JSON documents on disk, applies the
//! CMS redirect table, and opens the in-page editor when a page is loaded
//! from the CMS.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request-id → trace → timeout
//!                          │
//!                          ▼
//!                  ┌───────────────┐   Redirect   ┌──────────────┐
//!                  │   routing     │─────────────▶│ 301/302 +    │
//!                  │ (redirects)   │              │ Location     │
//!                  └───────┬───────┘              └──────────────┘
//!                          │ NoMatch / Passthrough (URI rewritten)
//!                          ▼
//!                  ┌───────────────┐   exact path ┌──────────────┐
//!                  │   clientjs    │─────────────▶│ launcher .js │
//!                  └───────┬───────┘              └──────────────┘
//!                          ▼
//!                  ┌───────────────┐  external    ┌──────────────┐
//!                  │ site handler  │─────────────▶│  upstream    │
//!                  └───────┬───────┘              └──────────────┘
//!                          ▼
//!        cms (editor gate) → page::store → resolve → content files
//! ```

pub mod cms;
pub mod config;
pub mod editor;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod page;
pub mod resolve;
pub mod routing;

pub use cms::Cms;
pub use config::schema::CmsConfig;
pub use error::{CmsError, CmsResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
