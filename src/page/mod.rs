//! Published page data.
//!
//! # Data Flow
//! ```text
//! URL
//!     → store.rs (resolve candidates, first regular file wins, parse JSON)
//!     → model.rs (Page: total, read-only accessors)
//! ```
//!
//! # Design Decisions
//! - Files are read fresh on every call; published content may change at any time
//! - Missing or broken files yield an empty page, never an error
//! - Editor pages carry no document content

pub mod model;
pub mod store;

pub use model::{Mode, Page, PageDocument, Seo, Slots};
pub use store::{FsPageStore, PageLoader};
