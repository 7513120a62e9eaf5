//! Scope rules that decide what a crawl records and what it navigates.
//!
//! Everything in this crate is synchronous and free of I/O. The scoping
//! tables are built once from the seeds and are read-only afterwards, so a
//! [`ScopePolicy`] can be shared between workers behind an `Arc`.

pub mod asset;
pub mod discovery;
pub mod error;
pub mod frontier;
pub mod normalize;
pub mod scope;

pub use asset::{ASSET_EXTENSIONS, is_asset};
pub use discovery::DiscoverySet;
pub use error::{LinkError, SeedError};
pub use frontier::FrontierFilter;
pub use normalize::{normalize_href, normalize_url};
pub use scope::{LinkClass, ScopePolicy};
