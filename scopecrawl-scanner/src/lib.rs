pub mod config;
pub mod crawler;
pub mod error;
pub mod page;
pub mod result;

pub use config::{EngineConfig, WaitUntil};
pub use crawler::{Crawler, PageHandler, ProgressCallback};
pub use error::ScanError;
pub use page::{LinkEnqueuer, Page};
pub use result::CrawlStats;
