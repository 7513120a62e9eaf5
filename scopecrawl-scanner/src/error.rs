use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Navigation timed out after {0:?}")]
    NavigationTimeout(Duration),

    #[error("Page handler timed out after {0:?}")]
    HandlerTimeout(Duration),

    #[error("No seed URLs to crawl")]
    NoSeeds,

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
