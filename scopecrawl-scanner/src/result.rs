use serde::{Deserialize, Serialize};

/// Counters collected by the engine over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Requests issued, successful or not.
    pub requests: usize,
    /// Pages handed to the page handler.
    pub pages_handled: usize,
    /// Navigations that failed or timed out and produced no callback.
    pub failed_requests: usize,
    /// Handler invocations that ran past the handler timeout.
    pub handler_timeouts: usize,
    /// The run stopped because the request ceiling was hit.
    pub ceiling_reached: bool,
}
