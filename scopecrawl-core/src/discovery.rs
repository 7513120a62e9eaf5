use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Deduplicating accumulator of every URL a run reports.
///
/// Inserts are safe from any number of workers. Entries are never removed;
/// [`DiscoverySet::snapshot`] is read once the crawl has finished.
#[derive(Debug, Default)]
pub struct DiscoverySet {
    urls: Mutex<HashSet<String>>,
}

impl DiscoverySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent insert. Returns `true` if the URL was not present yet.
    pub fn record(&self, url: &Url) -> bool {
        let mut urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        if urls.contains(url.as_str()) {
            return false;
        }
        urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All recorded URLs in ascending lexicographic order.
    pub fn snapshot(&self) -> Vec<String> {
        let urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        let mut sorted: Vec<String> = urls.iter().cloned().collect();
        sorted.sort();
        sorted
    }
}
