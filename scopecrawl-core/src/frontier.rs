use crate::normalize::normalize_url;
use crate::scope::ScopePolicy;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Per-candidate predicate handed to the engine's link-following.
///
/// Uses the same [`ScopePolicy::classify`] as result recording, so the two
/// extraction paths cannot disagree. Only in-scope pages pass; assets are
/// never navigated.
#[derive(Debug, Clone)]
pub struct FrontierFilter {
    policy: Arc<ScopePolicy>,
}

impl FrontierFilter {
    pub fn new(policy: Arc<ScopePolicy>) -> Self {
        Self { policy }
    }

    /// Returns the candidate without its fragment if it may be crawled.
    pub fn accept(&self, candidate: &Url) -> Option<Url> {
        let url = match normalize_url(candidate.as_str()) {
            Ok(url) => url,
            Err(e) => {
                debug!("Frontier rejected {}: {}", candidate, e);
                return None;
            }
        };
        if self.policy.classify(&url).is_navigable() {
            Some(url)
        } else {
            None
        }
    }
}
