use crate::asset::is_asset;
use crate::error::SeedError;
use crate::normalize::normalize_url;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use url::Url;

/// Verdict for a normalized URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// Navigable HTML page inside the crawl scope.
    Page,
    /// Non-HTML asset inside the (relaxed) asset scope. Recorded, never navigated.
    Asset,
    OutOfScope,
}

impl LinkClass {
    /// Whether the URL belongs in the discovery results.
    pub fn is_recorded(self) -> bool {
        !matches!(self, LinkClass::OutOfScope)
    }

    /// Whether the URL may become a crawl task.
    pub fn is_navigable(self) -> bool {
        matches!(self, LinkClass::Page)
    }
}

/// Scope recorded for one seeded hostname.
///
/// Empty `prefixes` means the host was seeded at its root and every path
/// is admissible.
#[derive(Debug, Default, Clone)]
struct HostScope {
    prefixes: Vec<String>,
    tokens: Vec<String>,
    unconstrained: bool,
}

impl HostScope {
    fn add_seed_path(&mut self, path: &str) {
        if self.unconstrained {
            return;
        }
        match seed_prefix(path) {
            None => {
                // A root seed admits the whole host, whatever else was seeded.
                self.unconstrained = true;
                self.prefixes.clear();
                self.tokens.clear();
            }
            Some(prefix) => {
                if let Some(token) = prefix.split('/').find(|segment| !segment.is_empty())
                    && !self.tokens.iter().any(|t| t == token)
                {
                    self.tokens.push(token.to_string());
                }
                if !self.prefixes.contains(&prefix) {
                    self.prefixes.push(prefix);
                }
            }
        }
    }

    fn admits_page(&self, normalized_path: &str) -> bool {
        self.prefixes.is_empty()
            || self
                .prefixes
                .iter()
                .any(|prefix| normalized_path.starts_with(prefix.as_str()))
    }

    fn admits_asset(&self, lowered_path: &str) -> bool {
        self.tokens.is_empty()
            || self
                .tokens
                .iter()
                .any(|token| lowered_path.contains(token.as_str()))
    }
}

/// Hostname and path-prefix rules derived once from the seed URLs.
///
/// Immutable after construction; share it across workers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ScopePolicy {
    same_domain_only: bool,
    seeds: Vec<Url>,
    allowed_hosts: HashSet<String>,
    hosts: HashMap<String, HostScope>,
}

impl ScopePolicy {
    /// Build the scoping tables from the seed list.
    ///
    /// Seeds that fail to parse or are not `http`/`https` are skipped with a
    /// warning. Fails only when no usable seed remains.
    pub fn from_seeds<S: AsRef<str>>(seeds: &[S], same_domain_only: bool) -> Result<Self, SeedError> {
        let mut policy = Self {
            same_domain_only,
            seeds: Vec::new(),
            allowed_hosts: HashSet::new(),
            hosts: HashMap::new(),
        };

        for raw in seeds {
            let seed = match normalize_url(raw.as_ref()) {
                Ok(seed) => seed,
                Err(e) => {
                    warn!("Skipping seed {}: {}", raw.as_ref(), e);
                    continue;
                }
            };
            let Some(host) = seed.host_str().map(str::to_string) else {
                continue;
            };

            policy
                .hosts
                .entry(host.clone())
                .or_default()
                .add_seed_path(seed.path());
            policy.allowed_hosts.insert(host);
            if !policy.seeds.contains(&seed) {
                policy.seeds.push(seed);
            }
        }

        if policy.seeds.is_empty() {
            return Err(SeedError::NoSeeds);
        }

        debug!(
            "Scope built from {} seed(s): hosts={:?}, same_domain_only={}",
            policy.seeds.len(),
            policy.allowed_hosts,
            same_domain_only
        );
        Ok(policy)
    }

    /// The usable seeds, normalized, in the order they were supplied.
    pub fn seeds(&self) -> &[Url] {
        &self.seeds
    }

    pub fn same_domain_only(&self) -> bool {
        self.same_domain_only
    }

    pub fn allowed_hosts(&self) -> &HashSet<String> {
        &self.allowed_hosts
    }

    /// Recorded path prefixes for a host; empty for root-seeded or unknown hosts.
    pub fn path_prefixes(&self, host: &str) -> &[String] {
        self.hosts.get(host).map(|h| h.prefixes.as_slice()).unwrap_or(&[])
    }

    /// Scope tokens (first path segment of each prefix) for a host.
    pub fn scope_tokens(&self, host: &str) -> &[String] {
        self.hosts.get(host).map(|h| h.tokens.as_slice()).unwrap_or(&[])
    }

    /// Hostname gate. Always passes when same-domain-only is off.
    pub fn host_allowed(&self, host: &str) -> bool {
        !self.same_domain_only || self.allowed_hosts.contains(host)
    }

    /// Scope check for navigable pages: host gate plus path-prefix match.
    pub fn admits_page(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        if !self.host_allowed(host) {
            return false;
        }
        match self.hosts.get(host) {
            Some(scope) => scope.admits_page(&normalized_path(url)),
            None => true,
        }
    }

    /// Relaxed scope check for assets: host gate plus scope-token substring match.
    pub fn admits_asset(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        if !self.host_allowed(host) {
            return false;
        }
        match self.hosts.get(host) {
            Some(scope) => scope.admits_asset(&url.path().to_lowercase()),
            None => true,
        }
    }

    /// Single decision point shared by result recording and frontier filtering.
    pub fn classify(&self, url: &Url) -> LinkClass {
        let class = if is_asset(url.path()) {
            if self.admits_asset(url) {
                LinkClass::Asset
            } else {
                LinkClass::OutOfScope
            }
        } else if self.admits_page(url) {
            LinkClass::Page
        } else {
            LinkClass::OutOfScope
        };
        debug!("{} -> {:?}", url, class);
        class
    }
}

/// Lower-cased seed path forced to start and end with `/`. `None` for the root.
fn seed_prefix(path: &str) -> Option<String> {
    let mut prefix = path.to_lowercase();
    if !prefix.starts_with('/') {
        prefix.insert(0, '/');
    }
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    if prefix == "/" { None } else { Some(prefix) }
}

/// Candidate path as compared against prefixes: lower-cased, trailing `/`.
fn normalized_path(url: &Url) -> String {
    let mut path = url.path().to_lowercase();
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}
