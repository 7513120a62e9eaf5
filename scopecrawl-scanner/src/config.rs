use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Page-load condition a navigation waits for.
///
/// The HTTP engine has no renderer, so every variant resolves once the
/// response body has been read. Rendering engines distinguish them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitUntil {
    #[default]
    Load,
    DomContentLoaded,
    NetworkIdle,
}

impl WaitUntil {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitUntil::Load => "load",
            WaitUntil::DomContentLoaded => "domcontentloaded",
            WaitUntil::NetworkIdle => "networkidle",
        }
    }
}

impl fmt::Display for WaitUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaitUntil {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "load" => Ok(WaitUntil::Load),
            "domcontentloaded" => Ok(WaitUntil::DomContentLoaded),
            "networkidle" => Ok(WaitUntil::NetworkIdle),
            other => Err(format!("unknown wait condition '{}'", other)),
        }
    }
}

/// Knobs the engine is configured with before a run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of workers fetching pages at the same time.
    pub max_concurrency: usize,
    /// Total requests (seeds included) after which no new page is dispatched.
    pub max_requests: usize,
    pub navigation_timeout: Duration,
    pub handler_timeout: Duration,
    pub wait_until: WaitUntil,
    pub headless: bool,
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 10,
            max_requests: 500,
            navigation_timeout: Duration::from_secs(30),
            handler_timeout: Duration::from_secs(60),
            wait_until: WaitUntil::default(),
            headless: true,
            user_agent: format!("scopecrawl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
