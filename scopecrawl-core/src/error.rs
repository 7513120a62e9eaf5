use thiserror::Error;

/// Why a single link was dropped. Never fatal to a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("Unparseable URL: {0}")]
    Unparseable(String),

    #[error("Unsupported scheme '{scheme}' in {url}")]
    UnsupportedScheme { scheme: String, url: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("No valid seed URLs provided")]
    NoSeeds,
}
