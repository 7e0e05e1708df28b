use classglob_api::ResourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logging error: {0}")]
    Logging(String),
}

impl DiscoveryError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, DiscoveryError::Resource(e) if e.is_malformed())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DiscoveryError::Resource(e) if e.is_not_found())
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryError::Config(err.to_string())
    }
}

pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;
