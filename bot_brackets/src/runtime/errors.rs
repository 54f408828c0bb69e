use crate::brackets::ConfigError;
use thiserror::Error;

/// Result type for actor handle operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Actor handle errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Balancer is closed")]
    Closed,

    #[error("Balancer dropped the response")]
    NoResponse,

    #[error("Configuration rejected: {0}")]
    Config(#[from] ConfigError),
}
