//! Error types for trisect

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid build config: {0}")]
    InvalidConfig(String),

    #[error("triangle storage allocation failed: {0}")]
    OutOfMemory(#[from] std::collections::TryReserveError),
}
