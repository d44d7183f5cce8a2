//! Engine lifecycle error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::model::FetchError;

/// Errors that can occur while starting the engine.
///
/// Once started, the engine's components degrade instead of failing:
/// capability probing, model loads, and tracking updates never surface
/// errors to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to build the asset transport.
    #[error("failed to start asset fetcher: {0}")]
    Fetcher(#[from] FetchError),

    /// Configuration file problem.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
