//! Error types for the climate-overlay engine.

use thiserror::Error;

/// Result type alias using OverlayError.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Primary error type for overlay operations.
///
/// Deliberately small: per-sample projection failures and empty inputs are
/// recovered locally and never surface here, and post-unmount calls are
/// silent no-ops rather than errors.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// `mount` was called while the overlay was already mounted.
    #[error("overlay is already mounted")]
    AlreadyMounted,

    /// A configuration value failed validation before mounting.
    #[error("invalid overlay configuration: {0}")]
    InvalidConfig(String),
}
