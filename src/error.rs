//! This module defines the crate's typed error.
//!
//! The capture hot path is deliberately total and never produces errors;
//! only one-time setup can fail.
use thiserror::Error;

/// Errors surfaced by capture setup.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A global default subscriber was already installed.
    #[error("failed to install capture layer: {0}")]
    InstallLayer(#[from] tracing::subscriber::SetGlobalDefaultError),
}
