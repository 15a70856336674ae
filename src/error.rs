//! Error types for tree generation and rendering

use std::io;
use thiserror::Error;

/// Main error type for fractree operations
#[derive(Error, Debug)]
pub enum FractalError {
    /// Invalid user input, rejected before any drawing starts
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The render boundary stopped accepting pen commands
    #[error("renderer unavailable: {0}")]
    RendererUnavailable(#[source] io::Error),

    /// The user quit an interactive draw
    #[error("drawing interrupted")]
    Interrupted,
}

impl FractalError {
    pub fn config(msg: impl Into<String>) -> Self {
        FractalError::Config(msg.into())
    }
}

impl From<io::Error> for FractalError {
    fn from(err: io::Error) -> Self {
        FractalError::RendererUnavailable(err)
    }
}

/// Result type alias for fractree operations
pub type Result<T> = std::result::Result<T, FractalError>;
