//! Engine error types

use thiserror::Error;

/// Errors surfaced by the engine boundary
#[derive(Debug, Error)]
pub enum EngineError {
    /// No drawing surface could be obtained for the canvas (fatal at construction)
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A raw key or touch did not map to any player action (ignored by listeners)
    #[error("no input binding for {0:?}")]
    InvalidInputBinding(String),

    /// Tuning values out of range
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// Tuning JSON could not be parsed
    #[error("tuning parse error: {0}")]
    TuningParse(#[from] serde_json::Error),
}
