//! Error types for the racetrack simulation.

use std::path::PathBuf;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Simulation and persistence errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The track has no yellow start cell next to a road cell
    #[error("No valid starting position found on the track")]
    NoStartFound,

    /// A persisted Q-table entry could not be decoded
    #[error("Corrupt Q-table entry {key:?}: {reason}")]
    CorruptState {
        /// The offending key as stored on disk
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// Evaluation was requested but no learned table exists
    #[error("No Q-table found at {0}")]
    MissingQTable(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Track image could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
