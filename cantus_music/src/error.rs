// Error types for pitch arithmetic, counterpoint search and file output.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A pitch, index, position, or event parameter outside the supported bounds.
    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("{pitch} is not in scale {scale}")]
    NotInScale { pitch: String, scale: String },

    /// The counterpoint search ran out of candidates for one position.
    #[error("no acceptable interval at position {position} after {attempts} attempts")]
    NoAcceptableInterval { position: usize, attempts: u32 },

    #[error("unknown scale type: {0}")]
    UnknownScaleType(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MIDI write error: {0}")]
    Midi(String),
}

pub type Result<T> = std::result::Result<T, Error>;
