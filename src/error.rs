//! Error types for the pitchshift crate.

use thiserror::Error;

/// Errors raised outside the real-time path: property validation,
/// configuration loading, and WAV file I/O.
#[derive(Debug, Error)]
pub enum PshiftError {
    /// Coarse tune outside the accepted semitone range.
    #[error("coarse tune {0} out of range [{min}, {max}] semitones", min = crate::effect::props::MIN_COARSE_TUNE, max = crate::effect::props::MAX_COARSE_TUNE)]
    CoarseTuneOutOfRange(i32),
    /// Fine tune outside the accepted cent range.
    #[error("fine tune {0} out of range [{min}, {max}] cents", min = crate::effect::props::MIN_FINE_TUNE, max = crate::effect::props::MAX_FINE_TUNE)]
    FineTuneOutOfRange(i32),
    /// Processing block size of zero or longer than one buffer line.
    #[error("block size {0} out of range [1, {max}]", max = crate::core::types::BUFFER_LINE_SIZE)]
    InvalidBlockSize(usize),
    /// Invalid audio format or parameters.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
