//! Error types for the motor control link.

use thiserror::Error;

/// Errors that can occur decoding link messages
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Message too short: {0} bytes")]
    Truncated(usize),

    #[error("Length byte mismatch: header says {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Unknown message id: 0x{0:02X}")]
    UnknownId(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
