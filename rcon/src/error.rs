use std::io;
use std::time::Duration;

use thiserror::Error;

/// Transport-level failure. Every variant means the command's outcome is unknown.
#[derive(Debug, Error)]
pub enum RconError {
    #[error("RCON I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("RCON operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("RCON authentication rejected by server")]
    AuthenticationFailed,
    #[error("RCON payload of {len} bytes exceeds limit of {max}")]
    PayloadTooLarge { len: usize, max: usize },
    #[error("RCON protocol error: {0}")]
    Protocol(String),
    #[error("RCON connection closed by server")]
    Closed,
}
