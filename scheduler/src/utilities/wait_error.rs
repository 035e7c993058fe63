use std::error;
use std::fmt;

/// Why a blocking wait or simulated pause ended without its condition being met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// The shutdown signal fired.
    Cancelled,
    /// The caller's deadline passed first.
    TimedOut,
}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitError::Cancelled => f.write_str("wait cancelled by shutdown"),
            WaitError::TimedOut => f.write_str("wait timed out"),
        }
    }
}

impl error::Error for WaitError {}
