//! Error types for the scripting bridge

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Failures reported while running a generated script
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The script ran and reported an error on stderr
    #[error("AppleScript error: {0}")]
    Script(String),

    /// Non-zero exit with nothing written to stderr
    #[error("Command failed with exit code {code}")]
    ExitStatus { code: i32 },

    /// The shell could not be started or its pipes failed
    #[error("failed to run script: {0}")]
    Spawn(#[from] std::io::Error),

    /// Script output did not fit in the capture buffer
    #[error("script output exceeded the {limit} byte capture buffer")]
    OutputTooLarge { limit: usize },
}
