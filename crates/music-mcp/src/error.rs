//! Error types for the MCP server

use music_bridge::BridgeError;
use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown tool requested
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Argument missing, mistyped or outside its allowed values
    #[error("{0}")]
    InvalidArgument(String),

    /// The generated script failed to run
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Text shown to the client when this error ends a tool call.
    ///
    /// Rejections made before anything runs are reported as-is; failures
    /// from the bridge or the runtime carry an `Error:` prefix.
    pub fn tool_message(&self) -> String {
        match self {
            Self::UnknownTool(_) | Self::InvalidArgument(_) => self.to_string(),
            Self::Bridge(_) | Self::Json(_) | Self::Io(_) => format!("Error: {self}"),
        }
    }
}
