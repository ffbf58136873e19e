//! MCP Server for Apple Music
//!
//! This crate exposes playback and library control of the macOS Music app
//! via the Model Context Protocol (MCP), so an LLM client can play, pause,
//! search and queue music.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client (Claude/IDE) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ music-mcp (server + dispatcher) ]
//!        | Script
//!        v
//! [ music-bridge (escaping + osascript) ]
//!        |
//!        v
//! [ Music.app ]
//! ```
//!
//! # Tools
//!
//! The 28 tools are listed in [`tools`]. Each call goes through the same
//! steps:
//! 1. the name resolves to a [`Tool`]; unknown names are rejected
//! 2. arguments are validated and defaulted into a [`ToolCall`]
//! 3. the call's [`music_bridge::Script`] runs through the executor
//! 4. raw output is rendered into client-facing text

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod render;
pub mod scripts;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use handlers::{Dispatcher, ToolCall};
pub use server::MusicMcpServer;
pub use tools::{Tool, ToolContent, ToolDefinition, ToolResult, get_tool_definitions};
