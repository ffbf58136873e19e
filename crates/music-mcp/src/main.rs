//! Apple Music MCP Server
//!
//! A Model Context Protocol server that lets agentic clients such as
//! Claude Desktop control the macOS Music app.
//!
//! # Usage
//!
//! ```bash
//! music-mcp [--max-buffer <BYTES>] [--shell <PATH>]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `music_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::path::PathBuf;

use clap::Parser;
use music_bridge::{DEFAULT_MAX_BUFFER, ExecutorConfig, ShellExecutor};
use music_mcp::MusicMcpServer;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "music_mcp=info";

/// MCP server for Apple Music
#[derive(Parser)]
#[command(name = "music-mcp")]
#[command(about = "MCP server for Apple Music")]
#[command(version)]
struct Args {
    /// Maximum bytes of script output to capture
    #[arg(long, default_value_t = DEFAULT_MAX_BUFFER)]
    max_buffer: usize,

    /// Shell used to run generated osascript commands
    #[arg(long, default_value = "/bin/sh")]
    shell: PathBuf,
}

/// `RUST_LOG` wins when it parses; otherwise fall back to the default directive
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!(
        max_buffer = args.max_buffer,
        shell = ?args.shell,
        "Starting music-mcp server"
    );

    let executor = ShellExecutor::new(ExecutorConfig {
        shell: args.shell,
        max_buffer: args.max_buffer,
    });
    let server = MusicMcpServer::new(executor);
    server.run().await?;

    Ok(())
}
