//! MCP Server implementation
//!
//! Reads newline-delimited JSON-RPC requests from stdin, answers on
//! stdout, and hands `tools/call` requests to the [`Dispatcher`].

use std::io::{BufRead, Write};

use music_bridge::ScriptExecutor;
use serde_json::{Value, json};

use crate::handlers::Dispatcher;
use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability, codes,
};
use crate::tools::{ToolDefinition, get_tool_definitions};
use crate::{Error, Result};

/// Executor type held by the server
pub type BoxedExecutor = Box<dyn ScriptExecutor + Send + Sync>;

/// MCP Server for the Music app
///
/// Requests are handled one at a time; a tool call blocks until its
/// script has finished.
///
/// # Example
///
/// ```ignore
/// use music_bridge::ShellExecutor;
/// use music_mcp::MusicMcpServer;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = MusicMcpServer::new(ShellExecutor::default());
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct MusicMcpServer {
    dispatcher: Dispatcher<BoxedExecutor>,

    /// Available MCP tools, in registry order
    tools: Vec<ToolDefinition>,
}

impl MusicMcpServer {
    /// Create a server that runs scripts through `executor`
    pub fn new(executor: impl ScriptExecutor + Send + Sync + 'static) -> Self {
        let executor: BoxedExecutor = Box::new(executor);
        Self {
            dispatcher: Dispatcher::new(executor),
            tools: get_tool_definitions(),
        }
    }

    /// Run the MCP server over stdin/stdout until stdin closes
    pub async fn run(&self) -> Result<()> {
        tracing::info!(tools = self.tools.len(), "MCP server ready, listening on stdio");

        let stdin = std::io::stdin();
        self.serve(stdin.lock(), std::io::stdout()).await?;

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Answer every newline-delimited message from `reader` on `writer`
    ///
    /// Lines that are not UTF-8 get a parse error and the loop moves on;
    /// only I/O failures on the streams themselves end it early.
    pub async fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(());
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    tracing::debug!(request = %line, "Received message");
                    match self.handle_message(line).await {
                        Ok(response) => response,
                        Err(e) => serde_json::to_string(&JsonRpcResponse::error(
                            None,
                            codes::INTERNAL_ERROR,
                            format!("Internal error: {e}"),
                        ))?,
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Message is not valid UTF-8");
                    serde_json::to_string(&JsonRpcResponse::error(
                        None,
                        codes::PARSE_ERROR,
                        format!("Parse error: {e}"),
                    ))?
                }
            };

            // Notifications produce no response
            if !response.is_empty() {
                writeln!(writer, "{response}")?;
                writer.flush()?;
            }
        }
    }

    /// Handle a single MCP message
    ///
    /// Returns the serialized response, or an empty string for
    /// notifications.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                let response =
                    JsonRpcResponse::error(None, codes::PARSE_ERROR, format!("Parse error: {e}"));
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        let id = value.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Message is not a JSON-RPC request");
                let response = JsonRpcResponse::error(
                    id,
                    codes::INVALID_REQUEST,
                    format!("Invalid Request: {e}"),
                );
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        if request.jsonrpc != "2.0" {
            let response = JsonRpcResponse::error(
                request.id,
                codes::INVALID_REQUEST,
                format!("Invalid Request: unsupported jsonrpc version {}", request.jsonrpc),
            );
            return serde_json::to_string(&response).map_err(Error::from);
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params).await?,
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id).await?,
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            // Notifications, no response
            "initialized" => return Ok(String::new()),
            method if method.starts_with("notifications/") => return Ok(String::new()),
            _ => JsonRpcResponse::error(
                request.id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    async fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: InitializeParams = serde_json::from_value(params).unwrap_or_default();
        let client = params.client_info.as_ref();
        tracing::info!(
            client = client.map_or("unknown", |c| c.name.as_str()),
            client_version = client.map_or("", |c| c.version.as_str()),
            "Client connected"
        );
        if let Some(requested) = params.protocol_version.as_deref() {
            if requested != PROTOCOL_VERSION {
                tracing::info!(requested, offered = PROTOCOL_VERSION, "Protocol version differs");
            }
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: "music-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    async fn handle_tools_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let tools = serde_json::to_value(&self.tools)?;
        Ok(JsonRpcResponse::success(id, json!({ "tools": tools })))
    }

    /// Tool failures are successful responses with `isError` set; only
    /// malformed params produce a JSON-RPC error.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                ));
            }
        };

        let result = self
            .dispatcher
            .invoke(&tool_params.name, tool_params.arguments);
        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Get available tools
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }
}
