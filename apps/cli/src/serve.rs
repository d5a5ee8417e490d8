//! Tool server over stdio, built on rmcp.
//!
//! Every catalog operation is listed as a tool. Calls go straight to
//! [`Dispatcher::invoke`]; a failed operation is a tool result with
//! `isError` set, never a protocol error.

use std::sync::Arc;

use color_eyre::eyre::Result;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt, model::*,
    service::RequestContext,
};
use serde_json::Value;
use tracing::{debug, info};

use sourcebridge_core::{Dispatcher, ToolDescriptor, ToolResult};

/// Exposes a [`Dispatcher`] as an MCP tool server.
#[derive(Clone)]
pub(crate) struct SourceBridgeServer {
    dispatcher: Arc<Dispatcher>,
}

impl SourceBridgeServer {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    fn tools(&self) -> Vec<Tool> {
        self.dispatcher.list_tools().into_iter().map(to_tool).collect()
    }

    async fn call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let arguments = arguments.unwrap_or_default();
        to_call_result(self.dispatcher.invoke(name, &arguments).await)
    }
}

fn to_tool(descriptor: ToolDescriptor) -> Tool {
    let schema = match descriptor.input_schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    };
    Tool::new(descriptor.name, descriptor.description, Arc::new(schema))
}

fn to_call_result(result: ToolResult) -> CallToolResult {
    let text = result.text().unwrap_or_default().to_string();
    if result.is_error {
        return CallToolResult::error(vec![Content::text(text)]);
    }
    let mut out = CallToolResult::success(vec![Content::text(text)]);
    out.structured_content = result.structured_content;
    out
}

impl ServerHandler for SourceBridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sourcebridge".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::default()
            },
            instructions: Some(
                "SourceBridge creates ingestion feeds, queries content and manages a remote \
                 content platform. Every operation returns a JSON payload or an error message."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "tool call");
        Ok(self.call(&request.name, request.arguments).await)
    }
}

/// Serve `dispatcher` on stdin/stdout until the client disconnects.
pub(crate) async fn serve(dispatcher: Arc<Dispatcher>) -> Result<()> {
    let server = SourceBridgeServer::new(dispatcher);
    info!(tools = server.tools().len(), "serving on stdio");

    let service = server.serve(rmcp::transport::stdio()).await?;
    let reason = service.waiting().await?;
    info!(?reason, "client disconnected");
    Ok(())
}
