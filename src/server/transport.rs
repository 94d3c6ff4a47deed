use std::io;
use std::sync::Arc;

use log::{
    debug,
    error,
    info,
    warn
};
use serde_json::{
    json,
    Value
};
use tokio::io::{
    AsyncBufRead,
    AsyncBufReadExt,
    AsyncWrite,
    AsyncWriteExt
};
use tokio::sync::mpsc;

use crate::server::dispatcher::Dispatcher;
use crate::server::rpcmessage::{
    CallToolParams,
    RpcRequest,
    RpcResponse,
    INVALID_PARAMS,
    INVALID_REQUEST,
    METHOD_NOT_FOUND,
    PARSE_ERROR
};
use crate::server::tooldefinition::tool_definitions;

pub const SERVER_NAME: &str = "time-mcp";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

const OUTBOX_CAPACITY: usize = 64;

/// Newline-delimited JSON-RPC 2.0 front end for a [`Dispatcher`].
pub struct Server {
    dispatcher: Arc<Dispatcher>
}

impl Server {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Server {
        Server { dispatcher }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Answers one input line. `None` for notifications and blank lines.
    pub async fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => return Some(RpcResponse::error(Value::Null, PARSE_ERROR, format!("Parse error: {e}")))
        };
        if !message.is_object() {
            return Some(RpcResponse::error(Value::Null, INVALID_REQUEST, "Invalid request: expected a single JSON object"));
        }
        let id = message.get("id").cloned();
        let request: RpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return id.map(|id| RpcResponse::error(id, INVALID_REQUEST, format!("Invalid request: {e}")));
            }
        };
        self.handle_request(request).await
    }

    pub async fn handle_request(&self, request: RpcRequest) -> Option<RpcResponse> {
        if request.is_notification() {
            debug!("notification {}", request.method);
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => {
                let protocol_version = request
                    .params
                    .as_ref()
                    .and_then(|params| params.get("protocolVersion"))
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL_VERSION)
                    .to_owned();
                RpcResponse::result(id, json!({
                    "protocolVersion": protocol_version,
                    "capabilities": {
                        "tools": {},
                        "logging": {}
                    },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }))
            },
            "ping" => RpcResponse::result(id, json!({})),
            "tools/list" => RpcResponse::result(id, json!({ "tools": tool_definitions() })),
            "tools/call" => {
                let params = request.params.unwrap_or(Value::Null);
                match serde_json::from_value::<CallToolParams>(params) {
                    Ok(params) => {
                        let result = self.dispatcher.call(&params.name, params.arguments).await;
                        match serde_json::to_value(result) {
                            Ok(result) => RpcResponse::result(id, result),
                            Err(e) => RpcResponse::error(id, INVALID_PARAMS, e.to_string())
                        }
                    },
                    Err(e) => RpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}"))
                }
            },
            method => RpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {method}"))
        };
        Some(response)
    }

    /// Reads requests until EOF. Each request runs in its own task; answers
    /// are written by a single writer task in completion order.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outbox, mut inbox) = mpsc::channel::<String>(OUTBOX_CAPACITY);

        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(mut line) = inbox.recv().await {
                line.push('\n');
                writer.write_all(line.as_bytes()).await?;
                writer.flush().await?;
            }
            Ok::<(), io::Error>(())
        });

        info!("{SERVER_NAME} listening on stdio");
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let server = Arc::clone(&self);
            let outbox = outbox.clone();
            tokio::spawn(async move {
                let Some(response) = server.handle_line(&line).await else {
                    return;
                };
                match serde_json::to_string(&response) {
                    Ok(encoded) => {
                        if outbox.send(encoded).await.is_err() {
                            warn!("response dropped, output closed");
                        }
                    },
                    Err(e) => error!("cannot encode response: {e}")
                }
            });
        }
        drop(outbox);
        info!("input closed, shutting down");

        match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(io::Error::other(e))
        }
    }
}
