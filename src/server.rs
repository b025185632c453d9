//! Line-delimited JSON-RPC 2.0 server exposing [`CleaningTools`].
//!
//! One request per input line, one response per output line. Notifications (messages without an
//! `id`) are processed but never answered.

use std::io::{BufRead, Write};

use serde_json::{json, Value as JsonValue};

use crate::tools::CleaningTools;

/// Protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "CSV Data Cleaning Server";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;

#[derive(Debug, Clone, Default)]
pub struct Server {
    tools: CleaningTools,
}

impl Server {
    pub fn new(tools: CleaningTools) -> Self {
        Self { tools }
    }

    /// Handle one raw input line. Returns the response to write, if any.
    pub fn handle_line(&self, line: &str) -> Option<JsonValue> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str::<JsonValue>(line) {
            Ok(msg) => self.handle_message(&msg),
            Err(e) => {
                tracing::warn!(error = %e, "malformed request line");
                Some(error_response(JsonValue::Null, PARSE_ERROR, &format!("Parse error: {e}")))
            }
        }
    }

    /// Handle one decoded message.
    ///
    /// Batches are not supported: anything other than a JSON object is an invalid request.
    pub fn handle_message(&self, msg: &JsonValue) -> Option<JsonValue> {
        if !msg.is_object() {
            return Some(error_response(
                JsonValue::Null,
                INVALID_REQUEST,
                "Invalid request: expected a JSON object",
            ));
        }
        let id = msg.get("id").cloned();
        let Some(method) = msg.get("method").and_then(JsonValue::as_str) else {
            return id.map(|id| error_response(id, INVALID_REQUEST, "Invalid request: missing method"));
        };
        let params = msg.get("params").cloned().unwrap_or(JsonValue::Null);

        let Some(id) = id else {
            tracing::debug!(method, "notification");
            return None;
        };
        tracing::debug!(method, %id, "request");

        let response = match method {
            "initialize" => result_response(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": { "listChanged": false } },
                    "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") }
                }),
            ),
            "ping" => result_response(id, json!({})),
            "tools/list" => result_response(id, json!({ "tools": self.tools.definitions() })),
            "tools/call" => {
                let name = params.get("name").and_then(JsonValue::as_str).unwrap_or("");
                let arguments = params.get("arguments").cloned().unwrap_or(JsonValue::Null);
                let (text, is_error) = match self.tools.call(name, &arguments) {
                    Ok(text) => (text, false),
                    Err(e) => (e.to_string(), true),
                };
                result_response(
                    id,
                    json!({ "content": [{ "type": "text", "text": text }], "isError": is_error }),
                )
            }
            other => error_response(id, METHOD_NOT_FOUND, &format!("Method not found: {other}")),
        };
        Some(response)
    }

    /// Serve requests from `input` until end of input, writing responses to `output`.
    pub fn serve<R: BufRead, W: Write>(&self, input: R, mut output: W) -> std::io::Result<()> {
        tracing::info!(name = SERVER_NAME, protocol = PROTOCOL_VERSION, "serving on stdio");
        for line in input.lines() {
            let line = line?;
            if let Some(response) = self.handle_line(&line) {
                writeln!(output, "{response}")?;
                output.flush()?;
            }
        }
        tracing::info!("input closed, shutting down");
        Ok(())
    }
}

fn result_response(id: JsonValue, result: JsonValue) -> JsonValue {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn error_response(id: JsonValue, code: i64, message: &str) -> JsonValue {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_get_no_response() {
        let server = Server::default();
        let msg = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        assert_eq!(server.handle_message(&msg), None);
        assert_eq!(server.handle_line("   "), None);
    }

    #[test]
    fn malformed_json_is_a_parse_error_with_null_id() {
        let response = Server::default().handle_line("{not json").unwrap();
        assert_eq!(response["id"], JsonValue::Null);
        assert_eq!(response["error"]["code"], json!(-32700));
    }

    #[test]
    fn batches_and_scalars_are_invalid_requests() {
        let server = Server::default();
        for msg in [json!([{"jsonrpc": "2.0", "id": 1, "method": "ping"}]), json!(42)] {
            let response = server.handle_message(&msg).unwrap();
            assert_eq!(response["id"], JsonValue::Null);
            assert_eq!(response["error"]["code"], json!(-32600));
        }
    }

    #[test]
    fn unknown_method() {
        let response = Server::default()
            .handle_message(&json!({"jsonrpc": "2.0", "id": 7, "method": "resources/read"}))
            .unwrap();
        assert_eq!(response["id"], json!(7));
        assert_eq!(response["error"]["code"], json!(-32601));
    }
}
