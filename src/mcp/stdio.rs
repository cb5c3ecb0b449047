//! Newline-delimited MCP over stdin/stdout
//!
//! rmcp ends a session on the first line it cannot decode, so every inbound
//! line is screened first. Lines that are not a JSON-RPC message are answered
//! here and never reach the session.

use super::AppsServer;
use crate::{AppsError, Result};
use rmcp::ServiceExt;
use rmcp::model::ClientJsonRpcMessage;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream,
    WriteHalf,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const PIPE_CAPACITY: usize = 64 * 1024;

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

const NOT_A_MESSAGE: &str = "Invalid request: expected a JSON-RPC 2.0 message object";

/// Methods the session answers; anything else is unknown
const SERVED_METHODS: [&str; 7] = [
    "initialize",
    "ping",
    "tools/list",
    "tools/call",
    "resources/list",
    "resources/read",
    "resources/templates/list",
];

/// What to do with one inbound line
#[derive(Debug, PartialEq)]
enum Screened {
    Forward,
    Reply(Value),
    /// An undecodable notification: nothing to answer
    Drop,
}

fn error_reply(id: Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message.into() }
    })
}

fn screen(frame: &[u8]) -> Screened {
    let Ok(text) = std::str::from_utf8(frame) else {
        return Screened::Reply(error_reply(
            Value::Null,
            PARSE_ERROR,
            "Parse error: message is not valid UTF-8",
        ));
    };
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            return Screened::Reply(error_reply(Value::Null, PARSE_ERROR, format!("Parse error: {e}")));
        }
    };
    let Some(object) = value.as_object() else {
        return Screened::Reply(error_reply(Value::Null, INVALID_REQUEST, NOT_A_MESSAGE));
    };
    let id = object
        .get("id")
        .filter(|id| id.is_string() || id.is_number())
        .cloned();
    if object.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Screened::Reply(error_reply(
            id.unwrap_or(Value::Null),
            INVALID_REQUEST,
            "Invalid request: jsonrpc must be \"2.0\"",
        ));
    }
    if serde_json::from_value::<ClientJsonRpcMessage>(value.clone()).is_ok() {
        return Screened::Forward;
    }

    match (id, object.get("method").and_then(Value::as_str)) {
        (None, Some(_)) => Screened::Drop,
        (Some(id), Some(method)) if SERVED_METHODS.contains(&method) => Screened::Reply(
            error_reply(id, INVALID_PARAMS, format!("Invalid params for {method}")),
        ),
        (Some(id), Some(method)) => Screened::Reply(error_reply(
            id,
            METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        )),
        (id, None) => Screened::Reply(error_reply(
            id.unwrap_or(Value::Null),
            INVALID_REQUEST,
            NOT_A_MESSAGE,
        )),
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

async fn write_line<W>(output: &Mutex<W>, line: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut output = output.lock().await;
    output.write_all(line).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

async fn forward_requests<R, W>(
    mut input: R,
    mut session: WriteHalf<DuplexStream>,
    output: Arc<Mutex<W>>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        let frame = trim_line_ending(&line);
        if frame.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match screen(frame) {
            Screened::Forward => {
                session.write_all(frame).await?;
                session.write_all(b"\n").await?;
                session.flush().await?;
            }
            Screened::Reply(reply) => {
                warn!("Rejected inbound line: {}", reply["error"]["message"]);
                write_line(&output, reply.to_string().as_bytes()).await?;
            }
            Screened::Drop => debug!("Dropped undecodable notification"),
        }
    }
    session.shutdown().await
}

async fn forward_responses<R, W>(mut session: R, output: Arc<Mutex<W>>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        if session.read_until(b'\n', &mut line).await? == 0 {
            return Ok(());
        }
        let frame = trim_line_ending(&line);
        if !frame.is_empty() {
            write_line(&output, frame).await?;
        }
    }
}

/// Serve one MCP session over stdin/stdout until stdin closes
pub async fn run(server: AppsServer) -> Result<()> {
    info!("MCP server ready, listening on stdio...");
    serve_lines(server, tokio::io::stdin(), tokio::io::stdout()).await?;
    info!("stdin closed, shutting down");
    Ok(())
}

/// Serve one MCP session over a pair of byte streams, one message per line
pub async fn serve_lines<R, W>(server: AppsServer, input: R, output: W) -> Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (session_end, guard_end) = tokio::io::duplex(PIPE_CAPACITY);
    let (from_session, to_session) = tokio::io::split(guard_end);
    let output = Arc::new(Mutex::new(output));

    let inbound = tokio::spawn(forward_requests(
        BufReader::new(input),
        to_session,
        Arc::clone(&output),
    ));
    let outbound = tokio::spawn(forward_responses(BufReader::new(from_session), output));

    let served: Result<()> = async {
        let service = server
            .serve(session_end)
            .await
            .map_err(|e| AppsError::protocol(format!("MCP handshake failed: {e}")))?;
        let reason = service
            .waiting()
            .await
            .map_err(|e| AppsError::protocol(format!("MCP session aborted: {e}")))?;
        debug!("MCP session ended: {:?}", reason);
        Ok(())
    }
    .await;

    inbound.abort();
    match outbound.await {
        Ok(Err(e)) => warn!("Failed to write response: {}", e),
        Err(e) => warn!("Response writer stopped: {}", e),
        Ok(Ok(())) => {}
    }
    served
}
