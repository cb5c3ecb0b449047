//! In-process fixture servers standing in for the public APIs, and a line
//! client speaking to [`crate::mcp::stdio::serve_lines`]

use crate::mcp::{AppsServer, stdio};
use axum::Router;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// One newline-delimited MCP session against an in-memory server
pub struct LineClient {
    input: DuplexStream,
    output: Lines<BufReader<DuplexStream>>,
}

impl LineClient {
    pub fn start(server: AppsServer) -> Self {
        let (input, server_input) = tokio::io::duplex(64 * 1024);
        let (server_output, output) = tokio::io::duplex(64 * 1024);
        tokio::spawn(stdio::serve_lines(server, server_input, server_output));
        Self {
            input,
            output: BufReader::new(output).lines(),
        }
    }

    pub async fn send_raw(&mut self, line: &[u8]) {
        self.input.write_all(line).await.unwrap();
        self.input.write_all(b"\n").await.unwrap();
        self.input.flush().await.unwrap();
    }

    pub async fn send(&mut self, message: Value) {
        self.send_raw(message.to_string().as_bytes()).await;
    }

    pub async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(10), self.output.next_line())
            .await
            .expect("timed out waiting for a response")
            .unwrap()
            .expect("session closed");
        serde_json::from_str(&line).unwrap()
    }

    pub async fn request(&mut self, message: Value) -> Value {
        self.send(message).await;
        self.recv().await
    }

    /// Run the `initialize` handshake and return the server's answer
    pub async fn initialize(&mut self, version: &str) -> Value {
        let response = self
            .request(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": version,
                    "capabilities": {},
                    "clientInfo": {"name": "line-client", "version": "0"}
                }
            }))
            .await;
        self.send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await;
        response
    }
}
