//! Mock Politicians API Server
//!
//! Provides a [`MockApiServer`] that answers the politicians REST routes
//! with canned JSON so [`crate::api::ApiClient`] can be exercised end to end
//! without a live backend.
//!
//! # Features
//! - Canned responses per method and path
//! - Error responses (status code + body)
//! - Latency simulation
//! - Request recording for assertions
//!
//! # Example
//! ```ignore
//! let server = MockApiServer::builder()
//!     .with_json("GET", "/statistics", 200, json!({"mean": 1.0}))
//!     .build()
//!     .await;
//! let url = server.url(); // e.g. "http://127.0.0.1:12345"
//! server.stop().await;
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A response the server can give.
#[derive(Debug, Clone, PartialEq)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
}

impl MockReply {
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            body: value.to_string(),
        }
    }

    pub fn message(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "message": message }))
    }
}

/// A request as the server saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Path without the query string.
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, q)| q)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

type RouteKey = (String, String);

/// Configuration produced by the builder.
#[derive(Debug, Clone, Default)]
pub struct MockServerConfig {
    /// Replies per `(METHOD, path)`, served in order. The last one repeats.
    pub routes: HashMap<RouteKey, VecDeque<MockReply>>,
    /// Artificial latency added before every response (milliseconds).
    pub latency_ms: u64,
}

struct ServerState {
    routes: HashMap<RouteKey, VecDeque<MockReply>>,
    requests: Vec<RecordedRequest>,
}

/// A lightweight HTTP server speaking just enough of the politicians API.
pub struct MockApiServer {
    url: String,
    state: Arc<Mutex<ServerState>>,
    shutdown_tx: watch::Sender<bool>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockApiServer {
    pub fn builder() -> MockApiServerBuilder {
        MockApiServerBuilder::default()
    }

    /// Bind to `127.0.0.1:0` and serve in a background task.
    pub async fn start(config: MockServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let addr = listener.local_addr().expect("failed to get local addr");
        let url = format!("http://{}", addr);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let state = Arc::new(Mutex::new(ServerState {
            routes: config.routes,
            requests: Vec::new(),
        }));

        let handle = tokio::spawn(accept_loop(
            listener,
            Arc::clone(&state),
            config.latency_ms,
            shutdown_rx,
        ));

        Self {
            url,
            state,
            shutdown_tx,
            handle,
        }
    }

    /// Base URL, e.g. `"http://127.0.0.1:54321"`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Every request received so far, in arrival order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Requests matching a method and path.
    pub async fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.method == method && r.path() == path)
            .collect()
    }

    /// Queue another reply for a route while the server is running.
    pub async fn push(&self, method: &str, path: &str, reply: MockReply) {
        self.state
            .lock()
            .await
            .routes
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockApiServerBuilder {
    config: MockServerConfig,
}

impl MockApiServerBuilder {
    /// Queue a reply for `method path`. Replies are served in FIFO order.
    pub fn with_reply(mut self, method: &str, path: &str, reply: MockReply) -> Self {
        self.config
            .routes
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn with_json(self, method: &str, path: &str, status: u16, value: serde_json::Value) -> Self {
        self.with_reply(method, path, MockReply::json(status, value))
    }

    /// Queue an error reply carrying `{"message": ...}`.
    pub fn with_error(self, method: &str, path: &str, status: u16, message: &str) -> Self {
        self.with_reply(method, path, MockReply::message(status, message))
    }

    pub fn with_latency(mut self, ms: u64) -> Self {
        self.config.latency_ms = ms;
        self
    }

    pub async fn build(self) -> MockApiServer {
        MockApiServer::start(self.config).await
    }
}

// ---------------------------------------------------------------------------
// Internal: accept loop & request handling
// ---------------------------------------------------------------------------

async fn accept_loop(
    listener: TcpListener,
    state: Arc<Mutex<ServerState>>,
    latency_ms: u64,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _addr)) => {
                        let state = Arc::clone(&state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, state, latency_ms).await {
                                tracing::debug!("mock server connection error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        tracing::debug!("mock server accept error: {}", e);
                    }
                }
            }
        }
    }
}

/// Read one request: headers, then as much body as Content-Length says.
async fn read_request(stream: &mut tokio::net::TcpStream) -> std::io::Result<Option<RecordedRequest>> {
    let mut buf = Vec::new();
    let mut chunk = vec![0u8; 8192];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or("/").to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);

    Ok(Some(RecordedRequest {
        method,
        target,
        content_type,
        body: buf[header_end..body_end].to_vec(),
    }))
}

async fn handle_connection(
    mut stream: tokio::net::TcpStream,
    state: Arc<Mutex<ServerState>>,
    latency_ms: u64,
) -> std::io::Result<()> {
    let Some(request) = read_request(&mut stream).await? else {
        return Ok(());
    };

    if latency_ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(latency_ms)).await;
    }

    let reply = {
        let mut state = state.lock().await;
        let key = (request.method.clone(), request.path().to_string());
        state.requests.push(request);
        match state.routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    };

    let reply = reply.unwrap_or_else(|| MockReply::message(404, "Not found"));
    write_http_response(&mut stream, reply.status, &reply.body).await
}

async fn write_http_response(
    stream: &mut tokio::net::TcpStream,
    status: u16,
    body: &str,
) -> std::io::Result<()> {
    let status_text = match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Error",
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body,
    );

    stream.write_all(response.as_bytes()).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
