//! In-process HTTP stub for the rate API, the price page and PostgREST

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct MockRoute {
    pub method: &'static str,
    pub path_prefix: &'static str,
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Advertise more bytes than are sent, so the client sees a cut-off body
    pub truncated: bool,
}

impl MockRoute {
    pub fn json(method: &'static str, path_prefix: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self {
            method,
            path_prefix,
            status,
            content_type: "application/json",
            body: body.into(),
            truncated: false,
        }
    }

    pub fn html(path_prefix: &'static str, body: impl Into<String>) -> Self {
        Self {
            method: "GET",
            path_prefix,
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.into(),
            truncated: false,
        }
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }
}

pub struct MockServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start(routes: Vec<MockRoute>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let recorded = Arc::clone(&recorded);
                let routes = Arc::clone(&routes);
                tokio::spawn(async move {
                    let _ = serve_connection(stream, &routes, &recorded).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    routes: &[MockRoute],
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).into_owned();

    let route = routes
        .iter()
        .find(|r| r.method == method && target.starts_with(r.path_prefix));

    recorded.lock().unwrap().push(RecordedRequest {
        method,
        target,
        headers,
        body,
    });

    let (status, content_type, body, truncated) = match route {
        Some(r) => (r.status, r.content_type, r.body.as_str(), r.truncated),
        None => (404, "text/plain", "not found", false),
    };
    let declared_length = if truncated { body.len() + 64 } else { body.len() };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        content_type,
        declared_length,
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

/// Page snippet with both price phrases split across markup
pub fn gold_page(buy: &str, sell: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="tr"><head><title>Çeyrek Altın Fiyatı</title>
<script>window.dataLayer = [];</script></head>
<body>
  <div class="price-box">
    <p>Çeyrek altın <strong>alış fiyatı</strong> {buy} TL, <strong>satış fiyatı</strong> {sell}&nbsp;TL olarak işlem görüyor.</p>
  </div>
</body></html>"#
    )
}
