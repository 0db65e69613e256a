//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use cms_router::observability::CollectingReporter;
use cms_router::{CmsConfig, HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Redirect table used across the integration tests.
pub const REDIRECTS: &str = r#"[
    {"redirect_url_type":"EXACT","redirect_url":"/301","redirect_http_code":"301","redirect_dest":"/random_numbers"},
    {"redirect_url_type":"EXACT","redirect_url":"/302","redirect_http_code":"302","redirect_dest":"/random_numbers"},
    {"redirect_url_type":"EXACT","redirect_url":"/exact","redirect_http_code":"302","redirect_dest":"/exact/match"},
    {"redirect_url_type":"EXACTICASE","redirect_url":"/exact/case","redirect_http_code":"302","redirect_dest":"/exact/match/case"},
    {"redirect_url_type":"BEGINS","redirect_url":"/begins","redirect_http_code":"302","redirect_dest":"/begins/with"},
    {"redirect_url_type":"BEGINSICASE","redirect_url":"/begins","redirect_http_code":"302","redirect_dest":"/begins/with/case"},
    {"redirect_url_type":"REGEX","redirect_url":"^/regex/(\\d+)","redirect_http_code":"302","redirect_dest":"/regex/to/$1"},
    {"redirect_url_type":"REGEXICASE","redirect_url":"^/regex/(\\d+)","redirect_http_code":"302","redirect_dest":"/regex/case/to/$1"},
    {"redirect_url_type":"EXACT","redirect_url":"/relative","redirect_http_code":"302","redirect_dest":"relative_target"},
    {"redirect_url_type":"EXACT","redirect_url":"/proxy","redirect_http_code":"PASSTHRU","redirect_dest":"/random_numbers"}
]"#;

/// Start a mock backend that answers every request with its own request
/// line, e.g. `GET /path?q=1 HTTP/1.1`.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let text = String::from_utf8_lossy(&buf[..n]);
                        let body = text.lines().next().unwrap_or_default().to_string();
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Config serving `content` with the editor open to any CMS.
pub fn config_for(content: &Path) -> CmsConfig {
    let mut config = CmsConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.content.path = content.to_path_buf();
    config.editor.server_urls = vec!["*".to_string()];
    config
}

/// Running server plus the handle that stops it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub reporter: std::sync::Arc<CollectingReporter>,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Bind an ephemeral port and serve `config` in the background.
pub async fn start_server(config: CmsConfig) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let reporter = CollectingReporter::new();
    let shutdown = Shutdown::new();

    let server = HttpServer::new(config, reporter.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        reporter,
        shutdown,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
