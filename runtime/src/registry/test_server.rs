//! Minimal HTTP/1.1 responder for registry tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned response for requests whose target starts with `prefix`.
#[derive(Clone)]
pub(crate) struct Route {
    pub prefix: String,
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Route {
    pub(crate) fn new(prefix: &str, status: u16, body: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// HTTP client that never routes loopback traffic through an env proxy.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub(crate) struct TestServer {
    addr: SocketAddr,
    host: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub(crate) async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let host = addr.to_string();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&head).into_owned();
                    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                    recorded.lock().push(head);

                    let route = routes.iter().find(|r| target.starts_with(&r.prefix));
                    let (status, body) = match route {
                        Some(route) => {
                            if let Some(delay) = route.delay {
                                tokio::time::sleep(delay).await;
                            }
                            (route.status, route.body.clone())
                        }
                        None => (404, "{}".to_string()),
                    };

                    let response = format!(
                        "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            addr,
            host,
            requests,
        }
    }

    pub(crate) fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `127.0.0.1:<port>`
    pub(crate) fn host(&self) -> &str {
        &self.host
    }

    /// Raw request heads received so far, lowercased.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| r.to_lowercase())
            .collect()
    }
}
