// src/github/test_server.rs
// =============================================================================
// A throwaway HTTP/1.1 server for tests.
//
// It accepts one connection per canned reply, records the raw request head,
// writes the reply and closes the connection. Reply::Hang accepts the
// connection but never answers, to exercise client timeouts.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub enum Reply {
    Raw(String),
    Hang,
}

pub struct CannedServer {
    /// e.g. "http://127.0.0.1:53124/"
    pub base_url: String,
    listener: Option<TcpListener>,
    requests: Arc<Mutex<Vec<String>>>,
    task: Option<JoinHandle<()>>,
}

impl CannedServer {
    /// Binds a port without serving yet, so replies can embed `base_url`
    pub async fn bind() -> CannedServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        CannedServer {
            base_url: format!("http://{}/", addr),
            listener: Some(listener),
            requests: Arc::new(Mutex::new(Vec::new())),
            task: None,
        }
    }

    pub async fn start(replies: Vec<Reply>) -> CannedServer {
        let mut server = CannedServer::bind().await;
        server.serve(replies);
        server
    }

    pub fn serve(&mut self, replies: Vec<Reply>) {
        let listener = self.listener.take().expect("serve() called twice");
        let log = self.requests.clone();

        self.task = Some(tokio::spawn(async move {
            for reply in replies {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let head = read_head(&mut socket).await;
                log.lock().await.push(head);

                match reply {
                    Reply::Raw(text) => {
                        let _ = socket.write_all(text.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                    Reply::Hang => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                    }
                }
            }
        }));
    }

    /// Request heads received so far, in arrival order
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

impl Drop for CannedServer {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

// Reads until the blank line that ends the request head (GETs have no body)
async fn read_head(socket: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];

    loop {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                raw.extend_from_slice(&buf[..n]);
                if raw.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    String::from_utf8_lossy(&raw).into_owned()
}

/// Formats a complete HTTP/1.1 response with Content-Length set
pub fn http_response(status_line: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut response = format!("HTTP/1.1 {}\r\n", status_line);
    for (name, value) in headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("content-type: application/json\r\n");
    response.push_str(&format!("content-length: {}\r\n", body.len()));
    response.push_str("connection: close\r\n\r\n");
    response.push_str(body);
    response
}
