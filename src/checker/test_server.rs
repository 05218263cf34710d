// src/checker/test_server.rs
// =============================================================================
// A tiny HTTP/1.1 server for tests.
//
// It answers scripted (method, path) routes with a fixed status and body,
// one thread per connection, and records every request it saw. A route can
// also answer late, or hang up without answering at all. Good enough to
// drive the real reqwest clients without Internet access.
// =============================================================================

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    /// "GET", "HEAD", or "*" for any method
    pub method: &'static str,
    pub path: &'static str,
    pub status: u16,
    pub body: &'static str,
    /// How long to wait before answering
    pub delay: Duration,
    /// Close the connection after reading the request, without a response
    pub hang_up: bool,
}

impl Route {
    pub fn new(method: &'static str, path: &'static str, status: u16, body: &'static str) -> Self {
        Self {
            method,
            path,
            status,
            body,
            delay: Duration::ZERO,
            hang_up: false,
        }
    }

    pub fn any(path: &'static str, status: u16, body: &'static str) -> Self {
        Self::new("*", path, status, body)
    }

    pub fn hang_up(method: &'static str, path: &'static str) -> Self {
        Self {
            hang_up: true,
            ..Self::new(method, path, 0, "")
        }
    }

    pub fn delayed(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    fn matches(&self, method: &str, path: &str) -> bool {
        (self.method == "*" || self.method == method) && self.path == path
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub user_agent: Option<String>,
}

pub struct TestServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    /// Starts serving on an ephemeral localhost port. Unknown routes get
    /// an empty 404.
    pub fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let log = Arc::clone(&log);
                thread::spawn(move || handle(stream, &routes, &log));
            }
        });

        Self { addr, requests }
    }

    /// A URL on a port nobody listens on.
    pub fn unused_url(path: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}{path}")
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn handle(stream: TcpStream, routes: &[Route], log: &Mutex<Vec<RecordedRequest>>) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut user_agent = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = Some(value.trim().to_string());
            }
        }
    }

    log.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        user_agent,
    });

    let route = routes
        .iter()
        .find(|route| route.matches(&method, &path))
        .cloned()
        .unwrap_or_else(|| Route::any("", 404, ""));
    if route.hang_up {
        return;
    }
    thread::sleep(route.delay);
    let (status, body) = (route.status, route.body);

    let mut response = format!(
        "HTTP/1.1 {status} Scripted\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    if method != "HEAD" {
        response.push_str(body);
    }

    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
