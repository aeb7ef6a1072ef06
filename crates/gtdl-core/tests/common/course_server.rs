//! Minimal HTTP/1.1 server posing as the lesson site for integration tests.
//!
//! Serves a fixed set of path → body routes, answers the login POST with a
//! session cookie, and records every request line so tests can assert that
//! skip paths stay off the network entirely.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

pub struct CourseServer {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub origin: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CourseServer {
    /// All "METHOD /path" request lines seen so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

/// Starts a server in a background thread serving `routes` (path with query
/// string → body). The server runs until the process exits.
pub fn start(routes: Vec<(&str, Vec<u8>)>) -> CourseServer {
    let routes: Arc<HashMap<String, Vec<u8>>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, body)| (path.to_string(), body))
            .collect(),
    );
    let requests = Arc::new(Mutex::new(Vec::new()));

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests_srv = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&requests_srv);
            thread::spawn(move || handle(stream, &routes, &requests));
        }
    });

    CourseServer {
        origin: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Vec<u8>>,
    requests: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let data = match read_request(&mut stream) {
        Some(data) => data,
        None => return,
    };
    let request = match std::str::from_utf8(&data) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    requests
        .lock()
        .unwrap()
        .push(format!("{} {}", method, path));

    if method.eq_ignore_ascii_case("POST") {
        // Login endpoint: hand out a cookie, body content is irrelevant.
        let _ = stream.write_all(
            b"HTTP/1.1 200 OK\r\nSet-Cookie: session=fixture\r\nContent-Length: 2\r\n\r\nok",
        );
        return;
    }

    match routes.get(path) {
        Some(body) => {
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(body);
        }
        None => {
            let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
        }
    }
}

/// Reads one request: all headers plus a Content-Length body, if any.
fn read_request(stream: &mut std::net::TcpStream) -> Option<Vec<u8>> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) => return None,
            Ok(n) => n,
            Err(_) => return None,
        };
        data.extend_from_slice(&buf[..n]);
        if let Some(header_end) = find_subsequence(&data, b"\r\n\r\n") {
            let body_len = content_length(&data[..header_end]).unwrap_or(0);
            if data.len() >= header_end + 4 + body_len {
                return Some(data);
            }
        }
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn content_length(headers: &[u8]) -> Option<usize> {
    let headers = std::str::from_utf8(headers).ok()?;
    for line in headers.lines() {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                return value.trim().parse().ok();
            }
        }
    }
    None
}
