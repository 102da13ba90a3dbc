//! Minimal HTTP/1.1 server for integration tests.
//!
//! Each route answers from a script of `(status, body)` pairs, one per hit;
//! the last entry repeats once the script runs out. Unknown paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

type Script = Vec<(u16, String)>;

#[derive(Default)]
struct State {
    routes: HashMap<String, Script>,
    hits: HashMap<String, usize>,
}

/// Handle to a running mock API.
#[derive(Clone)]
pub struct MockApi {
    pub base_url: String,
    state: Arc<Mutex<State>>,
}

impl MockApi {
    /// Number of requests received for `path` (e.g. "/api/analytics/batches").
    pub fn hits(&self, path: &str) -> usize {
        self.state.lock().unwrap().hits.get(path).copied().unwrap_or(0)
    }
}

/// Start a server in a background thread. Routes are full request paths.
pub fn start(routes: Vec<(&str, Script)>) -> MockApi {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(State {
        routes: routes
            .into_iter()
            .map(|(p, s)| (p.to_string(), s))
            .collect(),
        hits: HashMap::new(),
    }));
    let shared = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &state));
        }
    });
    MockApi {
        base_url: format!("http://127.0.0.1:{}/api/", port),
        state,
    }
}

/// A base URL where nothing is listening.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api/", port)
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let (status, body) = {
        let mut st = state.lock().unwrap();
        let hit = {
            let h = st.hits.entry(path.clone()).or_insert(0);
            *h += 1;
            *h
        };
        match st.routes.get(&path) {
            Some(script) if !script.is_empty() => {
                script[(hit - 1).min(script.len() - 1)].clone()
            }
            _ => (404, "not found".to_string()),
        }
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
