//! Shared test plumbing: an in-process HTTP fixture server standing in for
//! `api.avrae.io`, plus canned response bodies.

// Each test binary compiles this module; not all of them use every helper.
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// The binary under test, with sync-related environment scrubbed so host
/// or CI settings cannot leak into a test run.
pub fn sync_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("avrae-sync").expect("binary under test");
    cmd.env_remove("AVRAE_TOKEN")
        .env_remove("AVRAE_API_BASE")
        .env_remove("COLLECTIONS_CONFIG")
        .env_remove("GVARS_CONFIG")
        .env_remove("GITHUB_WORKSPACE");
    cmd
}

/// A canned response for one `(method, request-target)` pair.
pub struct Route {
    pub method: &'static str,
    pub target: String,
    pub content_type: &'static str,
    pub body: String,
}

impl Route {
    pub fn json(method: &'static str, target: impl Into<String>, body: impl Into<String>) -> Self {
        Route {
            method,
            target: target.into(),
            content_type: "application/json",
            body: body.into(),
        }
    }

    pub fn text(method: &'static str, target: impl Into<String>, body: impl Into<String>) -> Self {
        Route {
            method,
            target: target.into(),
            content_type: "text/plain",
            body: body.into(),
        }
    }
}

/// One request as seen by the fixture server.
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub target: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Serve `routes` for exactly `expected` requests, then stop.
pub fn serve(
    routes: Vec<Route>,
    expected: usize,
) -> (String, Arc<Mutex<Vec<Received>>>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));
    let received = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&received);

    let handle = std::thread::spawn(move || {
        for _ in 0..expected {
            let (mut stream, _) = listener.accept().expect("accept");
            let request = read_request(&mut stream);
            let response = routes
                .iter()
                .find(|r| r.method == request.method && r.target == request.target)
                .map(|r| {
                    format!(
                        "HTTP/1.1 200 Fixture\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        r.content_type,
                        r.body.len(),
                        r.body
                    )
                })
                .unwrap_or_else(|| {
                    "HTTP/1.1 404 Fixture\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string()
                });
            log.lock().expect("lock").push(request);
            stream.write_all(response.as_bytes()).expect("write");
        }
    });

    (base_url, received, handle)
}

fn read_request(stream: &mut TcpStream) -> Received {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).expect("read");
        assert!(n > 0, "client closed before sending a full request");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut parts = lines.next().expect("request line").split_whitespace();
    let method = parts.next().expect("method").to_string();
    let target = parts.next().expect("target").to_string();

    let mut authorization = None;
    let mut content_length = 0usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.to_ascii_lowercase().as_str() {
                "authorization" => authorization = Some(value.to_string()),
                "content-length" => content_length = value.parse().expect("content-length"),
                _ => {}
            }
        }
    }

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).expect("read body");
        assert!(n > 0, "client closed mid-body");
        body.extend_from_slice(&chunk[..n]);
    }

    Received {
        method,
        target,
        authorization,
        body: String::from_utf8_lossy(&body).to_string(),
    }
}

/// Envelope for `GET /workshop/collection/5fa19a98/full` with one alias
/// (one subcommand) and one snippet.
pub fn collection_body() -> String {
    serde_json::json!({
        "success": true,
        "data": {
            "name": "API Collection Test",
            "description": "fixture",
            "image": null,
            "owner": "999",
            "alias_ids": ["aaa111"],
            "snippet_ids": ["ccc333"],
            "publish_state": "PRIVATE",
            "num_subscribers": 0,
            "num_guild_subscribers": 0,
            "last_edited": "2020-11-03T19:43:53.676000",
            "created_at": "2020-11-03T19:36:40.123000",
            "tags": [],
            "_id": "5fa19a98",
            "aliases": [{
                "name": "test-alias",
                "code": "alias code",
                "docs": "alias docs",
                "collection_id": "5fa19a98",
                "_id": "aaa111",
                "subcommands": [{
                    "name": "test-subalias",
                    "code": "sub code",
                    "docs": "sub docs",
                    "collection_id": "5fa19a98",
                    "_id": "bbb222",
                    "parent_id": "aaa111",
                    "subcommands": []
                }]
            }],
            "snippets": [{
                "name": "test123",
                "code": "snippet code",
                "docs": "snippet docs",
                "collection_id": "5fa19a98",
                "_id": "ccc333"
            }]
        }
    })
    .to_string()
}

/// Body for `GET /customizations/gvars` with one owned gvar.
pub fn gvars_body(value: &str) -> String {
    serde_json::json!({
        "owned": [{
            "owner": "999",
            "key": "abc123",
            "owner_name": "my name",
            "value": value,
            "editors": []
        }],
        "editable": []
    })
    .to_string()
}
