//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use edge_router::config::load_route_table;
use edge_router::RouteTable;

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The Next.js-style route table used across the integration tests.
pub fn next_app_table() -> RouteTable {
    load_route_table(&fixture_path("next-app.json")).expect("fixture should compile")
}

/// Issue a bare HTTP/1.1 GET and return the raw response text.
#[allow(dead_code)]
pub async fn raw_get(addr: SocketAddr, path: &str) -> String {
    let mut socket = TcpStream::connect(addr).await.expect("connect");
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    );
    socket.write_all(request.as_bytes()).await.expect("write");

    let mut buf = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), socket.read_to_end(&mut buf))
        .await
        .expect("response timed out")
        .expect("read");
    String::from_utf8_lossy(&buf).into_owned()
}
