#![allow(dead_code)]

//! Test infrastructure for id-server RPC tests

use id_auth::{PasswordHasher, TokenSigner};
use id_db::UserRepository;
use id_server::service::IdentityService;

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

pub const TEST_SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

/// Start a server on an OS-assigned port, backed by an in-memory store.
/// The accept loop runs until the test process exits.
pub async fn spawn_test_server() -> SocketAddr {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    sqlx::migrate!("../crates/id-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let service = Arc::new(IdentityService::new(
        Arc::new(UserRepository::new(pool)),
        PasswordHasher::new(4),
        TokenSigner::with_hs256(TEST_SECRET, 7200),
    ));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read bound address");

    tokio::spawn(async move {
        let _ = id_server::rpc::listener::serve(listener, service).await;
    });

    addr
}

/// Line-oriented JSON client: one request frame out, one reply frame in.
pub struct TestClient {
    lines: tokio::io::Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to test server");
        let (read_half, writer) = stream.into_split();

        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    pub async fn call(&mut self, op: &str, data: Value) -> Value {
        self.send_raw(&json!({ "op": op, "data": data }).to_string())
            .await
    }

    /// Send an arbitrary frame, e.g. to exercise malformed input handling.
    pub async fn send_raw(&mut self, frame: &str) -> Value {
        self.writer
            .write_all(frame.as_bytes())
            .await
            .expect("Failed to write frame");
        self.writer.write_all(b"\n").await.expect("Failed to write frame");
        self.writer.flush().await.expect("Failed to flush frame");

        let line = self
            .lines
            .next_line()
            .await
            .expect("Failed to read reply")
            .expect("Connection closed before reply");

        serde_json::from_str(&line).expect("Reply was not valid JSON")
    }
}
