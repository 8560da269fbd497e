//! Test helpers for mpv IPC integration tests.
//!
//! Each fake player listens on a Unix socket inside its own temp directory,
//! accepts exactly one connection and plays out a scripted behavior.

use player_core::mpv::Connector;

use std::io::Error as IoError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;

pub const SOCKET_FILE_NAME: &str = "mpv.sock";

/// What the fake player does once a client connects.
pub enum PeerBehavior {
    /// Read the whole request, answer with these bytes, close.
    Reply(Vec<u8>),
    /// Read the request, answer `success` with `data` and the request's own id, close.
    EchoSuccess(Value),
    /// Read the request, send the bytes in pieces with a pause between them, close.
    ReplyInChunks(Vec<Vec<u8>>),
    /// Read the request, send these bytes, keep the connection open.
    ReplyAndLinger(Vec<u8>),
    /// Read the request, close without writing anything.
    CloseSilently,
    /// Accept and then neither write nor close.
    Hang,
    /// Close straight after accepting, without reading the request.
    DropOnAccept,
}

pub struct FakeMpv {
    _dir: TempDir,
    path: PathBuf,
    task: JoinHandle<String>,
}

impl FakeMpv {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Request text the fake player received.
    pub async fn received(self) -> String {
        self.task.await.expect("fake mpv task panicked")
    }
}

/// A fresh temp directory and a socket path inside it that nothing listens on yet.
pub fn unbound_socket_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(SOCKET_FILE_NAME);
    (dir, path)
}

/// Start a fake player. Must be called inside a tokio runtime.
pub fn start_fake_mpv(behavior: PeerBehavior) -> FakeMpv {
    let (dir, path) = unbound_socket_path();
    let listener = UnixListener::bind(&path).expect("Failed to bind fake mpv socket");

    let task = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("Failed to accept client");

        if let PeerBehavior::DropOnAccept = behavior {
            drop(stream);
            return String::new();
        }

        if let PeerBehavior::Hang = behavior {
            tokio::time::sleep(Duration::from_secs(60)).await;
            drop(stream);
            return String::new();
        }

        let request = read_request(&mut stream).await;

        match behavior {
            PeerBehavior::Reply(bytes) => {
                stream.write_all(&bytes).await.expect("Failed to write reply");
            }
            PeerBehavior::EchoSuccess(data) => {
                let command: Value =
                    serde_json::from_str(request.trim_end()).expect("request should be JSON");
                let reply = json!({
                    "error": "success",
                    "data": data,
                    "request_id": command["request_id"],
                });
                let mut bytes = serde_json::to_vec(&reply).expect("reply should serialize");
                bytes.push(b'\n');
                stream.write_all(&bytes).await.expect("Failed to write reply");
            }
            PeerBehavior::ReplyInChunks(chunks) => {
                for chunk in chunks {
                    stream.write_all(&chunk).await.expect("Failed to write chunk");
                    stream.flush().await.expect("Failed to flush chunk");
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
            }
            PeerBehavior::ReplyAndLinger(bytes) => {
                stream.write_all(&bytes).await.expect("Failed to write reply");
                stream.flush().await.expect("Failed to flush reply");
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            PeerBehavior::CloseSilently | PeerBehavior::Hang | PeerBehavior::DropOnAccept => {}
        }

        request
    });

    FakeMpv {
        _dir: dir,
        path,
        task,
    }
}

/// Read until the client half-closes its write side.
async fn read_request(stream: &mut UnixStream) -> String {
    let mut request = Vec::new();
    stream
        .read_to_end(&mut request)
        .await
        .expect("Failed to read request");
    String::from_utf8(request).expect("request should be UTF-8")
}

/// Connector that refuses to open anything and counts how often it was asked.
#[derive(Debug, Clone, Default)]
pub struct ForbiddenConnector {
    attempts: Arc<AtomicUsize>,
}

impl ForbiddenConnector {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for ForbiddenConnector {
    type Stream = UnixStream;

    async fn connect(&self, path: &Path) -> Result<UnixStream, IoError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(IoError::other(format!(
            "connect to {} attempted during dry run",
            path.display()
        )))
    }
}

/// Connector that opens a real socket, then waits before handing it over.
///
/// Gives a fake player time to act on the accepted connection first.
#[derive(Debug, Clone, Copy)]
pub struct SlowConnector {
    pub delay: Duration,
}

#[async_trait]
impl Connector for SlowConnector {
    type Stream = UnixStream;

    async fn connect(&self, path: &Path) -> Result<UnixStream, IoError> {
        let stream = UnixStream::connect(path).await?;
        tokio::time::sleep(self.delay).await;
        Ok(stream)
    }
}
