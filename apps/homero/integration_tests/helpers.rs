//! A fake mpv that serves a fixed number of connections and records each request.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;
use tokio::task::JoinHandle;

pub struct RecordingMpv {
    _dir: TempDir,
    path: PathBuf,
    task: JoinHandle<Vec<Value>>,
}

impl RecordingMpv {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Requests in the order they arrived, one per connection.
    pub async fn requests(self) -> Vec<Value> {
        self.task.await.expect("fake mpv task panicked")
    }
}

/// Accept `connections` clients one after another and answer each with `success`.
pub fn start_recording_mpv(connections: usize) -> RecordingMpv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("mpv.sock");
    let listener = UnixListener::bind(&path).expect("Failed to bind fake mpv socket");

    let task = tokio::spawn(async move {
        let mut requests = Vec::with_capacity(connections);

        for _ in 0..connections {
            let (mut stream, _) = listener.accept().await.expect("Failed to accept client");

            let mut raw = Vec::new();
            stream
                .read_to_end(&mut raw)
                .await
                .expect("Failed to read request");
            let request: Value = serde_json::from_slice(&raw).expect("request is not JSON");

            let reply = json!({
                "error": "success",
                "data": null,
                "request_id": request["request_id"],
            });
            let mut bytes = serde_json::to_vec(&reply).expect("Failed to encode reply");
            bytes.push(b'\n');
            stream.write_all(&bytes).await.expect("Failed to write reply");

            requests.push(request);
        }

        requests
    });

    RecordingMpv {
        _dir: dir,
        path,
        task,
    }
}
