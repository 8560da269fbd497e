use std::io::Error;
use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixStream;

/// Opens the stream a single exchange runs over.
#[async_trait]
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    async fn connect(&self, path: &Path) -> Result<Self::Stream, Error>;
}

/// Connects to mpv's `--input-ipc-server` socket.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixConnector;

#[async_trait]
impl Connector for UnixConnector {
    type Stream = UnixStream;

    async fn connect(&self, path: &Path) -> Result<UnixStream, Error> {
        UnixStream::connect(path).await
    }
}
