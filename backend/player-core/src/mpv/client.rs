use crate::DEFAULT_IPC_TIMEOUT;
use crate::error::ipc::IpcError;
use crate::mpv::codec::{MpvCommand, MpvResponse, decode, encode, first_record};
use crate::mpv::command::CommandInput;
use crate::mpv::connector::{Connector, UnixConnector};
use crate::mpv::sequence::RequestIdSequence;

use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::str::from_utf8;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout as TokioTimeout;

const READ_CHUNK_SIZE: usize = 4096;

/// Largest reply accepted before a newline has to appear.
pub const DEFAULT_REPLY_LIMIT: usize = 1024 * 1024;

/// Client for a running mpv instance's JSON IPC socket.
///
/// Every non-dry-run [`send`](Self::send) opens its own connection, performs
/// one request/response exchange and closes it again. Nothing but the request
/// id sequence is shared between calls, so a client can be cloned into as many
/// tasks as needed.
#[derive(Debug, Clone)]
pub struct MpvClient<C = UnixConnector> {
    socket_path: PathBuf,
    dry_run: bool,
    timeout: Duration,
    reply_limit: usize,
    sequence: RequestIdSequence,
    connector: C,
}

impl MpvClient<UnixConnector> {
    pub fn new(socket_path: impl AsRef<Path>, dry_run: bool) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
            dry_run,
            timeout: DEFAULT_IPC_TIMEOUT,
            reply_limit: DEFAULT_REPLY_LIMIT,
            sequence: RequestIdSequence::default(),
            connector: UnixConnector,
        }
    }
}

impl<C: Connector> MpvClient<C> {
    /// Upper bound on the whole network phase (connect, write, read) of one call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bytes a reply may grow to without a newline before it is rejected.
    pub fn with_reply_limit(mut self, reply_limit: usize) -> Self {
        self.reply_limit = reply_limit;
        self
    }

    pub fn with_sequence(mut self, sequence: RequestIdSequence) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_connector<D: Connector>(self, connector: D) -> MpvClient<D> {
        MpvClient {
            socket_path: self.socket_path,
            dry_run: self.dry_run,
            timeout: self.timeout,
            reply_limit: self.reply_limit,
            sequence: self.sequence,
            connector,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn reply_limit(&self) -> usize {
        self.reply_limit
    }

    pub fn sequence(&self) -> &RequestIdSequence {
        &self.sequence
    }

    /// Send one command and return it paired with mpv's reply.
    ///
    /// Never fails: transport and protocol problems come back as a response
    /// whose `error` names the failure and whose `request_id` is the command's.
    pub async fn send(&self, command: impl Into<CommandInput>) -> (MpvCommand, MpvResponse) {
        let (command, outcome) = self.request(command).await;

        let response = match outcome {
            Ok(response) => response,
            Err(failure) => {
                warn!(
                    "mpv command {:?} (id={}) failed: {failure}",
                    command.tokens(),
                    command.request_id()
                );
                MpvResponse::from_failure(&failure, command.request_id())
            }
        };

        (command, response)
    }

    /// Like [`send`](Self::send), but hands back the classified failure instead
    /// of folding it into a response.
    pub async fn request(
        &self,
        command: impl Into<CommandInput>,
    ) -> (MpvCommand, Result<MpvResponse, IpcError>) {
        let command = MpvCommand::new(command.into().into_tokens(), self.sequence.next_id());

        if self.dry_run {
            debug!(
                "Dry run, not sending {:?} (id={})",
                command.tokens(),
                command.request_id()
            );
            let response = MpvResponse::dry_run(command.request_id());
            return (command, Ok(response));
        }

        let started = Instant::now();
        let outcome = match TokioTimeout(self.timeout, self.exchange(&command)).await {
            Ok(result) => result,
            Err(_) => Err(IpcError::timeout(self.timeout)),
        };

        debug!(
            "mpv exchange for id={} finished in {:?}",
            command.request_id(),
            started.elapsed()
        );

        (command, outcome)
    }

    async fn exchange(&self, command: &MpvCommand) -> Result<MpvResponse, IpcError> {
        let request = encode(command)?;

        let mut stream = self
            .connector
            .connect(&self.socket_path)
            .await
            .map_err(|e| self.io_failure(e))?;

        trace!("-> {}", from_utf8(&request).unwrap_or("<non-utf8>").trim_end());

        // A peer that hangs up before taking the request may still be read to EOF;
        // that case is an empty response, not a reset.
        if let Err(e) = stream.write_all(&request).await {
            self.tolerate_peer_closed(e, "write")?;
        }

        // Half-close: mpv sees end-of-request, our read side stays open.
        if let Err(e) = stream.shutdown().await {
            self.tolerate_peer_closed(e, "shutdown")?;
        }

        let reply = self.read_first_line(&mut stream).await?;

        let record = first_record(&reply);
        trace!("<- {record}");

        if record.is_empty() {
            return Err(IpcError::empty_response());
        }

        Ok(decode(&record)?)
    }

    #[track_caller]
    fn io_failure(&self, error: IoError) -> IpcError {
        IpcError::from_io(error, &self.socket_path, self.timeout)
    }

    #[track_caller]
    fn tolerate_peer_closed(&self, error: IoError, step: &str) -> Result<(), IpcError> {
        if is_peer_closed(&error) {
            debug!("mpv closed the connection before {step}: {error}");
            Ok(())
        } else {
            Err(self.io_failure(error))
        }
    }

    /// Read until the peer closes or a full line has arrived, whichever is first.
    async fn read_first_line<S: AsyncRead + Unpin>(
        &self,
        stream: &mut S,
    ) -> Result<Vec<u8>, IpcError> {
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; READ_CHUNK_SIZE];

        loop {
            let read = match stream.read(&mut chunk).await {
                Ok(read) => read,
                // Nothing received yet: the peer simply went away.
                Err(e) if buffer.is_empty() && is_peer_closed(&e) => {
                    debug!("mpv closed the connection without replying: {e}");
                    0
                }
                Err(e) => return Err(self.io_failure(e)),
            };

            if read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..read]);

            if chunk[..read].contains(&b'\n') {
                break;
            }

            if buffer.len() > self.reply_limit {
                return Err(IpcError::reply_too_large(self.reply_limit));
            }
        }

        Ok(buffer)
    }
}

fn is_peer_closed(error: &IoError) -> bool {
    matches!(
        error.kind(),
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::NotConnected
    )
}
