//! mpv JSON IPC over a Unix-domain socket.
//!
//! - [`codec`] turns commands and replies into wire records and back
//! - [`client`] runs one request/response exchange per call
//! - [`sequence`] hands out request identifiers
//! - [`connector`] is the seam where sockets are opened

pub mod client;
pub mod codec;
pub mod command;
pub mod connector;
pub mod sequence;

pub use client::MpvClient;
pub use codec::{MpvCommand, MpvResponse};
pub use command::CommandInput;
pub use connector::{Connector, UnixConnector};
pub use sequence::RequestIdSequence;
