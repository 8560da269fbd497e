pub mod catalog;
pub mod codec;
pub mod config;
pub mod ipc;

pub use catalog::CatalogError;
pub use codec::CodecError;
pub use config::ConfigError;
pub use ipc::IpcError;
