pub mod catalog;
pub mod config;
pub mod error;
pub mod mpv;

#[cfg(test)]
mod tests;

use std::time::Duration;

pub const DEFAULT_MPV_SOCKET: &str = "/run/mpv/socket";
pub const DEFAULT_EPISODES_FILE: &str = "data/mock.m3u";
pub const DEFAULT_IPC_TIMEOUT: Duration = Duration::from_secs(5);
pub const REQUEST_ID_BASE: u64 = 100;
