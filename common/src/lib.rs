//! Shared building blocks for homero.
//!
//! This crate holds the pieces every other crate in the workspace leans on
//! but that carry no player knowledge of their own.
//!
//! ## Architecture
//!
//! - **common** (this crate): error location tracking
//! - **player-core**: mpv codec, IPC client, catalog and configuration
//! - **homero**: the calling layer and CLI binary

pub mod error;

pub use error::error_location::ErrorLocation;
