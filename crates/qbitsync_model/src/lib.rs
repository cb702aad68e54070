//! # qbitsync Model
//!
//! Delta model for the qBittorrent `sync/maindata` feed.
//!
//! This crate provides:
//! - `TorrentInfo` / `DeltaTorrentInfo` full and partial torrent records
//! - `ServerState` / `DeltaServerState` full and partial aggregate records
//! - `Category` values
//! - `MainData`, the synchronization envelope, and its JSON decoding
//!
//! Every field of a partial record is an `Option`. `None` means the field
//! was not part of the update; `Some` carries the new value, even when that
//! value is zero or empty.
//!
//! This is a pure data crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod error;
mod maindata;
mod server_state;
mod torrent;

pub use category::Category;
pub use error::{ModelError, ModelResult};
pub use maindata::MainData;
pub use server_state::{DeltaServerState, ServerState};
pub use torrent::{DeltaTorrentInfo, TorrentInfo};
