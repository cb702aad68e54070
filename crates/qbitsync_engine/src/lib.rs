//! # qbitsync Engine
//!
//! Synchronized state engine for the qBittorrent `sync/maindata` feed.
//!
//! This crate provides:
//! - Merge functions folding partial records into full records
//! - `SyncStore`, the concurrency-safe mirror of the remote state
//! - Transport abstraction and a qBittorrent WebUI transport
//! - `MainDataPoller`, which keeps a store in step with the remote
//!
//! ## Architecture
//!
//! The remote answers `sync/maindata?rid=N` with either a full snapshot or
//! the changes since message `N`. The poller fetches with the store's
//! current rid and hands the decoded message to [`SyncStore::apply`]:
//! 1. A full snapshot, or any message while the store is empty (rid 0),
//!    rebuilds the mirror
//! 2. Anything else is merged field by field into the existing mirror
//!
//! ## Key Invariants
//!
//! - A partial field that is absent leaves the mirrored value alone
//! - A partial field that is present overwrites, even with zero or empty
//! - Readers never observe a partially applied message
//! - Applying a decoded message never fails

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
pub mod merge;
mod poller;
mod store;
mod transport;

pub use config::{PollerConfig, RetryConfig};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpResponse, HttpTransport};
pub use merge::{materialize_torrent, merge_server_state, merge_torrent, Merge};
pub use poller::{MainDataPoller, PollOutcome, PollStats, PollerState};
pub use store::{AggregateBundle, ApplyKind, ApplyOutcome, StoreSnapshot, SyncStore};
pub use transport::{MainDataTransport, MockResponse, MockTransport};
