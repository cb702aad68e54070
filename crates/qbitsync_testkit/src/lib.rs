//! # qbitsync Testkit
//!
//! Test utilities for qbitsync.
//!
//! This crate provides:
//! - Property-based test generators using proptest
//! - Captured maindata sessions as JSON fixtures
//! - `FakeWebUi`, an in-process stand-in for the qBittorrent WebUI
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qbitsync_testkit::prelude::*;
//!
//! #[test]
//! fn replay_session() {
//!     let store = SyncStore::new();
//!     for message in session_messages() {
//!         store.apply(&message);
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod webui;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::webui::*;
}

pub use fixtures::*;
pub use generators::*;
pub use webui::*;
