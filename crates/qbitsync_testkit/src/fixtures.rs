//! Captured maindata sessions.
//!
//! `SESSION` is a short session as a WebUI would serve it: one full
//! snapshot followed by three deltas. The expected end state is spelled
//! out by the `SESSION_FINAL_*` constants.

use qbitsync_model::MainData;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Hash of the Debian torrent in the session.
pub const DEBIAN_HASH: &str = "8c212779b4abde7c6bc608063a0d008b7e40ce32";
/// Hash of the Ubuntu torrent in the session.
pub const UBUNTU_HASH: &str = "3f1e2d9c0b7a6f5e4d3c2b1a0f9e8d7c6b5a4f3e";
/// Hash of the Fedora torrent in the session.
pub const FEDORA_HASH: &str = "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3";

/// Full snapshot at rid 1.
pub const SESSION_FULL: &str = r#"{
    "rid": 1,
    "full_update": true,
    "torrents": {
        "8c212779b4abde7c6bc608063a0d008b7e40ce32": {
            "name": "debian-12.5.0-amd64-netinst.iso",
            "added_on": 1709900000,
            "amount_left": 0,
            "category": "linux",
            "completed": 659554304,
            "dlspeed": 0,
            "downloaded": 659554304,
            "num_seeds": 0,
            "num_leechs": 2,
            "progress": 1.0,
            "ratio": 1.5,
            "save_path": "/data/linux",
            "size": 659554304,
            "state": "uploading",
            "tags": "iso",
            "tracker": "http://bttracker.debian.org:6969/announce",
            "uploaded": 989331456,
            "upspeed": 524288
        },
        "3f1e2d9c0b7a6f5e4d3c2b1a0f9e8d7c6b5a4f3e": {
            "name": "ubuntu-24.04-desktop-amd64.iso",
            "added_on": 1709910000,
            "amount_left": 3000000000,
            "category": "linux",
            "dlspeed": 10485760,
            "progress": 0.4,
            "size": 6000000000,
            "state": "downloading",
            "tags": "iso",
            "upspeed": 0
        }
    },
    "categories": {
        "linux": {"name": "linux", "savePath": "/data/linux"}
    },
    "tags": ["iso"],
    "server_state": {
        "alltime_dl": 100000000000,
        "alltime_ul": 250000000000,
        "connection_status": "connected",
        "dht_nodes": 380,
        "dl_info_speed": 10485760,
        "global_ratio": "2.50",
        "queueing": true,
        "up_info_speed": 524288,
        "use_alt_speed_limits": false
    }
}"#;

/// Delta at rid 2: rates change, the Ubuntu download progresses.
pub const SESSION_DELTA_RATES: &str = r#"{
    "rid": 2,
    "torrents": {
        "8c212779b4abde7c6bc608063a0d008b7e40ce32": {"upspeed": 0, "state": "stalledUP"},
        "3f1e2d9c0b7a6f5e4d3c2b1a0f9e8d7c6b5a4f3e": {"progress": 0.75, "amount_left": 1500000000}
    },
    "server_state": {"up_info_speed": 0}
}"#;

/// Delta at rid 3: Fedora added, Ubuntu removed, tags and categories reshuffled.
pub const SESSION_DELTA_MEMBERSHIP: &str = r#"{
    "rid": 3,
    "torrents": {
        "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3": {
            "name": "Fedora-Workstation-Live-x86_64-40.iso",
            "category": "linux",
            "state": "metaDL",
            "tags": "new"
        }
    },
    "torrents_removed": ["3f1e2d9c0b7a6f5e4d3c2b1a0f9e8d7c6b5a4f3e"],
    "categories": {
        "distros": {"name": "distros", "savePath": "/data/distros"}
    },
    "tags": ["new"],
    "tags_removed": ["iso"]
}"#;

/// Delta at rid 4: only server state changes.
pub const SESSION_DELTA_SERVER: &str = r#"{
    "rid": 4,
    "server_state": {"dl_info_speed": 0, "queueing": false, "global_ratio": "2.51"}
}"#;

/// The session's messages in order.
pub const SESSION: [&str; 4] = [
    SESSION_FULL,
    SESSION_DELTA_RATES,
    SESSION_DELTA_MEMBERSHIP,
    SESSION_DELTA_SERVER,
];

/// Rid after the whole session is applied.
pub const SESSION_FINAL_RID: i64 = 4;
/// Torrent hashes after the whole session is applied.
pub const SESSION_FINAL_HASHES: [&str; 2] = [DEBIAN_HASH, FEDORA_HASH];
/// Tags after the whole session is applied.
pub const SESSION_FINAL_TAGS: [&str; 1] = ["new"];

/// Decodes the session's messages.
pub fn session_messages() -> Vec<MainData> {
    SESSION
        .iter()
        .map(|json| MainData::from_json(json.as_bytes()).expect("Invalid session fixture"))
        .collect()
}

/// A temporary directory holding the session as numbered JSON files.
pub struct FixtureDir {
    dir: TempDir,
    paths: Vec<PathBuf>,
}

impl FixtureDir {
    /// Writes the session to a new temporary directory.
    pub fn session() -> Self {
        Self::with_messages(&SESSION)
    }

    /// Writes the given bodies to a new temporary directory, one file each.
    pub fn with_messages(bodies: &[&str]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let paths = bodies
            .iter()
            .enumerate()
            .map(|(index, body)| {
                let path = dir.path().join(format!("{:04}.json", index + 1));
                fs::write(&path, body).expect("Failed to write fixture");
                path
            })
            .collect();
        Self { dir, paths }
    }

    /// Returns the directory path.
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Returns the file paths in session order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_decodes() {
        let messages = session_messages();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].full_update);
        assert!(messages[1..].iter().all(|m| !m.full_update));
        assert_eq!(messages.last().map(|m| m.rid), Some(SESSION_FINAL_RID));
    }

    #[test]
    fn fixture_dir_writes_files() {
        let fixtures = FixtureDir::session();
        assert_eq!(fixtures.paths().len(), SESSION.len());
        assert!(fixtures.paths().iter().all(|p| p.exists()));
        assert!(fixtures.paths()[0].ends_with("0001.json"));
        assert!(fixtures.path().is_dir());
    }
}
