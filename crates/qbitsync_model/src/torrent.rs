//! Full and partial torrent records.

use serde::{Deserialize, Serialize};

/// A torrent as mirrored from the remote.
///
/// The `hash` is the identity of the record and never changes once the
/// torrent exists. Every other field may change with any update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorrentInfo {
    /// Torrent info hash. Identity of the record.
    pub hash: String,
    /// Display name.
    pub name: String,
    /// Time the torrent was added (unix seconds).
    pub added_on: i64,
    /// Bytes still to download.
    pub amount_left: i64,
    /// Category name, empty when uncategorized.
    pub category: String,
    /// Bytes of the selection already downloaded.
    pub completed: i64,
    /// Time the download completed (unix seconds).
    pub completion_on: i64,
    /// Download speed in bytes per second.
    pub dlspeed: i64,
    /// Bytes downloaded over the torrent's lifetime.
    pub downloaded: i64,
    /// Estimated seconds until completion.
    pub eta: i64,
    /// Time of the last chunk transfer (unix seconds).
    pub last_activity: i64,
    /// Seeds in the swarm.
    pub num_complete: i64,
    /// Leechers in the swarm.
    pub num_incomplete: i64,
    /// Connected leechers.
    pub num_leechs: i64,
    /// Connected seeds.
    pub num_seeds: i64,
    /// Progress between 0 and 1.
    pub progress: f64,
    /// Share ratio.
    pub ratio: f64,
    /// Directory the torrent is saved to.
    pub save_path: String,
    /// Size of the selected files in bytes.
    pub size: i64,
    /// Torrent state as reported by the remote (e.g. `uploading`).
    pub state: String,
    /// Comma-separated tag list.
    pub tags: String,
    /// Seconds the torrent has been active.
    pub time_active: i64,
    /// Total size of all files in bytes.
    pub total_size: i64,
    /// Current working tracker URL.
    pub tracker: String,
    /// Bytes uploaded over the torrent's lifetime.
    pub uploaded: i64,
    /// Upload speed in bytes per second.
    pub upspeed: i64,
}

impl TorrentInfo {
    /// Creates an empty record for the given hash.
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            ..Self::default()
        }
    }

    /// Returns the individual tags, trimmed, skipping empty entries.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// A partial torrent record carried by an incremental update.
///
/// A field set to `None` is left untouched by the update. A field set to
/// `Some` overwrites the mirrored value, including zero and empty values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaTorrentInfo {
    /// Torrent info hash. Identity of the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Time the torrent was added (unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_on: Option<i64>,
    /// Bytes still to download.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_left: Option<i64>,
    /// Category name, empty when uncategorized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Bytes of the selection already downloaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<i64>,
    /// Time the download completed (unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_on: Option<i64>,
    /// Download speed in bytes per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dlspeed: Option<i64>,
    /// Bytes downloaded over the torrent's lifetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded: Option<i64>,
    /// Estimated seconds until completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<i64>,
    /// Time of the last chunk transfer (unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<i64>,
    /// Seeds in the swarm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_complete: Option<i64>,
    /// Leechers in the swarm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_incomplete: Option<i64>,
    /// Connected leechers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_leechs: Option<i64>,
    /// Connected seeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_seeds: Option<i64>,
    /// Progress between 0 and 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Share ratio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    /// Directory the torrent is saved to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_path: Option<String>,
    /// Size of the selected files in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Torrent state as reported by the remote (e.g. `uploading`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Comma-separated tag list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Seconds the torrent has been active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_active: Option<i64>,
    /// Total size of all files in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_size: Option<i64>,
    /// Current working tracker URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<String>,
    /// Bytes uploaded over the torrent's lifetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded: Option<i64>,
    /// Upload speed in bytes per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upspeed: Option<i64>,
}

impl DeltaTorrentInfo {
    /// Returns true if the delta carries no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<TorrentInfo> for DeltaTorrentInfo {
    /// Builds a delta that sets every field to the record's value.
    fn from(info: TorrentInfo) -> Self {
        Self {
            hash: Some(info.hash),
            name: Some(info.name),
            added_on: Some(info.added_on),
            amount_left: Some(info.amount_left),
            category: Some(info.category),
            completed: Some(info.completed),
            completion_on: Some(info.completion_on),
            dlspeed: Some(info.dlspeed),
            downloaded: Some(info.downloaded),
            eta: Some(info.eta),
            last_activity: Some(info.last_activity),
            num_complete: Some(info.num_complete),
            num_incomplete: Some(info.num_incomplete),
            num_leechs: Some(info.num_leechs),
            num_seeds: Some(info.num_seeds),
            progress: Some(info.progress),
            ratio: Some(info.ratio),
            save_path: Some(info.save_path),
            size: Some(info.size),
            state: Some(info.state),
            tags: Some(info.tags),
            time_active: Some(info.time_active),
            total_size: Some(info.total_size),
            tracker: Some(info.tracker),
            uploaded: Some(info.uploaded),
            upspeed: Some(info.upspeed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_fields_are_absent() {
        let delta: DeltaTorrentInfo =
            serde_json::from_str(r#"{"dlspeed": 1024, "name": null}"#).unwrap();
        assert_eq!(delta.dlspeed, Some(1024));
        assert_eq!(delta.name, None);
        assert_eq!(delta.upspeed, None);
    }

    #[test]
    fn explicit_zero_is_present() {
        let delta: DeltaTorrentInfo =
            serde_json::from_str(r#"{"dlspeed": 0, "category": "", "progress": 0.0}"#).unwrap();
        assert_eq!(delta.dlspeed, Some(0));
        assert_eq!(delta.category, Some(String::new()));
        assert_eq!(delta.progress, Some(0.0));
        assert!(!delta.is_empty());
    }

    #[test]
    fn empty_object_is_empty_delta() {
        let delta: DeltaTorrentInfo = serde_json::from_str("{}").unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let delta = DeltaTorrentInfo {
            eta: Some(0),
            ..DeltaTorrentInfo::default()
        };
        assert_eq!(serde_json::to_string(&delta).unwrap(), r#"{"eta":0}"#);
    }

    #[test]
    fn tag_list_splits_and_trims() {
        let mut info = TorrentInfo::new("abc");
        info.tags = "linux, iso,,  ".into();
        assert_eq!(info.tag_list(), vec!["linux", "iso"]);

        info.tags.clear();
        assert!(info.tag_list().is_empty());
    }

    #[test]
    fn full_delta_from_record() {
        let mut info = TorrentInfo::new("abc");
        info.name = "debian.iso".into();
        let delta = DeltaTorrentInfo::from(info);
        assert_eq!(delta.hash.as_deref(), Some("abc"));
        assert_eq!(delta.name.as_deref(), Some("debian.iso"));
        assert_eq!(delta.size, Some(0));
    }
}
