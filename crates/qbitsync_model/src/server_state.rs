//! Full and partial server state records.

use serde::{Deserialize, Serialize};

/// Process-wide counters reported by the remote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerState {
    /// Bytes downloaded across all sessions.
    pub alltime_dl: i64,
    /// Bytes uploaded across all sessions.
    pub alltime_ul: i64,
    /// Average time a disk job waits in the queue (ms).
    pub average_time_queue: i64,
    /// Connection status (`connected`, `firewalled`, `disconnected`).
    pub connection_status: String,
    /// DHT nodes connected to.
    pub dht_nodes: i64,
    /// Bytes downloaded this session.
    pub dl_info_data: i64,
    /// Global download rate in bytes per second.
    pub dl_info_speed: i64,
    /// Download rate limit in bytes per second.
    pub dl_rate_limit: i64,
    /// Free space in the default save path in bytes.
    pub free_space_on_disk: i64,
    /// Global share ratio, formatted by the remote.
    pub global_ratio: String,
    /// Disk jobs waiting in the queue.
    pub queued_io_jobs: i64,
    /// Whether torrent queueing is enabled.
    pub queueing: bool,
    /// Read cache hit percentage, formatted by the remote.
    pub read_cache_hits: String,
    /// Read cache overload percentage, formatted by the remote.
    pub read_cache_overload: String,
    /// Suggested refresh interval for clients (ms).
    pub refresh_interval: i64,
    /// Total size of disk buffers in bytes.
    pub total_buffers_size: i64,
    /// Connected peers across all torrents.
    pub total_peer_connections: i64,
    /// Bytes queued for disk I/O.
    pub total_queued_size: i64,
    /// Bytes wasted this session.
    pub total_wasted_session: i64,
    /// Bytes uploaded this session.
    pub up_info_data: i64,
    /// Global upload rate in bytes per second.
    pub up_info_speed: i64,
    /// Upload rate limit in bytes per second.
    pub up_rate_limit: i64,
    /// Whether alternative speed limits are active.
    pub use_alt_speed_limits: bool,
    /// Whether subcategories are enabled.
    pub use_subcategories: bool,
    /// Write cache overload percentage, formatted by the remote.
    pub write_cache_overload: String,
}

/// A partial server state record.
///
/// Follows the same absent/present rules as the partial torrent record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaServerState {
    /// Bytes downloaded across all sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alltime_dl: Option<i64>,
    /// Bytes uploaded across all sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alltime_ul: Option<i64>,
    /// Average time a disk job waits in the queue (ms).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_time_queue: Option<i64>,
    /// Connection status (`connected`, `firewalled`, `disconnected`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_status: Option<String>,
    /// DHT nodes connected to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dht_nodes: Option<i64>,
    /// Bytes downloaded this session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dl_info_data: Option<i64>,
    /// Global download rate in bytes per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dl_info_speed: Option<i64>,
    /// Download rate limit in bytes per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dl_rate_limit: Option<i64>,
    /// Free space in the default save path in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_space_on_disk: Option<i64>,
    /// Global share ratio, formatted by the remote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_ratio: Option<String>,
    /// Disk jobs waiting in the queue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queued_io_jobs: Option<i64>,
    /// Whether torrent queueing is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queueing: Option<bool>,
    /// Read cache hit percentage, formatted by the remote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_cache_hits: Option<String>,
    /// Read cache overload percentage, formatted by the remote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_cache_overload: Option<String>,
    /// Suggested refresh interval for clients (ms).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<i64>,
    /// Total size of disk buffers in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_buffers_size: Option<i64>,
    /// Connected peers across all torrents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_peer_connections: Option<i64>,
    /// Bytes queued for disk I/O.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_queued_size: Option<i64>,
    /// Bytes wasted this session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_wasted_session: Option<i64>,
    /// Bytes uploaded this session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_info_data: Option<i64>,
    /// Global upload rate in bytes per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_info_speed: Option<i64>,
    /// Upload rate limit in bytes per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_rate_limit: Option<i64>,
    /// Whether alternative speed limits are active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_alt_speed_limits: Option<bool>,
    /// Whether subcategories are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_subcategories: Option<bool>,
    /// Write cache overload percentage, formatted by the remote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_cache_overload: Option<String>,
}

impl DeltaServerState {
    /// Returns true if the delta carries no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<ServerState> for DeltaServerState {
    /// Builds a delta that sets every field to the record's value.
    fn from(state: ServerState) -> Self {
        Self {
            alltime_dl: Some(state.alltime_dl),
            alltime_ul: Some(state.alltime_ul),
            average_time_queue: Some(state.average_time_queue),
            connection_status: Some(state.connection_status),
            dht_nodes: Some(state.dht_nodes),
            dl_info_data: Some(state.dl_info_data),
            dl_info_speed: Some(state.dl_info_speed),
            dl_rate_limit: Some(state.dl_rate_limit),
            free_space_on_disk: Some(state.free_space_on_disk),
            global_ratio: Some(state.global_ratio),
            queued_io_jobs: Some(state.queued_io_jobs),
            queueing: Some(state.queueing),
            read_cache_hits: Some(state.read_cache_hits),
            read_cache_overload: Some(state.read_cache_overload),
            refresh_interval: Some(state.refresh_interval),
            total_buffers_size: Some(state.total_buffers_size),
            total_peer_connections: Some(state.total_peer_connections),
            total_queued_size: Some(state.total_queued_size),
            total_wasted_session: Some(state.total_wasted_session),
            up_info_data: Some(state.up_info_data),
            up_info_speed: Some(state.up_info_speed),
            up_rate_limit: Some(state.up_rate_limit),
            use_alt_speed_limits: Some(state.use_alt_speed_limits),
            use_subcategories: Some(state.use_subcategories),
            write_cache_overload: Some(state.write_cache_overload),
        }
    }
}
