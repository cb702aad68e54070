//! Folding partial records into full records.
//!
//! Merging never mutates its inputs: it builds a new record where every
//! field comes from the delta when the delta carries it, and from the
//! existing record otherwise. A delta carrying a zero or empty value
//! overwrites just like any other value.

use qbitsync_model::{DeltaServerState, DeltaTorrentInfo, ServerState, TorrentInfo};

/// A full record that can absorb its partial counterpart.
pub trait Merge: Sized {
    /// The partial counterpart of the record.
    type Delta;

    /// Returns a new record with the delta's present fields applied.
    fn merge(&self, delta: &Self::Delta) -> Self;

    /// Builds a record from a delta alone; absent fields take their default.
    fn materialize(delta: &Self::Delta) -> Self
    where
        Self: Default,
    {
        Self::default().merge(delta)
    }
}

// The struct literal must name every field, so a field added to the model
// without being listed here fails to compile.
macro_rules! merge_fields {
    ($existing:expr, $delta:expr, $ty:ident { $($field:ident),+ $(,)? }) => {
        $ty {
            $(
                $field: match &$delta.$field {
                    Some(value) => value.clone(),
                    None => $existing.$field.clone(),
                },
            )+
        }
    };
}

impl Merge for TorrentInfo {
    type Delta = DeltaTorrentInfo;

    fn merge(&self, delta: &DeltaTorrentInfo) -> Self {
        merge_fields!(
            self,
            delta,
            TorrentInfo {
                hash,
                name,
                added_on,
                amount_left,
                category,
                completed,
                completion_on,
                dlspeed,
                downloaded,
                eta,
                last_activity,
                num_complete,
                num_incomplete,
                num_leechs,
                num_seeds,
                progress,
                ratio,
                save_path,
                size,
                state,
                tags,
                time_active,
                total_size,
                tracker,
                uploaded,
                upspeed,
            }
        )
    }
}

impl Merge for ServerState {
    type Delta = DeltaServerState;

    fn merge(&self, delta: &DeltaServerState) -> Self {
        merge_fields!(
            self,
            delta,
            ServerState {
                alltime_dl,
                alltime_ul,
                average_time_queue,
                connection_status,
                dht_nodes,
                dl_info_data,
                dl_info_speed,
                dl_rate_limit,
                free_space_on_disk,
                global_ratio,
                queued_io_jobs,
                queueing,
                read_cache_hits,
                read_cache_overload,
                refresh_interval,
                total_buffers_size,
                total_peer_connections,
                total_queued_size,
                total_wasted_session,
                up_info_data,
                up_info_speed,
                up_rate_limit,
                use_alt_speed_limits,
                use_subcategories,
                write_cache_overload,
            }
        )
    }
}

/// Merges a torrent delta onto an existing torrent.
pub fn merge_torrent(existing: &TorrentInfo, delta: &DeltaTorrentInfo) -> TorrentInfo {
    existing.merge(delta)
}

/// Merges a server state delta onto the existing server state.
pub fn merge_server_state(existing: &ServerState, delta: &DeltaServerState) -> ServerState {
    existing.merge(delta)
}

/// Builds a torrent from a delta keyed by `hash`.
///
/// The key wins over any hash carried inside the delta.
pub fn materialize_torrent(hash: &str, delta: &DeltaTorrentInfo) -> TorrentInfo {
    let mut info = TorrentInfo::materialize(delta);
    info.hash = hash.to_owned();
    info
}
