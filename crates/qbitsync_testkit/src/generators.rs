//! Property-based test generators using proptest.
//!
//! Hashes, tags and category names are drawn from small pools so that
//! generated message sequences keep touching the same keys.

use proptest::prelude::*;
use qbitsync_model::{
    Category, DeltaServerState, DeltaTorrentInfo, MainData, ServerState, TorrentInfo,
};

/// Torrent hashes used by the generators.
pub const HASH_POOL: [&str; 6] = ["h0", "h1", "h2", "h3", "h4", "h5"];

/// Tags used by the generators.
pub const TAG_POOL: [&str; 5] = ["t0", "t1", "t2", "t3", "t4"];

/// Category names used by the generators.
pub const CATEGORY_POOL: [&str; 3] = ["linux", "movies", "tv"];

fn keep<T>(present: bool, value: T) -> Option<T> {
    present.then_some(value)
}

/// Strategy for short free-text fields, empty string included.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9 ._-]{0,12}").expect("Invalid regex")
}

/// Strategy for full torrent records.
pub fn torrent_info_strategy() -> impl Strategy<Value = TorrentInfo> {
    (
        prop::sample::select(HASH_POOL.to_vec()),
        prop::collection::vec(text_strategy(), 6),
        prop::collection::vec(any::<i64>(), 17),
        (0.0f64..=1.0, 0.0f64..100.0),
    )
        .prop_map(|(hash, text, ints, (progress, ratio))| TorrentInfo {
            hash: hash.to_string(),
            name: text[0].clone(),
            category: text[1].clone(),
            save_path: text[2].clone(),
            state: text[3].clone(),
            tags: text[4].clone(),
            tracker: text[5].clone(),
            added_on: ints[0],
            amount_left: ints[1],
            completed: ints[2],
            completion_on: ints[3],
            dlspeed: ints[4],
            downloaded: ints[5],
            eta: ints[6],
            last_activity: ints[7],
            num_complete: ints[8],
            num_incomplete: ints[9],
            num_leechs: ints[10],
            num_seeds: ints[11],
            size: ints[12],
            time_active: ints[13],
            total_size: ints[14],
            uploaded: ints[15],
            upspeed: ints[16],
            progress,
            ratio,
        })
}

/// Strategy for partial torrent records with an arbitrary set of present fields.
///
/// Present fields are as likely to hold zero or empty values as anything else
/// the full strategy produces.
pub fn delta_torrent_strategy() -> impl Strategy<Value = DeltaTorrentInfo> {
    (
        torrent_info_strategy(),
        prop::collection::vec(any::<bool>(), 26),
    )
        .prop_map(|(info, mask)| DeltaTorrentInfo {
            hash: keep(mask[0], info.hash),
            name: keep(mask[1], info.name),
            added_on: keep(mask[2], info.added_on),
            amount_left: keep(mask[3], info.amount_left),
            category: keep(mask[4], info.category),
            completed: keep(mask[5], info.completed),
            completion_on: keep(mask[6], info.completion_on),
            dlspeed: keep(mask[7], info.dlspeed),
            downloaded: keep(mask[8], info.downloaded),
            eta: keep(mask[9], info.eta),
            last_activity: keep(mask[10], info.last_activity),
            num_complete: keep(mask[11], info.num_complete),
            num_incomplete: keep(mask[12], info.num_incomplete),
            num_leechs: keep(mask[13], info.num_leechs),
            num_seeds: keep(mask[14], info.num_seeds),
            progress: keep(mask[15], info.progress),
            ratio: keep(mask[16], info.ratio),
            save_path: keep(mask[17], info.save_path),
            size: keep(mask[18], info.size),
            state: keep(mask[19], info.state),
            tags: keep(mask[20], info.tags),
            time_active: keep(mask[21], info.time_active),
            total_size: keep(mask[22], info.total_size),
            tracker: keep(mask[23], info.tracker),
            uploaded: keep(mask[24], info.uploaded),
            upspeed: keep(mask[25], info.upspeed),
        })
}

/// Strategy for full server state records.
pub fn server_state_strategy() -> impl Strategy<Value = ServerState> {
    (
        prop::collection::vec(text_strategy(), 5),
        prop::collection::vec(any::<i64>(), 17),
        prop::collection::vec(any::<bool>(), 3),
    )
        .prop_map(|(text, ints, flags)| ServerState {
            connection_status: text[0].clone(),
            global_ratio: text[1].clone(),
            read_cache_hits: text[2].clone(),
            read_cache_overload: text[3].clone(),
            write_cache_overload: text[4].clone(),
            alltime_dl: ints[0],
            alltime_ul: ints[1],
            average_time_queue: ints[2],
            dht_nodes: ints[3],
            dl_info_data: ints[4],
            dl_info_speed: ints[5],
            dl_rate_limit: ints[6],
            free_space_on_disk: ints[7],
            queued_io_jobs: ints[8],
            refresh_interval: ints[9],
            total_buffers_size: ints[10],
            total_peer_connections: ints[11],
            total_queued_size: ints[12],
            total_wasted_session: ints[13],
            up_info_data: ints[14],
            up_info_speed: ints[15],
            up_rate_limit: ints[16],
            queueing: flags[0],
            use_alt_speed_limits: flags[1],
            use_subcategories: flags[2],
        })
}

/// Strategy for partial server state records.
pub fn delta_server_state_strategy() -> impl Strategy<Value = DeltaServerState> {
    (
        server_state_strategy(),
        prop::collection::vec(any::<bool>(), 25),
    )
        .prop_map(|(state, mask)| DeltaServerState {
            alltime_dl: keep(mask[0], state.alltime_dl),
            alltime_ul: keep(mask[1], state.alltime_ul),
            average_time_queue: keep(mask[2], state.average_time_queue),
            connection_status: keep(mask[3], state.connection_status),
            dht_nodes: keep(mask[4], state.dht_nodes),
            dl_info_data: keep(mask[5], state.dl_info_data),
            dl_info_speed: keep(mask[6], state.dl_info_speed),
            dl_rate_limit: keep(mask[7], state.dl_rate_limit),
            free_space_on_disk: keep(mask[8], state.free_space_on_disk),
            global_ratio: keep(mask[9], state.global_ratio),
            queued_io_jobs: keep(mask[10], state.queued_io_jobs),
            queueing: keep(mask[11], state.queueing),
            read_cache_hits: keep(mask[12], state.read_cache_hits),
            read_cache_overload: keep(mask[13], state.read_cache_overload),
            refresh_interval: keep(mask[14], state.refresh_interval),
            total_buffers_size: keep(mask[15], state.total_buffers_size),
            total_peer_connections: keep(mask[16], state.total_peer_connections),
            total_queued_size: keep(mask[17], state.total_queued_size),
            total_wasted_session: keep(mask[18], state.total_wasted_session),
            up_info_data: keep(mask[19], state.up_info_data),
            up_info_speed: keep(mask[20], state.up_info_speed),
            up_rate_limit: keep(mask[21], state.up_rate_limit),
            use_alt_speed_limits: keep(mask[22], state.use_alt_speed_limits),
            use_subcategories: keep(mask[23], state.use_subcategories),
            write_cache_overload: keep(mask[24], state.write_cache_overload),
        })
}

fn pool_subset(pool: &'static [&'static str]) -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(pool.to_vec(), 0..=pool.len())
        .prop_map(|items| items.into_iter().map(str::to_string).collect())
}

/// Strategy for maindata messages drawing keys from the pools.
///
/// The rid is left at 0; use [`message_sequence_strategy`] for ordered rids.
pub fn main_data_strategy() -> impl Strategy<Value = MainData> {
    (
        any::<bool>(),
        prop::collection::hash_map(
            prop::sample::select(HASH_POOL.to_vec()).prop_map(str::to_string),
            delta_torrent_strategy(),
            0..4,
        ),
        pool_subset(&HASH_POOL),
        prop::collection::vec(
            (prop::sample::select(CATEGORY_POOL.to_vec()), text_strategy()),
            0..3,
        ),
        pool_subset(&CATEGORY_POOL),
        pool_subset(&TAG_POOL),
        pool_subset(&TAG_POOL),
        delta_server_state_strategy(),
    )
        .prop_map(
            |(
                full_update,
                torrents,
                torrents_removed,
                categories,
                categories_removed,
                tags,
                tags_removed,
                server_state,
            )| MainData {
                rid: 0,
                full_update,
                torrents,
                torrents_removed,
                categories: categories
                    .into_iter()
                    .map(|(name, path)| (name.to_string(), Category::new(name, path)))
                    .collect(),
                categories_removed,
                tags,
                tags_removed,
                server_state,
            },
        )
}

/// Strategy for sequences of messages with rids 1, 2, 3, ...
pub fn message_sequence_strategy(max_len: usize) -> impl Strategy<Value = Vec<MainData>> {
    prop::collection::vec(main_data_strategy(), 1..=max_len).prop_map(|mut messages| {
        for (index, message) in messages.iter_mut().enumerate() {
            message.rid = index as i64 + 1;
        }
        messages
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_torrents_use_pool_hashes(info in torrent_info_strategy()) {
            prop_assert!(HASH_POOL.contains(&info.hash.as_str()));
            prop_assert!((0.0..=1.0).contains(&info.progress));
        }

        #[test]
        fn generated_sequences_have_increasing_rids(messages in message_sequence_strategy(5)) {
            for pair in messages.windows(2) {
                prop_assert!(pair[0].rid < pair[1].rid);
            }
        }

        #[test]
        fn generated_removals_use_pools(message in main_data_strategy()) {
            prop_assert!(message.torrents_removed.iter().all(|h| HASH_POOL.contains(&h.as_str())));
            prop_assert!(message.tags_removed.iter().all(|t| TAG_POOL.contains(&t.as_str())));
        }
    }
}
