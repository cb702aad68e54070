//! Property tests for merging and applying messages.

use proptest::prelude::*;
use qbitsync_engine::{ApplyKind, Merge, SyncStore};
use qbitsync_model::{DeltaServerState, DeltaTorrentInfo, ServerState, TorrentInfo};
use qbitsync_testkit::generators::*;
use std::collections::BTreeSet;

macro_rules! assert_fields_merged {
    ($merged:expr, $existing:expr, $delta:expr; $($field:ident),+ $(,)?) => {
        $(
            prop_assert_eq!(
                &$merged.$field,
                $delta.$field.as_ref().unwrap_or(&$existing.$field),
                "field {}",
                stringify!($field)
            );
        )+
    };
}

proptest! {
    #[test]
    fn absent_torrent_delta_is_identity(existing in torrent_info_strategy()) {
        prop_assert_eq!(existing.merge(&DeltaTorrentInfo::default()), existing);
    }

    #[test]
    fn absent_server_delta_is_identity(existing in server_state_strategy()) {
        prop_assert_eq!(existing.merge(&DeltaServerState::default()), existing);
    }

    #[test]
    fn torrent_fields_come_from_delta_when_present(
        existing in torrent_info_strategy(),
        delta in delta_torrent_strategy(),
    ) {
        let merged = existing.merge(&delta);
        assert_fields_merged!(merged, existing, delta;
            hash, name, added_on, amount_left, category, completed, completion_on,
            dlspeed, downloaded, eta, last_activity, num_complete, num_incomplete,
            num_leechs, num_seeds, progress, ratio, save_path, size, state, tags,
            time_active, total_size, tracker, uploaded, upspeed,
        );
    }

    #[test]
    fn server_fields_come_from_delta_when_present(
        existing in server_state_strategy(),
        delta in delta_server_state_strategy(),
    ) {
        let merged = existing.merge(&delta);
        assert_fields_merged!(merged, existing, delta;
            alltime_dl, alltime_ul, average_time_queue, connection_status, dht_nodes,
            dl_info_data, dl_info_speed, dl_rate_limit, free_space_on_disk, global_ratio,
            queued_io_jobs, queueing, read_cache_hits, read_cache_overload,
            refresh_interval, total_buffers_size, total_peer_connections,
            total_queued_size, total_wasted_session, up_info_data, up_info_speed,
            up_rate_limit, use_alt_speed_limits, use_subcategories, write_cache_overload,
        );
    }

    #[test]
    fn merging_twice_changes_nothing(
        existing in torrent_info_strategy(),
        delta in delta_torrent_strategy(),
    ) {
        let once = existing.merge(&delta);
        prop_assert_eq!(once.merge(&delta), once);
    }

    #[test]
    fn full_delta_overrides_everything(
        existing in server_state_strategy(),
        target in server_state_strategy(),
    ) {
        let delta = DeltaServerState::from(target.clone());
        prop_assert_eq!(existing.merge(&delta), target.clone());
        prop_assert_eq!(ServerState::materialize(&delta), target);
    }

    #[test]
    fn store_membership_follows_messages(messages in message_sequence_strategy(8)) {
        let store = SyncStore::new();
        let mut torrents = BTreeSet::new();
        let mut tags = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for (index, message) in messages.iter().enumerate() {
            let outcome = store.apply(message);

            if message.full_update || index == 0 {
                prop_assert_eq!(outcome.kind, ApplyKind::Full);
                torrents = message.torrents.keys().cloned().collect();
                tags = message.tags.iter().cloned().collect();
                categories = message.categories.keys().cloned().collect();
            } else {
                prop_assert_eq!(outcome.kind, ApplyKind::Incremental);
                torrents.extend(message.torrents.keys().cloned());
                for hash in &message.torrents_removed {
                    torrents.remove(hash);
                }
                tags.extend(message.tags.iter().cloned());
                for tag in &message.tags_removed {
                    tags.remove(tag);
                }
                categories.extend(message.categories.keys().cloned());
                for name in &message.categories_removed {
                    categories.remove(name);
                }
            }

            let held: BTreeSet<String> = store.all_torrents().into_iter().map(|t| t.hash).collect();
            prop_assert_eq!(&held, &torrents);
            prop_assert_eq!(store.torrent_count(), torrents.len());

            let bundle = store.aggregate_bundle();
            prop_assert_eq!(&bundle.tags, &tags);
            let held_categories: BTreeSet<String> = bundle.categories.keys().cloned().collect();
            prop_assert_eq!(&held_categories, &categories);

            prop_assert_eq!(store.current_rid(), message.rid);
        }
    }

    #[test]
    fn untouched_torrents_are_unchanged(messages in message_sequence_strategy(6)) {
        let store = SyncStore::new();
        for message in &messages {
            let before: Vec<TorrentInfo> = store.all_torrents();
            store.apply(message);
            if message.full_update || message.rid == 1 {
                continue;
            }
            for torrent in before {
                let touched = message.torrents.contains_key(&torrent.hash)
                    || message.torrents_removed.contains(&torrent.hash);
                if !touched {
                    prop_assert_eq!(store.torrent(&torrent.hash), Some(torrent));
                }
            }
        }
    }
}
