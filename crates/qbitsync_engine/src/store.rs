//! The synchronized mirror of the remote state.
//!
//! [`SyncStore`] owns the last applied rid, the torrents keyed by hash, the
//! categories, the tag set and the server state. All of it sits behind one
//! reader/writer lock: [`SyncStore::apply`] holds the write lock for the
//! whole message, so readers see either the state before a message or the
//! state after it, never a mixture.

use crate::merge::{materialize_torrent, Merge};
use parking_lot::RwLock;
use qbitsync_model::{Category, MainData, ServerState, TorrentInfo};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// How a message was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyKind {
    /// The mirror was rebuilt from the message.
    Full,
    /// The message was merged into the existing mirror.
    Incremental,
}

/// Summary of one [`SyncStore::apply`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// How the message was applied.
    pub kind: ApplyKind,
    /// Rid before the message.
    pub previous_rid: i64,
    /// Rid after the message.
    pub rid: i64,
    /// Torrents inserted or merged.
    pub torrents_upserted: usize,
    /// Torrents removed, or held before a full replace and absent after it.
    pub torrents_removed: usize,
    /// Torrents held after the message.
    pub torrent_count: usize,
}

/// Categories, server state and tags, copied out of the store together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateBundle {
    /// Categories keyed by name.
    pub categories: HashMap<String, Category>,
    /// Server-wide counters.
    pub server_state: ServerState,
    /// Tag set.
    pub tags: BTreeSet<String>,
}

/// Everything the store holds, copied under a single read lock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    /// Rid of the last applied message.
    pub rid: i64,
    /// All torrents, in no particular order.
    pub torrents: Vec<TorrentInfo>,
    /// Categories, server state and tags.
    pub aggregate: AggregateBundle,
}

#[derive(Debug, Default)]
struct StoreState {
    rid: i64,
    torrents: HashMap<String, TorrentInfo>,
    categories: HashMap<String, Category>,
    tags: BTreeSet<String>,
    server_state: ServerState,
}

impl StoreState {
    fn replace_with(&mut self, data: &MainData) -> (usize, usize) {
        let previous = std::mem::take(&mut self.torrents);
        self.torrents = data
            .torrents
            .iter()
            .map(|(hash, delta)| (hash.clone(), materialize_torrent(hash, delta)))
            .collect();
        self.categories = data.categories.clone();
        self.tags = data.tags.iter().cloned().collect();
        self.server_state = ServerState::materialize(&data.server_state);

        let discarded = previous
            .keys()
            .filter(|hash| !self.torrents.contains_key(hash.as_str()))
            .count();
        (data.torrents.len(), discarded)
    }

    fn merge_from(&mut self, data: &MainData) -> (usize, usize) {
        for (hash, delta) in &data.torrents {
            let merged = match self.torrents.get(hash) {
                Some(existing) => {
                    let mut merged = existing.merge(delta);
                    // The hash is the identity and never changes.
                    merged.hash.clone_from(&existing.hash);
                    merged
                }
                None => materialize_torrent(hash, delta),
            };
            self.torrents.insert(hash.clone(), merged);
        }

        let removed = data
            .torrents_removed
            .iter()
            .filter(|hash| self.torrents.remove(hash.as_str()).is_some())
            .count();

        // Additions first, then removals: a tag in both lists ends up absent.
        self.tags.extend(data.tags.iter().cloned());
        for tag in &data.tags_removed {
            self.tags.remove(tag);
        }

        for (name, category) in &data.categories {
            self.categories.insert(name.clone(), category.clone());
        }
        for name in &data.categories_removed {
            self.categories.remove(name);
        }

        self.server_state = self.server_state.merge(&data.server_state);
        (data.torrents.len(), removed)
    }

    fn aggregate(&self) -> AggregateBundle {
        AggregateBundle {
            categories: self.categories.clone(),
            server_state: self.server_state.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// An in-memory mirror of the remote's maindata.
///
/// The store starts empty with rid 0. Rid 0 means nothing has been applied
/// yet, so the first message is always applied as a full replace.
#[derive(Debug, Default)]
pub struct SyncStore {
    state: RwLock<StoreState>,
}

impl SyncStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one message to the mirror.
    ///
    /// The message is applied as a full replace when it says so or when the
    /// store has not applied anything yet, and merged otherwise. Removing
    /// keys that are not present is a no-op. Messages must be applied in
    /// rid order; the store does not check.
    pub fn apply(&self, data: &MainData) -> ApplyOutcome {
        let mut state = self.state.write();
        let previous_rid = state.rid;
        let kind = if data.full_update || previous_rid == 0 {
            ApplyKind::Full
        } else {
            ApplyKind::Incremental
        };

        let (torrents_upserted, torrents_removed) = match kind {
            ApplyKind::Full => state.replace_with(data),
            ApplyKind::Incremental => state.merge_from(data),
        };
        state.rid = data.rid;

        let outcome = ApplyOutcome {
            kind,
            previous_rid,
            rid: data.rid,
            torrents_upserted,
            torrents_removed,
            torrent_count: state.torrents.len(),
        };
        drop(state);

        match kind {
            ApplyKind::Full => info!(
                rid = outcome.rid,
                torrents = outcome.torrent_count,
                "applied full update"
            ),
            ApplyKind::Incremental => debug!(
                previous_rid = outcome.previous_rid,
                rid = outcome.rid,
                upserted = outcome.torrents_upserted,
                removed = outcome.torrents_removed,
                "applied incremental update"
            ),
        }

        outcome
    }

    /// Clears the mirror. The next message is applied as a full replace.
    pub fn reset(&self) {
        *self.state.write() = StoreState::default();
        debug!("store reset");
    }

    /// Returns the rid of the last applied message, 0 if none.
    pub fn current_rid(&self) -> i64 {
        self.state.read().rid
    }

    /// Returns a copy of every torrent, in no particular order.
    pub fn all_torrents(&self) -> Vec<TorrentInfo> {
        self.state.read().torrents.values().cloned().collect()
    }

    /// Returns a copy of one torrent.
    pub fn torrent(&self, hash: &str) -> Option<TorrentInfo> {
        self.state.read().torrents.get(hash).cloned()
    }

    /// Returns the number of torrents.
    pub fn torrent_count(&self) -> usize {
        self.state.read().torrents.len()
    }

    /// Returns a copy of the categories, server state and tags.
    pub fn aggregate_bundle(&self) -> AggregateBundle {
        self.state.read().aggregate()
    }

    /// Returns a copy of the whole mirror, taken under one read lock.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read();
        StoreSnapshot {
            rid: state.rid,
            torrents: state.torrents.values().cloned().collect(),
            aggregate: state.aggregate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbitsync_model::{DeltaServerState, DeltaTorrentInfo};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn named(name: &str) -> DeltaTorrentInfo {
        DeltaTorrentInfo {
            name: Some(name.into()),
            ..DeltaTorrentInfo::default()
        }
    }

    fn hashes(store: &SyncStore) -> BTreeSet<String> {
        store.all_torrents().into_iter().map(|t| t.hash).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn seeded_store() -> SyncStore {
        let store = SyncStore::new();
        store.apply(
            &MainData::full(1)
                .with_torrent(
                    "a",
                    DeltaTorrentInfo {
                        name: Some("alpha".into()),
                        dlspeed: Some(100),
                        upspeed: Some(200),
                        ..DeltaTorrentInfo::default()
                    },
                )
                .with_torrent("b", named("bravo"))
                .with_torrent("c", named("charlie"))
                .with_category(Category::new("linux", "/data/linux"))
                .with_tag("t1")
                .with_tag("t2")
                .with_server_state(DeltaServerState {
                    connection_status: Some("connected".into()),
                    dht_nodes: Some(300),
                    ..DeltaServerState::default()
                }),
        );
        store
    }

    #[test]
    fn new_store_is_empty() {
        let store = SyncStore::new();
        assert_eq!(store.current_rid(), 0);
        assert_eq!(store.torrent_count(), 0);
        assert!(store.all_torrents().is_empty());
        assert_eq!(store.aggregate_bundle(), AggregateBundle::default());
    }

    #[test]
    fn first_apply_is_full() {
        let store = SyncStore::new();
        let outcome = store.apply(&MainData::incremental(4).with_torrent("a", named("alpha")));

        assert_eq!(outcome.kind, ApplyKind::Full);
        assert_eq!(outcome.previous_rid, 0);
        assert_eq!(store.current_rid(), 4);
        assert_eq!(hashes(&store), set(&["a"]));

        let a = store.torrent("a").unwrap();
        assert_eq!(a.hash, "a");
        assert_eq!(a.name, "alpha");
        assert_eq!(a.size, 0);
    }

    #[test]
    fn full_replace_resets_membership() {
        let store = seeded_store();
        let outcome = store.apply(
            &MainData::full(10)
                .with_torrent("a", named("alpha"))
                .with_torrent("d", named("delta"))
                .with_tag("t9"),
        );

        assert_eq!(outcome.kind, ApplyKind::Full);
        assert_eq!(hashes(&store), set(&["a", "d"]));

        // Fields the full update omits resolve to zero, not to the old value.
        let a = store.torrent("a").unwrap();
        assert_eq!(a.dlspeed, 0);

        let bundle = store.aggregate_bundle();
        assert!(bundle.categories.is_empty());
        assert_eq!(bundle.tags, set(&["t9"]));
        assert_eq!(bundle.server_state, ServerState::default());
    }

    #[test]
    fn incremental_upsert_and_remove() {
        let store = seeded_store();
        let before_c = store.torrent("c").unwrap();

        let outcome = store.apply(
            &MainData::incremental(2)
                .with_removed_torrent("b")
                .with_torrent(
                    "a",
                    DeltaTorrentInfo {
                        dlspeed: Some(0),
                        ..DeltaTorrentInfo::default()
                    },
                ),
        );

        assert_eq!(outcome.kind, ApplyKind::Incremental);
        assert_eq!(outcome.torrents_removed, 1);
        assert_eq!(outcome.torrent_count, 2);
        assert_eq!(hashes(&store), set(&["a", "c"]));

        let a = store.torrent("a").unwrap();
        assert_eq!(a.dlspeed, 0);
        assert_eq!(a.upspeed, 200);
        assert_eq!(a.name, "alpha");
        assert_eq!(store.torrent("c").unwrap(), before_c);
    }

    #[test]
    fn incremental_introduces_new_torrent() {
        let store = seeded_store();
        store.apply(&MainData::incremental(2).with_torrent("d", named("delta")));

        let d = store.torrent("d").unwrap();
        assert_eq!(d.hash, "d");
        assert_eq!(d.name, "delta");
        assert_eq!(store.torrent_count(), 4);
    }

    #[test]
    fn delta_cannot_change_identity() {
        let store = seeded_store();
        store.apply(&MainData::incremental(2).with_torrent(
            "a",
            DeltaTorrentInfo {
                hash: Some("zzz".into()),
                ..DeltaTorrentInfo::default()
            },
        ));
        assert_eq!(store.torrent("a").unwrap().hash, "a");
    }

    #[test]
    fn full_replace_counts_discarded_torrents() {
        let store = seeded_store();
        let outcome = store.apply(
            &MainData::full(7)
                .with_torrent("a", named("alpha"))
                .with_torrent("d", named("delta")),
        );

        assert_eq!(outcome.kind, ApplyKind::Full);
        assert_eq!(outcome.torrents_upserted, 2);
        assert_eq!(outcome.torrents_removed, 2);
        assert_eq!(outcome.torrent_count, 2);
        assert_eq!(hashes(&store), set(&["a", "d"]));
    }

    #[test]
    fn removing_unknown_torrent_is_noop() {
        let store = seeded_store();
        let outcome = store.apply(&MainData::incremental(2).with_removed_torrent("missing"));
        assert_eq!(outcome.torrents_removed, 0);
        assert_eq!(store.torrent_count(), 3);
        assert_eq!(store.current_rid(), 2);
    }

    #[test]
    fn tags_are_added_then_removed() {
        let store = seeded_store();
        store.apply(
            &MainData::incremental(2)
                .with_tag("t3")
                .with_removed_tag("t1")
                .with_removed_tag("t3"),
        );
        assert_eq!(store.aggregate_bundle().tags, set(&["t2"]));
    }

    #[test]
    fn tags_form_a_set() {
        let store = seeded_store();
        store.apply(&MainData::incremental(2).with_tag("t1").with_tag("t1"));
        store.apply(&MainData::incremental(3).with_tag("t1"));
        assert_eq!(store.aggregate_bundle().tags, set(&["t1", "t2"]));

        let store = SyncStore::new();
        store.apply(&MainData::full(1).with_tag("x").with_tag("x"));
        assert_eq!(store.aggregate_bundle().tags.len(), 1);
    }

    #[test]
    fn category_upsert_and_remove() {
        let store = seeded_store();
        store.apply(
            &MainData::incremental(2)
                .with_category(Category::new("linux", "/mnt/linux"))
                .with_category(Category::new("tv", "/data/tv"))
                .with_removed_category("missing"),
        );

        let categories = store.aggregate_bundle().categories;
        assert_eq!(categories.len(), 2);
        assert_eq!(categories["linux"].save_path, "/mnt/linux");

        store.apply(&MainData::incremental(3).with_removed_category("tv"));
        let categories = store.aggregate_bundle().categories;
        assert_eq!(categories.len(), 1);
        assert!(categories.contains_key("linux"));
    }

    #[test]
    fn server_state_is_merged_incrementally() {
        let store = seeded_store();
        store.apply(&MainData::incremental(2).with_server_state(DeltaServerState {
            dht_nodes: Some(0),
            global_ratio: Some("0.50".into()),
            ..DeltaServerState::default()
        }));

        let state = store.aggregate_bundle().server_state;
        assert_eq!(state.dht_nodes, 0);
        assert_eq!(state.global_ratio, "0.50");
        assert_eq!(state.connection_status, "connected");
    }

    #[test]
    fn reset_forces_full_replace() {
        let store = seeded_store();
        store.reset();
        assert_eq!(store.current_rid(), 0);
        assert_eq!(store.torrent_count(), 0);

        let outcome = store.apply(&MainData::incremental(2).with_torrent("z", named("zulu")));
        assert_eq!(outcome.kind, ApplyKind::Full);
        assert_eq!(hashes(&store), set(&["z"]));
    }

    #[test]
    fn rid_follows_last_message_even_when_older() {
        let store = seeded_store();
        store.apply(&MainData::incremental(9));
        store.apply(&MainData::incremental(5));
        assert_eq!(store.current_rid(), 5);
    }

    #[test]
    fn accessors_return_copies() {
        let store = seeded_store();
        let mut torrents = store.all_torrents();
        torrents.clear();
        let mut bundle = store.aggregate_bundle();
        bundle.tags.clear();

        assert_eq!(store.torrent_count(), 3);
        assert_eq!(store.aggregate_bundle().tags.len(), 2);
    }

    #[test]
    fn snapshot_is_consistent() {
        let store = seeded_store();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.rid, 1);
        assert_eq!(snapshot.torrents.len(), 3);
        assert_eq!(snapshot.aggregate, store.aggregate_bundle());
    }

    #[test]
    fn concurrent_readers_see_whole_messages() {
        const HASHES: [&str; 8] = ["h0", "h1", "h2", "h3", "h4", "h5", "h6", "h7"];

        let store = SyncStore::new();
        let done = AtomicBool::new(false);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for generation in 1..=500i64 {
                    let mut data = MainData::full(generation);
                    for hash in HASHES {
                        data = data.with_torrent(hash, named(&format!("gen-{generation}")));
                    }
                    store.apply(&data);
                }
                done.store(true, Ordering::SeqCst);
            });

            for _ in 0..4 {
                scope.spawn(|| {
                    while !done.load(Ordering::SeqCst) {
                        let torrents = store.all_torrents();
                        if torrents.is_empty() {
                            continue;
                        }
                        assert_eq!(torrents.len(), HASHES.len());
                        let first = &torrents[0].name;
                        assert!(torrents.iter().all(|t| &t.name == first));

                        let snapshot = store.snapshot();
                        let expected = format!("gen-{}", snapshot.rid);
                        assert!(snapshot.torrents.iter().all(|t| t.name == expected));
                    }
                });
            }
        });

        assert_eq!(store.current_rid(), 500);
    }
}
