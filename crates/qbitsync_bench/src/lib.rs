//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use qbitsync_model::{Category, DeltaServerState, DeltaTorrentInfo, MainData};
use rand::Rng;

const STATES: [&str; 5] = ["downloading", "uploading", "stalledUP", "pausedDL", "queuedDL"];

/// Hash for the `index`-th synthetic torrent.
pub fn torrent_hash(index: usize) -> String {
    format!("{:040x}", index)
}

/// A delta carrying every torrent field.
pub fn full_torrent_delta(index: usize) -> DeltaTorrentInfo {
    let mut rng = rand::thread_rng();
    let size: i64 = rng.gen_range(1_000_000..10_000_000_000);
    let progress: f64 = rng.gen();
    DeltaTorrentInfo {
        hash: Some(torrent_hash(index)),
        name: Some(format!("torrent-{index}.iso")),
        added_on: Some(1_700_000_000 + index as i64),
        amount_left: Some(((1.0 - progress) * size as f64) as i64),
        category: Some("bench".to_string()),
        completed: Some((progress * size as f64) as i64),
        completion_on: Some(0),
        dlspeed: Some(rng.gen_range(0..10_000_000)),
        downloaded: Some((progress * size as f64) as i64),
        eta: Some(rng.gen_range(0..86_400)),
        last_activity: Some(1_700_000_000 + index as i64),
        num_complete: Some(rng.gen_range(0..500)),
        num_incomplete: Some(rng.gen_range(0..500)),
        num_leechs: Some(rng.gen_range(0..50)),
        num_seeds: Some(rng.gen_range(0..50)),
        progress: Some(progress),
        ratio: Some(rng.gen_range(0.0..5.0)),
        save_path: Some("/data/bench".to_string()),
        size: Some(size),
        state: Some(STATES[index % STATES.len()].to_string()),
        tags: Some("bench".to_string()),
        time_active: Some(rng.gen_range(0..1_000_000)),
        total_size: Some(size),
        tracker: Some("http://tracker.example:6969/announce".to_string()),
        uploaded: Some(rng.gen_range(0..size)),
        upspeed: Some(rng.gen_range(0..10_000_000)),
    }
}

/// A delta touching the handful of fields that change between polls.
pub fn rate_delta() -> DeltaTorrentInfo {
    let mut rng = rand::thread_rng();
    DeltaTorrentInfo {
        dlspeed: Some(rng.gen_range(0..10_000_000)),
        upspeed: Some(rng.gen_range(0..10_000_000)),
        eta: Some(rng.gen_range(0..86_400)),
        progress: Some(rng.gen()),
        ..Default::default()
    }
}

/// A full snapshot with `count` torrents.
pub fn full_message(count: usize) -> MainData {
    (0..count)
        .fold(MainData::full(1), |message, i| {
            message.with_torrent(torrent_hash(i), full_torrent_delta(i))
        })
        .with_category(Category::new("bench", "/data/bench"))
        .with_tag("bench")
        .with_server_state(DeltaServerState {
            connection_status: Some("connected".to_string()),
            dht_nodes: Some(300),
            ..Default::default()
        })
}

/// An incremental message updating rates on `changed` of `count` torrents.
pub fn incremental_message(rid: i64, count: usize, changed: usize) -> MainData {
    let mut rng = rand::thread_rng();
    (0..changed).fold(MainData::incremental(rid), |message, _| {
        message.with_torrent(torrent_hash(rng.gen_range(0..count)), rate_delta())
    })
}
