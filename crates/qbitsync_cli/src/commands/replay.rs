//! Replay command implementation.

use super::{collect_inputs, read_message, OutputFormat};
use qbitsync_engine::{ApplyKind, StoreSnapshot, SyncStore};
use qbitsync_model::{Category, ServerState, TorrentInfo};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// The mirror after a replay.
#[derive(Debug, Serialize)]
pub struct ReplayResult {
    /// Number of messages applied.
    pub messages: usize,
    /// Messages applied as a full replace.
    pub full_updates: usize,
    /// Rid of the last message.
    pub rid: i64,
    /// Number of torrents in the mirror.
    pub torrent_count: usize,
    /// Categories, sorted by name.
    pub categories: Vec<Category>,
    /// Tags, sorted.
    pub tags: Vec<String>,
    /// Server state.
    pub server_state: ServerState,
    /// Torrents sorted by hash (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub torrents: Option<Vec<TorrentInfo>>,
}

impl ReplayResult {
    fn from_snapshot(
        snapshot: StoreSnapshot,
        messages: usize,
        full_updates: usize,
        include_torrents: bool,
    ) -> Self {
        let mut categories: Vec<Category> = snapshot.aggregate.categories.into_values().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        let torrent_count = snapshot.torrents.len();
        let torrents = include_torrents.then(|| {
            let mut torrents = snapshot.torrents;
            torrents.sort_by(|a, b| a.hash.cmp(&b.hash));
            torrents
        });

        Self {
            messages,
            full_updates,
            rid: snapshot.rid,
            torrent_count,
            categories,
            tags: snapshot.aggregate.tags.into_iter().collect(),
            server_state: snapshot.aggregate.server_state,
            torrents,
        }
    }
}

/// Applies every input to a fresh store and returns the resulting mirror.
pub fn replay(
    inputs: &[PathBuf],
    include_torrents: bool,
) -> Result<ReplayResult, Box<dyn std::error::Error>> {
    let files = collect_inputs(inputs)?;
    if files.is_empty() {
        return Err("No maindata messages found".into());
    }

    let store = SyncStore::new();
    let mut full_updates = 0;
    for path in &files {
        let message = read_message(path)?;
        let outcome = store.apply(&message);
        if outcome.kind == ApplyKind::Full {
            full_updates += 1;
        }
        info!(
            "Applied {:?} (rid {} -> {}, {} torrents)",
            path, outcome.previous_rid, outcome.rid, outcome.torrent_count
        );
    }

    Ok(ReplayResult::from_snapshot(
        store.snapshot(),
        files.len(),
        full_updates,
        include_torrents,
    ))
}

/// Runs the replay command.
pub fn run(
    inputs: &[PathBuf],
    include_torrents: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = OutputFormat::parse(format)?;
    let result = replay(inputs, include_torrents)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_text(&result),
    }
    Ok(())
}

fn print_text(result: &ReplayResult) {
    println!("Messages:    {} ({} full)", result.messages, result.full_updates);
    println!("Rid:         {}", result.rid);
    println!("Torrents:    {}", result.torrent_count);
    println!("Tags:        {}", result.tags.join(", "));
    println!("Categories:");
    for category in &result.categories {
        println!("  {:<16} {}", category.name, category.save_path);
    }

    let state = &result.server_state;
    println!("Server:");
    println!("  connection   {}", state.connection_status);
    println!("  download     {} B/s", state.dl_info_speed);
    println!("  upload       {} B/s", state.up_info_speed);
    println!("  ratio        {}", state.global_ratio);
    println!("  dht nodes    {}", state.dht_nodes);

    if let Some(torrents) = &result.torrents {
        println!("Torrents:");
        for torrent in torrents {
            println!(
                "  {} {:<12} {:>6.1}% {}",
                torrent.hash,
                torrent.state,
                torrent.progress * 100.0,
                torrent.name
            );
        }
    }
}
