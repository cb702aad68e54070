//! Inspect command implementation.

use super::{read_message, OutputFormat};
use qbitsync_model::MainData;
use serde::Serialize;
use std::path::Path;

/// Summary of a single message.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Message path.
    pub path: String,
    /// Response id.
    pub rid: i64,
    /// Whether the message is a full snapshot.
    pub full_update: bool,
    /// Number of upserted torrents.
    pub torrents: usize,
    /// Number of removed torrents.
    pub torrents_removed: usize,
    /// Number of upserted categories.
    pub categories: usize,
    /// Number of removed categories.
    pub categories_removed: usize,
    /// Added tags.
    pub tags: Vec<String>,
    /// Removed tags.
    pub tags_removed: Vec<String>,
    /// Whether the message carries server state fields.
    pub has_server_state: bool,
}

impl InspectResult {
    fn new(path: &Path, message: &MainData) -> Self {
        Self {
            path: path.display().to_string(),
            rid: message.rid,
            full_update: message.full_update,
            torrents: message.torrents.len(),
            torrents_removed: message.torrents_removed.len(),
            categories: message.categories.len(),
            categories_removed: message.categories_removed.len(),
            tags: message.tags.clone(),
            tags_removed: message.tags_removed.clone(),
            has_server_state: !message.server_state.is_empty(),
        }
    }
}

/// Reads a message and summarizes it.
pub fn inspect(path: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let message = read_message(path)?;
    Ok(InspectResult::new(path, &message))
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let format = OutputFormat::parse(format)?;
    let result = inspect(path)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => {
            println!("Message:        {}", result.path);
            println!("Rid:            {}", result.rid);
            println!(
                "Kind:           {}",
                if result.full_update { "full" } else { "incremental" }
            );
            println!(
                "Torrents:       {} upserted, {} removed",
                result.torrents, result.torrents_removed
            );
            println!(
                "Categories:     {} upserted, {} removed",
                result.categories, result.categories_removed
            );
            println!(
                "Tags:           +[{}] -[{}]",
                result.tags.join(", "),
                result.tags_removed.join(", ")
            );
            let server_state = if result.has_server_state {
                "changed"
            } else {
                "unchanged"
            };
            println!("Server state:   {}", server_state);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbitsync_testkit::FixtureDir;

    #[test]
    fn inspect_full_snapshot() {
        let fixtures = FixtureDir::session();
        let result = inspect(&fixtures.paths()[0]).unwrap();
        assert_eq!(result.rid, 1);
        assert!(result.full_update);
        assert_eq!(result.torrents, 2);
        assert_eq!(result.categories, 1);
        assert!(result.has_server_state);
    }

    #[test]
    fn inspect_membership_delta() {
        let fixtures = FixtureDir::session();
        let result = inspect(&fixtures.paths()[2]).unwrap();
        assert!(!result.full_update);
        assert_eq!(result.torrents, 1);
        assert_eq!(result.torrents_removed, 1);
        assert_eq!(result.tags, vec!["new".to_string()]);
        assert_eq!(result.tags_removed, vec!["iso".to_string()]);
        assert!(!result.has_server_state);
    }
}
