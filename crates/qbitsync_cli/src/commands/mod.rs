//! CLI command implementations.

pub mod inspect;
pub mod replay;

use qbitsync_model::MainData;
use std::path::{Path, PathBuf};

/// Output formats shared by the commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a `--format` value.
    pub fn parse(format: &str) -> Result<Self, Box<dyn std::error::Error>> {
        match format {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown output format: {other} (expected text or json)").into()),
        }
    }
}

/// Reads and decodes one captured message.
pub fn read_message(path: &Path) -> Result<MainData, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
    let message =
        MainData::from_json(&bytes).map_err(|e| format!("Failed to decode {:?}: {}", path, e))?;
    Ok(message)
}

/// Expands directories into their `.json` files, sorted by name.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .collect();
            entries.sort();
            files.extend(entries);
        } else if input.exists() {
            files.push(input.clone());
        } else {
            return Err(format!("No such file or directory: {:?}", input).into());
        }
    }
    Ok(files)
}
