//! The `sync/maindata` envelope.

use crate::category::Category;
use crate::error::{ModelError, ModelResult};
use crate::server_state::DeltaServerState;
use crate::torrent::DeltaTorrentInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One message from the remote's `sync/maindata` endpoint.
///
/// A message is either a full snapshot (`full_update` set) or a delta
/// against the message identified by the rid the client sent. Collections
/// the remote leaves out decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainData {
    /// Response id of this message.
    pub rid: i64,
    /// Whether this message replaces the mirrored state.
    pub full_update: bool,
    /// Upserted torrents, keyed by hash.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub torrents: HashMap<String, DeltaTorrentInfo>,
    /// Hashes of removed torrents.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub torrents_removed: Vec<String>,
    /// Upserted categories, keyed by name.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub categories: HashMap<String, Category>,
    /// Names of removed categories.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories_removed: Vec<String>,
    /// Added tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Removed tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags_removed: Vec<String>,
    /// Changed server state fields.
    pub server_state: DeltaServerState,
}

impl MainData {
    /// Creates an empty full-update message.
    pub fn full(rid: i64) -> Self {
        Self {
            rid,
            full_update: true,
            ..Self::default()
        }
    }

    /// Creates an empty incremental message.
    pub fn incremental(rid: i64) -> Self {
        Self {
            rid,
            full_update: false,
            ..Self::default()
        }
    }

    /// Adds a torrent upsert.
    pub fn with_torrent(mut self, hash: impl Into<String>, delta: DeltaTorrentInfo) -> Self {
        self.torrents.insert(hash.into(), delta);
        self
    }

    /// Adds a torrent removal.
    pub fn with_removed_torrent(mut self, hash: impl Into<String>) -> Self {
        self.torrents_removed.push(hash.into());
        self
    }

    /// Adds a category upsert.
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category.name.clone(), category);
        self
    }

    /// Adds a category removal.
    pub fn with_removed_category(mut self, name: impl Into<String>) -> Self {
        self.categories_removed.push(name.into());
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a tag removal.
    pub fn with_removed_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags_removed.push(tag.into());
        self
    }

    /// Sets the server state delta.
    pub fn with_server_state(mut self, server_state: DeltaServerState) -> Self {
        self.server_state = server_state;
        self
    }

    /// Returns true if the message changes nothing besides the rid.
    pub fn is_noop(&self) -> bool {
        !self.full_update
            && self.torrents.is_empty()
            && self.torrents_removed.is_empty()
            && self.categories.is_empty()
            && self.categories_removed.is_empty()
            && self.tags.is_empty()
            && self.tags_removed.is_empty()
            && self.server_state.is_empty()
    }

    /// Decodes a message from the remote's JSON body.
    pub fn from_json(bytes: &[u8]) -> ModelResult<Self> {
        let data: Self = serde_json::from_slice(bytes)?;
        if data.rid < 0 {
            return Err(ModelError::invalid_structure(format!(
                "negative rid {}",
                data.rid
            )));
        }
        Ok(data)
    }

    /// Encodes the message as JSON.
    pub fn to_json(&self) -> ModelResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ModelError::Encode {
            message: e.to_string(),
        })
    }
}
