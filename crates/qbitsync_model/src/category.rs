//! Torrent categories.

use serde::{Deserialize, Serialize};

/// A torrent category.
///
/// Categories always arrive whole, never as partial updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    /// Category name.
    pub name: String,
    /// Default save path for torrents in this category.
    #[serde(rename = "savePath")]
    pub save_path: String,
}

impl Category {
    /// Creates a new category.
    pub fn new(name: impl Into<String>, save_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            save_path: save_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_save_path() {
        let category: Category =
            serde_json::from_str(r#"{"name":"linux","savePath":"/data/linux"}"#).unwrap();
        assert_eq!(category, Category::new("linux", "/data/linux"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let category: Category = serde_json::from_str(r#"{"name":"movies"}"#).unwrap();
        assert_eq!(category.save_path, "");
    }
}
