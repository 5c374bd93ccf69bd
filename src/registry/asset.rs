//! Asset metadata registry.

use std::collections::HashMap;

use regex::Regex;
use serde::Serialize;

use crate::key::{Action, Direction};
use crate::resolver::Archetype;

use super::traits::Registry;

/// What kind of texture an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Single character frame
    Sprite,
    /// Horizontal strip of animation frames
    Sheet,
    Tile,
    Icon,
    /// UI panel, button, bar...
    Chrome,
    /// Alias for a requested key served by another texture
    Fallback,
    /// Flat-colour terminal placeholder
    Emergency,
}

/// Where the pixels under a key came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntrySource {
    Generated,
    /// The key has no texture of its own; requests are served by `served`
    Fallback { served: String },
    /// Flat-colour texture minted for a failed request
    Emergency { requested: String },
}

/// Descriptive metadata for one registered texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archetype: Option<Archetype>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_width: Option<u32>,
    pub source: EntrySource,
}

impl Default for EntryMeta {
    fn default() -> Self {
        Self {
            archetype: None,
            variant: None,
            action: None,
            direction: None,
            frames: None,
            frame_width: None,
            source: EntrySource::Generated,
        }
    }
}

/// One registered texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub key: String,
    pub kind: EntryKind,
    pub width: u32,
    pub height: u32,
    pub meta: EntryMeta,
}

impl RegistryEntry {
    pub fn new(key: impl Into<String>, kind: EntryKind, width: u32, height: u32) -> Self {
        Self { key: key.into(), kind, width, height, meta: EntryMeta::default() }
    }

    pub fn with_meta(mut self, meta: EntryMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Whether the entry stands in for a different requested key.
    pub fn is_degraded(&self) -> bool {
        !matches!(self.meta.source, EntrySource::Generated)
    }

    /// Texture key that answers requests for this entry's key.
    pub fn served_key(&self) -> &str {
        match &self.meta.source {
            EntrySource::Fallback { served } => served,
            _ => &self.key,
        }
    }
}

/// In-memory key → metadata table for one rendering context.
///
/// Unbounded: entries live until [`Registry::clear`], which must accompany
/// teardown of the host the textures lived in.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Record an entry, replacing any previous one under the same key.
    pub fn record(&mut self, entry: RegistryEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    pub fn remove(&mut self, key: &str) -> Option<RegistryEntry> {
        self.entries.remove(key)
    }

    /// Entries sorted by key.
    pub fn entries(&self) -> Vec<&RegistryEntry> {
        let mut entries: Vec<&RegistryEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// Entries whose key matches `pattern`, sorted by key.
    pub fn keys_matching(&self, pattern: &Regex) -> Vec<&RegistryEntry> {
        self.entries().into_iter().filter(|e| pattern.is_match(&e.key)).collect()
    }
}

impl Registry<RegistryEntry> for AssetRegistry {
    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn names(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        Box::new(self.entries.keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let mut registry = AssetRegistry::new();
        assert!(!registry.has("tile_grass"));
        registry.record(RegistryEntry::new("tile_grass", EntryKind::Tile, 32, 32));
        assert!(registry.has("tile_grass"));
        assert_eq!(registry.get("tile_grass").map(|e| e.width), Some(32));
        assert!(registry.get("tile_dirt").is_none());
    }

    #[test]
    fn test_record_replaces() {
        let mut registry = AssetRegistry::new();
        registry.record(RegistryEntry::new("a_b", EntryKind::Sprite, 32, 32));
        registry.record(RegistryEntry::new("a_b", EntryKind::Sheet, 128, 32));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a_b").map(|e| e.kind), Some(EntryKind::Sheet));
    }

    #[test]
    fn test_clear() {
        let mut registry = AssetRegistry::new();
        registry.record(RegistryEntry::new("a_b", EntryKind::Sprite, 1, 1));
        registry.record(RegistryEntry::new("c_d", EntryKind::Sprite, 1, 1));
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.has("a_b"));
    }

    #[test]
    fn test_keys_matching() {
        let mut registry = AssetRegistry::new();
        for key in ["enemy_slime", "enemy_ghost", "tile_grass"] {
            registry.record(RegistryEntry::new(key, EntryKind::Sprite, 1, 1));
        }
        let pattern = Regex::new("^enemy_").unwrap();
        let keys: Vec<&str> = registry.keys_matching(&pattern).iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["enemy_ghost", "enemy_slime"]);
    }

    #[test]
    fn test_degraded_entries() {
        let entry = RegistryEntry::new("tile_moonrock", EntryKind::Fallback, 32, 32).with_meta(EntryMeta {
            source: EntrySource::Fallback { served: "tile_grass".to_string() },
            ..Default::default()
        });
        assert!(entry.is_degraded());
        assert_eq!(entry.served_key(), "tile_grass");

        let plain = RegistryEntry::new("x_y", EntryKind::Tile, 1, 1);
        assert!(!plain.is_degraded());
        assert_eq!(plain.served_key(), "x_y");
    }

    #[test]
    fn test_entry_serializes() {
        let entry = RegistryEntry::new("enemy_skeleton_walk_left_sheet", EntryKind::Sheet, 128, 32)
            .with_meta(EntryMeta {
                archetype: Some(Archetype::Humanoid),
                action: Some(Action::Walk),
                direction: Some(Direction::Left),
                frames: Some(4),
                frame_width: Some(32),
                ..Default::default()
            });
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "sheet");
        assert_eq!(json["meta"]["archetype"], "humanoid");
        assert_eq!(json["meta"]["frames"], 4);
        assert_eq!(json["meta"]["source"]["type"], "generated");
    }
}
