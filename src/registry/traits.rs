//! Common trait for registries keyed by asset name.

/// Common trait for registries that map asset keys to metadata.
///
/// # Type Parameters
///
/// * `V` - The metadata type stored per key
///
/// # Example
///
/// ```
/// use mockart::registry::{AssetRegistry, EntryKind, Registry, RegistryEntry};
///
/// let mut registry = AssetRegistry::new();
/// registry.record(RegistryEntry::new("tile_grass", EntryKind::Tile, 32, 32));
///
/// assert!(registry.has("tile_grass"));
/// assert_eq!(registry.len(), 1);
/// ```
pub trait Registry<V> {
    /// Check whether metadata exists for `key`.
    fn has(&self, key: &str) -> bool;

    /// Get the metadata for `key`.
    ///
    /// Returns `None` if nothing was recorded under it.
    fn get(&self, key: &str) -> Option<&V>;

    /// Get the number of recorded keys.
    fn len(&self) -> usize;

    /// Check if the registry is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every entry.
    fn clear(&mut self);

    /// Get an iterator over all recorded keys.
    fn names(&self) -> Box<dyn Iterator<Item = &String> + '_>;
}
