//! Registry of generated assets.
//!
//! This module provides:
//! - A `Registry` trait for key → metadata tables
//! - `AssetRegistry`, the engine's record of every texture it registered
//!   with the host, what it depicts and whether it is a stand-in

mod asset;
mod traits;

pub use asset::{AssetRegistry, EntryKind, EntryMeta, EntrySource, RegistryEntry};
pub use traits::Registry;
