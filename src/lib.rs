//! Mockart - on-demand placeholder art for games in development
//!
//! This library provides functionality to:
//! - Parse semantic asset keys (`enemy_skeleton_walk_left_sheet`) and resolve
//!   them to draw parameters
//! - Draw directional, posed placeholder sprites, tiles, items and UI chrome
//! - Cache results in a texture host and always return a drawable key,
//!   degrading to category defaults and flat-colour emergency assets

pub mod cli;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod features;
pub mod host;
pub mod key;
pub mod noise;
pub mod output;
pub mod pose;
pub mod primitives;
pub mod registry;
pub mod resolver;
pub mod rigs;
pub mod shapes;
pub mod spritesheet;
pub mod surface;

pub use engine::{AnimationSet, AssetEngine, GenerateParams, Outcome, ResolvedKey};
pub use error::{GenerationError, HostUnavailable, Warning};
pub use host::{MemoryHost, RecordingHost, TextureHost};
pub use key::{Action, AssetKey, Direction};
