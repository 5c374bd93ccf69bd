//! Error and warning types for asset synthesis

use thiserror::Error;

/// A warning recorded while serving a request in lenient mode
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Failure inside the resolve/draw/commit chain for one key.
///
/// These never reach callers of the synthesis API; the engine turns each of
/// them into a descent of the fallback ladder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// Geometry that cannot be drawn (zero-sized canvas, non-finite values)
    #[error("invalid geometry for '{key}': {reason}")]
    InvalidGeometry { key: String, reason: String },
    /// A tile, item or UI element name no drawer knows
    #[error("unknown {family} pattern '{name}'")]
    UnknownPattern { family: &'static str, name: String },
    /// Drawer received a spec for a different archetype
    #[error("drawer for {expected} received a {found} variant")]
    VariantMismatch { expected: &'static str, found: String },
    /// No drawer registered for an archetype
    #[error("no drawer registered for archetype {0}")]
    MissingDrawer(String),
    /// The key is already being generated further up the call chain
    #[error("cyclic request for '{0}' while it is being generated")]
    CyclicKey(String),
    /// Free-form failure reported by a custom drawer
    #[error("drawer failed: {0}")]
    Drawer(String),
}

/// The rendering surface is missing or has been torn down.
///
/// This is the only failure the synthesis API reports: without a surface
/// there is nothing to degrade onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("texture host is unavailable")]
pub struct HostUnavailable;
