//! The fallback ladder walked when a key fails to generate.
//!
//! A ladder is the requested key, then its archetype's default key, then the
//! emergency asset. The last rung is a separate field so every ladder has one.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::features::FeatureOverrides;
use crate::resolver::{DrawSpec, Resolver, MAX_FRAME_SIZE};
use crate::surface::{Layer, Paint, Surface};

/// One generated rung: the texture key to fill and what to draw under it.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub key: String,
    pub spec: DrawSpec,
}

/// Parameters of the terminal flat-colour asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencySpec {
    pub category: String,
    pub width: u32,
    pub height: u32,
    pub color: u32,
}

impl EmergencySpec {
    /// Size is clamped to `1..=MAX_FRAME_SIZE` per side.
    pub fn new(category: &str, width: u32, height: u32, color: u32) -> Self {
        Self {
            category: sanitize_category(category),
            width: width.clamp(1, MAX_FRAME_SIZE),
            height: height.clamp(1, MAX_FRAME_SIZE),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackLadder {
    attempts: Vec<Attempt>,
    terminal: EmergencySpec,
}

impl FallbackLadder {
    /// Ladder for `requested`, whose resolved spec is `spec`.
    ///
    /// The category default is resolved without caller colour or feature
    /// overrides, and skipped when it is the requested key itself.
    pub fn build(requested: &str, spec: DrawSpec, resolver: &Resolver, terminal: EmergencySpec) -> Self {
        let default_key = spec.archetype.default_key();
        let mut attempts = vec![Attempt { key: requested.to_string(), spec }];
        if default_key != requested {
            attempts.push(Attempt {
                key: default_key.to_string(),
                spec: resolver.resolve_str(default_key, None, &FeatureOverrides::default()),
            });
        }
        Self { attempts, terminal }
    }

    /// Generated rungs, most specific first.
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn terminal(&self) -> &EmergencySpec {
        &self.terminal
    }

    /// Total rungs including the emergency asset.
    pub fn len(&self) -> usize {
        self.attempts.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn into_parts(self) -> (Vec<Attempt>, EmergencySpec) {
        (self.attempts, self.terminal)
    }
}

/// `emergency_<category>_<unix-nanos>_<sequence>`
pub fn emergency_key(category: &str, sequence: u64) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("emergency_{}_{}_{}", sanitize_category(category), nanos, sequence)
}

/// The single unconditional fill of the emergency asset.
pub fn draw_emergency(surface: &mut dyn Surface, spec: &EmergencySpec) {
    surface.set_layer(Layer::Emergency);
    surface.fill_rect(0.0, 0.0, spec.width as f32, spec.height as f32, Paint::solid(spec.color));
}

fn sanitize_category(category: &str) -> String {
    let clean: String = category
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if clean.is_empty() {
        "generic".to_string()
    } else {
        clean
    }
}
