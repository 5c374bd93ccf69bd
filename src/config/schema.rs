//! Configuration schema types for `mockart.toml`
//!
//! Defines the structure and validation rules for engine configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::color::{parse_color, MAGENTA};
use crate::resolver::MAX_FRAME_SIZE;

/// Root configuration structure for mockart.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockartConfig {
    /// Engine-wide settings
    #[serde(default)]
    pub engine: EngineSection,
    /// Texture sizes per archetype family
    #[serde(default)]
    pub sizes: SizeConfig,
    /// Base colour overrides, keyed by category or subtype name
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

/// The `[engine]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Pins decorative noise; absent means a fresh seed per draw
    #[serde(default)]
    pub seed: Option<u64>,
    /// Fill colour of emergency assets
    #[serde(default = "default_emergency_color")]
    pub emergency_color: String,
    /// Size of emergency assets as `[width, height]`
    #[serde(default = "default_emergency_size")]
    pub emergency_size: [u32; 2],
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            seed: None,
            emergency_color: default_emergency_color(),
            emergency_size: default_emergency_size(),
        }
    }
}

fn default_emergency_color() -> String {
    "#FF00FF".to_string()
}

fn default_emergency_size() -> [u32; 2] {
    [32, 32]
}

/// The `[sizes]` section, every entry `[width, height]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeConfig {
    #[serde(default = "default_character")]
    pub character: [u32; 2],
    #[serde(default = "default_tile")]
    pub tile: [u32; 2],
    #[serde(default = "default_item")]
    pub item: [u32; 2],
    #[serde(default = "default_panel")]
    pub panel: [u32; 2],
    #[serde(default = "default_button")]
    pub button: [u32; 2],
    #[serde(default = "default_bar")]
    pub bar: [u32; 2],
    #[serde(default = "default_slot")]
    pub slot: [u32; 2],
    #[serde(default = "default_cursor")]
    pub cursor: [u32; 2],
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            character: default_character(),
            tile: default_tile(),
            item: default_item(),
            panel: default_panel(),
            button: default_button(),
            bar: default_bar(),
            slot: default_slot(),
            cursor: default_cursor(),
        }
    }
}

impl SizeConfig {
    fn named(&self) -> [(&'static str, [u32; 2]); 8] {
        [
            ("character", self.character),
            ("tile", self.tile),
            ("item", self.item),
            ("panel", self.panel),
            ("button", self.button),
            ("bar", self.bar),
            ("slot", self.slot),
            ("cursor", self.cursor),
        ]
    }
}

fn default_character() -> [u32; 2] {
    [32, 32]
}

fn default_tile() -> [u32; 2] {
    [32, 32]
}

fn default_item() -> [u32; 2] {
    [24, 24]
}

fn default_panel() -> [u32; 2] {
    [64, 48]
}

fn default_button() -> [u32; 2] {
    [48, 16]
}

fn default_bar() -> [u32; 2] {
    [64, 10]
}

fn default_slot() -> [u32; 2] {
    [24, 24]
}

fn default_cursor() -> [u32; 2] {
    [16, 16]
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "sizes.tile")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mockart.toml: '{}' {}", self.field, self.message)
    }
}

fn size_problem([w, h]: [u32; 2]) -> Option<String> {
    if w == 0 || h == 0 {
        Some(format!("must be non-zero, got [{}, {}]", w, h))
    } else if w > MAX_FRAME_SIZE || h > MAX_FRAME_SIZE {
        Some(format!("must be at most {} per side, got [{}, {}]", MAX_FRAME_SIZE, w, h))
    } else {
        None
    }
}

impl MockartConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if let Err(e) = parse_color(&self.engine.emergency_color) {
            errors.push(ConfigValidationError {
                field: "engine.emergency_color".to_string(),
                message: format!("is not a colour: {}", e),
            });
        }

        if let Some(message) = size_problem(self.engine.emergency_size) {
            errors.push(ConfigValidationError { field: "engine.emergency_size".to_string(), message });
        }

        for (name, size) in self.sizes.named() {
            if let Some(message) = size_problem(size) {
                errors.push(ConfigValidationError { field: format!("sizes.{}", name), message });
            }
        }

        let mut names: Vec<&String> = self.colors.keys().collect();
        names.sort();
        for name in names {
            if let Err(e) = parse_color(&self.colors[name]) {
                errors.push(ConfigValidationError {
                    field: format!("colors.{}", name),
                    message: format!("is not a colour: {}", e),
                });
            }
        }

        errors
    }

    /// Convert into the engine's runtime settings, parsing every colour.
    ///
    /// Call [`validate`](Self::validate) first; unparsable colours here are
    /// reported as a single error list.
    pub fn to_engine_config(&self) -> Result<EngineConfig, Vec<ConfigValidationError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let emergency_color = parse_color(&self.engine.emergency_color).unwrap_or(MAGENTA);
        let colors = self
            .colors
            .iter()
            .filter_map(|(name, value)| {
                parse_color(value).ok().map(|c| (name.to_lowercase(), c))
            })
            .collect();

        Ok(EngineConfig {
            seed: self.engine.seed,
            emergency_color,
            emergency_size: self.engine.emergency_size,
            sizes: self.sizes.clone(),
            colors,
        })
    }
}

/// Runtime settings of one [`AssetEngine`](crate::engine::AssetEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub seed: Option<u64>,
    pub emergency_color: u32,
    pub emergency_size: [u32; 2],
    pub sizes: SizeConfig,
    /// Lower-cased name → packed colour
    pub colors: HashMap<String, u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            emergency_color: MAGENTA,
            emergency_size: default_emergency_size(),
            sizes: SizeConfig::default(),
            colors: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: MockartConfig = toml::from_str("").unwrap();
        assert_eq!(config.engine.emergency_color, "#FF00FF");
        assert_eq!(config.engine.emergency_size, [32, 32]);
        assert_eq!(config.sizes, SizeConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r##"
            [engine]
            seed = 42
            emergency_color = "#808080"

            [sizes]
            character = [48, 48]
            bar = [100, 8]

            [colors]
            skeleton = "#FFFFFF"
            slime = "rebeccapurple"
        "##;
        let config: MockartConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.engine.seed, Some(42));
        assert_eq!(config.sizes.character, [48, 48]);
        assert_eq!(config.sizes.tile, [32, 32]);

        let engine = config.to_engine_config().unwrap();
        assert_eq!(engine.emergency_color, 0x808080);
        assert_eq!(engine.colors.get("skeleton"), Some(&0xFFFFFF));
        assert_eq!(engine.colors.get("slime"), Some(&0x663399));
    }

    #[test]
    fn test_validate_zero_size() {
        let toml = r#"
            [sizes]
            tile = [0, 32]
        "#;
        let config: MockartConfig = toml::from_str(toml).unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "sizes.tile");
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let toml = r##"
            [engine]
            emergency_color = "not-a-colour"
            emergency_size = [0, 0]

            [colors]
            wall = "#GGG"
        "##;
        let config: MockartConfig = toml::from_str(toml).unwrap();
        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["engine.emergency_color", "engine.emergency_size", "colors.wall"]);
        assert!(config.to_engine_config().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_frames() {
        let toml = r#"
            [engine]
            emergency_size = [4096, 4097]

            [sizes]
            character = [1000000000, 32]
            tile = [4096, 4096]
        "#;
        let config: MockartConfig = toml::from_str(toml).unwrap();
        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["engine.emergency_size", "sizes.character"]);
        assert!(errors[1].message.contains("at most 4096"));
    }

    #[test]
    fn test_color_names_lowercased() {
        let mut config = MockartConfig::default();
        config.colors.insert("Zombie".to_string(), "#010203".to_string());
        let engine = config.to_engine_config().unwrap();
        assert_eq!(engine.colors.get("zombie"), Some(&0x010203));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "sizes.item".to_string(),
            message: "must be non-zero".to_string(),
        };
        assert_eq!(err.to_string(), "mockart.toml: 'sizes.item' must be non-zero");
    }
}
