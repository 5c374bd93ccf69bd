//! Configuration loading and discovery for `mockart.toml`

use super::schema::{EngineConfig, MockartConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery.
pub const CONFIG_FILE: &str = "mockart.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse mockart.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Find mockart.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find mockart.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a mockart.toml file.
///
/// If a path is provided, loads from that file. Otherwise uses `find_config()`;
/// when nothing is found the defaults apply.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let engine = AssetEngine::new(MemoryHost::new(), config);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<EngineConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate mockart.toml contents.
pub fn parse_config(contents: &str) -> Result<EngineConfig, ConfigError> {
    let config: MockartConfig = toml::from_str(contents)?;
    config
        .to_engine_config()
        .map_err(|errors| ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
}
