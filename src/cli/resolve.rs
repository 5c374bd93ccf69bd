//! Resolve command: show what a key would be drawn as

use std::path::Path;
use std::process::ExitCode;

use super::{generate_params, open_engine, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the resolve command
pub fn run_resolve(config: Option<&Path>, key: &str, color: Option<&str>, features: Option<&str>) -> ExitCode {
    let params = match generate_params(color, features) {
        Ok(params) => params,
        Err(code) => return code,
    };
    let engine = match open_engine(config, None) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let spec = engine.resolve_with(key, &params);
    match serde_json::to_string_pretty(&spec) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to serialize '{}': {}", key, e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
