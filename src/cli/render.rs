//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::output::generate_output_path;

use super::{generate_params, open_engine, report_warnings, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the render command
#[allow(clippy::too_many_arguments)]
pub fn run_render(
    config: Option<&Path>,
    key: &str,
    output: Option<&Path>,
    scale: u8,
    color: Option<&str>,
    features: Option<&str>,
    seed: Option<u64>,
    strict: bool,
) -> ExitCode {
    let params = match generate_params(color, features) {
        Ok(params) => params,
        Err(code) => return code,
    };
    let mut engine = match open_engine(config, seed) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let resolved = match engine.get_or_create(key, &params) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    report_warnings(&mut engine);

    if strict && resolved.is_degraded() {
        eprintln!("Error: '{}' could not be generated (would be served by '{}')", key, resolved.key);
        return ExitCode::from(EXIT_ERROR);
    }

    let name = if key.trim().is_empty() { resolved.key.as_str() } else { key.trim() };
    let output_path = generate_output_path(name, output, true);
    match engine.host().export_png(&resolved.key, &output_path, scale) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("Error: No texture registered under '{}'", resolved.key);
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    println!("Saved: {}", output_path.display());
    ExitCode::from(EXIT_SUCCESS)
}
