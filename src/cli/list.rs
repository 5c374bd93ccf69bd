//! List command: synthesize keys and print the registry

use std::path::Path;
use std::process::ExitCode;

use regex::Regex;

use crate::engine::GenerateParams;
use crate::registry::{EntrySource, RegistryEntry};

use super::{open_engine, report_warnings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the list command
pub fn run_list(config: Option<&Path>, keys: &[String], pattern: Option<&str>, json: bool) -> ExitCode {
    let pattern = match pattern.map(Regex::new).transpose() {
        Ok(pattern) => pattern,
        Err(e) => {
            eprintln!("Error: Invalid --pattern: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let mut engine = match open_engine(config, None) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let params = GenerateParams::default();
    for key in keys {
        if let Err(e) = engine.get_or_create(key, &params) {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    }
    report_warnings(&mut engine);

    let registry = engine.registry();
    let entries = match &pattern {
        Some(pattern) => registry.keys_matching(pattern),
        None => registry.entries(),
    };

    if json {
        match serde_json::to_string_pretty(&entries) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: Failed to serialize registry: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for entry in entries {
            println!("{}", format_entry(entry));
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

fn format_entry(entry: &RegistryEntry) -> String {
    let kind = format!("{:?}", entry.kind).to_lowercase();
    let mut line = format!("{:<40} {:<9} {}x{}", entry.key, kind, entry.width, entry.height);
    if let Some(frames) = entry.meta.frames {
        line.push_str(&format!(" ({} frames)", frames));
    }
    match &entry.meta.source {
        EntrySource::Generated => {}
        EntrySource::Fallback { served } => line.push_str(&format!(" -> {}", served)),
        EntrySource::Emergency { requested } => line.push_str(&format!(" (for {})", requested)),
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EntryKind, EntryMeta};

    #[test]
    fn test_format_entry() {
        let entry = RegistryEntry::new("tile_grass", EntryKind::Tile, 32, 32);
        let line = format_entry(&entry);
        assert!(line.starts_with("tile_grass"));
        assert!(line.contains("tile"));
        assert!(line.ends_with("32x32"));
    }

    #[test]
    fn test_format_alias_entry() {
        let entry = RegistryEntry::new("tile_moonrock", EntryKind::Fallback, 32, 32).with_meta(EntryMeta {
            source: EntrySource::Fallback { served: "tile_grass".to_string() },
            ..Default::default()
        });
        assert!(format_entry(&entry).ends_with("-> tile_grass"));
    }
}
