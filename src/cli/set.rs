//! Set command: a character's animation sheets, plus an optional preview grid

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::engine::AnimationSet;
use crate::host::MemoryHost;
use crate::key::{Action, Direction};
use crate::output::{generate_output_path, save_png, scale_image};
use crate::registry::{EntryKind, Registry};
use crate::spritesheet::render_contact_sheet;

use super::{generate_params, open_engine, report_warnings, EXIT_ERROR, EXIT_SUCCESS};

/// Gap between sheets in the preview grid
const PREVIEW_PADDING: u32 = 2;

/// Execute the set command
#[allow(clippy::too_many_arguments)]
pub fn run_set(
    config: Option<&Path>,
    base_key: &str,
    actions: &[Action],
    directions: &[Direction],
    output: Option<&Path>,
    color: Option<&str>,
    features: Option<&str>,
    seed: Option<u64>,
    scale: u8,
    preview: bool,
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

    let set = match engine.create_character_animation_set(
        base_key,
        params.color,
        actions,
        directions,
        &params.features,
    ) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    report_warnings(&mut engine);

    if strict {
        let degraded: Vec<&String> = set
            .values()
            .flat_map(|by_direction| by_direction.values())
            .filter(|key| engine.registry().get(key).map(|e| e.kind) != Some(EntryKind::Sheet))
            .collect();
        if let Some(first) = degraded.first() {
            eprintln!("Error: {} sheet(s) degraded, first served by '{}'", degraded.len(), first);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let dir = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Error: Cannot create output directory '{}': {}", dir.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    for key in set.values().flat_map(|by_direction| by_direction.values()) {
        let output_path = generate_output_path(key, Some(dir.as_path()), false);
        match engine.host().export_png(key, &output_path, scale) {
            Ok(true) => println!("Saved: {}", output_path.display()),
            Ok(false) => {
                eprintln!("Error: No texture registered under '{}'", key);
                return ExitCode::from(EXIT_ERROR);
            }
            Err(e) => {
                eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    if preview {
        let sheet = preview_sheet(engine.host(), &set);
        let output_path = dir.join(format!("{}_preview.png", base_key.trim()));
        if let Err(e) = save_png(&scale_image(sheet, scale), &output_path) {
            eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Saved: {}", output_path.display());
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// One row per action, one column per direction.
fn preview_sheet(host: &MemoryHost, set: &AnimationSet) -> image::RgbaImage {
    let mut directions: Vec<Direction> = set.values().flat_map(|d| d.keys().copied()).collect();
    directions.sort();
    directions.dedup();

    let columns = &directions;
    let cells: Vec<Option<&image::RgbaImage>> = set
        .values()
        .flat_map(move |by_direction| {
            columns
                .iter()
                .map(move |direction| by_direction.get(direction).and_then(|key| host.texture(key)))
        })
        .collect();
    render_contact_sheet(&cells, directions.len() as u32, PREVIEW_PADDING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AssetEngine;
    use crate::features::FeatureOverrides;

    #[test]
    fn test_preview_grid_shape() {
        let mut engine = AssetEngine::with_defaults(MemoryHost::new());
        let set = engine
            .create_character_animation_set(
                "npc_guard",
                None,
                &[Action::Idle, Action::Hurt],
                &[Direction::Down, Direction::Left, Direction::Up],
                &FeatureOverrides::default(),
            )
            .unwrap();

        let sheet = preview_sheet(engine.host(), &set);
        // Widest strip is idle: 4 frames of 32px
        assert_eq!(sheet.width(), 3 * 128 + 2 * PREVIEW_PADDING);
        assert_eq!(sheet.height(), 2 * 32 + PREVIEW_PADDING);
    }
}
