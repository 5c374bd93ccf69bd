//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod list;
mod render;
mod resolve;
mod set;

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::color::parse_color;
use crate::config::load_config;
use crate::engine::{AssetEngine, GenerateParams};
use crate::features::FeatureOverrides;
use crate::host::{MemoryHost, TextureHost};
use crate::key::{Action, Direction};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Mockart - synthesize placeholder art from semantic asset keys
#[derive(Parser)]
#[command(name = "mockart")]
#[command(about = "Mockart - synthesize placeholder sprites, tiles and UI chrome from semantic keys")]
#[command(version)]
pub struct Cli {
    /// Path to mockart.toml (default: search upward from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output: -v for debug, -vv for trace (RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize one key and write it as PNG
    Render {
        /// Asset key, e.g. enemy_skeleton_walk_left_sheet
        key: String,

        /// Output file or directory.
        /// If omitted: {key}.png
        /// If directory (ends with /): dir/{key}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-64, default: 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=64))]
        scale: u8,

        /// Base colour (#RGB, #RRGGBB, 0xRRGGBB or any CSS colour)
        #[arg(long)]
        color: Option<String>,

        /// Feature overrides as JSON, e.g. '{"has_cape": true}'
        #[arg(long)]
        features: Option<String>,

        /// Pin decorative noise for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Strict mode: fail instead of writing a fallback or emergency asset
        #[arg(long)]
        strict: bool,
    },
    /// Build a character's animation sheets for several actions and directions
    Set {
        /// Character key, e.g. npc_knight
        base_key: String,

        /// Actions to build, comma-separated (default: all)
        #[arg(long, value_delimiter = ',')]
        actions: Vec<Action>,

        /// Directions to build, comma-separated (default: all)
        #[arg(long, value_delimiter = ',')]
        directions: Vec<Direction>,

        /// Output directory (default: working directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base colour (#RGB, #RRGGBB, 0xRRGGBB or any CSS colour)
        #[arg(long)]
        color: Option<String>,

        /// Feature overrides as JSON
        #[arg(long)]
        features: Option<String>,

        /// Pin decorative noise for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Scale output by integer factor (1-64, default: 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=64))]
        scale: u8,

        /// Also write {base_key}_preview.png packing every sheet into a grid
        #[arg(long)]
        preview: bool,

        /// Strict mode: fail if any sheet degraded
        #[arg(long)]
        strict: bool,
    },
    /// Print the resolved draw parameters of a key as JSON
    Resolve {
        key: String,

        /// Base colour override
        #[arg(long)]
        color: Option<String>,

        /// Feature overrides as JSON
        #[arg(long)]
        features: Option<String>,
    },
    /// Synthesize keys and print the resulting registry entries
    List {
        /// Keys to synthesize first
        #[arg(required = true)]
        keys: Vec<String>,

        /// Only show entries whose key matches this regular expression
        #[arg(long)]
        pattern: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Render { key, output, scale, color, features, seed, strict } => render::run_render(
            config,
            &key,
            output.as_deref(),
            scale,
            color.as_deref(),
            features.as_deref(),
            seed,
            strict,
        ),
        Commands::Set {
            base_key,
            actions,
            directions,
            output,
            color,
            features,
            seed,
            scale,
            preview,
            strict,
        } => set::run_set(
            config,
            &base_key,
            &actions,
            &directions,
            output.as_deref(),
            color.as_deref(),
            features.as_deref(),
            seed,
            scale,
            preview,
            strict,
        ),
        Commands::Resolve { key, color, features } => {
            resolve::run_resolve(config, &key, color.as_deref(), features.as_deref())
        }
        Commands::List { keys, pattern, json } => list::run_list(config, &keys, pattern.as_deref(), json),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init();
}

/// Engine over an in-memory host, configured from mockart.toml.
pub(crate) fn open_engine(config: Option<&Path>, seed: Option<u64>) -> Result<AssetEngine<MemoryHost>, ExitCode> {
    let mut config = match load_config(config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(AssetEngine::new(MemoryHost::new(), config))
}

/// Build request parameters from `--color` and `--features`.
pub(crate) fn generate_params(color: Option<&str>, features: Option<&str>) -> Result<GenerateParams, ExitCode> {
    let color = match color.map(parse_color).transpose() {
        Ok(color) => color,
        Err(e) => {
            eprintln!("Error: Invalid --color: {}", e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };
    let features = match features {
        Some(json) => match serde_json::from_str::<FeatureOverrides>(json) {
            Ok(features) => features,
            Err(e) => {
                eprintln!("Error: Invalid --features JSON: {}", e);
                return Err(ExitCode::from(EXIT_INVALID_ARGS));
            }
        },
        None => FeatureOverrides::default(),
    };
    Ok(GenerateParams { color, features })
}

/// Print accumulated engine warnings to stderr, returning how many there were.
pub(crate) fn report_warnings<H: TextureHost>(engine: &mut AssetEngine<H>) -> usize {
    let warnings = engine.take_warnings();
    for warning in &warnings {
        eprintln!("Warning: {}", warning.message);
    }
    warnings.len()
}
