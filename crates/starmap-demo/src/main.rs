//! Headless star map demo.
//!
//! Loads a galaxy from a JSON snapshot list (or generates a grid of fresh
//! stars), syncs every star into a recording scene, optionally routes a click
//! through hit testing, and writes the resulting snapshots back out.
//!
//! Run with: `cargo run -p starmap-demo -- --count 9 --click 64,0`

mod galaxy;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use starmap_config::{CliArgs, Config, ConfigError, default_config_dir};
use starmap_star::{CreateError, PointerButton, SnapshotError, StarSnapshot, UnknownShape};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::galaxy::StarMap;

#[derive(Parser, Debug)]
#[command(name = "starmap-demo", about = "Headless star map demo")]
struct DemoArgs {
    #[command(flatten)]
    common: CliArgs,

    /// JSON file holding an array of star snapshots.
    #[arg(long)]
    galaxy: Option<PathBuf>,

    /// Number of fresh stars to generate when no galaxy is given.
    #[arg(long, default_value_t = 16)]
    count: usize,

    /// World position of a primary click, as `x,y`.
    #[arg(long, value_parser = parse_point)]
    click: Option<Vec2>,

    /// Where to write the snapshot list. Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum DemoError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("galaxy config: {0}")]
    Shape(#[from] UnknownShape),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Create(#[from] CreateError),
}

fn parse_point(raw: &str) -> Result<Vec2, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {raw:?}"))?;
    let x = x.trim().parse::<f32>().map_err(|e| format!("x: {e}"))?;
    let y = y.trim().parse::<f32>().map_err(|e| format!("y: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn load_config(args: &CliArgs) -> Result<(Config, PathBuf), DemoError> {
    let dir = match &args.config {
        Some(dir) => dir.clone(),
        None => default_config_dir()?,
    };
    let mut config = Config::load_or_create(&dir)?;
    config.apply_cli_overrides(args);
    Ok((config, dir))
}

fn run(args: DemoArgs, config: &Config) -> Result<(), DemoError> {
    let mut map = StarMap::new(config)?;

    match &args.galaxy {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| DemoError::Read {
                path: path.clone(),
                source,
            })?;
            let snapshots = StarSnapshot::list_from_json(&json)?;
            map.load(&snapshots)?;
            info!(stars = snapshots.len(), path = %path.display(), "galaxy loaded");
        }
        None => {
            map.generate(args.count)?;
            info!(stars = args.count, "galaxy generated");
        }
    }

    for star in map.stars() {
        info!(star = %star.id(), facets = ?star.visible_facets(), "synced");
    }

    if let Some(point) = args.click {
        map.pointer_moved(point);
        match map.pointer_up(point, PointerButton::Primary) {
            Some(id) => info!(star = %id, selected = ?map.selected(), "click handled"),
            None => warn!(x = point.x, y = point.y, "click missed every star"),
        }
    }

    let json = serde_json::to_string_pretty(&map.snapshots()).map_err(SnapshotError::from)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, json).map_err(|source| DemoError::Write {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "snapshots written");
        }
        None => println!("{json}"),
    }

    let stats = map.scene().stats();
    info!(
        nodes = map.scene().node_count(),
        inserted = stats.inserted,
        removed = stats.removed,
        destroyed = stats.destroyed,
        "scene summary"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = DemoArgs::parse();

    let (config, config_dir) = match load_config(&args.common) {
        Ok(loaded) => loaded,
        Err(err) => {
            // Logging is not up yet.
            eprintln!("starmap-demo: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = starmap_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    ) {
        eprintln!("starmap-demo: logging disabled: {err}");
    }
    info!(
        seed = ?config.galaxy.seed,
        sync_mode = ?config.star.sync_mode,
        "starmap demo"
    );

    match run(args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
