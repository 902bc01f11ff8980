#![deny(clippy::all, clippy::pedantic)]
//! # Cubeworld Runtime
//!
//! Loads a scene file and drives the physics engine frame by frame, either
//! with a fixed timestep as fast as possible or in real time with the
//! timestep measured from the wall clock. Pass `--watch` to reload the scene
//! whenever the file changes on disk.

mod app;
mod input;
mod watcher;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cubeworld", about = "Run a cubeworld scene")]
struct Cli {
    /// Scene description (JSON)
    #[arg(long)]
    scene: PathBuf,

    /// Stop after this many frames. Headless runs default to 600.
    #[arg(long)]
    frames: Option<u64>,

    /// Fixed timestep in seconds, ignored with `--realtime`
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Measure each frame's timestep from the wall clock
    #[arg(long)]
    realtime: bool,

    /// Reload the scene when the file changes
    #[arg(long)]
    watch: bool,

    /// Log body positions and contacts every N frames (0 disables)
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let frames = match (cli.frames, cli.realtime) {
        (Some(n), _) => Some(n),
        (None, false) => Some(app::DEFAULT_HEADLESS_FRAMES),
        (None, true) => None,
    };
    let clock = if cli.realtime {
        app::Clock::RealTime
    } else {
        app::Clock::Fixed(cli.dt)
    };

    app::run(&app::Options {
        scene: cli.scene,
        frames,
        clock,
        watch: cli.watch,
        report_every: cli.report_every,
    })
}
