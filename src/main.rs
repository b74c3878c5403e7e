//! Lane Rash entry point
//!
//! Runs a headless match between the autopilot and the searching adversary
//! and prints the final summary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use lane_rash::ai::StyleProfile;
use lane_rash::{Session, Settings, autopilot};

#[derive(Parser)]
#[command(name = "lane-rash")]
#[command(about = "Headless lane racing against an alpha-beta opponent", version)]
struct Cli {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Opponent style: aggressive, balanced or random
    #[arg(short, long)]
    style: Option<StyleProfile>,

    /// World seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write the effective settings to this file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(style) = cli.style {
        settings.style = style;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    if cli.max_ticks.is_some() {
        settings.max_ticks = cli.max_ticks;
    }

    if let Some(path) = &cli.save_config {
        settings
            .save(path)
            .with_context(|| format!("saving settings to {}", path.display()))?;
        return Ok(());
    }

    let seed = settings.seed_or_random();
    log::info!("Lane Rash starting (seed {seed}, style {})", settings.style);

    let mut session = Session::new(seed, settings.style);
    let summary = session.run(settings.max_ticks, autopilot);

    println!("seed={seed} style={}", settings.style);
    println!("{summary}");
    if !session.is_over() {
        println!("(stopped before the match finished)");
    }
    Ok(())
}
