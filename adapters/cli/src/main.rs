#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Spire Siege headless and reports the outcome.

use std::{fs, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use spire_siege_core::{ContentTables, GameConfig};
use spire_siege_system_simulation::FixedStepDriver;
use spire_siege_world::{query, World};
use tracing_subscriber::EnvFilter;

/// Wall-clock length of one simulated frame.
const FRAME: Duration = Duration::from_millis(16);
/// Seconds a visual effect stays around before being pruned.
const VISUAL_LIFETIME: f64 = 2.0;
/// Log entries included in the summary.
const SUMMARY_LOG_ENTRIES: usize = 8;

/// Runs a headless Spire Siege session.
#[derive(Debug, Parser)]
#[command(name = "spire-siege", version, about, long_about = None)]
struct Cli {
    /// Simulated seconds to run before reporting.
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,
    /// Seed for deck shuffles and AI choices; overrides the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with tuning overrides.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// TOML file with card, entity and wave tables.
    #[arg(long, value_name = "FILE")]
    content: Option<PathBuf>,
    /// Disables the automatic card player.
    #[arg(long)]
    no_ai: bool,
    /// Disables automatic wave restarts.
    #[arg(long)]
    no_auto_continue: bool,
    /// Prints the summary as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                GameConfig::from_toml_str(&contents)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => GameConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.rng_seed = seed;
        }
        if self.no_ai {
            config.ai.enabled = false;
        }
        if self.no_auto_continue {
            config.auto_continue.enabled = false;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn content_tables(&self) -> Result<ContentTables> {
        match &self.content {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read content {}", path.display()))?;
                ContentTables::from_toml_str(&contents)
                    .with_context(|| format!("invalid content {}", path.display()))
            }
            None => Ok(ContentTables::builtin()),
        }
    }

    fn frames(&self) -> u64 {
        if self.seconds <= 0.0 {
            return 0;
        }
        (self.seconds / FRAME.as_secs_f64()).ceil() as u64
    }
}

/// Entry point for the Spire Siege command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.game_config()?;
    let content = cli.content_tables()?;
    tracing::info!(seed = config.rng_seed, seconds = cli.seconds, "starting run");

    let mut world = World::new(config, Arc::new(content));
    world.set_running(true);
    let mut driver = FixedStepDriver::default();

    for _ in 0..cli.frames() {
        let _ = driver
            .advance(&mut world, FRAME)
            .context("simulation failed")?;
        world.prune_visual_effects(VISUAL_LIFETIME);
        if !world.is_running {
            break;
        }
    }

    let summary = query::summary(&world, SUMMARY_LOG_ENTRIES);
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to encode summary")?
        );
        return Ok(());
    }

    println!(
        "floor {} wave {}/{} ({:?})",
        summary.floor, summary.wave, summary.total_waves, summary.phase
    );
    println!("tower {:.0}/{:.0}", summary.tower_hp, summary.tower_max_hp);
    println!(
        "gold {} essence {:.0} mana {:.1}",
        summary.gold, summary.essence, summary.mana
    );
    println!(
        "{} ticks, {:.2}s simulated{}",
        summary.tick_count,
        summary.time,
        if summary.is_running { "" } else { ", stopped" }
    );
    for entry in &summary.recent_log {
        println!("[{:>7.2}] {:?}: {}", entry.time, entry.kind, entry.message);
    }
    Ok(())
}
