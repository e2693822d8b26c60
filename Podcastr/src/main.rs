mod cli;
mod logs;
mod surface;

use std::io;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use podconfig::Config;
use podplayer::{PlayerHandle, PlayerState};
use podsource::{EpisodeListing, EpisodeSource, JsonFeedSource};
use tracing::{debug, info};

use crate::surface::Surface;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // ========== PHASE 1 : Configuration ==========
    let config_dir = cli
        .config_dir
        .as_ref()
        .map(|dir| dir.to_string_lossy().to_string())
        .unwrap_or_default();
    let config = Config::load_config(&config_dir).context("Failed to load configuration")?;
    logs::init_logging(&config).context("Failed to initialize logging")?;
    info!(config_dir = %config.directory(), "⚙️ Configuration loaded");

    // ========== PHASE 2 : Episode feed ==========
    let feed_path = match cli.feed {
        Some(path) => path,
        None => config.get_feed_path()?,
    };
    // 0 lists the whole feed
    let source = match config.get_feed_limit()? {
        0 => JsonFeedSource::new(feed_path).without_limit(),
        limit => JsonFeedSource::new(feed_path).with_limit(limit),
    };
    let episodes = source
        .episodes()
        .with_context(|| format!("Failed to load episodes from {}", source.path().display()))?;
    let listing = EpisodeListing::split(episodes, config.get_feed_latest_count()?);
    info!(
        source = source.name(),
        path = %source.path().display(),
        episodes = listing.len(),
        latest = listing.latest().len(),
        "🎧 Feed loaded"
    );

    // ========== PHASE 3 : Player ==========
    let player = PlayerHandle::new(PlayerState::with_modes(
        config.get_player_start_looping()?,
        config.get_player_start_shuffling()?,
    ));

    let events = player.subscribe();
    thread::spawn(move || {
        for event in events {
            debug!(?event, "Player event");
        }
    });

    let surface =
        Surface::new(player, Box::new(source), listing).with_autoplay(!cli.no_autoplay);

    info!("✅ Podcastr is ready! Type 'help' for commands");
    surface.run(io::stdin().lock(), io::stdout().lock())?;

    info!("👋 Bye");
    Ok(())
}
