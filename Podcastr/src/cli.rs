use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "podcastr",
    version,
    about = "Listen to the podcast feed from the terminal"
)]
pub struct Cli {
    /// Configuration directory (defaults to $PODCASTR_CONFIG, ./.podcastr or ~/.podcastr)
    #[arg(short, long)]
    pub config_dir: Option<PathBuf>,

    /// Episode feed file, overriding `feed.path` from the configuration
    #[arg(short, long)]
    pub feed: Option<PathBuf>,

    /// Do not start audio automatically when an episode is selected
    #[arg(long)]
    pub no_autoplay: bool,
}
