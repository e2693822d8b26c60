//! Line-oriented playback surface.
//!
//! Stands in for the audio element of a real player: it reads commands,
//! drives the [`PlayerHandle`] and reports what the listener would see.
//! With autoplay on, freshly selected audio "starts" immediately and the
//! surface reports it through `set_playing_state(true)`.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use podplayer::{Episode, PlayerError, PlayerHandle, TrackEnd};
use podsource::{
    EpisodeListing, EpisodeSource, EpisodeSourceError, duration_to_time_string,
    published_date_string,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show(String),
    Play(usize),
    PlayEpisode(String),
    Playlist(usize),
    Toggle,
    Loop,
    Shuffle,
    Next,
    Prev,
    Ended,
    Started,
    Stopped,
    Clear,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command '{0}' expects an argument")]
    MissingArgument(String),

    #[error("Invalid episode number: {0}")]
    InvalidNumber(String),

    #[error("No episode #{0} in the listing")]
    NoSuchEpisode(usize),

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error(transparent)]
    Source(#[from] EpisodeSourceError),

    #[error("Failed to serialize player status: {0}")]
    Status(#[from] serde_json::Error),
}

impl FromStr for Command {
    type Err = SurfaceError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_lowercase();

        let argument = words
            .next()
            .ok_or_else(|| SurfaceError::MissingArgument(name.clone()));
        let number = |arg: &str| -> Result<usize, SurfaceError> {
            arg.parse()
                .map_err(|_| SurfaceError::InvalidNumber(arg.to_string()))
        };

        let command = match name.as_str() {
            "list" | "ls" => Command::List,
            "show" => Command::Show(argument?.to_string()),
            // A listing number, or else an episode id
            "play" => {
                let arg = argument?;
                match number(arg) {
                    Ok(n) => Command::Play(n),
                    Err(_) => Command::PlayEpisode(arg.to_string()),
                }
            }
            "playlist" => Command::Playlist(number(argument?)?),
            "toggle" | "pause" => Command::Toggle,
            "loop" => Command::Loop,
            "shuffle" => Command::Shuffle,
            "next" => Command::Next,
            "prev" | "previous" => Command::Prev,
            "ended" => Command::Ended,
            "started" => Command::Started,
            "stopped" => Command::Stopped,
            "clear" => Command::Clear,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(SurfaceError::UnknownCommand(line.trim().to_string())),
        };

        Ok(command)
    }
}

const HELP: &str = "\
commands:
  list             show latest releases and all episodes
  show <id>        episode details
  play <n|id>      play one episode alone
  playlist <n>     play the whole listing starting at episode n
  toggle           play / pause
  loop             toggle looping
  shuffle          toggle shuffling
  next | prev      move in the playlist
  ended            the current track reached its end
  started|stopped  the audio output started or stopped
  clear            empty the player
  status           player state as JSON
  quit";

pub struct Surface {
    player: PlayerHandle,
    source: Box<dyn EpisodeSource>,
    listing: EpisodeListing,
    autoplay: bool,
}

impl Surface {
    /// `listing` is what `list` shows; `show` and `play <id>` look episodes
    /// up in `source`, beyond the listing.
    pub fn new(
        player: PlayerHandle,
        source: Box<dyn EpisodeSource>,
        listing: EpisodeListing,
    ) -> Self {
        Self {
            player,
            source,
            listing,
            autoplay: true,
        }
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn player(&self) -> &PlayerHandle {
        &self.player
    }

    /// Runs commands until `quit` or end of input.
    ///
    /// Bad commands are reported on `output` and do not stop the loop.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            if line.trim().is_empty() {
                continue;
            }

            let reply = match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command),
                Err(e) => Err(e),
            };

            let written = match reply {
                Ok(text) => writeln!(output, "{text}"),
                Err(e) => {
                    warn!(command = %line.trim(), error = %e, "Command rejected");
                    writeln!(output, "error: {e}")
                }
            };
            written.context("Failed to write reply")?;
            output.flush().context("Failed to flush output")?;
        }

        Ok(())
    }

    pub fn execute(&self, command: Command) -> Result<String, SurfaceError> {
        debug!(?command, "Executing command");

        match command {
            Command::List => return Ok(self.render_listing()),
            Command::Show(id) => return Ok(render_details(&self.source.episode(&id)?)),
            Command::Status => return Ok(serde_json::to_string_pretty(&self.player.snapshot())?),
            Command::Help => return Ok(HELP.to_string()),
            Command::Quit => return Ok(String::new()),

            Command::Play(n) => {
                let episode = self.listing.get(n).ok_or(SurfaceError::NoSuchEpisode(n))?;
                self.player.play(episode.clone());
                self.audio_loaded();
            }
            Command::PlayEpisode(id) => {
                self.player.play(self.source.episode(&id)?);
                self.audio_loaded();
            }
            Command::Playlist(n) => {
                self.player.play_list(self.listing.play_order(), n)?;
                self.audio_loaded();
            }
            Command::Toggle => {
                self.player.toggle_play();
            }
            Command::Loop => {
                self.player.toggle_loop();
            }
            Command::Shuffle => {
                self.player.toggle_shuffle();
            }
            Command::Next => {
                if self.player.play_next() {
                    self.audio_loaded();
                }
            }
            Command::Prev => {
                if self.player.play_previous() {
                    self.audio_loaded();
                }
            }
            Command::Ended => match self.player.on_track_ended() {
                TrackEnd::Advanced { .. } => self.audio_loaded(),
                TrackEnd::Repeat { .. } | TrackEnd::Finished | TrackEnd::Idle => {}
            },
            Command::Started => self.player.set_playing_state(true),
            Command::Stopped => self.player.set_playing_state(false),
            Command::Clear => self.player.clear_state(),
        }

        Ok(self.now_playing())
    }

    fn audio_loaded(&self) {
        if self.autoplay && !self.player.is_empty() {
            self.player.set_playing_state(true);
        }
    }

    /// One status line, the way a player bar would show it.
    pub fn now_playing(&self) -> String {
        let snapshot = self.player.snapshot();

        let Some(episode) = snapshot.current_episode.as_ref() else {
            return "Select a podcast to listen to".to_string();
        };

        let mut line = format!(
            "{} {} [{}/{}] {}",
            if snapshot.is_playing { "▶" } else { "⏸" },
            episode.title(),
            snapshot.current_index.map_or(0, |i| i + 1),
            snapshot.len(),
            duration_to_time_string(episode.duration_seconds()),
        );
        if snapshot.is_looping {
            line.push_str(" [loop]");
        }
        if snapshot.is_shuffling {
            line.push_str(" [shuffle]");
        }
        if !snapshot.has_previous {
            line.push_str(" (first)");
        }
        if !snapshot.has_next {
            line.push_str(" (last)");
        }
        line
    }

    fn render_listing(&self) -> String {
        if self.listing.is_empty() {
            return "No episodes".to_string();
        }

        let latest = self.listing.latest().iter().enumerate().map(|(row, episode)| {
            let index = self.listing.playlist_index_for_latest(row).unwrap_or(row);
            listing_row(index, episode)
        });
        let all = self.listing.all().iter().enumerate().map(|(row, episode)| {
            let index = self
                .listing
                .playlist_index_for_all(row)
                .unwrap_or(row + self.listing.latest().len());
            listing_row(index, episode)
        });

        std::iter::once("Latest releases".to_string())
            .chain(latest)
            .chain(std::iter::once("All episodes".to_string()))
            .chain(all)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn published(episode: &Episode) -> Option<String> {
    episode.published_at().as_ref().map(published_date_string)
}

fn listing_row(index: usize, episode: &Episode) -> String {
    format!(
        "  {index:>3}  {}  {}  {} ({})",
        episode.title(),
        episode.members(),
        published(episode).unwrap_or_default(),
        duration_to_time_string(episode.duration_seconds())
    )
}

/// The episode page: title, hosts, date, duration and show notes.
fn render_details(episode: &Episode) -> String {
    let mut lines = vec![
        episode.title().to_string(),
        episode.members().to_string(),
    ];

    let duration = duration_to_time_string(episode.duration_seconds());
    lines.push(match published(episode) {
        Some(date) => format!("{date} · {duration}"),
        None => duration,
    });

    if !episode.description().is_empty() {
        lines.push(String::new());
        lines.push(episode.description().to_string());
    }
    lines.join("\n")
}
