//! # podsource
//!
//! Episode sources for Podcastr.
//!
//! A source hands the player an ordered sequence of [`Episode`] records.
//! The player trusts the record shape, so every conversion from the
//! remote API's JSON happens here.
//!
//! ## Features
//!
//! - **EpisodeSource** : the trait every source implements.
//! - **JsonFeedSource** : episodes read from a JSON export of the episodes API,
//!   newest first, limited to a fixed count.
//! - **MemorySource** : pre-built episodes, handy for tests and demos.
//! - **EpisodeListing** : the "latest releases" / "all episodes" split shown by
//!   the home page, with the matching playlist offsets.
//!
//! ## Usage
//!
//! ```no_run
//! use podsource::{EpisodeListing, EpisodeSource, JsonFeedSource};
//!
//! let source = JsonFeedSource::new("episodes.json").with_limit(12);
//! let listing = EpisodeListing::split(source.episodes()?, 2);
//!
//! for episode in listing.latest() {
//!     println!("{}", episode.title());
//! }
//! # Ok::<(), podsource::EpisodeSourceError>(())
//! ```

mod feed;
mod format;
mod listing;

use std::fmt::Debug;

pub use feed::{DEFAULT_FEED_LIMIT, FeedFile, FeedRecord, JsonFeedSource};
pub use format::{duration_to_time_string, published_date_string};
pub use listing::{DEFAULT_LATEST_COUNT, EpisodeListing};
pub use podplayer::Episode;

/// Error types for episode source operations
#[derive(Debug, thiserror::Error)]
pub enum EpisodeSourceError {
    #[error("Failed to read feed {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse feed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Episode not found: {0}")]
    NotFound(String),

    #[error("Invalid episode record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },
}

/// Result type for episode source operations
pub type Result<T> = std::result::Result<T, EpisodeSourceError>;

/// Supplies ordered episodes to the player.
pub trait EpisodeSource: Debug + Send + Sync {
    /// Returns the human-readable name of the source
    fn name(&self) -> &str;

    /// Returns every episode, in the order the frontend lists them
    fn episodes(&self) -> Result<Vec<Episode>>;

    /// Returns the episode with the given `id`
    ///
    /// The default implementation scans [`EpisodeSource::episodes`].
    fn episode(&self, id: &str) -> Result<Episode> {
        self.episodes()?
            .into_iter()
            .find(|episode| episode.id() == id)
            .ok_or_else(|| EpisodeSourceError::NotFound(id.to_string()))
    }
}

/// In-memory source serving a fixed list of episodes.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    episodes: Vec<Episode>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, episodes: Vec<Episode>) -> Self {
        Self {
            name: name.into(),
            episodes,
        }
    }
}

impl EpisodeSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn episodes(&self) -> Result<Vec<Episode>> {
        Ok(self.episodes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_lookup() {
        let source = MemorySource::new(
            "memory",
            vec![Episode::new("a"), Episode::new("b").with_title("Bee")],
        );

        assert_eq!(source.name(), "memory");
        assert_eq!(source.episodes().unwrap().len(), 2);
        assert_eq!(source.episode("b").unwrap().title(), "Bee");
        assert!(matches!(
            source.episode("zzz"),
            Err(EpisodeSourceError::NotFound(id)) if id == "zzz"
        ));
    }
}
