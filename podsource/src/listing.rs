use crate::Episode;

/// Number of episodes shown as "latest releases" on the home page.
pub const DEFAULT_LATEST_COUNT: usize = 2;

/// Home page view of the feed: a few latest releases, then everything else.
///
/// Both sections play from the same combined playlist (`latest` followed by
/// `all`), so a row of the second section starts playback at its own index
/// shifted by the number of latest releases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeListing {
    latest: Vec<Episode>,
    all: Vec<Episode>,
}

impl EpisodeListing {
    /// Splits an ordered episode list after its first `latest_count` entries.
    pub fn split(mut episodes: Vec<Episode>, latest_count: usize) -> Self {
        let all = episodes.split_off(latest_count.min(episodes.len()));
        Self {
            latest: episodes,
            all,
        }
    }

    pub fn latest(&self) -> &[Episode] {
        &self.latest
    }

    pub fn all(&self) -> &[Episode] {
        &self.all
    }

    pub fn len(&self) -> usize {
        self.latest.len() + self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty() && self.all.is_empty()
    }

    /// The combined playlist both sections hand to the player.
    pub fn play_order(&self) -> Vec<Episode> {
        self.latest.iter().chain(self.all.iter()).cloned().collect()
    }

    /// Episode at `index` in the combined playlist.
    pub fn get(&self, index: usize) -> Option<&Episode> {
        self.latest.iter().chain(self.all.iter()).nth(index)
    }

    /// Playlist start index for row `index` of the latest releases.
    pub fn playlist_index_for_latest(&self, index: usize) -> Option<usize> {
        (index < self.latest.len()).then_some(index)
    }

    /// Playlist start index for row `index` of the "all episodes" table.
    pub fn playlist_index_for_all(&self, index: usize) -> Option<usize> {
        (index < self.all.len()).then(|| index + self.latest.len())
    }
}
