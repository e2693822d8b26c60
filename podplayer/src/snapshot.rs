use serde::Serialize;

use crate::{Episode, PlayerState};

/// Read-only copy of everything a playback surface renders.
///
/// Derived capabilities are computed once, when the snapshot is taken.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// All queued episodes, in play order.
    pub playlist: Vec<Episode>,
    /// Index of the selected episode, or `None` when nothing is queued.
    pub current_index: Option<usize>,
    pub current_episode: Option<Episode>,
    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffling: bool,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PlayerSnapshot {
    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }
}

impl From<&PlayerState> for PlayerSnapshot {
    fn from(state: &PlayerState) -> Self {
        let current_episode = state.current_episode().cloned();
        Self {
            playlist: state.playlist().to_vec(),
            current_index: current_episode.as_ref().map(|_| state.current_index()),
            current_episode,
            is_playing: state.is_playing(),
            is_looping: state.is_looping(),
            is_shuffling: state.is_shuffling(),
            has_next: state.has_next(),
            has_previous: state.has_previous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_of_empty_player() {
        let snapshot = PlayerSnapshot::from(&PlayerState::new());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.current_index, None);
        assert_eq!(snapshot.current_episode, None);
        assert!(!snapshot.has_next);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut state = PlayerState::new();
        state
            .play_list(vec![Episode::new("a"), Episode::new("b")], 1)
            .unwrap();

        let json = serde_json::to_value(PlayerSnapshot::from(&state)).unwrap();
        assert_eq!(json["currentIndex"], 1);
        assert_eq!(json["currentEpisode"]["id"], "b");
        assert_eq!(json["isPlaying"], true);
        assert_eq!(json["hasNext"], false);
        assert_eq!(json["hasPrevious"], true);
        assert_eq!(json["playlist"].as_array().map(Vec::len), Some(2));
    }
}
