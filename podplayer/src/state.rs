//! Playback state machine for the app-wide player.
//!
//! `PlayerState` owns:
//!   - the playlist (insertion order is playback order),
//!   - the index of the selected episode,
//!   - the playback intent flags (playing, looping, shuffling).
//!
//! It never touches audio. The playback surface reads this state and drives
//! the real transport from it, reporting back through `set_playing_state`.
//! Every operation on an empty playlist degrades to a no-op.

use rand::Rng;
use tracing::debug;

use crate::{Episode, errors::PlayerError};

#[derive(Clone, Debug, Default)]
pub struct PlayerState {
    playlist: Vec<Episode>,
    /// Only meaningful while `playlist` is not empty.
    current_index: usize,
    is_playing: bool,
    is_looping: bool,
    is_shuffling: bool,
}

impl PlayerState {
    /// Creates an idle player with an empty playlist and every flag off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle player starting with the given loop / shuffle modes.
    pub fn with_modes(looping: bool, shuffling: bool) -> Self {
        Self {
            is_looping: looping,
            is_shuffling: shuffling,
            ..Self::default()
        }
    }

    pub fn playlist(&self) -> &[Episode] {
        &self.playlist
    }

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    /// Raw selected index. Check `is_empty()` before relying on it.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Returns the selected episode, or `None` when nothing is queued.
    pub fn current_episode(&self) -> Option<&Episode> {
        self.playlist.get(self.current_index)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub fn is_shuffling(&self) -> bool {
        self.is_shuffling
    }

    /// True when `play_next` would move: always while shuffling, otherwise
    /// only if the selection is not the last episode.
    pub fn has_next(&self) -> bool {
        self.is_shuffling || self.current_index + 1 < self.playlist.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    // --- Playlist replacement ---

    /// Replaces the playlist with the single `episode` and selects it.
    ///
    /// The playing flag is left alone: the surface starts audio and reports
    /// it through `set_playing_state`.
    pub fn play(&mut self, episode: Episode) {
        debug!(episode = episode.id(), "Playing single episode");
        self.playlist = vec![episode];
        self.current_index = 0;
    }

    /// Replaces the playlist with `episodes`, selects `start_index` and
    /// marks the player as playing.
    ///
    /// # Errors
    /// Returns `PlayerError::IndexOutOfRange` if `start_index` is not a valid
    /// index into `episodes` (an empty list has no valid index). The state is
    /// left untouched in that case.
    pub fn play_list(
        &mut self,
        episodes: Vec<Episode>,
        start_index: usize,
    ) -> Result<(), PlayerError> {
        if start_index >= episodes.len() {
            return Err(PlayerError::index_out_of_range(
                start_index,
                episodes.len(),
            ));
        }

        debug!(
            length = episodes.len(),
            start_index,
            episode = episodes[start_index].id(),
            "Playing episode list"
        );
        self.playlist = episodes;
        self.current_index = start_index;
        self.is_playing = true;
        Ok(())
    }

    /// Empties the playlist. Flags are independent of the queue and survive.
    pub fn clear_state(&mut self) {
        debug!(length = self.playlist.len(), "Clearing player state");
        self.playlist.clear();
        self.current_index = 0;
    }

    // --- Flags ---

    /// Flips the playing intent and returns the new value.
    pub fn toggle_play(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        debug!(is_playing = self.is_playing, "Toggled play");
        self.is_playing
    }

    /// Flips looping and returns the new value.
    pub fn toggle_loop(&mut self) -> bool {
        self.is_looping = !self.is_looping;
        debug!(is_looping = self.is_looping, "Toggled loop");
        self.is_looping
    }

    /// Flips shuffling and returns the new value.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.is_shuffling = !self.is_shuffling;
        debug!(is_shuffling = self.is_shuffling, "Toggled shuffle");
        self.is_shuffling
    }

    /// Sets the playing intent without toggling. Used by the surface to
    /// report that audio actually started or stopped.
    pub fn set_playing_state(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    // --- Navigation ---

    /// Advances the selection, drawing from the thread-local RNG when
    /// shuffling. See [`PlayerState::play_next_with`].
    pub fn play_next(&mut self) -> bool {
        self.play_next_with(&mut rand::rng())
    }

    /// Advances the selection using `rng` for the shuffle draw.
    ///
    /// - shuffling: picks a uniform index in `[0, len)`. The current episode
    ///   takes part in the draw, so it may be picked again.
    /// - otherwise: moves to the following episode when there is one.
    ///
    /// Looping is not consulted here. Returns `true` if a new selection was
    /// made (a shuffle draw always counts, even if it lands on the same
    /// index), `false` for a no-op.
    pub fn play_next_with<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.playlist.is_empty() {
            return false;
        }

        if self.is_shuffling {
            let next = rng.random_range(0..self.playlist.len());
            debug!(from = self.current_index, to = next, "Shuffle draw");
            self.current_index = next;
            true
        } else if self.has_next() {
            self.current_index += 1;
            debug!(to = self.current_index, "Advanced to next episode");
            true
        } else {
            debug!(index = self.current_index, "Already at last episode");
            false
        }
    }

    /// Moves back one episode. Returns `false` when already at the start or
    /// when nothing is queued.
    pub fn play_previous(&mut self) -> bool {
        if self.playlist.is_empty() || !self.has_previous() {
            return false;
        }

        self.current_index -= 1;
        debug!(to = self.current_index, "Moved to previous episode");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn episodes(ids: &[&str]) -> Vec<Episode> {
        ids.iter()
            .map(|id| Episode::new(*id).with_title(format!("Episode {id}")))
            .collect()
    }

    #[test]
    fn test_new_player_is_idle() {
        let state = PlayerState::new();
        assert!(state.is_empty());
        assert_eq!(state.current_index(), 0);
        assert!(state.current_episode().is_none());
        assert!(!state.is_playing());
        assert!(!state.is_looping());
        assert!(!state.is_shuffling());
        assert!(!state.has_next());
        assert!(!state.has_previous());
    }

    #[test]
    fn test_with_modes() {
        let state = PlayerState::with_modes(true, true);
        assert!(state.is_looping());
        assert!(state.is_shuffling());
        assert!(state.is_empty());
    }

    #[test]
    fn test_play_single_replaces_playlist() {
        let mut state = PlayerState::new();
        state.play_list(episodes(&["a", "b", "c"]), 2).unwrap();

        let single = Episode::new("z");
        state.play(single.clone());

        assert_eq!(state.playlist(), &[single.clone()]);
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.current_episode(), Some(&single));
    }

    #[test]
    fn test_play_single_keeps_playing_flag() {
        let mut state = PlayerState::new();
        state.play(Episode::new("a"));
        assert!(!state.is_playing());

        state.set_playing_state(true);
        state.play(Episode::new("b"));
        assert!(state.is_playing());
    }

    #[test]
    fn test_play_list_selects_start_and_plays() {
        let mut state = PlayerState::new();
        let list = episodes(&["a", "b", "c"]);

        state.play_list(list.clone(), 1).unwrap();

        assert_eq!(state.playlist(), list.as_slice());
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.current_episode().map(Episode::id), Some("b"));
        assert!(state.is_playing());
    }

    #[test]
    fn test_play_list_out_of_range_leaves_state_untouched() {
        let mut state = PlayerState::new();
        state.play(Episode::new("keep"));

        let err = state.play_list(episodes(&["a", "b"]), 2).unwrap_err();
        assert_eq!(err, PlayerError::IndexOutOfRange { index: 2, len: 2 });

        let err = state.play_list(Vec::new(), 0).unwrap_err();
        assert_eq!(err, PlayerError::IndexOutOfRange { index: 0, len: 0 });

        assert_eq!(state.len(), 1);
        assert_eq!(state.current_episode().map(Episode::id), Some("keep"));
        assert!(!state.is_playing());
    }

    #[test]
    fn test_toggles_are_involutions() {
        let mut state = PlayerState::new();

        let playing = state.is_playing();
        state.toggle_play();
        state.toggle_play();
        assert_eq!(state.is_playing(), playing);

        let looping = state.is_looping();
        state.toggle_loop();
        state.toggle_loop();
        assert_eq!(state.is_looping(), looping);

        let shuffling = state.is_shuffling();
        state.toggle_shuffle();
        state.toggle_shuffle();
        assert_eq!(state.is_shuffling(), shuffling);
    }

    #[test]
    fn test_toggle_returns_new_value() {
        let mut state = PlayerState::new();
        assert!(state.toggle_play());
        assert!(state.toggle_loop());
        assert!(state.toggle_shuffle());
        assert!(!state.toggle_play());
    }

    #[test]
    fn test_set_playing_state_is_absolute() {
        let mut state = PlayerState::new();
        state.set_playing_state(true);
        state.set_playing_state(true);
        assert!(state.is_playing());
        state.set_playing_state(false);
        assert!(!state.is_playing());
    }

    #[test]
    fn test_clear_state_keeps_flags() {
        let mut state = PlayerState::new();
        state.play_list(episodes(&["a", "b", "c"]), 2).unwrap();
        state.toggle_loop();
        state.toggle_shuffle();

        state.clear_state();

        assert!(state.is_empty());
        assert_eq!(state.current_index(), 0);
        assert!(state.is_playing());
        assert!(state.is_looping());
        assert!(state.is_shuffling());
    }

    #[test]
    fn test_has_next_and_has_previous() {
        let mut state = PlayerState::new();
        state.play_list(episodes(&["a", "b", "c"]), 0).unwrap();

        for index in 0..3 {
            state.play_list(episodes(&["a", "b", "c"]), index).unwrap();
            assert_eq!(state.has_previous(), index > 0);
            assert_eq!(state.has_next(), index + 1 < 3);
        }

        state.toggle_shuffle();
        assert_eq!(state.current_index(), 2);
        assert!(state.has_next());
    }

    #[test]
    fn test_sequential_walkthrough() {
        let mut state = PlayerState::new();
        state.play_list(episodes(&["a", "b", "c"]), 0).unwrap();
        assert!(state.is_playing());

        assert!(state.play_next());
        assert!(state.play_next());
        assert_eq!(state.current_index(), 2);

        assert!(!state.play_next());
        assert_eq!(state.current_index(), 2);
        assert!(!state.has_next());

        assert!(state.play_previous());
        assert!(state.play_previous());
        assert_eq!(state.current_index(), 0);

        assert!(!state.play_previous());
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn test_looping_does_not_wrap_play_next() {
        let mut state = PlayerState::new();
        state.play_list(episodes(&["a", "b"]), 1).unwrap();
        state.toggle_loop();

        assert!(!state.play_next());
        assert_eq!(state.current_index(), 1);
    }

    #[test]
    fn test_shuffle_draw_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for len in 1..=8 {
            let ids: Vec<String> = (0..len).map(|i| format!("ep-{i}")).collect();
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

            let mut state = PlayerState::with_modes(false, true);
            state.play_list(episodes(&ids), len - 1).unwrap();

            for _ in 0..50 {
                assert!(state.play_next_with(&mut rng));
                assert!(state.current_index() < len);
            }
        }
    }

    #[test]
    fn test_shuffle_can_redraw_current_episode() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = PlayerState::with_modes(false, true);
        state.play(Episode::new("only"));

        assert!(state.play_next_with(&mut rng));
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn test_shuffle_with_thread_rng() {
        let mut state = PlayerState::new();
        state.play_list(episodes(&["a", "b", "c"]), 0).unwrap();
        state.toggle_shuffle();

        assert!(state.play_next());
        assert!(state.current_index() < 3);
    }

    #[test]
    fn test_navigation_after_clear_is_noop() {
        let mut state = PlayerState::new();
        state.play_list(episodes(&["a", "b", "c"]), 1).unwrap();
        state.clear_state();

        assert!(!state.play_next());
        assert!(!state.play_previous());
        assert_eq!(state.current_index(), 0);

        state.toggle_shuffle();
        assert!(!state.play_next());
        assert!(state.current_episode().is_none());
    }
}
