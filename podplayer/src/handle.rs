//! Shared, explicitly passed handle to the application's single player.
//!
//! The application builds exactly one `PlayerHandle` at its composition
//! root and hands clones of it to every consumer. All clones point to the
//! same `PlayerState`. Writers are serialised by a mutex and change events
//! are broadcast once the lock has been released.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::Receiver;
use rand::Rng;
use tracing::debug;

use crate::{
    Episode, PlayerEvent, PlayerEventBus, PlayerSnapshot, PlayerState, errors::PlayerError,
};

/// What the surface must do after its audio track reached its natural end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackEnd {
    /// Nothing is queued.
    Idle,
    /// Looping is on: restart the episode at `index`.
    Repeat { index: usize },
    /// The player moved to `index`; start it and report with
    /// `set_playing_state(true)` once audio is audible.
    Advanced { index: usize },
    /// The playlist ran out and was cleared.
    Finished,
}

#[derive(Clone, Default)]
pub struct PlayerHandle {
    state: Arc<Mutex<PlayerState>>,
    event_bus: PlayerEventBus,
}

impl std::fmt::Debug for PlayerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerHandle")
            .field("state", &*self.lock())
            .field("subscribers", &self.event_bus.subscriber_count())
            .finish()
    }
}

impl PlayerHandle {
    pub fn new(state: PlayerState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            event_bus: PlayerEventBus::new(),
        }
    }

    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.event_bus.subscribe()
    }

    // A panic while holding the lock cannot leave the state half-updated:
    // every mutation is a handful of plain field writes.
    fn lock(&self) -> MutexGuard<'_, PlayerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` under the lock, then broadcasts the events it produced.
    fn update<T>(&self, f: impl FnOnce(&mut PlayerState, &mut Vec<PlayerEvent>) -> T) -> T {
        let mut events = Vec::new();
        let result = {
            let mut state = self.lock();
            f(&mut state, &mut events)
        };

        for event in events {
            self.event_bus.broadcast(event);
        }
        result
    }

    // --- Queries ---

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot::from(&*self.lock())
    }

    pub fn current_episode(&self) -> Option<Episode> {
        self.lock().current_episode().cloned()
    }

    pub fn current_index(&self) -> usize {
        self.lock().current_index()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.lock().is_playing()
    }

    pub fn is_looping(&self) -> bool {
        self.lock().is_looping()
    }

    pub fn is_shuffling(&self) -> bool {
        self.lock().is_shuffling()
    }

    pub fn has_next(&self) -> bool {
        self.lock().has_next()
    }

    pub fn has_previous(&self) -> bool {
        self.lock().has_previous()
    }

    // --- Commands ---

    pub fn play(&self, episode: Episode) {
        self.update(|state, events| {
            state.play(episode);
            events.push(PlayerEvent::PlaylistChanged {
                length: 1,
                current_index: 0,
            });
            events.extend(selection_event(state));
        })
    }

    pub fn play_list(&self, episodes: Vec<Episode>, start_index: usize) -> Result<(), PlayerError> {
        self.update(|state, events| {
            let was_playing = state.is_playing();
            state.play_list(episodes, start_index)?;

            events.push(PlayerEvent::PlaylistChanged {
                length: state.len(),
                current_index: state.current_index(),
            });
            events.extend(selection_event(state));
            if !was_playing {
                events.push(PlayerEvent::PlayingChanged(true));
            }
            Ok(())
        })
    }

    pub fn toggle_play(&self) -> bool {
        self.update(|state, events| {
            let playing = state.toggle_play();
            events.push(PlayerEvent::PlayingChanged(playing));
            playing
        })
    }

    pub fn toggle_loop(&self) -> bool {
        self.update(|state, events| {
            let looping = state.toggle_loop();
            events.push(PlayerEvent::LoopingChanged(looping));
            looping
        })
    }

    pub fn toggle_shuffle(&self) -> bool {
        self.update(|state, events| {
            let shuffling = state.toggle_shuffle();
            events.push(PlayerEvent::ShufflingChanged(shuffling));
            shuffling
        })
    }

    pub fn set_playing_state(&self, playing: bool) {
        self.update(|state, events| {
            if state.is_playing() != playing {
                state.set_playing_state(playing);
                events.push(PlayerEvent::PlayingChanged(playing));
            }
        })
    }

    pub fn clear_state(&self) {
        self.update(|state, events| {
            if !state.is_empty() {
                state.clear_state();
                events.push(PlayerEvent::Cleared);
            }
        })
    }

    pub fn play_next(&self) -> bool {
        self.play_next_with(&mut rand::rng())
    }

    pub fn play_next_with<R: Rng>(&self, rng: &mut R) -> bool {
        self.update(|state, events| {
            let moved = state.play_next_with(rng);
            if moved {
                events.extend(selection_event(state));
            }
            moved
        })
    }

    pub fn play_previous(&self) -> bool {
        self.update(|state, events| {
            let moved = state.play_previous();
            if moved {
                events.extend(selection_event(state));
            }
            moved
        })
    }

    /// Applies the end-of-track policy for a track that finished on its own.
    ///
    /// Looping repeats the current episode. Otherwise the player stops,
    /// advances when it can, and clears itself once the playlist is done.
    /// After an advance the playing flag stays off until the surface reports
    /// that the new audio actually started.
    pub fn on_track_ended(&self) -> TrackEnd {
        self.on_track_ended_with(&mut rand::rng())
    }

    pub fn on_track_ended_with<R: Rng>(&self, rng: &mut R) -> TrackEnd {
        let outcome = self.update(|state, events| {
            if state.is_empty() {
                return TrackEnd::Idle;
            }

            if state.is_looping() {
                return TrackEnd::Repeat {
                    index: state.current_index(),
                };
            }

            if state.is_playing() {
                state.set_playing_state(false);
                events.push(PlayerEvent::PlayingChanged(false));
            }

            if state.play_next_with(rng) {
                events.extend(selection_event(state));
                TrackEnd::Advanced {
                    index: state.current_index(),
                }
            } else {
                state.clear_state();
                events.push(PlayerEvent::Cleared);
                TrackEnd::Finished
            }
        });

        debug!(outcome = ?outcome, "Track ended");
        outcome
    }
}

fn selection_event(state: &PlayerState) -> Option<PlayerEvent> {
    state
        .current_episode()
        .map(|episode| PlayerEvent::EpisodeChanged {
            index: state.current_index(),
            episode_id: episode.id().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn abc() -> Vec<Episode> {
        vec![Episode::new("a"), Episode::new("b"), Episode::new("c")]
    }

    fn drain(rx: &Receiver<PlayerEvent>) -> Vec<PlayerEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_clones_share_state() {
        let player = PlayerHandle::default();
        let surface = player.clone();

        player.play_list(abc(), 1).unwrap();

        assert_eq!(surface.current_index(), 1);
        assert!(surface.is_playing());
        assert_eq!(surface.current_episode().map(|e| e.id().to_string()), Some("b".into()));
    }

    #[test]
    fn test_play_list_events() {
        let player = PlayerHandle::default();
        let rx = player.subscribe();

        player.play_list(abc(), 0).unwrap();

        assert_eq!(
            drain(&rx),
            vec![
                PlayerEvent::PlaylistChanged {
                    length: 3,
                    current_index: 0
                },
                PlayerEvent::EpisodeChanged {
                    index: 0,
                    episode_id: "a".into()
                },
                PlayerEvent::PlayingChanged(true),
            ]
        );
    }

    #[test]
    fn test_failed_play_list_emits_nothing() {
        let player = PlayerHandle::default();
        let rx = player.subscribe();

        assert!(player.play_list(abc(), 3).is_err());
        assert!(drain(&rx).is_empty());
        assert!(player.is_empty());
    }

    #[test]
    fn test_noop_commands_emit_nothing() {
        let player = PlayerHandle::default();
        let rx = player.subscribe();

        assert!(!player.play_next());
        assert!(!player.play_previous());
        player.clear_state();
        player.set_playing_state(false);

        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_navigation_events() {
        let player = PlayerHandle::default();
        player.play_list(abc(), 2).unwrap();
        let rx = player.subscribe();

        assert!(!player.play_next());
        assert!(player.play_previous());

        assert_eq!(
            drain(&rx),
            vec![PlayerEvent::EpisodeChanged {
                index: 1,
                episode_id: "b".into()
            }]
        );
    }

    #[test]
    fn test_toggle_events() {
        let player = PlayerHandle::default();
        let rx = player.subscribe();

        player.toggle_play();
        player.toggle_loop();
        player.toggle_shuffle();
        player.set_playing_state(false);

        assert_eq!(
            drain(&rx),
            vec![
                PlayerEvent::PlayingChanged(true),
                PlayerEvent::LoopingChanged(true),
                PlayerEvent::ShufflingChanged(true),
                PlayerEvent::PlayingChanged(false),
            ]
        );
    }

    #[test]
    fn test_track_end_advances_and_waits_for_audio() {
        let player = PlayerHandle::default();
        player.play_list(abc(), 0).unwrap();

        assert_eq!(player.on_track_ended(), TrackEnd::Advanced { index: 1 });
        assert!(!player.is_playing());

        player.set_playing_state(true);
        assert!(player.is_playing());
    }

    #[test]
    fn test_track_end_with_loop_repeats() {
        let player = PlayerHandle::default();
        player.play_list(abc(), 2).unwrap();
        player.toggle_loop();
        let rx = player.subscribe();

        assert_eq!(player.on_track_ended(), TrackEnd::Repeat { index: 2 });
        assert!(player.is_playing());
        assert_eq!(player.len(), 3);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_track_end_at_last_episode_finishes() {
        let player = PlayerHandle::default();
        player.play_list(abc(), 2).unwrap();
        let rx = player.subscribe();

        assert_eq!(player.on_track_ended(), TrackEnd::Finished);
        assert!(player.is_empty());
        assert!(!player.is_playing());
        assert_eq!(
            drain(&rx),
            vec![PlayerEvent::PlayingChanged(false), PlayerEvent::Cleared]
        );
    }

    #[test]
    fn test_track_end_while_shuffling_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let player = PlayerHandle::new(PlayerState::with_modes(false, true));
        player.play_list(abc(), 2).unwrap();

        for _ in 0..20 {
            match player.on_track_ended_with(&mut rng) {
                TrackEnd::Advanced { index } => assert!(index < 3),
                other => panic!("unexpected outcome {other:?}"),
            }
            player.set_playing_state(true);
        }
    }

    #[test]
    fn test_track_end_on_empty_player() {
        let player = PlayerHandle::default();
        assert_eq!(player.on_track_ended(), TrackEnd::Idle);
    }

    #[test]
    fn test_snapshot_reflects_commands() {
        let player = PlayerHandle::default();
        player.play(Episode::new("solo"));
        player.toggle_shuffle();

        let snapshot = player.snapshot();
        assert_eq!(snapshot.current_index, Some(0));
        assert!(!snapshot.is_playing);
        assert!(snapshot.is_shuffling);
        assert!(snapshot.has_next);
        assert!(!snapshot.has_previous);
    }
}
