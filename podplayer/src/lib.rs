//! # podplayer - Playback state machine for Podcastr
//!
//! This crate owns the single source of truth for "what is queued and what
//! is the playback intent":
//! - **PlayerState** : playlist, selected index, playing / looping / shuffling flags
//! - **PlayerHandle** : shared handle passed explicitly to every consumer
//! - **PlayerEvent** : change notifications fanned out to subscribers
//! - **PlayerSnapshot** : serialisable read-only view for the playback surface
//!
//! It never decodes or plays audio.
//!
//! # Example
//!
//! ```
//! use podplayer::{Episode, PlayerHandle, TrackEnd};
//!
//! let player = PlayerHandle::default();
//! let episodes = vec![Episode::new("a"), Episode::new("b")];
//!
//! player.play_list(episodes, 0)?;
//! assert!(player.has_next());
//!
//! // The surface reports that the first track ended on its own.
//! assert_eq!(player.on_track_ended(), TrackEnd::Advanced { index: 1 });
//! # Ok::<(), podplayer::PlayerError>(())
//! ```

mod episode;
mod events;
mod handle;
mod snapshot;
mod state;

pub mod errors;

pub use episode::Episode;
pub use errors::PlayerError;
pub use events::{PlayerEvent, PlayerEventBus};
pub use handle::{PlayerHandle, TrackEnd};
pub use snapshot::PlayerSnapshot;
pub use state::PlayerState;
