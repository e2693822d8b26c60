use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Notification sent to every subscriber after a command changed the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The playlist was replaced.
    PlaylistChanged {
        length: usize,
        current_index: usize,
    },
    /// A new episode was selected inside the current playlist.
    ///
    /// A shuffle draw always emits this, even when it picks the same index,
    /// so the surface knows to restart the episode.
    EpisodeChanged { index: usize, episode_id: String },
    PlayingChanged(bool),
    LoopingChanged(bool),
    ShufflingChanged(bool),
    Cleared,
}

#[derive(Clone, Default)]
pub struct PlayerEventBus {
    subscribers: Arc<Mutex<Vec<Sender<PlayerEvent>>>>,
}

impl PlayerEventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        let (tx, rx) = unbounded::<PlayerEvent>();
        {
            let mut subscribers = self
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            subscribers.push(tx);
        }
        rx
    }

    /// Sends `event` to every live subscriber; dropped receivers are pruned.
    pub fn broadcast(&self, event: PlayerEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
