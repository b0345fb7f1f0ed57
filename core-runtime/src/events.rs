//! # Engine Event Fan-Out
//!
//! Re-publishes [`EngineEvent`]s to external listeners using
//! `tokio::sync::broadcast`. The playback controller consumes the engine's
//! event stream exclusively; every event it processes (position-bearing or
//! not) is mirrored onto this bus so host applications can observe the full
//! stream without touching the engine handle.
//!
//! ## Usage
//!
//! ```no_run
//! use core_runtime::events::PlayerEventBus;
//! use tokio::sync::broadcast::error::RecvError;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = PlayerEventBus::default();
//! let mut listener = bus.subscribe();
//!
//! tokio::spawn(async move {
//!     loop {
//!         match listener.recv().await {
//!             Ok(event) => println!("player event: {}", event.name()),
//!             Err(RecvError::Lagged(n)) => eprintln!("missed {} events", n),
//!             Err(RecvError::Closed) => break,
//!         }
//!     }
//! });
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Subscribers that fall behind by more than the buffer capacity receive
//! `RecvError::Lagged(n)` and can keep receiving newer events;
//! `RecvError::Closed` signals controller shutdown. Emitting with no
//! active subscriber is not an error at the bus level; the event is simply
//! dropped.

use bridge_traits::engine::EngineEvent;
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::RecvError;
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Balances memory usage against bursts of engine events (seeks and track
/// changes can emit several events back to back).
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Broadcast bus carrying the controller's outward-facing event stream.
#[derive(Clone)]
pub struct PlayerEventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl PlayerEventBus {
    /// Creates a new event bus with the specified per-subscriber buffer
    /// capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received it; zero when no
    /// listener is attached (the event is dropped, which is fine - the
    /// controller has already consumed it internally).
    pub fn emit(&self, event: EngineEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new independent subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for PlayerEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for PlayerEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerEventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_emitted_events() {
        let bus = PlayerEventBus::new(8);
        let mut rx = bus.subscribe();

        let delivered = bus.emit(EngineEvent::VolumeChanged { volume: 100 });
        assert_eq!(delivered, 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, EngineEvent::VolumeChanged { volume: 100 });
    }

    #[tokio::test]
    async fn emit_without_subscribers_is_dropped() {
        let bus = PlayerEventBus::new(8);
        assert_eq!(bus.emit(EngineEvent::PlayerInitialized), 0);
    }

    #[tokio::test]
    async fn subscribers_are_independent() {
        let bus = PlayerEventBus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(EngineEvent::ShuffleChanged { shuffle: true });
        assert_eq!(
            a.recv().await.unwrap(),
            EngineEvent::ShuffleChanged { shuffle: true }
        );
        assert_eq!(
            b.recv().await.unwrap(),
            EngineEvent::ShuffleChanged { shuffle: true }
        );
    }
}
