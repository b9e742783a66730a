//! Domain event hub.
//!
//! Events are emitted after the primary mutation commits and fan out over a
//! broadcast channel to the SSE stream and the integration consumer.
//! Delivery is best-effort; an event with no subscribers is dropped
//! silently.

use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{status::Status, testsolve::Verdict};

/// Something that happened to the tracked workflow.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A puzzle was created.
    PuzzleCreated {
        /// The new puzzle.
        puzzle_id: Uuid,
    },
    /// A puzzle's status changed.
    StatusChanged {
        /// The puzzle.
        puzzle_id: Uuid,
        /// Status before the change.
        from: Status,
        /// Status after the change.
        to: Status,
    },
    /// A user was added to a puzzle's spoiled set.
    SpoiledAdded {
        /// The puzzle.
        puzzle_id: Uuid,
        /// The newly spoiled user.
        user_id: Uuid,
    },
    /// A user was removed from a puzzle's spoiled set.
    SpoiledRemoved {
        /// The puzzle.
        puzzle_id: Uuid,
        /// The unspoiled user.
        user_id: Uuid,
    },
    /// A user was added to a round's spoiled set.
    RoundSpoiledAdded {
        /// The round.
        round_id: Uuid,
        /// The newly spoiled user.
        user_id: Uuid,
    },
    /// A testsolve session started.
    SessionStarted {
        /// The session.
        session_id: Uuid,
        /// The puzzle under test.
        puzzle_id: Uuid,
        /// Whether the puzzle was already past testsolving.
        late: bool,
    },
    /// A solver joined a session.
    ParticipantJoined {
        /// The session.
        session_id: Uuid,
        /// The solver.
        user_id: Uuid,
    },
    /// A guess was submitted.
    GuessSubmitted {
        /// The session.
        session_id: Uuid,
        /// The guesser.
        user_id: Uuid,
        /// How the guess was classified.
        verdict: Verdict,
    },
    /// A session solved its puzzle.
    SessionSolved {
        /// The session.
        session_id: Uuid,
        /// The solved puzzle.
        puzzle_id: Uuid,
    },
    /// A session was closed by a coordinator.
    SessionClosed {
        /// The session.
        session_id: Uuid,
    },
}

/// Broadcast hub wrapper carrying [`DomainEvent`]s.
pub struct EventHub {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn emit(&self, event: DomainEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let hub = EventHub::new(8);
        let mut rx = hub.subscribe();
        let puzzle_id = Uuid::new_v4();
        hub.emit(DomainEvent::PuzzleCreated { puzzle_id });

        match rx.recv().await {
            Ok(DomainEvent::PuzzleCreated { puzzle_id: got }) => assert_eq!(got, puzzle_id),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn emitting_without_subscribers_is_fine() {
        let hub = EventHub::new(8);
        hub.emit(DomainEvent::SessionClosed {
            session_id: Uuid::new_v4(),
        });
    }
}
