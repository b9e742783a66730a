//! Domain event streaming over SSE.

use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    dto::events::ServerEvent,
    state::{DomainEvent, SharedState},
};

/// Subscribe to the shared domain event stream.
pub fn subscribe(state: &SharedState) -> broadcast::Receiver<DomainEvent> {
    state.events().subscribe()
}

/// SSE event name for a domain event.
fn event_name(event: &DomainEvent) -> &'static str {
    match event {
        DomainEvent::PuzzleCreated { .. } => "puzzle_created",
        DomainEvent::StatusChanged { .. } => "status_changed",
        DomainEvent::SpoiledAdded { .. } => "spoiled_added",
        DomainEvent::SpoiledRemoved { .. } => "spoiled_removed",
        DomainEvent::RoundSpoiledAdded { .. } => "round_spoiled_added",
        DomainEvent::SessionStarted { .. } => "session_started",
        DomainEvent::ParticipantJoined { .. } => "participant_joined",
        DomainEvent::GuessSubmitted { .. } => "guess_submitted",
        DomainEvent::SessionSolved { .. } => "session_solved",
        DomainEvent::SessionClosed { .. } => "session_closed",
    }
}

/// Convert a broadcast receiver into an SSE response, forwarding events
/// until the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<DomainEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads from broadcast and pushes into mpsc
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(domain_event) => {
                            let name = event_name(&domain_event).to_string();
                            let Ok(payload) = ServerEvent::json(Some(name), &domain_event) else {
                                continue;
                            };
                            let mut event = Event::default().data(payload.data);
                            if let Some(name) = payload.event {
                                event = event.event(name);
                            }

                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => {
                            // Skip lagged messages but keep the stream alive.
                            continue;
                        }
                    }
                }
            }
        }

        tracing::info!("SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn event_names_are_stable() {
        assert_eq!(
            event_name(&DomainEvent::PuzzleCreated {
                puzzle_id: Uuid::new_v4()
            }),
            "puzzle_created"
        );
        assert_eq!(
            event_name(&DomainEvent::SessionClosed {
                session_id: Uuid::new_v4()
            }),
            "session_closed"
        );
    }
}
