//! External collaborator seams: chat, documents, notifications.
//!
//! All integration work is fire-and-forget. A consumer task subscribes to
//! the domain event hub, dispatches each event to the configured
//! collaborators, and logs any failure at `warn`. Nothing here ever feeds
//! an error back into the operation that emitted the event.

/// Chat workspace integration seam.
pub mod chat;
/// Collaborative document integration seam.
pub mod document;
/// Subscriber notification seam.
pub mod notify;

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::state::{DomainEvent, SharedState};

pub use self::chat::{ChatIntegration, LoggingChat};
pub use self::document::{DocumentService, LoggingDocuments};
pub use self::notify::{LoggingNotifier, Notifier};

/// The set of collaborators the consumer dispatches to.
pub struct Integrations {
    /// Chat workspace collaborator.
    pub chat: Arc<dyn ChatIntegration>,
    /// Document collaborator.
    pub documents: Arc<dyn DocumentService>,
    /// Notification collaborator.
    pub notifier: Arc<dyn Notifier>,
}

impl Integrations {
    /// Logging-only collaborators, the default for a standalone deployment.
    pub fn logging() -> Self {
        Self {
            chat: Arc::new(LoggingChat),
            documents: Arc::new(LoggingDocuments),
            notifier: Arc::new(LoggingNotifier),
        }
    }
}

/// Run the integration consumer until the event hub closes. Spawned once
/// at startup.
pub async fn run_consumer(state: SharedState, integrations: Integrations) {
    let mut receiver = state.events().subscribe();
    loop {
        let event = match receiver.recv().await {
            Ok(event) => event,
            Err(RecvError::Closed) => break,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "integration consumer lagged behind the event hub");
                continue;
            }
        };
        dispatch(&state, &integrations, event).await;
    }
}

/// Dispatch one event to the collaborators, logging failures and moving
/// on.
async fn dispatch(state: &SharedState, integrations: &Integrations, event: DomainEvent) {
    match event {
        DomainEvent::PuzzleCreated { puzzle_id } => {
            match integrations.chat.ensure_channel(puzzle_id).await {
                Ok(channel_id) => {
                    let _ = state
                        .store()
                        .with_puzzle(puzzle_id, |p| p.chat_channel_id = Some(channel_id));
                }
                Err(err) => warn!(%puzzle_id, error = %err, "chat channel setup failed"),
            }
            match integrations.documents.create_document(puzzle_id).await {
                Ok(document_id) => {
                    let _ = state
                        .store()
                        .with_puzzle(puzzle_id, |p| p.content_document_id = Some(document_id));
                }
                Err(err) => warn!(%puzzle_id, error = %err, "document creation failed"),
            }
        }
        DomainEvent::StatusChanged { puzzle_id, to, .. } => {
            if let Err(err) = integrations.chat.move_category(puzzle_id, to.code()).await {
                warn!(%puzzle_id, error = %err, "chat category move failed");
            }
            if let Err(err) = integrations
                .notifier
                .notify(puzzle_id, &format!("status is now {}", to.display()))
                .await
            {
                warn!(%puzzle_id, error = %err, "status notification failed");
            }
        }
        DomainEvent::SpoiledAdded { puzzle_id, user_id } => {
            if let Err(err) = integrations.chat.grant_access(puzzle_id, user_id).await {
                warn!(%puzzle_id, %user_id, error = %err, "chat access grant failed");
            }
        }
        DomainEvent::SpoiledRemoved { puzzle_id, user_id } => {
            if let Err(err) = integrations.chat.revoke_access(puzzle_id, user_id).await {
                warn!(%puzzle_id, %user_id, error = %err, "chat access revoke failed");
            }
        }
        DomainEvent::SessionSolved { puzzle_id, session_id } => {
            if let Err(err) = integrations
                .notifier
                .notify(puzzle_id, &format!("session {session_id} solved the puzzle"))
                .await
            {
                warn!(%puzzle_id, error = %err, "solve notification failed");
            }
        }
        // Purely informational for the SSE stream.
        DomainEvent::RoundSpoiledAdded { .. }
        | DomainEvent::SessionStarted { .. }
        | DomainEvent::ParticipantJoined { .. }
        | DomainEvent::GuessSubmitted { .. }
        | DomainEvent::SessionClosed { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, domain::puzzle::Puzzle, state::AppState};
    use uuid::Uuid;

    #[tokio::test]
    async fn puzzle_creation_writes_back_collaborator_ids() {
        let state = AppState::new(AppConfig::default());
        let puzzle = Puzzle::new("P".into(), "cn".into(), Uuid::new_v4());
        let id = puzzle.id;
        state.store().put_puzzle(puzzle);

        let integrations = Integrations::logging();
        dispatch(&state, &integrations, DomainEvent::PuzzleCreated { puzzle_id: id }).await;

        let puzzle = state.store().puzzle(id).unwrap();
        assert!(puzzle.chat_channel_id.is_some());
        assert!(puzzle.content_document_id.is_some());
    }

    #[tokio::test]
    async fn unknown_puzzles_do_not_panic_the_consumer() {
        let state = AppState::new(AppConfig::default());
        let integrations = Integrations::logging();
        dispatch(
            &state,
            &integrations,
            DomainEvent::PuzzleCreated {
                puzzle_id: Uuid::new_v4(),
            },
        )
        .await;
    }
}
