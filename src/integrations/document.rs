use futures::future::BoxFuture;
use tracing::debug;
use uuid::Uuid;

use crate::integrations::chat::IntegrationResult;

/// Abstraction over the collaborative document backend.
pub trait DocumentService: Send + Sync {
    /// Create the content document for a puzzle, returning its id.
    fn create_document(&self, puzzle_id: Uuid) -> BoxFuture<'static, IntegrationResult<String>>;
}

/// Document collaborator that only logs.
pub struct LoggingDocuments;

impl DocumentService for LoggingDocuments {
    fn create_document(&self, puzzle_id: Uuid) -> BoxFuture<'static, IntegrationResult<String>> {
        Box::pin(async move {
            let document_id = format!("doc-{}", puzzle_id.simple());
            debug!(%puzzle_id, document_id, "would create content document");
            Ok(document_id)
        })
    }
}
