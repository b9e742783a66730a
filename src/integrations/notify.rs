use futures::future::BoxFuture;
use tracing::debug;
use uuid::Uuid;

use crate::integrations::chat::IntegrationResult;

/// Abstraction over subscriber notifications.
pub trait Notifier: Send + Sync {
    /// Notify a puzzle's subscribers of something that happened to it.
    fn notify(&self, puzzle_id: Uuid, message: &str)
    -> BoxFuture<'static, IntegrationResult<()>>;
}

/// Notifier that only logs.
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(
        &self,
        puzzle_id: Uuid,
        message: &str,
    ) -> BoxFuture<'static, IntegrationResult<()>> {
        let message = message.to_owned();
        Box::pin(async move {
            debug!(%puzzle_id, message, "would notify subscribers");
            Ok(())
        })
    }
}
