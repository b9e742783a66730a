use futures::future::BoxFuture;
use tracing::debug;
use uuid::Uuid;

/// Result alias for integration calls.
pub type IntegrationResult<T> = Result<T, anyhow::Error>;

/// Abstraction over the team chat workspace.
pub trait ChatIntegration: Send + Sync {
    /// Ensure the puzzle has a chat channel, returning its id.
    fn ensure_channel(&self, puzzle_id: Uuid) -> BoxFuture<'static, IntegrationResult<String>>;
    /// Move the puzzle's channel into the category for a status code.
    fn move_category(
        &self,
        puzzle_id: Uuid,
        status_code: &str,
    ) -> BoxFuture<'static, IntegrationResult<()>>;
    /// Grant a user access to the puzzle's channel.
    fn grant_access(
        &self,
        puzzle_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, IntegrationResult<()>>;
    /// Revoke a user's access to the puzzle's channel.
    fn revoke_access(
        &self,
        puzzle_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, IntegrationResult<()>>;
}

/// Chat collaborator that only logs, for deployments without a workspace.
pub struct LoggingChat;

impl ChatIntegration for LoggingChat {
    fn ensure_channel(&self, puzzle_id: Uuid) -> BoxFuture<'static, IntegrationResult<String>> {
        Box::pin(async move {
            let channel_id = format!("channel-{}", puzzle_id.simple());
            debug!(%puzzle_id, channel_id, "would create chat channel");
            Ok(channel_id)
        })
    }

    fn move_category(
        &self,
        puzzle_id: Uuid,
        status_code: &str,
    ) -> BoxFuture<'static, IntegrationResult<()>> {
        let status_code = status_code.to_owned();
        Box::pin(async move {
            debug!(%puzzle_id, status_code, "would move chat channel category");
            Ok(())
        })
    }

    fn grant_access(
        &self,
        puzzle_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, IntegrationResult<()>> {
        Box::pin(async move {
            debug!(%puzzle_id, %user_id, "would grant chat access");
            Ok(())
        })
    }

    fn revoke_access(
        &self,
        puzzle_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, IntegrationResult<()>> {
        Box::pin(async move {
            debug!(%puzzle_id, %user_id, "would revoke chat access");
            Ok(())
        })
    }
}
