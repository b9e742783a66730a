use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::store::StoreStats;

/// Simple health response returned by the `/healthz` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, always "ok" for an in-memory store.
    pub status: String,
    /// Record counts in the store.
    pub stats: StoreStats,
}

impl HealthResponse {
    /// Create a health response carrying the current store counts.
    pub fn ok(stats: StoreStats) -> Self {
        Self {
            status: "ok".to_string(),
            stats,
        }
    }
}
