use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload carrying store counts.
pub fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.store().stats())
}
