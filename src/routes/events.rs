use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::event_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/events",
    responses((status = 200, description = "Domain event SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream domain events to connected clients.
pub async fn event_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = event_service::subscribe(&state);
    info!("new SSE connection");
    event_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/events", get(event_stream))
}
