use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod events;
pub mod health;
pub mod puzzles;
pub mod rounds;
pub mod statuses;
pub mod testsolves;
pub mod users;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(statuses::router())
        .merge(users::router())
        .merge(puzzles::router())
        .merge(rounds::router())
        .merge(testsolves::router())
        .merge(events::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
