use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::testsolve::{FinishRequest, GuessRequest, SessionView, StartSessionRequest},
    error::AppError,
    services::{auth, testsolve_service},
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/testsolves",
    request_body = StartSessionRequest,
    responses(
        (status = 201, description = "Session started", body = SessionView),
        (status = 409, description = "Testsolving disabled or puzzle not ready"),
        (status = 404, description = "Unknown puzzle"),
    )
)]
/// Start a testsolve session with the actor as its first participant.
pub async fn start_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    let view = testsolve_service::start_session(&state, &actor, request)?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/testsolves",
    responses((status = 200, description = "Sessions currently advertised for joining", body = [SessionView]))
)]
/// List sessions currently advertised for joining.
pub async fn list_sessions(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SessionView>>, AppError> {
    let viewer = auth::resolve_actor(&state, &headers)?;
    Ok(Json(testsolve_service::list_joinable(&state, &viewer)))
}

#[utoipa::path(
    get,
    path = "/testsolves/{id}",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "The session", body = SessionView),
        (status = 404, description = "Unknown session"),
    )
)]
/// Fetch one session.
pub async fn get_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let viewer = auth::resolve_actor(&state, &headers)?;
    Ok(Json(testsolve_service::get_session(&state, &viewer, id)?))
}

#[utoipa::path(
    post,
    path = "/testsolves/{id}/join",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Joined, or already a participant", body = SessionView),
        (status = 409, description = "Session closed or not accepting solvers"),
    )
)]
/// Join a session. Idempotent for existing participants.
pub async fn join_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    Ok(Json(testsolve_service::join_session(&state, &actor, id)?))
}

#[utoipa::path(
    post,
    path = "/testsolves/{id}/guesses",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = GuessRequest,
    responses(
        (status = 200, description = "Guess recorded and classified", body = SessionView),
        (status = 403, description = "Actor is not a participant"),
        (status = 409, description = "Session closed"),
    )
)]
/// Submit a guess on behalf of the acting participant.
pub async fn submit_guess(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<GuessRequest>,
) -> Result<Json<SessionView>, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    Ok(Json(testsolve_service::submit_guess(
        &state, &actor, id, request,
    )?))
}

#[utoipa::path(
    post,
    path = "/testsolves/{id}/finish",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = FinishRequest,
    responses(
        (status = 200, description = "Ratings recorded, feedback appended", body = SessionView),
        (status = 400, description = "Ratings out of range"),
        (status = 403, description = "Actor is not a participant"),
    )
)]
/// Finish the session for the acting participant.
pub async fn finish_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<FinishRequest>,
) -> Result<Json<SessionView>, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    Ok(Json(testsolve_service::finish_session(
        &state, &actor, id, request,
    )?))
}

#[utoipa::path(
    post,
    path = "/testsolves/{id}/escape",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 204, description = "Participation deleted"),
        (status = 404, description = "Unknown session or not a participant"),
    )
)]
/// Leave a session as if the actor was never there.
pub async fn escape_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    testsolve_service::escape_session(&state, &actor, id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/testsolves/{id}/close",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session closed", body = SessionView),
        (status = 403, description = "Missing close-session capability"),
        (status = 409, description = "Session already closed"),
    )
)]
/// Close a session for everyone. Requires the close-session capability.
pub async fn close_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    Ok(Json(testsolve_service::close_session(&state, &actor, id)?))
}

/// Configure the testsolve routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/testsolves", post(start_session).get(list_sessions))
        .route("/testsolves/{id}", get(get_session))
        .route("/testsolves/{id}/join", post(join_session))
        .route("/testsolves/{id}/guesses", post(submit_guess))
        .route("/testsolves/{id}/finish", post(finish_session))
        .route("/testsolves/{id}/escape", post(escape_session))
        .route("/testsolves/{id}/close", post(close_session))
}
