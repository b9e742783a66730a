use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        puzzle::SpoilRequest,
        round::{CreateAnswerRequest, CreateRoundRequest, RoundView},
    },
    error::AppError,
    services::{auth, round_service},
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/rounds",
    request_body = CreateRoundRequest,
    responses(
        (status = 201, description = "Round created", body = RoundView),
        (status = 403, description = "Missing edit-rounds capability"),
    )
)]
/// Create a round. Requires the edit-rounds capability.
pub async fn create_round(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<CreateRoundRequest>,
) -> Result<(StatusCode, Json<RoundView>), AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    let view = round_service::create_round(&state, &actor, request)?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/rounds",
    responses((status = 200, description = "All rounds, redacted per viewer", body = [RoundView]))
)]
/// List all rounds as the viewer is allowed to see them.
pub async fn list_rounds(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoundView>>, AppError> {
    let viewer = auth::resolve_actor(&state, &headers)?;
    Ok(Json(round_service::list_rounds(&state, &viewer)))
}

#[utoipa::path(
    post,
    path = "/rounds/{id}/spoil",
    params(("id" = Uuid, Path, description = "Round id")),
    request_body = SpoilRequest,
    responses(
        (status = 200, description = "Users spoiled on the round", body = RoundView),
        (status = 404, description = "Unknown round or user"),
    )
)]
/// Spoil the listed users, or the actor when the list is empty, on a round.
pub async fn spoil_round(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<SpoilRequest>,
) -> Result<Json<RoundView>, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    Ok(Json(round_service::spoil_round(&state, &actor, id, request)?))
}

#[utoipa::path(
    post,
    path = "/rounds/{id}/answers",
    params(("id" = Uuid, Path, description = "Round id")),
    request_body = CreateAnswerRequest,
    responses(
        (status = 201, description = "Answer created, returning its id", body = Uuid),
        (status = 403, description = "Missing edit-rounds capability"),
        (status = 404, description = "Unknown round"),
    )
)]
/// Create an answer inside a round.
pub async fn create_answer(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateAnswerRequest>,
) -> Result<(StatusCode, Json<Uuid>), AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    let answer_id = round_service::create_answer(&state, &actor, id, request)?;
    Ok((StatusCode::CREATED, Json(answer_id)))
}

#[utoipa::path(
    post,
    path = "/answers/{id}/assign/{puzzle_id}",
    params(
        ("id" = Uuid, Path, description = "Answer id"),
        ("puzzle_id" = Uuid, Path, description = "Puzzle id"),
    ),
    responses(
        (status = 204, description = "Answer linked to the puzzle"),
        (status = 403, description = "Missing edit-rounds capability"),
        (status = 404, description = "Unknown answer or puzzle"),
    )
)]
/// Link an answer to a puzzle.
pub async fn assign_answer(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((id, puzzle_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    round_service::assign_answer(&state, &actor, id, puzzle_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Configure the round and answer routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/rounds", post(create_round).get(list_rounds))
        .route("/rounds/{id}/spoil", post(spoil_round))
        .route("/rounds/{id}/answers", post(create_answer))
        .route("/answers/{id}/assign/{puzzle_id}", post(assign_answer))
}
