use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::puzzle::{
        ChangeStatusRequest, CreatePseudoAnswerRequest, CreatePuzzleRequest, PuzzleView,
        SpoilRequest, TransitionView, UnspoilRequest,
    },
    error::AppError,
    services::{auth, puzzle_service},
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/puzzles",
    request_body = CreatePuzzleRequest,
    responses(
        (status = 201, description = "Puzzle created with the actor as lead author", body = PuzzleView),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Missing X-User-Id header"),
    )
)]
/// Create a puzzle. The acting user becomes the lead author.
pub async fn create_puzzle(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<CreatePuzzleRequest>,
) -> Result<(StatusCode, Json<PuzzleView>), AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    let view = puzzle_service::create_puzzle(&state, &actor, request)?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/puzzles",
    responses((status = 200, description = "All puzzles, redacted per viewer", body = [PuzzleView]))
)]
/// List all puzzles as the viewer is allowed to see them.
pub async fn list_puzzles(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PuzzleView>>, AppError> {
    let viewer = auth::resolve_actor(&state, &headers)?;
    Ok(Json(puzzle_service::list_puzzles(&state, &viewer)))
}

#[utoipa::path(
    get,
    path = "/puzzles/{id}",
    params(("id" = Uuid, Path, description = "Puzzle id")),
    responses(
        (status = 200, description = "The puzzle, redacted per viewer", body = PuzzleView),
        (status = 404, description = "Unknown puzzle"),
    )
)]
/// Fetch one puzzle as the viewer is allowed to see it.
pub async fn get_puzzle(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<PuzzleView>, AppError> {
    let viewer = auth::resolve_actor(&state, &headers)?;
    Ok(Json(puzzle_service::get_puzzle(&state, &viewer, id)?))
}

#[utoipa::path(
    post,
    path = "/puzzles/{id}/status",
    params(("id" = Uuid, Path, description = "Puzzle id")),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = PuzzleView),
        (status = 400, description = "Unknown status code"),
        (status = 404, description = "Unknown puzzle"),
    )
)]
/// Set a puzzle's status. Any status may follow any other.
pub async fn change_status(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<PuzzleView>, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    Ok(Json(puzzle_service::change_status(
        &state, &actor, id, request,
    )?))
}

#[utoipa::path(
    get,
    path = "/puzzles/{id}/transitions",
    params(("id" = Uuid, Path, description = "Puzzle id")),
    responses(
        (status = 200, description = "Advisory next statuses for the actor", body = [TransitionView]),
        (status = 404, description = "Unknown puzzle"),
    )
)]
/// Advisory next statuses for the acting user's roles on the puzzle.
pub async fn transitions(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TransitionView>>, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    Ok(Json(puzzle_service::transitions(&state, &actor, id)?))
}

#[utoipa::path(
    post,
    path = "/puzzles/{id}/spoil",
    params(("id" = Uuid, Path, description = "Puzzle id")),
    request_body = SpoilRequest,
    responses(
        (status = 200, description = "Users spoiled", body = PuzzleView),
        (status = 404, description = "Unknown puzzle or user"),
    )
)]
/// Spoil the listed users, or the actor when the list is empty.
pub async fn spoil(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<SpoilRequest>,
) -> Result<Json<PuzzleView>, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    Ok(Json(puzzle_service::spoil(&state, &actor, id, request)?))
}

#[utoipa::path(
    post,
    path = "/puzzles/{id}/unspoil",
    params(("id" = Uuid, Path, description = "Puzzle id")),
    request_body = UnspoilRequest,
    responses(
        (status = 200, description = "User unspoiled", body = PuzzleView),
        (status = 403, description = "Missing unspoil capability"),
        (status = 404, description = "Unknown puzzle"),
    )
)]
/// Remove a user from the spoiled set. Requires the unspoil capability.
pub async fn unspoil(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<UnspoilRequest>,
) -> Result<Json<PuzzleView>, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    Ok(Json(puzzle_service::unspoil(&state, &actor, id, request)?))
}

#[utoipa::path(
    post,
    path = "/puzzles/{id}/pseudo-answers",
    params(("id" = Uuid, Path, description = "Puzzle id")),
    request_body = CreatePseudoAnswerRequest,
    responses(
        (status = 204, description = "Pattern registered"),
        (status = 403, description = "Actor is not spoiled on the puzzle"),
        (status = 404, description = "Unknown puzzle"),
    )
)]
/// Register a partial-credit answer pattern on a puzzle.
pub async fn add_pseudo_answer(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<CreatePseudoAnswerRequest>,
) -> Result<StatusCode, AppError> {
    let actor = auth::resolve_actor(&state, &headers)?;
    puzzle_service::add_pseudo_answer(&state, &actor, id, request)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Configure the puzzle routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/puzzles", post(create_puzzle).get(list_puzzles))
        .route("/puzzles/{id}", get(get_puzzle))
        .route("/puzzles/{id}/status", post(change_status))
        .route("/puzzles/{id}/transitions", get(transitions))
        .route("/puzzles/{id}/spoil", post(spoil))
        .route("/puzzles/{id}/unspoil", post(unspoil))
        .route("/puzzles/{id}/pseudo-answers", post(add_pseudo_answer))
}
