use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::user::{CreateUserRequest, UserView},
    error::AppError,
    services::user_service,
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserView),
        (status = 400, description = "Invalid payload"),
    )
)]
/// Create a user.
pub async fn create_user(
    State(state): State<SharedState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    let view = user_service::create_user(&state, request)?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "All registered users", body = [UserView]))
)]
/// List all registered users.
pub async fn list_users(State(state): State<SharedState>) -> Json<Vec<UserView>> {
    Json(user_service::list_users(&state))
}

/// Configure the user routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/users", post(create_user).get(list_users))
}
