use axum::{Json, Router, routing::get};

use crate::{
    domain::status,
    dto::puzzle::StatusView,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/statuses",
    responses((status = 200, description = "The status registry in workflow order", body = [StatusView]))
)]
/// List every status in the registry, in canonical workflow order.
pub async fn list_statuses() -> Json<Vec<StatusView>> {
    Json(status::ALL.into_iter().map(StatusView::from).collect())
}

/// Configure the status registry routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/statuses", get(list_statuses))
}
