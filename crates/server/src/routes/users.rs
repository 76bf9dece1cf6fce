//! Profile sync for the acting user so author joins resolve.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::Json as ResponseJson,
    routing::put,
};
use db::models::user::{UpsertUser, User};
use services::services::content_validation::Rejection;
use utils::response::ApiResponse;

use crate::{AppState, actor::Actor, error::ApiError};

const NAME_REQUIRED: &str = "الاسم مطلوب";

/// PUT /api/users/me
pub async fn upsert_me(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    payload: Result<Json<UpsertUser>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let Json(mut profile) = payload?;
    profile.name = profile.name.trim().to_string();
    if profile.name.is_empty() {
        return Err(Rejection::Invalid(vec![NAME_REQUIRED.to_string()]).into());
    }
    profile.username = profile
        .username
        .map(|username| username.trim().to_string())
        .filter(|username| !username.is_empty());

    let user = User::upsert(&state.db.pool, &actor_id, &profile).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

/// GET /api/users/me
pub async fn get_me(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let user = User::find_by_id(&state.db.pool, &actor_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().route("/users/me", put(upsert_me).get(get_me))
}
