use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::post,
};
use db::models::engagement::LikeToggle;
use serde::{Deserialize, Serialize};
use utils::response::ApiResponse;

use crate::{AppState, actor::Actor, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePronunciation {
    pub audio_url: String,
    pub dialect: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedId {
    pub id: String,
}

/// POST /api/content/{type}/{id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path((content_type, id)): Path<(String, String)>,
) -> Result<ResponseJson<ApiResponse<LikeToggle>>, ApiError> {
    let toggle = state
        .engagement
        .toggle_like(&content_type, &id, &actor_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(toggle)))
}

/// POST /api/content/{type}/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path((content_type, id)): Path<(String, String)>,
    payload: Result<Json<CreateComment>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<CreatedId>>), ApiError> {
    let Json(comment) = payload?;
    let comment_id = state
        .engagement
        .comment(&content_type, &id, &actor_id, &comment.body)
        .await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(CreatedId { id: comment_id })),
    ))
}

/// POST /api/content/{type}/{id}/share
pub async fn share_content(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path((content_type, id)): Path<(String, String)>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<CreatedId>>), ApiError> {
    let id = state.engagement.share(&content_type, &id, &actor_id).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(CreatedId { id }))))
}

/// POST /api/content/{type}/{id}/pronunciations
pub async fn create_pronunciation(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path((content_type, id)): Path<(String, String)>,
    payload: Result<Json<CreatePronunciation>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<CreatedId>>), ApiError> {
    let Json(pronunciation) = payload?;
    let id = state
        .engagement
        .pronounce(
            &content_type,
            &id,
            &actor_id,
            &pronunciation.audio_url,
            pronunciation.dialect.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(CreatedId { id }))))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/content/{content_type}/{id}/like", post(toggle_like))
        .route("/content/{content_type}/{id}/comments", post(create_comment))
        .route("/content/{content_type}/{id}/share", post(share_content))
        .route(
            "/content/{content_type}/{id}/pronunciations",
            post(create_pronunciation),
        )
}
