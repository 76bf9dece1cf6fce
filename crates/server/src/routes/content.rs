//! Routes for creating, reading, editing and deleting content of any kind.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::content::ContentRecord;
use serde::Deserialize;
use serde_json::Value;
use services::services::content_ingestion::{IngestOutcome, IngestionMetadata};
use utils::response::ApiResponse;

use crate::{AppState, actor::Actor, error::ApiError};

const CREATED_MESSAGE: &str = "تم إنشاء المحتوى بنجاح";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Pull `type` and `data` out of a `{type, data}` body. A missing `data`
/// is treated as an empty object so every field violation is reported.
fn split_submission(mut body: Value) -> (String, Value) {
    let tag = match body.get("type") {
        Some(Value::String(tag)) => tag.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let data = body
        .get_mut("data")
        .map(Value::take)
        .unwrap_or(Value::Null);
    (tag, data)
}

/// POST /api/content
pub async fn create_content(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<ContentRecord, IngestionMetadata>>), ApiError> {
    let Json(body) = payload?;
    let (tag, data) = split_submission(body);

    match state.content.ingest(&tag, data, &actor_id).await {
        IngestOutcome::Created(created) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success_with_metadata(
                created.record,
                CREATED_MESSAGE,
                created.metadata,
            )),
        )),
        IngestOutcome::Rejected(rejection) => Err(ApiError::Rejected(rejection)),
        IngestOutcome::Failed(failure) => Err(ApiError::Storage(failure)),
    }
}

/// GET /api/content/{type}
pub async fn list_content(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ResponseJson<ApiResponse<Vec<ContentRecord>>>, ApiError> {
    let Query(query) = query?;
    let records = state
        .content
        .list(&content_type, query.limit, query.offset)
        .await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

/// GET /api/content/{type}/{id}
pub async fn get_content(
    State(state): State<AppState>,
    Path((content_type, id)): Path<(String, String)>,
) -> Result<ResponseJson<ApiResponse<ContentRecord>>, ApiError> {
    let record = state.content.get(&content_type, &id).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

/// PUT /api/content/{type}/{id} with `{data}`
pub async fn update_content(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path((content_type, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<ContentRecord>>, ApiError> {
    let Json(body) = payload?;
    let (_, data) = split_submission(body);
    let record = state
        .content
        .update(&content_type, &id, data, &actor_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

/// DELETE /api/content/{type}/{id}
pub async fn delete_content(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path((content_type, id)): Path<(String, String)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    state.content.delete(&content_type, &id, &actor_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/content", post(create_content))
        .route("/content/{content_type}", get(list_content))
        .route(
            "/content/{content_type}/{id}",
            get(get_content).put(update_content).delete(delete_content),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_split_submission() {
        let (tag, data) = split_submission(json!({ "type": "post", "data": { "title": "t" } }));
        assert_eq!(tag, "post");
        assert_eq!(data, json!({ "title": "t" }));

        let (tag, data) = split_submission(json!({ "type": 7 }));
        assert_eq!(tag, "7");
        assert_eq!(data, Value::Null);
    }
}
