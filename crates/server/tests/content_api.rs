use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use db::DBService;
use serde_json::{Value, json};
use server::{AppState, actor::ACTOR_HEADER, routes};
use services::services::content_ingestion::IngestionOptions;
use tower::ServiceExt;

async fn create_test_app() -> Router {
    let db = DBService::new_in_memory().await.unwrap();
    let app = routes::router(AppState::new(db, IngestionOptions::default()));
    for (actor, name) in [("actor-1", "Amina"), ("actor-2", "Yuba")] {
        let (status, _) = send(
            app.clone(),
            "PUT",
            "/api/users/me",
            Some(actor),
            Some(json!({ "name": name, "username": name.to_lowercase(), "image": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    app
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    actor: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = body.map(|body| body.to_string());
    send_raw(app, method, uri, actor, body).await
}

async fn send_raw(
    app: Router,
    method: &str,
    uri: &str,
    actor: Option<&str>,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(actor) = actor {
        request = request.header(ACTOR_HEADER, actor);
    }
    let request = request
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create_post(app: &Router, actor: &str) -> String {
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/content",
        Some(actor),
        Some(json!({
            "type": "post",
            "data": { "title": " Azul ", "content": "Hello", "category": "greetings" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_returns_envelope_with_author() {
    let app = create_test_app().await;
    let (status, body) = send(
        app,
        "POST",
        "/api/content",
        Some("actor-1"),
        Some(json!({
            "type": "video",
            "data": {
                "title": "Tafsut",
                "content": "Spring festival",
                "category": "music",
                "videoUrl": "https://videos.example.com/tafsut.mp4",
                "duration": "00:04:12"
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());
    assert_eq!(body["data"]["title"], "Tafsut");
    assert_eq!(body["data"]["category"], "فيديوهات");
    assert_eq!(body["data"]["author"]["name"], "Amina");
    assert_eq!(body["data"]["_count"]["likes"], 0);
    assert_eq!(body["metadata"]["contentType"], "video");
    assert_eq!(body["metadata"]["authorId"], "actor-1");
    assert_eq!(body["metadata"]["contentId"], body["data"]["id"]);
    assert!(body["metadata"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_type_is_rejected() {
    let app = create_test_app().await;
    let (status, body) = send(
        app,
        "POST",
        "/api/content",
        Some("actor-1"),
        Some(json!({ "type": "poem", "data": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_CONTENT_TYPE");
    assert_eq!(body["received"], "poem");
}

#[tokio::test]
async fn test_validation_failures_are_all_listed() {
    let app = create_test_app().await;
    let (status, body) = send(
        app,
        "POST",
        "/api/content",
        Some("actor-1"),
        Some(json!({ "type": "word", "data": { "title": "   " } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    let details = body["details"].as_array().unwrap();
    assert!(details.len() >= 3);
    assert!(details.contains(&json!("الكلمة مطلوبة")));
}

#[tokio::test]
async fn test_missing_actor_is_unauthorized() {
    let app = create_test_app().await;
    let (status, body) = send(
        app,
        "POST",
        "/api/content",
        None,
        Some(json!({ "type": "post", "data": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_malformed_body_is_invalid_json() {
    let app = create_test_app().await;
    let (status, body) = send_raw(
        app,
        "POST",
        "/api/content",
        Some("actor-1"),
        Some("{ not json".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
}

#[tokio::test]
async fn test_duplicate_isbn_is_database_error() {
    let app = create_test_app().await;
    let submission = json!({
        "type": "book",
        "data": { "title": "Nedjma", "content": "Novel", "category": "books", "isbn": "0-306-40615-2" }
    });
    let (status, _) = send(app.clone(), "POST", "/api/content", Some("actor-1"), Some(submission.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, "POST", "/api/content", Some("actor-2"), Some(submission)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn test_read_list_update_delete() {
    let app = create_test_app().await;
    let id = create_post(&app, "actor-1").await;
    let item = format!("/api/content/post/{id}");

    let (status, body) = send(app.clone(), "GET", &item, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Azul");
    assert_eq!(body["data"]["author"]["username"], "amina");

    let (status, body) = send(app.clone(), "GET", "/api/content/post?limit=5", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let edit = json!({ "data": { "title": "Azul fellawen", "content": "Hello all", "category": "greetings" } });
    let (status, body) = send(app.clone(), "PUT", &item, Some("actor-2"), Some(edit.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, body) = send(app.clone(), "PUT", &item, Some("actor-1"), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Azul fellawen");

    let (status, _) = send(app.clone(), "DELETE", &item, Some("actor-1"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app, "GET", &item, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_like_toggle_and_comments() {
    let app = create_test_app().await;
    let id = create_post(&app, "actor-1").await;

    let like = format!("/api/content/post/{id}/like");
    let (status, body) = send(app.clone(), "POST", &like, Some("actor-2"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "liked": true, "likes": 1 }));
    let (_, body) = send(app.clone(), "POST", &like, Some("actor-2"), None).await;
    assert_eq!(body["data"], json!({ "liked": false, "likes": 0 }));

    let comments = format!("/api/content/post/{id}/comments");
    let (status, _) = send(
        app.clone(),
        "POST",
        &comments,
        Some("actor-2"),
        Some(json!({ "body": "Tanemmirt" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(app.clone(), "GET", &format!("/api/content/post/{id}"), None, None).await;
    assert_eq!(body["data"]["_count"]["comments"], 1);
    assert_eq!(body["data"]["comments"][0]["user"]["name"], "Yuba");

    let (status, _) = send(app, "POST", "/api/content/post/missing/like", Some("actor-2"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
