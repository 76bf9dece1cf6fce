use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod content;
pub mod engagement;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(content::router(&state))
        .merge(engagement::router(&state))
        .merge(users::router(&state))
        .route("/health", get(health::health_check));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
