mod flashcard;
mod health;
mod history;
mod matching;
mod quiz;
mod session;

use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest("/api/session", session::router())
        .nest("/api/quiz", quiz::router())
        .nest("/api/match", matching::router())
        .nest("/api/flashcard", flashcard::router())
        .nest("/api/history", history::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "接口不存在")
}
