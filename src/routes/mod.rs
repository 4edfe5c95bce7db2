mod next_step;
mod questionnaire;
mod sessions;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState, enable_cors: bool) -> Router {
    let app = Router::new()
        .route("/sessions", post(sessions::create_session))
        .route(
            "/sessions/{sid}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/sessions/{sid}/answer", post(sessions::post_answer))
        .route("/next_step", post(next_step::post_next_step))
        .route("/questionnaire", get(questionnaire::get_questionnaire))
        .route("/questionnaire/reload", post(questionnaire::reload_questionnaire))
        .route("/health", get(health_check))
        .with_state(state);

    if enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

async fn health_check() -> &'static str {
    "OK"
}
