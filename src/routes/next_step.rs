use axum::extract::State;
use axum::response::Json;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::flow::Step;
use crate::session::{Answer, Session};
use crate::state::AppState;

/// Stateless-client entry point: the caller may send its whole answer set
/// with every request. Unknown sessions are created on the fly.
pub async fn post_next_step(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Step>, ApiError> {
    let session_id = payload
        .get("session_id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("session_id is required".to_string()))?
        .to_string();

    let incoming = match payload.get("answers") {
        None | Some(Value::Null) => serde_json::Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return Err(ApiError::BadRequest("answers must be an object".to_string())),
    };

    let mut session = match state.store.get(&session_id).await? {
        Some(session) => session,
        None => {
            debug!(session_id = %session_id, "creating session from next_step");
            Session::new(session_id.clone())
        }
    };

    for (question_id, raw) in incoming {
        session.record(question_id, Answer::from(raw));
    }
    state.store.put(session).await?;

    let step = state.flow.next_step(&session_id).await?;
    Ok(Json(step))
}
