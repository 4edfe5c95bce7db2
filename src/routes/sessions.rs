use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::flow::Step;
use crate::session::{Answer, Session};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub flow: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub step: Step,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub session_id: String,
    pub question_id: String,
    pub answer: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub step: Step,
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let session_id = Uuid::new_v4().to_string();
    let mut session = Session::new(session_id.clone());
    session.user_id = req.user_id;
    session.flow = req.flow;
    state.store.put(session).await?;
    info!(session_id = %session_id, "session created");

    let step = state.flow.next_step(&session_id).await?;
    Ok(Json(CreateSessionResponse { session_id, step }))
}

pub async fn post_answer(
    State(state): State<AppState>,
    Path(sid): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<StepResponse>, ApiError> {
    if req.session_id != sid {
        return Err(ApiError::SessionNotFound(sid));
    }
    let mut session = state
        .store
        .get(&sid)
        .await?
        .ok_or_else(|| ApiError::SessionNotFound(sid.clone()))?;

    session.record(req.question_id, Answer::from(Value::Object(req.answer)));
    state.store.put(session).await?;

    let step = state.flow.next_step(&sid).await?;
    Ok(Json(StepResponse { step }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<Session>, ApiError> {
    match state.store.get(&sid).await? {
        Some(session) => Ok(Json(session)),
        None => Err(ApiError::SessionNotFound(sid)),
    }
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete(&sid).await? {
        info!(session_id = %sid, "session deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(sid))
    }
}
