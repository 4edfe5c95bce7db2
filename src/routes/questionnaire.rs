use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use crate::questionnaire::{QuestionSpec, Questionnaire};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct QuestionnaireResponse {
    pub total_questions: usize,
    pub questions: Vec<QuestionSpec>,
}

impl From<Arc<Questionnaire>> for QuestionnaireResponse {
    fn from(q: Arc<Questionnaire>) -> Self {
        Self {
            total_questions: q.total(),
            questions: q.iter().cloned().collect(),
        }
    }
}

pub async fn get_questionnaire(State(state): State<AppState>) -> Json<QuestionnaireResponse> {
    Json(state.catalog.snapshot().await.into())
}

/// Re-read and re-classify the questionnaire document.
pub async fn reload_questionnaire(State(state): State<AppState>) -> Json<QuestionnaireResponse> {
    Json(state.catalog.reload().await.into())
}
