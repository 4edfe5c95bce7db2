pub mod fallback;
pub mod prompts;
pub mod question;
pub mod step;
pub mod summary;

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ApiError;
use crate::llm::Oracle;
use crate::questionnaire::{QuestionCatalog, Questionnaire};
use crate::session::{AnswerMap, SessionStore};
pub use step::Step;

/// Linear questionnaire walk: `ASKING(n)` for `1 <= n <= total`, then a
/// terminal summary. The position is always `answers + 1`; nothing moves it
/// backward or skips ahead.
pub struct StepGenerator {
    oracle: Arc<dyn Oracle>,
    catalog: Arc<QuestionCatalog>,
    store: Arc<dyn SessionStore>,
}

impl StepGenerator {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        catalog: Arc<QuestionCatalog>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            oracle,
            catalog,
            store,
        }
    }

    /// Advance a stored session: refresh its cached sequence and build the
    /// step for that position.
    pub async fn next_step(&self, session_id: &str) -> Result<Step, ApiError> {
        let session = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| ApiError::SessionNotFound(session_id.to_string()))?;

        let sequence = session.next_sequence();
        if session.sequence != sequence
            && !self.store.update_sequence(session_id, sequence).await?
        {
            return Err(ApiError::SessionNotFound(session_id.to_string()));
        }
        let answers = session.answers;

        let questionnaire = self.catalog.snapshot().await;
        Ok(self
            .step_for(session_id, &answers, sequence, &questionnaire)
            .await)
    }

    /// Step for `sequence` given `answers`. Never fails: oracle problems
    /// degrade to canned content.
    pub async fn step_for(
        &self,
        session_id: &str,
        answers: &AnswerMap,
        sequence: u32,
        questionnaire: &Questionnaire,
    ) -> Step {
        let total = questionnaire.total();
        if sequence as usize > total {
            info!(session_id, sequence, total, "questionnaire complete, summarizing");
            return self.summary_step(session_id, answers, questionnaire).await;
        }

        // Gap in the numbering: nothing left to ask at this position
        let Some(spec) = questionnaire.get(sequence) else {
            warn!(session_id, sequence, "no question at sequence, summarizing");
            return self.summary_step(session_id, answers, questionnaire).await;
        };

        match question::generate_question(
            self.oracle.as_ref(),
            session_id,
            answers,
            spec,
            questionnaire,
        )
        .await
        {
            Ok(step) => step,
            Err(e) => {
                warn!(session_id, sequence, kind = %spec.kind, error = %e, "question generation failed, using fallback");
                fallback::fallback_question(session_id, sequence, spec.kind, questionnaire)
            }
        }
    }

    pub async fn summary_step(
        &self,
        session_id: &str,
        answers: &AnswerMap,
        questionnaire: &Questionnaire,
    ) -> Step {
        summary::summary_step(self.oracle.as_ref(), session_id, answers, questionnaire).await
    }
}
