use std::sync::Arc;

use crate::flow::StepGenerator;
use crate::questionnaire::QuestionCatalog;
use crate::session::SessionStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub catalog: Arc<QuestionCatalog>,
    pub flow: Arc<StepGenerator>,
}
