pub mod classify;
pub mod parser;
pub mod types;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::llm::Oracle;
use parser::ParsedQuestion;
pub use types::{QuestionKind, QuestionSpec, Questionnaire};

/// Read the questionnaire document. An unreadable file reads as empty.
pub async fn read_document(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read questionnaire, treating as empty");
            String::new()
        }
    }
}

/// Parse and classify a document. One oracle call per distinct sequence.
pub async fn build(raw: String, oracle: &dyn Oracle) -> Questionnaire {
    let latest: BTreeMap<u32, ParsedQuestion> = parser::parse_document(&raw)
        .into_iter()
        .map(|q| (q.sequence, q))
        .collect();

    let mut specs = Vec::with_capacity(latest.len());
    for (sequence, parsed) in latest {
        let kind = classify::classify(oracle, &parsed.full_text(), sequence).await;
        specs.push(QuestionSpec {
            sequence,
            title: parsed.title,
            text: parsed.text,
            kind,
        });
    }

    Questionnaire::new(raw, specs)
}

/// Classified question table, built once and swapped on reload.
pub struct QuestionCatalog {
    path: PathBuf,
    oracle: Arc<dyn Oracle>,
    current: RwLock<Arc<Questionnaire>>,
}

impl QuestionCatalog {
    pub async fn load(path: impl Into<PathBuf>, oracle: Arc<dyn Oracle>) -> Self {
        let path = path.into();
        let table = build(read_document(&path).await, oracle.as_ref()).await;
        info!(path = %path.display(), questions = table.total(), "questionnaire loaded");
        if table.is_empty() {
            warn!(path = %path.display(), "questionnaire has no questions, sessions go straight to the summary");
        }
        Self {
            path,
            oracle,
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// Fixed table, no backing file. `reload` keeps it unless a file appears at `path`.
    pub fn from_questionnaire(
        path: impl Into<PathBuf>,
        oracle: Arc<dyn Oracle>,
        table: Questionnaire,
    ) -> Self {
        Self {
            path: path.into(),
            oracle,
            current: RwLock::new(Arc::new(table)),
        }
    }

    pub async fn snapshot(&self) -> Arc<Questionnaire> {
        self.current.read().await.clone()
    }

    /// Re-read and re-classify the document, then swap it in.
    /// Readers keep the old table until the new one is complete.
    pub async fn reload(&self) -> Arc<Questionnaire> {
        let raw = read_document(&self.path).await;
        let table = Arc::new(build(raw, self.oracle.as_ref()).await);
        *self.current.write().await = table.clone();
        info!(path = %self.path.display(), questions = table.total(), "questionnaire reloaded");
        table
    }
}
