use serde_json::Map;
use tracing::warn;

use super::prompts;
use super::step::{object, Step, StepType};
use crate::llm::{Oracle, SamplingParams};
use crate::questionnaire::Questionnaire;
use crate::session::AnswerMap;

/// Question text for a stored answer id such as `q_ai_3`.
pub fn question_label(question_id: &str, questionnaire: &Questionnaire) -> String {
    let number = question_id
        .rsplit('_')
        .next()
        .and_then(|tail| tail.parse::<u32>().ok());
    match number {
        Some(n) => questionnaire
            .get(n)
            .map(|q| q.text.clone())
            .unwrap_or_else(|| format!("Question {}", n)),
        None => format!("Question for {}", question_id),
    }
}

pub fn qa_pairs(answers: &AnswerMap, questionnaire: &Questionnaire) -> String {
    answers
        .iter()
        .map(|(id, answer)| {
            format!(
                "Q: {}\nA: {}",
                question_label(id, questionnaire),
                answer.display_value()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn fallback_summary(answers: &AnswerMap) -> String {
    let subject = answers
        .values()
        .next()
        .filter(|a| a.given_value().is_some())
        .map(|a| a.display_value())
        .unwrap_or_else(|| "your inner voice".to_string());
    format!(
        "Thank you for exploring your relationship with {subject} and reflecting on its impact on your life. \
         Your willingness to examine these patterns and commit to positive change demonstrates real courage and self-awareness. \
         This kind of honest self-reflection is a powerful foundation for continued growth and healing."
    )
}

/// Narrative summary, and whether the oracle wrote it.
pub async fn summarize(
    oracle: &dyn Oracle,
    answers: &AnswerMap,
    questionnaire: &Questionnaire,
) -> (String, bool) {
    let user = prompts::summary_user_prompt(&qa_pairs(answers, questionnaire));
    match oracle
        .complete(prompts::SUMMARY_SYSTEM_PROMPT, &user, SamplingParams::SUMMARY)
        .await
    {
        Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), true),
        Ok(_) => {
            warn!("oracle returned an empty summary, using template");
            (fallback_summary(answers), false)
        }
        Err(e) => {
            warn!(error = %e, "summary generation failed, using template");
            (fallback_summary(answers), false)
        }
    }
}

/// Terminal step shown once every question has an answer.
pub async fn summary_step(
    oracle: &dyn Oracle,
    session_id: &str,
    answers: &AnswerMap,
    questionnaire: &Questionnaire,
) -> Step {
    let (summary, ai_generated) = summarize(oracle, answers, questionnaire).await;

    let mut context = object! {
        "session_id": session_id,
        "sequence": answers.len() + 1,
        "summary": summary,
        "total_questions": questionnaire.total(),
        "completed": true,
    };
    if ai_generated {
        context.insert("ai_generated".into(), true.into());
    } else {
        context.insert("fallback".into(), true.into());
    }

    Step {
        id: "step_summary".to_string(),
        step_type: StepType::Info,
        question: None,
        ui: object! {
            "next_button_label": "Start New Session",
            "summary_text": summary,
            "show_restart": true,
        },
        validation: Map::new(),
        context,
    }
}
