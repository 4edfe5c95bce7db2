use serde::Deserialize;
use serde_json::{Map, Value};

use super::prompts;
use super::step::{button_label, object, placeholder_options, ChoiceOption, Input, Question, Step, StepType};
use crate::error::GenerationError;
use crate::llm::{Oracle, SamplingParams};
use crate::questionnaire::{QuestionKind, QuestionSpec, Questionnaire};
use crate::session::AnswerMap;

const DEGENERATE_LABEL_CHARS: usize = 200;

/// What the oracle proposed for a question. Only phrasing, help, placeholder
/// and options are used; `input_type` is kept for diagnostics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OracleSuggestion {
    pub question: String,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<ChoiceOption>>,
}

/// Remove Markdown code fences around a reply.
pub fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("```json") {
        trimmed.replace("```json", "").replace("```", "").trim().to_string()
    } else if trimmed.starts_with("```") {
        trimmed.replace("```", "").trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Interpret an oracle reply.
///
/// Non-JSON text becomes a degenerate suggestion that echoes the reply as the
/// label. JSON that does not have the expected shape is an error.
pub fn parse_suggestion(raw: &str, kind: QuestionKind) -> Result<OracleSuggestion, serde_json::Error> {
    let cleaned = strip_code_fence(raw);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => serde_json::from_value(value),
        Err(_) => {
            tracing::warn!(reply = %cleaned, "oracle reply is not JSON, echoing it as the label");
            let label: String = cleaned
                .replace('"', "")
                .replace('\n', " ")
                .chars()
                .take(DEGENERATE_LABEL_CHARS)
                .collect();
            Ok(OracleSuggestion {
                question: label,
                input_type: Some(kind.as_str().to_string()),
                placeholder: (kind == QuestionKind::FreeText)
                    .then(|| "Type your answer here".to_string()),
                ..Default::default()
            })
        }
    }
}

/// Input for the classified `kind`, filled from the oracle's suggestion.
pub fn build_input(kind: QuestionKind, suggestion: &OracleSuggestion) -> Input {
    match kind {
        QuestionKind::MultipleChoice | QuestionKind::MultiSelect => {
            let opts = suggestion
                .options
                .clone()
                .filter(|o| !o.is_empty())
                .unwrap_or_else(placeholder_options);
            Input::with_options(kind, opts)
        }
        QuestionKind::YesNo => Input::of(kind),
        QuestionKind::FreeText => Input::free_text(
            suggestion
                .placeholder
                .clone()
                .unwrap_or_else(|| "Share your thoughts...".to_string()),
        ),
    }
}

/// Prior answers as prompt context, one `Q<n> (<kind>): <value>` line each,
/// numbered by position in `answers`.
pub fn render_previous_answers(answers: &AnswerMap) -> String {
    if answers.is_empty() {
        return "This is the first question.".to_string();
    }
    answers
        .values()
        .enumerate()
        .map(|(i, a)| format!("Q{} ({}): {}", i + 1, a.display_kind(), a.display_value()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ask the oracle to phrase `spec` and build the question step from its reply.
pub async fn generate_question(
    oracle: &dyn Oracle,
    session_id: &str,
    answers: &AnswerMap,
    spec: &QuestionSpec,
    questionnaire: &Questionnaire,
) -> Result<Step, GenerationError> {
    let sequence = spec.sequence;
    let kind = spec.kind;
    let total = questionnaire.total();

    let system = prompts::question_system_prompt(&questionnaire.raw, sequence, total, &spec.text, kind);
    let user = if sequence == 1 {
        prompts::first_question_user_prompt(sequence, total, &spec.text, kind)
    } else {
        prompts::follow_up_user_prompt(&render_previous_answers(answers), sequence, total, &spec.text, kind)
    };

    let reply = oracle.complete(&system, &user, SamplingParams::QUESTION).await?;
    let suggestion = parse_suggestion(&reply, kind)?;

    let claimed = suggestion
        .input_type
        .clone()
        .unwrap_or_else(|| kind.as_str().to_string());
    if claimed != kind.as_str() {
        tracing::debug!(sequence, %kind, claimed = %claimed, "ignoring oracle input type");
    }

    Ok(Step {
        id: format!("step_{}", sequence),
        step_type: StepType::Question,
        question: Some(Question {
            id: format!("q_ai_{}", sequence),
            label: suggestion.question.clone(),
            input: build_input(kind, &suggestion),
            required: true,
            help: suggestion.help.clone(),
        }),
        ui: object! { "next_button_label": button_label(sequence, total) },
        validation: Map::new(),
        context: object! {
            "session_id": session_id,
            "sequence": sequence,
            "ai_generated": true,
            "target_type": kind,
            "actual_type": claimed,
            "total_questions": total,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedOracle;
    use crate::session::Answer;

    fn spec(sequence: u32, text: &str, kind: QuestionKind) -> QuestionSpec {
        QuestionSpec {
            sequence,
            title: String::new(),
            text: text.to_string(),
            kind,
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_non_json_reply_becomes_degenerate_label() {
        let raw = format!("Sure! \"Here\" is\nyour question: {}", "x".repeat(300));
        let s = parse_suggestion(&raw, QuestionKind::FreeText).unwrap();
        assert_eq!(s.question.chars().count(), 200);
        assert!(s.question.starts_with("Sure! Here is your question: "));
        assert_eq!(s.input_type.as_deref(), Some("free_text"));
        assert_eq!(s.placeholder.as_deref(), Some("Type your answer here"));

        let s = parse_suggestion("not json", QuestionKind::YesNo).unwrap();
        assert!(s.placeholder.is_none());
    }

    #[test]
    fn test_json_without_question_is_malformed() {
        assert!(parse_suggestion(r#"{"input_type": "yes_no"}"#, QuestionKind::YesNo).is_err());
        assert!(parse_suggestion(r#""just a string""#, QuestionKind::YesNo).is_err());
        assert!(parse_suggestion(r#"{"question": "Q?", "options": "a,b"}"#, QuestionKind::MultiSelect).is_err());
    }

    #[test]
    fn test_build_input_uses_classified_kind() {
        let s = OracleSuggestion {
            question: "Q?".into(),
            input_type: Some("free_text".into()),
            options: Some(vec![ChoiceOption::new("calm", "Calm")]),
            ..Default::default()
        };
        let input = build_input(QuestionKind::MultipleChoice, &s);
        assert_eq!(input.kind, QuestionKind::MultipleChoice);
        assert_eq!(input.options.unwrap()[0].value, "calm");

        let empty = OracleSuggestion {
            question: "Q?".into(),
            options: Some(vec![]),
            ..Default::default()
        };
        let input = build_input(QuestionKind::MultiSelect, &empty);
        assert_eq!(input.options.unwrap().len(), 3);

        let input = build_input(QuestionKind::FreeText, &empty);
        assert_eq!(input.placeholder.as_deref(), Some("Share your thoughts..."));
    }

    #[test]
    fn test_render_previous_answers() {
        assert_eq!(render_previous_answers(&AnswerMap::new()), "This is the first question.");

        let mut answers = AnswerMap::new();
        answers.insert("q_ai_2".into(), Answer::new("anger", "multiple_choice"));
        answers.insert("q_ai_1".into(), Answer::from(serde_json::json!({"value": "harsh"})));
        assert_eq!(
            render_previous_answers(&answers),
            "Q1 (multiple_choice): anger\nQ2 (unknown): harsh"
        );
    }

    #[tokio::test]
    async fn test_generate_question_ignores_oracle_kind() {
        let oracle = ScriptedOracle::new().on(
            "ask question #1",
            r#"```json
{"question": "What emotion comes up most often?", "input_type": "free_text", "help": "Take a breath.", "options": [{"value": "fear", "label": "Fear"}]}
```"#,
        );
        let s = spec(1, "What emotion comes up most often?", QuestionKind::MultipleChoice);
        let q = Questionnaire::new("doc".into(), vec![s.clone(), spec(2, "Next", QuestionKind::FreeText)]);

        let step = generate_question(&oracle, "s1", &AnswerMap::new(), &s, &q)
            .await
            .unwrap();
        assert!(step.is_ai_generated());
        assert_eq!(step.context["target_type"], "multiple_choice");
        assert_eq!(step.context["actual_type"], "free_text");
        assert_eq!(step.ui["next_button_label"], "Continue");
        let question = step.question.unwrap();
        assert_eq!(question.id, "q_ai_1");
        assert_eq!(question.input.kind, QuestionKind::MultipleChoice);
        assert_eq!(question.help.as_deref(), Some("Take a breath."));
    }

    #[tokio::test]
    async fn test_generate_question_propagates_oracle_failure() {
        let oracle = ScriptedOracle::new();
        let s = spec(1, "Describe the voice.", QuestionKind::FreeText);
        let q = Questionnaire::new(String::new(), vec![s.clone()]);
        let err = generate_question(&oracle, "s1", &AnswerMap::new(), &s, &q)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Oracle(_)));
    }
}
