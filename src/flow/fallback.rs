//! Canned question steps used whenever the oracle cannot phrase one.
//! Pure functions: no I/O, no failure paths.

use serde_json::Map;

use super::step::{button_label, object, options, placeholder_options, Input, Question, Step, StepType};
use crate::questionnaire::{QuestionKind, Questionnaire};

pub const DEFAULT_QUESTION_TEXT: &str = "What's on your mind right now?";

const EMOTION_OPTIONS: &[(&str, &str)] = &[
    ("fear", "Fear"),
    ("shame", "Shame"),
    ("anger", "Anger"),
    ("sadness", "Sadness"),
    ("guilt", "Guilt"),
    ("anxiety", "Anxiety"),
    ("other", "Other emotion"),
];

const ACTION_OPTIONS: &[(&str, &str)] = &[
    ("daily_practice", "Daily mindfulness practice"),
    ("journaling", "Regular journaling"),
    ("support_network", "Connect with support network"),
    ("professional_help", "Seek professional guidance"),
    ("self_care", "Prioritize self-care activities"),
    ("boundaries", "Set healthy boundaries"),
];

/// Input for `kind`, with option sets and placeholders picked by keyword.
pub fn canned_input(kind: QuestionKind, question_text: &str, sequence: u32) -> Input {
    let lower = question_text.to_lowercase();
    match kind {
        QuestionKind::MultipleChoice => {
            let opts = if lower.contains("emotion") {
                options(EMOTION_OPTIONS)
            } else {
                placeholder_options()
            };
            Input::with_options(kind, opts)
        }
        QuestionKind::MultiSelect => {
            let opts = if lower.contains("action") || lower.contains("steps") {
                options(ACTION_OPTIONS)
            } else {
                placeholder_options()
            };
            Input::with_options(kind, opts)
        }
        QuestionKind::YesNo => Input::of(kind),
        QuestionKind::FreeText => {
            let placeholder = if lower.contains("voice") && sequence <= 2 {
                "Describe what you experience..."
            } else if lower.contains("value") || lower.contains("commit") {
                "Write your commitment or value here..."
            } else {
                "Share your thoughts..."
            };
            Input::free_text(placeholder)
        }
    }
}

/// Deterministic question step for `sequence`.
///
/// `kind` comes from load-time classification and is used as given.
pub fn fallback_question(
    session_id: &str,
    sequence: u32,
    kind: QuestionKind,
    questionnaire: &Questionnaire,
) -> Step {
    let total = questionnaire.total();
    let (label, sniff_text) = match questionnaire.get(sequence) {
        Some(spec) => (spec.text.clone(), spec.full_text()),
        None => (
            DEFAULT_QUESTION_TEXT.to_string(),
            DEFAULT_QUESTION_TEXT.to_string(),
        ),
    };

    Step {
        id: format!("step_{}", sequence),
        step_type: StepType::Question,
        question: Some(Question {
            id: format!("q_fallback_{}", sequence),
            label,
            input: canned_input(kind, &sniff_text, sequence),
            required: true,
            help: None,
        }),
        ui: object! { "next_button_label": button_label(sequence, total) },
        validation: Map::new(),
        context: object! {
            "session_id": session_id,
            "sequence": sequence,
            "fallback": true,
            "total_questions": total,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::QuestionSpec;

    fn questionnaire(specs: &[(u32, &str, QuestionKind)]) -> Questionnaire {
        Questionnaire::new(
            String::new(),
            specs.iter().map(|(sequence, text, kind)| QuestionSpec {
                sequence: *sequence,
                title: String::new(),
                text: text.to_string(),
                kind: *kind,
            }),
        )
    }

    fn option_values(input: &Input) -> Vec<String> {
        input
            .options
            .as_ref()
            .unwrap()
            .iter()
            .map(|o| o.value.clone())
            .collect()
    }

    #[test]
    fn test_emotion_options() {
        let input = canned_input(QuestionKind::MultipleChoice, "What emotion shows up?", 2);
        let values = option_values(&input);
        assert_eq!(values.len(), 7);
        assert_eq!(values[0], "fear");
        assert_eq!(values[6], "other");
    }

    #[test]
    fn test_action_options() {
        let input = canned_input(QuestionKind::MultiSelect, "Which steps will you take?", 5);
        assert_eq!(option_values(&input)[1], "journaling");

        let input = canned_input(QuestionKind::MultiSelect, "Pick your hobbies", 5);
        assert_eq!(option_values(&input), vec!["opt1", "opt2", "opt3"]);
    }

    #[test]
    fn test_free_text_placeholders() {
        let p = |text: &str, seq| canned_input(QuestionKind::FreeText, text, seq).placeholder;
        assert_eq!(
            p("Describe the voice", 1).as_deref(),
            Some("Describe what you experience...")
        );
        assert_eq!(p("Describe the voice", 3).as_deref(), Some("Share your thoughts..."));
        assert_eq!(
            p("What value will you commit to?", 6).as_deref(),
            Some("Write your commitment or value here...")
        );
    }

    #[test]
    fn test_yes_no_has_no_options() {
        let input = canned_input(QuestionKind::YesNo, "Are you willing to try?", 1);
        assert!(input.options.is_none());
        assert!(input.placeholder.is_none());
    }

    #[test]
    fn test_fallback_step_shape() {
        let q = questionnaire(&[
            (1, "Describe the voice.", QuestionKind::FreeText),
            (2, "What emotion comes up?", QuestionKind::MultipleChoice),
        ]);

        let step = fallback_question("s1", 1, QuestionKind::FreeText, &q);
        assert_eq!(step.id, "step_1");
        assert!(step.is_fallback());
        assert_eq!(step.ui["next_button_label"], "Continue");
        let question = step.question.as_ref().unwrap();
        assert_eq!(question.id, "q_fallback_1");
        assert_eq!(question.label, "Describe the voice.");

        let step = fallback_question("s1", 2, QuestionKind::MultipleChoice, &q);
        assert_eq!(step.ui["next_button_label"], "Finish");
        assert_eq!(step.context["total_questions"], 2);
    }

    #[test]
    fn test_fallback_for_missing_sequence() {
        let q = questionnaire(&[]);
        let step = fallback_question("s1", 4, QuestionKind::FreeText, &q);
        assert_eq!(step.question.unwrap().label, DEFAULT_QUESTION_TEXT);
    }
}
