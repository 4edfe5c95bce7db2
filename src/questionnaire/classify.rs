use tracing::{debug, warn};

use super::types::QuestionKind;
use crate::llm::{Oracle, SamplingParams};

const CLASSIFY_SYSTEM_PROMPT: &str = r#"You are an expert in questionnaire design. Your task is to analyze a question and determine the BEST input type for it.

Available input types:
- free_text: Open-ended questions requiring written responses (stories, descriptions, explanations)
- yes_no: Simple binary questions that can be answered with yes or no
- multiple_choice: Questions where user selects ONE option from a predefined list
- multi_select: Questions where user can select MULTIPLE options from a list

Rules for classification:
1. free_text: Use for open-ended questions asking for descriptions, explanations, stories, or personal reflections
2. yes_no: ONLY for questions that are literally asking yes/no (contains "yes/no", starts with "Do you", "Are you", "Can you", "Will you")
3. multiple_choice: For questions asking to choose ONE from categories (emotions, preferences, methods)
4. multi_select: For questions asking for multiple selections (skills, activities, multiple actions)

Return ONLY the type name (free_text, yes_no, multiple_choice, or multi_select). Be 90%+ certain of your choice."#;

fn classify_user_prompt(question: &str) -> String {
    format!(
        r#"Analyze this question and determine the best input type:

Question: "{question}"

Consider:
- Is this asking for an open description/explanation? → free_text
- Is this literally a yes/no question? → yes_no
- Is this asking to select ONE option from categories? → multiple_choice
- Is this asking to select MULTIPLE items? → multi_select

Return only the input type."#
    )
}

const YES_NO_MARKERS: &[&str] = &[
    "yes / no",
    "yes/no",
    "does this voice often affect",
    "are you willing to try",
    "can you accept that",
];

const MULTI_SELECT_MARKERS: &[&str] = &[
    "choose minimal",
    "select all",
    "which of these",
    "what specific steps",
    "multiple actions",
];

const MULTIPLE_CHOICE_MARKERS: &[&str] = &["what emotion", "which emotion", "what feeling"];

/// Offline classification by substring match on the lowercased text.
/// Checked in order: yes/no, multi-select, multiple choice, else free text.
pub fn classify_by_keywords(question: &str) -> QuestionKind {
    let lower = question.to_lowercase();
    let hit = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

    if hit(YES_NO_MARKERS) {
        QuestionKind::YesNo
    } else if hit(MULTI_SELECT_MARKERS) {
        QuestionKind::MultiSelect
    } else if hit(MULTIPLE_CHOICE_MARKERS) {
        QuestionKind::MultipleChoice
    } else {
        QuestionKind::FreeText
    }
}

/// Ask the oracle for a kind label, falling back to keywords when the call
/// fails or the label is not one of the four known kinds.
pub async fn classify(oracle: &dyn Oracle, question: &str, sequence: u32) -> QuestionKind {
    let reply = oracle
        .complete(
            CLASSIFY_SYSTEM_PROMPT,
            &classify_user_prompt(question),
            SamplingParams::CLASSIFY,
        )
        .await;

    match reply {
        Ok(raw) => {
            let label = raw.trim().to_lowercase();
            match label.parse::<QuestionKind>() {
                Ok(kind) => {
                    debug!(sequence, %kind, "oracle classified question");
                    kind
                }
                Err(_) => {
                    let kind = classify_by_keywords(question);
                    warn!(sequence, label = %label, fallback = %kind, "oracle returned unknown kind");
                    kind
                }
            }
        }
        Err(e) => {
            let kind = classify_by_keywords(question);
            warn!(sequence, error = %e, fallback = %kind, "oracle classification failed");
            kind
        }
    }
}
