use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::questionnaire::QuestionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Question,
    Info,
    Summary,
    Decision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Build a canned option list from `(value, label)` pairs.
pub fn options(pairs: &[(&str, &str)]) -> Vec<ChoiceOption> {
    pairs
        .iter()
        .map(|(value, label)| ChoiceOption::new(value, label))
        .collect()
}

pub fn placeholder_options() -> Vec<ChoiceOption> {
    options(&[
        ("opt1", "Option 1"),
        ("opt2", "Option 2"),
        ("opt3", "Option 3"),
    ])
}

/// Input widget description for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub kind: QuestionKind,
    pub options: Option<Vec<ChoiceOption>>,
    pub placeholder: Option<String>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub allow_other: Option<bool>,
}

impl Input {
    pub fn of(kind: QuestionKind) -> Self {
        Self {
            kind,
            options: None,
            placeholder: None,
            min_length: None,
            max_length: None,
            allow_other: None,
        }
    }

    pub fn with_options(kind: QuestionKind, options: Vec<ChoiceOption>) -> Self {
        Self {
            options: Some(options),
            ..Self::of(kind)
        }
    }

    pub fn free_text(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: Some(placeholder.into()),
            ..Self::of(QuestionKind::FreeText)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub label: String,
    pub input: Input,
    pub required: bool,
    pub help: Option<String>,
}

/// One unit of interaction returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub question: Option<Question>,
    #[serde(default)]
    pub ui: Map<String, Value>,
    #[serde(default)]
    pub validation: Map<String, Value>,
    /// Diagnostic echo of the state that produced this step.
    #[serde(default)]
    pub context: Map<String, Value>,
}

#[cfg(test)]
impl Step {
    pub fn is_fallback(&self) -> bool {
        self.context.get("fallback") == Some(&Value::Bool(true))
    }

    pub fn is_ai_generated(&self) -> bool {
        self.context.get("ai_generated") == Some(&Value::Bool(true))
    }

    pub fn is_completed(&self) -> bool {
        self.context.get("completed") == Some(&Value::Bool(true))
    }

    pub fn sequence(&self) -> Option<u64> {
        self.context.get("sequence").and_then(Value::as_u64)
    }
}

/// "Finish" on the last question, "Continue" before it.
pub fn button_label(sequence: u32, total: usize) -> &'static str {
    if (sequence as usize) < total {
        "Continue"
    } else {
        "Finish"
    }
}

/// `json!`-style object literal that yields a `Map` instead of a `Value`.
macro_rules! object {
    ($($key:literal : $value:expr),* $(,)?) => {{
        let mut map = ::serde_json::Map::new();
        $( map.insert($key.to_string(), ::serde_json::json!($value)); )*
        map
    }};
}
pub(crate) use object;
