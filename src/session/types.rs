use std::borrow::Cow;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Answers keyed by question id, in the order they were first recorded.
pub type AnswerMap = IndexMap<String, Answer>;

/// A caller-supplied answer.
///
/// Wire form is a free JSON object, normally `{"value": ..., "kind": "..."}`.
/// The object is stored as posted: absent keys stay absent and unknown keys
/// are kept. A non-object payload becomes the `value`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct Answer {
    pub value: Option<Value>,
    pub kind: Option<Value>,
    pub extra: Map<String, Value>,
}

impl Answer {
    pub fn new(value: impl Into<Value>, kind: &str) -> Self {
        Self {
            value: Some(value.into()),
            kind: Some(Value::String(kind.to_string())),
            extra: Map::new(),
        }
    }

    /// The answer value, if one was given and is not null.
    pub fn given_value(&self) -> Option<&Value> {
        self.value.as_ref().filter(|v| !v.is_null())
    }

    /// Text used in prompts and the summary context.
    pub fn display_value(&self) -> String {
        match self.given_value() {
            None => "No answer".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn display_kind(&self) -> Cow<'_, str> {
        match &self.kind {
            None | Some(Value::Null) => Cow::Borrowed("unknown"),
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }
}

impl From<Value> for Answer {
    fn from(raw: Value) -> Self {
        match raw {
            Value::Object(mut map) => {
                let value = map.remove("value");
                let kind = map.remove("kind");
                Self {
                    value,
                    kind,
                    extra: map,
                }
            }
            other => Self {
                value: Some(other),
                kind: None,
                extra: Map::new(),
            },
        }
    }
}

impl From<Answer> for Value {
    fn from(answer: Answer) -> Self {
        let mut map = answer.extra;
        if let Some(value) = answer.value {
            map.insert("value".to_string(), value);
        }
        if let Some(kind) = answer.kind {
            map.insert("kind".to_string(), kind);
        }
        Value::Object(map)
    }
}

/// One user's progress through the questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(skip_serializing)]
    #[serde(default)]
    pub id: String,
    pub answers: AnswerMap,
    /// Last sequence handed out. The live value is always `answers.len() + 1`.
    pub sequence: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            answers: AnswerMap::new(),
            sequence: 0,
            user_id: None,
            flow: None,
            created_at: Utc::now(),
        }
    }

    pub fn next_sequence(&self) -> u32 {
        (self.answers.len() as u32).saturating_add(1)
    }

    /// Insert or overwrite by question id. Overwrites keep the original position.
    pub fn record(&mut self, question_id: impl Into<String>, answer: Answer) {
        self.answers.insert(question_id.into(), answer);
    }
}
