use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Answer shape expected for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    FreeText,
    YesNo,
    MultipleChoice,
    MultiSelect,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 4] = [
        QuestionKind::FreeText,
        QuestionKind::YesNo,
        QuestionKind::MultipleChoice,
        QuestionKind::MultiSelect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::FreeText => "free_text",
            QuestionKind::YesNo => "yes_no",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::MultiSelect => "multi_select",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    /// Exact label match only; no trimming or case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown question kind: {}", s))
    }
}

/// One parsed, classified question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub sequence: u32,
    #[serde(default)]
    pub title: String,
    pub text: String,
    /// Kind decided at load time. Oracle output at generation time never overrides it.
    pub kind: QuestionKind,
}

impl QuestionSpec {
    pub fn full_text(&self) -> String {
        join_title(&self.title, &self.text)
    }
}

pub(crate) fn join_title(title: &str, text: &str) -> String {
    if title.is_empty() || title == text {
        text.to_string()
    } else {
        format!("{} {}", title, text)
    }
}

/// The classified question table plus the raw document it came from.
#[derive(Debug, Clone, Default)]
pub struct Questionnaire {
    /// Full document text, quoted to the oracle as interview context.
    pub raw: String,
    questions: BTreeMap<u32, QuestionSpec>,
}

impl Questionnaire {
    pub fn new(raw: String, questions: impl IntoIterator<Item = QuestionSpec>) -> Self {
        let questions = questions.into_iter().map(|q| (q.sequence, q)).collect();
        Self { raw, questions }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn get(&self, sequence: u32) -> Option<&QuestionSpec> {
        self.questions.get(&sequence)
    }

    /// Questions in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &QuestionSpec> {
        self.questions.values()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels_round_trip_through_from_str() {
        for kind in QuestionKind::ALL {
            assert_eq!(kind.as_str().parse::<QuestionKind>(), Ok(kind));
        }
        assert!("Yes_No".parse::<QuestionKind>().is_err());
        assert!(" yes_no".parse::<QuestionKind>().is_err());
        assert!("boolean".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&QuestionKind::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple_choice\"");
    }

    #[test]
    fn test_duplicate_sequence_last_wins() {
        let q = Questionnaire::new(
            String::new(),
            vec![
                QuestionSpec {
                    sequence: 1,
                    title: String::new(),
                    text: "first".into(),
                    kind: QuestionKind::FreeText,
                },
                QuestionSpec {
                    sequence: 1,
                    title: String::new(),
                    text: "second".into(),
                    kind: QuestionKind::YesNo,
                },
            ],
        );
        assert_eq!(q.total(), 1);
        assert_eq!(q.get(1).unwrap().text, "second");
    }
}
