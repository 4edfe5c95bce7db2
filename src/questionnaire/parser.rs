//! Heading-based questionnaire format.
//!
//! ```text
//! ## 1. The voice
//! What does the critical voice in your head usually say?
//! * Example: "You're not good enough"
//! ---
//! ## 2. Emotion
//! What emotion comes up most often when you hear it?
//! ---
//! ```
//!
//! Body lines between a heading and the next `---` make up the question text.
//! Lines starting with `*` or `(` are examples/notes and are dropped.

use tracing::debug;

use super::types::join_title;

/// A question block before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    pub sequence: u32,
    /// Heading text after the number, e.g. "The voice".
    pub title: String,
    /// Joined body lines; the title when the block has no body.
    pub text: String,
}

impl ParsedQuestion {
    /// Title and body together, for keyword sniffing and classification.
    pub fn full_text(&self) -> String {
        join_title(&self.title, &self.text)
    }
}

fn is_heading(line: &str) -> bool {
    line.starts_with("## ") && line.chars().any(|c| c.is_ascii_digit())
}

/// `## 12. Title` → (12, "Title"). Sequence numbers start at 1.
fn parse_heading(line: &str) -> Option<(u32, String)> {
    let (number, title) = line.split_once('.').unwrap_or((line, ""));
    let sequence = number.replace("##", "").trim().parse::<u32>().ok()?;
    if sequence == 0 {
        return None;
    }
    Some((sequence, title.trim().to_string()))
}

struct Pending {
    sequence: u32,
    title: String,
    body: String,
}

impl Pending {
    fn finish(self) -> ParsedQuestion {
        let body = self.body.trim().to_string();
        let text = if body.is_empty() {
            self.title.clone()
        } else {
            body
        };
        ParsedQuestion {
            sequence: self.sequence,
            title: self.title,
            text,
        }
    }
}

/// Split a document into question blocks, in document order.
///
/// Duplicate sequence numbers are all returned; callers keying by sequence
/// get last-wins. A heading whose number does not parse closes the previous
/// block and discards everything up to the next valid heading.
pub fn parse_document(content: &str) -> Vec<ParsedQuestion> {
    let mut out = Vec::new();
    let mut pending: Option<Pending> = None;
    let mut in_body = false;

    for raw in content.lines() {
        let line = raw.trim();

        if is_heading(line) {
            if let Some(done) = pending.take() {
                out.push(done.finish());
            }
            match parse_heading(line) {
                Some((sequence, title)) => {
                    pending = Some(Pending {
                        sequence,
                        title,
                        body: String::new(),
                    });
                    in_body = true;
                }
                None => {
                    debug!(line, "skipping heading without a sequence number");
                    in_body = false;
                }
            }
        } else if line.starts_with("---") {
            in_body = false;
        } else if in_body && !line.is_empty() {
            if line.starts_with('*') || line.starts_with('(') {
                continue;
            }
            if let Some(p) = pending.as_mut() {
                if !p.body.is_empty() {
                    p.body.push(' ');
                }
                p.body.push_str(line);
            }
        }
    }

    if let Some(done) = pending.take() {
        out.push(done.finish());
    }

    out
}
