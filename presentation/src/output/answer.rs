//! Display-side reading of model answers.
//!
//! Answers are opaque text to the core. For display only, they are read as
//! the JSON object the preambles ask for.

use parallelai_domain::truncate_chars;
use serde_json::Value;

/// Characters shown when an answer is not the expected JSON
pub const PREVIEW_CHARS: usize = 100;

/// Short answer plus explanation, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView {
    pub short: String,
    pub explanation: String,
}

impl AnswerView {
    /// Read `{"short_ans" | "short_online_ans", "explanation"}` from `text`,
    /// tolerating Markdown code fences.
    ///
    /// Anything else previews the first [`PREVIEW_CHARS`] characters and
    /// keeps the full text as the explanation.
    pub fn parse(text: &str) -> Self {
        let cleaned = text.replace("```json", "").replace("```", "");

        match serde_json::from_str::<Value>(cleaned.trim()) {
            Ok(Value::Object(map)) => {
                let short = ["short_ans", "short_online_ans"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(display_value))
                    .unwrap_or_default();
                let explanation = map
                    .get("explanation")
                    .and_then(display_value)
                    .unwrap_or_default();
                Self { short, explanation }
            }
            _ => Self {
                short: format!("{}...", truncate_chars(text, PREVIEW_CHARS)),
                explanation: text.to_string(),
            },
        }
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let view = AnswerView::parse(r#"{"short_ans": "Paris", "explanation": "Capital of France"}"#);
        assert_eq!(view.short, "Paris");
        assert_eq!(view.explanation, "Capital of France");
    }

    #[test]
    fn test_fenced_json() {
        let view = AnswerView::parse("```json\n{\"short_ans\": \"4\"}\n```");
        assert_eq!(view.short, "4");
        assert_eq!(view.explanation, "");
    }

    #[test]
    fn test_online_answer_key_and_empty_fallback() {
        let view = AnswerView::parse(r#"{"short_ans": "", "short_online_ans": "Saturn"}"#);
        assert_eq!(view.short, "Saturn");
    }

    #[test]
    fn test_non_string_values() {
        let view = AnswerView::parse(r#"{"short_ans": 42}"#);
        assert_eq!(view.short, "42");
    }

    #[test]
    fn test_unparseable_text_previewed() {
        let text = "x".repeat(150);
        let view = AnswerView::parse(&text);
        assert_eq!(view.short, format!("{}...", "x".repeat(100)));
        assert_eq!(view.explanation, text);

        let view = AnswerView::parse("No response");
        assert_eq!(view.short, "No response...");
    }
}
