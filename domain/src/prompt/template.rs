//! Prompt templates for provider calls and consensus synthesis

use crate::core::model::Model;
use crate::core::string::truncate_chars;
use crate::invocation::InvocationResult;

/// Characters of each answer embedded in the consensus prompt.
pub const DEFAULT_ANSWER_BUDGET: usize = 500;

const ANSWER_SEPARATOR: &str = "\n\n---\n\n";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Default system instruction for a model in the built-in line-up.
    ///
    /// Every variant asks for the same `short_ans` / `explanation` JSON
    /// object, worded for what each model is good at.
    pub fn default_preamble(model: &Model) -> &'static str {
        match model {
            Model::Llama31Instant => {
                r#"Return ONLY JSON: {"short_ans": "concise factual answer under 50 words", "explanation": "brief reasoning"}."#
            }
            Model::Qwen3 => {
                r#"Return ONLY JSON: {"short_ans": "1-line answer", "explanation": "reasoning if needed"}."#
            }
            Model::CompoundMini => {
                r#"Return ONLY JSON: {"short_ans": "precise answer under 50 words", "explanation": "justification"}."#
            }
            Model::GptOss20b => {
                r#"Return ONLY JSON: {"short_ans": "accurate identification", "explanation": "short explanation"}."#
            }
            Model::KimiK2Instruct => {
                r#"Return ONLY JSON: {"short_ans": "direct brief choice", "explanation": "context"}."#
            }
            Model::Custom(_) => {
                r#"Return ONLY JSON: {"short_ans": "short answer", "explanation": "brief reasoning"}."#
            }
        }
    }

    /// System prompt for the consensus call
    pub fn consensus_system() -> &'static str {
        "You are an expert consensus engine. Output ONLY JSON."
    }

    /// User prompt for the consensus call.
    ///
    /// Only successful results are embedded, each cut to `answer_budget`
    /// characters; failed results do not appear at all.
    pub fn consensus_prompt(
        question: &str,
        results: &[InvocationResult],
        answer_budget: usize,
    ) -> String {
        let context = results
            .iter()
            .filter(|r| r.is_success())
            .map(|r| {
                format!(
                    "Model ({}): {}",
                    r.model,
                    truncate_chars(&r.answer_text, answer_budget)
                )
            })
            .collect::<Vec<_>>()
            .join(ANSWER_SEPARATOR);

        format!(
            r#"Analyze these AI responses and the user question.
Return ONLY a JSON object:
{{
  "short_ans": "One-line clear answer",
  "explanation": "Brief synthesis of logic"
}}

Question: {}

Responses:
{}"#,
            question, context
        )
    }
}
