//! Console output formatter for chat results

use super::answer::AnswerView;
use crate::cli::commands::OutputFormat;
use colored::Colorize;
use parallelai_application::{ConsensusOutcome, MultiChatOutcome, SingleChatOutcome};
use parallelai_domain::{
    ConsensusResult, ConversationEntry, EntryId, InvocationResult, ProviderRegistry,
    UNAVAILABLE_ANSWER_TEXT, truncate_with_ellipsis,
};
use serde_json::json;

/// Question characters shown per history line
const HISTORY_QUESTION_CHARS: usize = 80;

/// Formats chat results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Answers of every model, plus the consensus when there is one
    pub fn multi(question: &str, outcome: &MultiChatOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(&json!({
                "entry_id": outcome.entry_id,
                "question": question,
                "results": outcome.results,
                "consensus": outcome.consensus,
            })),
            OutputFormat::Short => {
                let mut output: String = outcome
                    .results
                    .iter()
                    .map(|r| format!("{}: {}\n", r.model.short_name().bold(), Self::short_of(r)))
                    .collect();
                if let Some(consensus) = &outcome.consensus {
                    output.push_str(&Self::consensus_line(consensus));
                }
                output
            }
            OutputFormat::Full => {
                let mut output = String::new();
                output.push_str(&Self::header("ParallelAI Results"));
                output.push('\n');
                output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), question));

                output.push_str(&Self::section_header("Model Answers"));
                for result in &outcome.results {
                    output.push_str(&Self::result_block(result));
                }

                if let Some(consensus) = &outcome.consensus {
                    output.push_str(&Self::section_header("Consensus"));
                    output.push_str(&Self::consensus_block(consensus));
                }

                output.push_str(&Self::footer(outcome.entry_id));
                output
            }
        }
    }

    /// Answer of the one selected model
    pub fn single(question: &str, outcome: &SingleChatOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(&json!({
                "entry_id": outcome.entry_id,
                "question": question,
                "result": outcome.result,
            })),
            OutputFormat::Short => format!("{}\n", Self::short_of(&outcome.result)),
            OutputFormat::Full => {
                let mut output = String::new();
                output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), question));
                output.push_str(&Self::result_block(&outcome.result));
                output.push_str(&Self::footer(outcome.entry_id));
                output
            }
        }
    }

    /// Follow-up consensus for a recorded entry
    pub fn consensus(outcome: &ConsensusOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(&json!({
                "entry_id": outcome.entry_id,
                "consensus": outcome.consensus,
            })),
            OutputFormat::Short => Self::consensus_line(&outcome.consensus),
            OutputFormat::Full => {
                let mut output = Self::section_header("Consensus");
                output.push_str(&Self::consensus_block(&outcome.consensus));
                output.push_str(&Self::footer(outcome.entry_id));
                output
            }
        }
    }

    /// Past exchanges, in the order given
    pub fn history(entries: &[ConversationEntry], format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::to_json(&json!(entries));
        }
        if entries.is_empty() {
            return format!("{}\n", "No history yet.".dimmed());
        }

        let mut output = String::new();
        for entry in entries {
            output.push_str(&format!(
                "{} {} [{}] {}\n",
                entry.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                entry.id.to_string().dimmed(),
                entry.mode,
                truncate_with_ellipsis(&entry.question, HISTORY_QUESTION_CHARS).bold()
            ));

            if format == OutputFormat::Full {
                for result in &entry.results {
                    output.push_str(&format!(
                        "    {}: {}\n",
                        result.model.short_name().yellow(),
                        Self::short_of(result)
                    ));
                }
                if let Some(consensus) = &entry.consensus {
                    output.push_str(&format!("    {}", Self::consensus_line(consensus)));
                }
            }
        }
        output
    }

    /// Registry listing; the first model is the consensus model
    pub fn models(registry: &ProviderRegistry, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            let models: Vec<_> = registry
                .list_providers()
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    json!({
                        "id": p.model.as_str(),
                        "primary": i == 0,
                        "max_tokens": p.token_budget,
                        "temperature": p.temperature,
                    })
                })
                .collect();
            return Self::to_json(&json!(models));
        }

        let mut output = String::new();
        for (i, provider) in registry.list_providers().iter().enumerate() {
            let marker = if i == 0 { " (consensus)" } else { "" };
            output.push_str(&format!("{}{}\n", provider.model.as_str().bold(), marker.cyan()));
            if format == OutputFormat::Full {
                output.push_str(&format!(
                    "    max_tokens={} temperature={}\n",
                    provider.token_budget, provider.temperature
                ));
            }
        }
        output
    }

    fn result_block(result: &InvocationResult) -> String {
        let title = format!("── {} ──", result.model.short_name());
        if result.is_success() {
            let view = AnswerView::parse(&result.answer_text);
            let mut block = format!("\n{}\n{}\n", title.yellow().bold(), view.short.bold());
            if !view.explanation.is_empty() {
                block.push_str(&format!("{}\n", view.explanation.dimmed()));
            }
            block
        } else {
            format!(
                "\n{}\n{}\n{}\n",
                title.red().bold(),
                UNAVAILABLE_ANSWER_TEXT,
                result.error_detail.as_deref().unwrap_or("Unknown").dimmed()
            )
        }
    }

    fn consensus_block(consensus: &ConsensusResult) -> String {
        if !consensus.is_success() {
            return format!(
                "\n{}\n{}\n",
                consensus.answer_text().red(),
                consensus.error_detail().unwrap_or("Unknown").dimmed()
            );
        }

        let view = AnswerView::parse(consensus.answer_text());
        let mut block = format!("\n{}\n", view.short.green().bold());
        if !view.explanation.is_empty() {
            block.push_str(&format!("{}\n", view.explanation));
        }
        block
    }

    fn consensus_line(consensus: &ConsensusResult) -> String {
        let text = if consensus.is_success() {
            AnswerView::parse(consensus.answer_text()).short
        } else {
            consensus.answer_text().to_string()
        };
        format!("{} {}\n", "Consensus:".green().bold(), text)
    }

    fn short_of(result: &InvocationResult) -> String {
        if result.is_success() {
            AnswerView::parse(&result.answer_text).short
        } else {
            UNAVAILABLE_ANSWER_TEXT.to_string()
        }
    }

    fn to_json(value: &serde_json::Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer(entry_id: EntryId) -> String {
        format!("\n{} {}\n", "Entry:".dimmed(), entry_id.to_string().dimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallelai_domain::{Model, ProviderConfig};

    fn outcome(consensus: Option<ConsensusResult>) -> MultiChatOutcome {
        MultiChatOutcome {
            entry_id: EntryId::new(),
            results: vec![
                InvocationResult::success(
                    "llama-3.1-8b-instant",
                    r#"{"short_ans":"Saturn","explanation":"146 moons"}"#,
                ),
                InvocationResult::failure("qwen/qwen3-32b", "Request timed out"),
            ],
            consensus,
        }
    }

    #[test]
    fn test_full_shows_short_names_and_failures() {
        let text = ConsoleFormatter::multi("Most moons?", &outcome(None), OutputFormat::Full);
        assert!(text.contains("Most moons?"));
        assert!(text.contains("llama-3.1-8b-instant"));
        assert!(text.contains("qwen3-32b"));
        assert!(!text.contains("qwen/qwen3-32b"));
        assert!(text.contains("Saturn"));
        assert!(text.contains("146 moons"));
        assert!(text.contains(UNAVAILABLE_ANSWER_TEXT));
        assert!(text.contains("Request timed out"));
        assert!(!text.contains("Consensus"));
    }

    #[test]
    fn test_short_with_consensus() {
        let consensus = ConsensusResult::success(r#"{"short_ans":"Saturn"}"#);
        let text = ConsoleFormatter::multi("q", &outcome(Some(consensus)), OutputFormat::Short);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Saturn"));
        assert!(lines[1].ends_with(UNAVAILABLE_ANSWER_TEXT));
        assert!(lines[2].contains("Consensus:"));
    }

    #[test]
    fn test_json_keeps_raw_answers() {
        let outcome = outcome(Some(ConsensusResult::failure("boom")));
        let text = ConsoleFormatter::multi("q", &outcome, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["entry_id"], outcome.entry_id.to_string());
        assert_eq!(value["results"][0]["status"], "success");
        assert_eq!(value["results"][1]["model"], "qwen/qwen3-32b");
        assert_eq!(value["results"][1]["status"], "error");
        assert_eq!(value["consensus"]["model"], "consensus-engine");
        assert_eq!(value["consensus"]["status"], "error");
    }

    #[test]
    fn test_failed_consensus_shows_fallback_text() {
        let outcome = ConsensusOutcome {
            entry_id: EntryId::new(),
            consensus: ConsensusResult::failure("Request timed out"),
        };
        let text = ConsoleFormatter::consensus(&outcome, OutputFormat::Full);
        assert!(text.contains("Failed to generate consensus due to a technical error."));
    }

    #[test]
    fn test_history_truncates_long_questions() {
        let question = "why ".repeat(40);
        let entry = ConversationEntry::multi_from_results(
            question.clone(),
            vec![InvocationResult::success("a", r#"{"short_ans":"because"}"#)],
        );

        let text = ConsoleFormatter::history(&[entry], OutputFormat::Full);
        assert!(!text.contains(&question));
        assert!(text.contains("..."));
        assert!(text.contains("because"));
    }

    #[test]
    fn test_empty_history() {
        assert!(ConsoleFormatter::history(&[], OutputFormat::Full).contains("No history"));
        assert_eq!(ConsoleFormatter::history(&[], OutputFormat::Json), "[]");
    }

    #[test]
    fn test_models_listing_marks_primary() {
        let registry = ProviderRegistry::new(vec![
            ProviderConfig::new(Model::Llama31Instant, "k".to_string(), "p"),
            ProviderConfig::new(Model::Qwen3, "k".to_string(), "p"),
        ])
        .unwrap();

        let text = ConsoleFormatter::models(&registry, OutputFormat::Short);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].contains("(consensus)"));
        assert!(!lines[1].contains("(consensus)"));

        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::models(&registry, OutputFormat::Json)).unwrap();
        assert_eq!(json[1]["id"], "qwen/qwen3-32b");
        assert_eq!(json[0]["primary"], true);
    }
}
