//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use parallelai_domain::{CallerId, EntryId, HistoryQuery, SortOrder};
use std::path::PathBuf;

/// Caller identity when neither `--user` nor `$USER` is set
pub const DEFAULT_CALLER: &str = "local";

/// Output format for chat results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Every answer with its explanation
    #[default]
    Full,
    /// Short answers only, one line each
    Short,
    /// JSON output
    Json,
}

/// CLI arguments for parallelai
#[derive(Parser, Debug)]
#[command(name = "parallelai")]
#[command(author, version, about = "Ask several LLMs at once and reconcile their answers")]
#[command(long_about = r#"
ParallelAI sends your question to every configured model concurrently and
shows each model's answer side by side. With --consensus, the primary model
then reconciles the answers into one.

Configuration files are loaded from (in priority order):
1. PARALLELAI_* environment variables
2. --config <path>        Explicit config file
3. ./parallelai.toml      Project-level config
4. ~/.config/parallelai/config.toml   Global config

Credentials are read from GROQ_API_KEY1..GROQ_API_KEY5 (a .env file is
honoured) unless the configuration names other variables.

Example:
  parallelai ask "Which planet has the most moons?"
  parallelai ask --consensus "Is a tomato a fruit?"
  parallelai ask --model qwen/qwen3-32b "Explain Rust lifetimes briefly"
  parallelai consensus 1b4e28ba-2fa1-11d2-883f-0016d3cca427
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Caller identity that history is kept under (default: $USER or "local")
    #[arg(long, global = true, value_name = "ID")]
    pub user: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostics to a daily rolling file in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Ask every configured model, or one with --model
    Ask {
        /// The question
        question: String,

        /// Reconcile the answers into one
        #[arg(short, long)]
        consensus: bool,

        /// Ask only this model
        #[arg(short, long, value_name = "MODEL", conflicts_with = "consensus")]
        model: Option<String>,

        /// Token request for single-model mode
        #[arg(long, value_name = "N", requires = "model")]
        max_tokens: Option<u32>,
    },

    /// Reconcile the answers of an earlier multi-model exchange
    Consensus {
        /// Entry id as printed by `ask` or `history`
        entry_id: EntryId,
    },

    /// Show past exchanges, newest first
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Only entries whose question, answers or model ids contain this
        /// text (case-insensitive)
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,

        /// List oldest entries first
        #[arg(long)]
        oldest: bool,
    },

    /// List the configured models
    Models,
}

impl Command {
    /// History filter for `history`; the default query otherwise
    pub fn history_query(&self) -> HistoryQuery {
        match self {
            Command::History { search, oldest, .. } => {
                let order = if *oldest {
                    SortOrder::OldestFirst
                } else {
                    SortOrder::NewestFirst
                };
                let query = HistoryQuery::new().with_order(order);
                match search {
                    Some(term) => query.with_search(term.as_str()),
                    None => query,
                }
            }
            _ => HistoryQuery::new(),
        }
    }
}

impl Cli {
    /// `--user`, else `$USER`, else [`DEFAULT_CALLER`]
    pub fn caller(&self) -> CallerId {
        self.caller_from(std::env::var("USER").ok())
    }

    fn caller_from(&self, env_user: Option<String>) -> CallerId {
        let id = self
            .user
            .clone()
            .or(env_user)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CALLER.to_string());
        CallerId::new(id)
    }
}
