//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for ensemble results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output with ranked clusters and statistics
    Full,
    /// Only the winning answer
    Answer,
    /// JSON output
    Json,
}

/// CLI arguments for agent-ensemble
#[derive(Parser, Debug)]
#[command(name = "agent-ensemble")]
#[command(author, version, about = "Ask one question to an ensemble of agents and take the majority answer")]
#[command(long_about = r#"
agent-ensemble fans one question out to N independently sampled agent
invocations, groups the answers into similarity clusters as they complete,
and reports the largest cluster's answer together with how strongly the
ensemble agreed on it.

With early stopping enabled, the run cancels outstanding invocations as
soon as one cluster dominates, trading completeness for cost and latency.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./ensemble.toml     Project-level config
3. ~/.config/agent-ensemble/config.toml   Global config

Example:
  agent-ensemble "What does `Box::leak` return?"
  agent-ensemble -n 20 --max-concurrent 10 "Is this regex correct: ^a+$ ?"
  agent-ensemble --profile quick_test -o json "What is 6 * 7?"
"#)]
pub struct Cli {
    /// The question to fan out to the ensemble
    pub question: Option<String>,

    /// Number of agent invocations
    #[arg(short = 'n', long = "agents", value_name = "N")]
    pub agents: Option<usize>,

    /// Model identifier to invoke
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Ceiling on simultaneously in-flight invocations
    #[arg(long, value_name = "N")]
    pub max_concurrent: Option<usize>,

    /// System prompt shared by every invocation
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Per-invocation timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Run invocations one at a time instead of concurrently
    #[arg(long)]
    pub sequential: bool,

    /// Disable early stopping even if the config enables it
    #[arg(long)]
    pub no_early_stop: bool,

    /// Named profile from the config file (e.g. quick_test, production)
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_question_and_overrides() {
        let cli = Cli::parse_from([
            "agent-ensemble",
            "-n",
            "20",
            "--max-concurrent",
            "10",
            "--no-early-stop",
            "what is 6 * 7?",
        ]);

        assert_eq!(cli.question.as_deref(), Some("what is 6 * 7?"));
        assert_eq!(cli.agents, Some(20));
        assert_eq!(cli.max_concurrent, Some(10));
        assert!(cli.no_early_stop);
        assert!(!cli.sequential);
    }

    #[test]
    fn test_verbosity_accumulates() {
        let cli = Cli::parse_from(["agent-ensemble", "-vvv", "q"]);
        assert_eq!(cli.verbose, 3);
    }
}
