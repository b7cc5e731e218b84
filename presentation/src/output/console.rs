//! Console output formatter for ensemble results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use ensemble_domain::{EnsembleOutcome, EnsembleResult, InsufficientResponses};

/// Formats ensemble outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete outcome
    pub fn format(outcome: &EnsembleOutcome) -> String {
        match outcome {
            EnsembleOutcome::Completed(result) => Self::format_result(result),
            EnsembleOutcome::Insufficient(shortfall) => Self::format_shortfall(shortfall),
        }
    }

    /// Format as JSON
    pub fn format_json(outcome: &EnsembleOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the winning answer only (concise output)
    pub fn format_answer_only(outcome: &EnsembleOutcome) -> String {
        match outcome {
            EnsembleOutcome::Completed(result) => result.final_answer.clone(),
            EnsembleOutcome::Insufficient(shortfall) => shortfall.to_string(),
        }
    }

    fn format_result(result: &EnsembleResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Ensemble Result"));
        output.push('\n');

        // Consensus summary
        let consensus_line = format!(
            "Consensus: {:.1}% ({}/{} agents)",
            result.consensus_percentage * 100.0,
            result.supporting_agents,
            result.total_agents
        );
        if result.meets_consensus {
            output.push_str(&format!("{}\n", consensus_line.green().bold()));
        } else {
            output.push_str(&format!(
                "{}  {}\n",
                consensus_line.yellow().bold(),
                "(below the configured minimum; treat with caution)".yellow()
            ));
        }
        output.push('\n');

        // Winning answer
        output.push_str(&format!("{}\n{}\n", "Answer:".cyan().bold(), result.final_answer));

        // Ranked clusters
        if result.top_clusters.len() > 1 {
            output.push_str(&format!("\n{}\n", "Answer clusters:".cyan().bold()));
            for (rank, cluster) in result.top_clusters.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {:>5.1}%  {} agent{}  {}\n",
                    rank + 1,
                    cluster.percentage * 100.0,
                    cluster.supporting_agents,
                    if cluster.supporting_agents == 1 { "" } else { "s" },
                    Self::preview(&cluster.answer).dimmed()
                ));
            }
        }

        // Execution statistics
        if let Some(metadata) = &result.metadata {
            output.push_str(&format!("\n{}\n", "Run:".cyan().bold()));
            output.push_str(&format!(
                "  agents: {} executed, {} succeeded\n",
                metadata.agents_executed, metadata.agents_succeeded
            ));
            output.push_str(&format!(
                "  time: {:.2}s total, {:.2}s avg per agent\n",
                metadata.execution_time.as_secs_f64(),
                metadata.avg_response_time.as_secs_f64()
            ));
            if let Some(range) = metadata.temperature_range {
                output.push_str(&format!(
                    "  temperatures: {:.2} to {:.2}\n",
                    range.min(),
                    range.max()
                ));
            }
        }

        output
    }

    fn format_shortfall(shortfall: &InsufficientResponses) -> String {
        format!(
            "{} {} of {} required responses succeeded (missing {})\n{}\n",
            "Insufficient responses:".red().bold(),
            shortfall.succeeded,
            shortfall.required,
            shortfall.shortfall(),
            "Retry with fewer agents, a longer timeout, or a lower quorum.".dimmed()
        )
    }

    fn header(title: &str) -> String {
        format!("{}\n{}\n", title.cyan().bold(), "=".repeat(title.len()).cyan())
    }

    /// First line of an answer, truncated for the cluster listing
    fn preview(answer: &str) -> String {
        const MAX_PREVIEW: usize = 60;
        let first_line = answer.lines().next().unwrap_or_default();
        if first_line.chars().count() <= MAX_PREVIEW {
            first_line.to_string()
        } else {
            let truncated: String = first_line.chars().take(MAX_PREVIEW).collect();
            format!("{truncated}...")
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, outcome: &EnsembleOutcome) -> String {
        ConsoleFormatter::format(outcome)
    }

    fn format_json(&self, outcome: &EnsembleOutcome) -> String {
        ConsoleFormatter::format_json(outcome)
    }

    fn format_answer_only(&self, outcome: &EnsembleOutcome) -> String {
        ConsoleFormatter::format_answer_only(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::{Cluster, majority_vote};

    fn sample_outcome() -> EnsembleOutcome {
        let clusters = vec![
            Cluster {
                representative: "Answer: 42".to_string(),
                members: (0..3)
                    .map(|i| {
                        ensemble_domain::AgentResponse::new(
                            i,
                            "Answer: 42",
                            0.7,
                            std::time::Duration::from_millis(100),
                        )
                    })
                    .collect(),
            },
            Cluster {
                representative: "Answer: 7".to_string(),
                members: (3..5)
                    .map(|i| {
                        ensemble_domain::AgentResponse::new(
                            i,
                            "Answer: 7",
                            0.7,
                            std::time::Duration::from_millis(100),
                        )
                    })
                    .collect(),
            },
        ];
        EnsembleOutcome::Completed(majority_vote(clusters, 0.5))
    }

    #[test]
    fn test_full_format_mentions_consensus_and_answer() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format(&sample_outcome());

        assert!(output.contains("60.0%"));
        assert!(output.contains("Answer: 42"));
        assert!(output.contains("Answer clusters:"));
    }

    #[test]
    fn test_answer_only_is_bare() {
        let output = ConsoleFormatter::format_answer_only(&sample_outcome());
        assert_eq!(output, "Answer: 42");
    }

    #[test]
    fn test_json_round_trips() {
        let json = ConsoleFormatter::format_json(&sample_outcome());
        let parsed: EnsembleOutcome = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_completed());
    }

    #[test]
    fn test_trait_object_dispatch() {
        let formatter: &dyn OutputFormatter = &ConsoleFormatter;
        let output = formatter.format_answer_only(&sample_outcome());
        assert_eq!(output, "Answer: 42");
    }

    #[test]
    fn test_shortfall_format() {
        colored::control::set_override(false);
        let outcome = EnsembleOutcome::Insufficient(InsufficientResponses::new(1, 3));
        let output = ConsoleFormatter::format(&outcome);

        assert!(output.contains("1 of 3"));
        assert!(output.contains("missing 2"));
    }

    #[test]
    fn test_preview_truncates_long_answers() {
        let long = "x".repeat(200);
        let preview = ConsoleFormatter::preview(&long);
        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() <= 63);
    }
}
