//! Output formatter trait

use ensemble_domain::EnsembleOutcome;

/// Trait for formatting ensemble outcomes
pub trait OutputFormatter {
    /// Format the complete outcome
    fn format(&self, outcome: &EnsembleOutcome) -> String;

    /// Format as JSON
    fn format_json(&self, outcome: &EnsembleOutcome) -> String;

    /// Format the winning answer only (concise output)
    fn format_answer_only(&self, outcome: &EnsembleOutcome) -> String;
}
