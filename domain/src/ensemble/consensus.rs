//! Consensus aggregation
//!
//! Once the fan-out has terminated, the cluster partition is ranked by
//! size and the largest cluster's representative becomes the final
//! answer. Falling short of the consensus threshold is a valid result
//! carrying a low-confidence answer, not an error; falling short of the
//! response quorum yields [`InsufficientResponses`] instead of a vote.

use super::cluster::Cluster;
use super::temperature::TemperatureRange;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How many ranked clusters the result reports for observability
const TOP_CLUSTERS_REPORTED: usize = 5;

/// One ranked cluster in the result, for observability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Representative answer of the cluster
    pub answer: String,
    /// Number of agents whose responses landed in this cluster
    pub supporting_agents: usize,
    /// Fraction of all successful responses in this cluster (0.0 to 1.0)
    pub percentage: f64,
}

/// Execution statistics attached to a result when metadata is enabled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleMetadata {
    /// Tasks that ran to an observed completion or failure (cancelled
    /// invocations are not counted)
    pub agents_executed: usize,
    /// Tasks that completed successfully
    pub agents_succeeded: usize,
    /// Wall-clock duration of the whole run
    pub execution_time: Duration,
    /// Mean per-invocation latency over successful responses
    pub avg_response_time: Duration,
    /// Temperature bound the run sampled from, when diversification was on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_range: Option<TemperatureRange>,
    /// Completion timestamp (milliseconds since epoch)
    pub timestamp: u64,
}

/// Terminal value of a successful aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleResult {
    /// Representative text of the winning cluster
    pub final_answer: String,
    /// Winning cluster size over successful responses (0.0 to 1.0)
    pub consensus_percentage: f64,
    /// Winning cluster size
    pub supporting_agents: usize,
    /// Successful response count (not the configured ensemble size)
    pub total_agents: usize,
    /// Whether `consensus_percentage` cleared the configured minimum
    pub meets_consensus: bool,
    /// Up to five clusters ranked by size
    pub top_clusters: Vec<ClusterSummary>,
    /// Execution statistics, when enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EnsembleMetadata>,
}

impl EnsembleResult {
    /// Attach execution statistics
    pub fn with_metadata(mut self, metadata: EnsembleMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Batch-level shortfall: fewer successful responses than the quorum.
///
/// Surfaced as data so callers can decide to retry with relaxed settings
/// or accept degraded confidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InsufficientResponses {
    /// Successful responses obtained
    pub succeeded: usize,
    /// Quorum that was required
    pub required: usize,
}

impl InsufficientResponses {
    pub fn new(succeeded: usize, required: usize) -> Self {
        Self {
            succeeded,
            required,
        }
    }

    /// How many more responses the quorum needed
    pub fn shortfall(&self) -> usize {
        self.required.saturating_sub(self.succeeded)
    }
}

impl std::fmt::Display for InsufficientResponses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "insufficient responses: {}/{} required",
            self.succeeded, self.required
        )
    }
}

/// Terminal value of an ensemble run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnsembleOutcome {
    /// Aggregation ran over a quorum of successful responses
    Completed(EnsembleResult),
    /// The run fell short of the response quorum; no vote was held
    Insufficient(InsufficientResponses),
}

impl EnsembleOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, EnsembleOutcome::Completed(_))
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, EnsembleOutcome::Insufficient(_))
    }

    /// The aggregated result, if the run completed
    pub fn result(&self) -> Option<&EnsembleResult> {
        match self {
            EnsembleOutcome::Completed(result) => Some(result),
            EnsembleOutcome::Insufficient(_) => None,
        }
    }
}

/// Rank clusters by size and pick the winner.
///
/// Ties break toward the earlier-created cluster: the sort is stable and
/// clusters arrive in creation order. `min_consensus` is a fraction in
/// [0, 1].
pub fn majority_vote(clusters: Vec<Cluster>, min_consensus: f64) -> EnsembleResult {
    let total_agents: usize = clusters.iter().map(Cluster::len).sum();

    let mut ranked = clusters;
    ranked.sort_by(|a, b| b.len().cmp(&a.len()));

    let top_clusters: Vec<ClusterSummary> = ranked
        .iter()
        .take(TOP_CLUSTERS_REPORTED)
        .map(|cluster| ClusterSummary {
            answer: cluster.representative.clone(),
            supporting_agents: cluster.len(),
            percentage: cluster.len() as f64 / total_agents.max(1) as f64,
        })
        .collect();

    let (final_answer, supporting_agents) = ranked
        .first()
        .map(|winner| (winner.representative.clone(), winner.len()))
        .unwrap_or_default();

    let consensus_percentage = supporting_agents as f64 / total_agents.max(1) as f64;

    EnsembleResult {
        final_answer,
        consensus_percentage,
        supporting_agents,
        total_agents,
        meets_consensus: total_agents > 0 && consensus_percentage >= min_consensus,
        top_clusters,
        metadata: None,
    }
}

/// Current timestamp in milliseconds since epoch
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::cluster::ResponseClusterer;
    use crate::ensemble::response::AgentResponse;
    use std::time::Duration;

    fn cluster_from(contents: &[(usize, &str)]) -> Vec<Cluster> {
        let mut clusterer = ResponseClusterer::new(0.85);
        for (agent_id, content) in contents {
            clusterer.insert(AgentResponse::new(
                *agent_id,
                *content,
                0.7,
                Duration::from_millis(100),
            ));
        }
        clusterer.into_clusters()
    }

    #[test]
    fn test_majority_vote_three_against_two() {
        let clusters = cluster_from(&[
            (0, "Answer: 42"),
            (1, "Answer: 7"),
            (2, "Answer: 42"),
            (3, "Answer: 42"),
            (4, "Answer: 7"),
        ]);
        assert_eq!(clusters.len(), 2);

        let result = majority_vote(clusters, 0.5);

        assert_eq!(result.final_answer, "Answer: 42");
        assert_eq!(result.supporting_agents, 3);
        assert_eq!(result.total_agents, 5);
        assert!((result.consensus_percentage - 0.6).abs() < 1e-9);
        assert!(result.meets_consensus);
        assert_eq!(result.top_clusters.len(), 2);
        assert_eq!(result.top_clusters[0].supporting_agents, 3);
        assert_eq!(result.top_clusters[1].supporting_agents, 2);
    }

    #[test]
    fn test_consensus_arithmetic_is_exact() {
        let clusters = cluster_from(&[(0, "a"), (1, "a"), (2, "b"), (3, "c")]);
        let result = majority_vote(clusters, 0.5);

        let reconstructed = result.consensus_percentage * result.total_agents as f64;
        assert_eq!(reconstructed.round() as usize, result.supporting_agents);
        assert!(result.consensus_percentage >= 0.0 && result.consensus_percentage <= 1.0);
    }

    #[test]
    fn test_tie_breaks_toward_earlier_cluster() {
        let clusters = cluster_from(&[
            (0, "first answer text"),
            (1, "second answer text entirely unrelated words"),
            (2, "first answer text"),
            (3, "second answer text entirely unrelated words"),
        ]);
        assert_eq!(clusters.len(), 2);

        let result = majority_vote(clusters, 0.5);

        // 2 vs 2: the cluster created first wins
        assert_eq!(result.final_answer, "first answer text");
        assert!(result.meets_consensus);
    }

    #[test]
    fn test_below_minimum_is_a_result_not_an_error() {
        let clusters = cluster_from(&[
            (0, "alpha"),
            (1, "beta unrelated"),
            (2, "gamma also different"),
        ]);
        let result = majority_vote(clusters, 0.8);

        assert!(!result.meets_consensus);
        assert_eq!(result.supporting_agents, 1);
    }

    #[test]
    fn test_top_clusters_capped_at_five() {
        let contents: Vec<(usize, String)> = (0..8)
            .map(|i| (i, format!("distinct answer number {i} with unique words{i}")))
            .collect();
        let refs: Vec<(usize, &str)> = contents.iter().map(|(i, s)| (*i, s.as_str())).collect();

        let result = majority_vote(cluster_from(&refs), 0.5);
        assert_eq!(result.top_clusters.len(), 5);
    }

    #[test]
    fn test_insufficient_responses_shortfall() {
        let shortfall = InsufficientResponses::new(1, 3);
        assert_eq!(shortfall.shortfall(), 2);
        assert_eq!(shortfall.to_string(), "insufficient responses: 1/3 required");
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = EnsembleOutcome::Insufficient(InsufficientResponses::new(0, 3));
        assert!(outcome.is_insufficient());
        assert!(!outcome.is_completed());
        assert!(outcome.result().is_none());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = EnsembleOutcome::Insufficient(InsufficientResponses::new(2, 5));
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"insufficient\""));
        assert!(json.contains("\"succeeded\":2"));
    }
}
