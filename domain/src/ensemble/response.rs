//! Agent response value object

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One completed agent invocation.
///
/// Immutable once created; the collector hands it to the clusterer and
/// never touches it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Sequence position of the invocation (0..N-1, unique within a run)
    pub agent_id: usize,
    /// The answer text
    pub content: String,
    /// Temperature this invocation was sampled with
    pub temperature: f64,
    /// How long the invocation took
    pub execution_time: Duration,
    /// Optional confidence score; the default invocation path leaves this unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl AgentResponse {
    /// Creates a completed response.
    ///
    /// # Arguments
    /// * `agent_id` - Sequence position of the invocation within the run
    /// * `content` - The answer text
    /// * `temperature` - Temperature the invocation was sampled with
    /// * `execution_time` - Wall-clock duration of the invocation
    pub fn new(
        agent_id: usize,
        content: impl Into<String>,
        temperature: f64,
        execution_time: Duration,
    ) -> Self {
        Self {
            agent_id,
            content: content.into(),
            temperature,
            execution_time,
            confidence: None,
        }
    }

    /// Attach a confidence score (clamped to [0, 1])
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_creation() {
        let response = AgentResponse::new(3, "Answer: 42", 0.7, Duration::from_millis(450));
        assert_eq!(response.agent_id, 3);
        assert_eq!(response.content, "Answer: 42");
        assert!(response.confidence.is_none());
    }

    #[test]
    fn test_with_confidence_clamps() {
        let response =
            AgentResponse::new(0, "x", 0.5, Duration::ZERO).with_confidence(1.5);
        assert_eq!(response.confidence, Some(1.0));
    }
}
