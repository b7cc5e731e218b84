//! Early-stop policy
//!
//! Watches the growing cluster partition and decides when the remaining
//! invocations are no longer worth their cost: once enough responses have
//! arrived and one cluster holds a dominant fraction of them, outstanding
//! work can be cancelled.

use super::cluster::ResponseClusterer;

/// Dominance-threshold policy over the partial response set.
///
/// The dominant fraction is recomputed from scratch after every insertion,
/// so it can fluctuate downward as minority answers arrive before the
/// policy fires.
#[derive(Debug, Clone, Copy)]
pub struct EarlyStopPolicy {
    enabled: bool,
    /// Largest-cluster fraction at which to stop
    threshold: f64,
    /// Do not stop before this many responses have been collected
    min_responses: usize,
}

impl EarlyStopPolicy {
    pub fn new(enabled: bool, threshold: f64, min_responses: usize) -> Self {
        Self {
            enabled,
            threshold,
            min_responses,
        }
    }

    /// Policy that never fires
    pub fn disabled() -> Self {
        Self::new(false, 1.0, usize::MAX)
    }

    /// Should the run cancel its outstanding invocations?
    pub fn should_stop(&self, clusterer: &ResponseClusterer) -> bool {
        self.enabled
            && clusterer.total_responses() >= self.min_responses
            && clusterer.largest_cluster_fraction() >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::response::AgentResponse;
    use std::time::Duration;

    fn response(agent_id: usize, content: &str) -> AgentResponse {
        AgentResponse::new(agent_id, content, 0.7, Duration::from_millis(50))
    }

    #[test]
    fn test_does_not_fire_below_response_floor() {
        let policy = EarlyStopPolicy::new(true, 0.9, 3);
        let mut clusterer = ResponseClusterer::new(0.85);
        clusterer.insert(response(0, "same"));
        clusterer.insert(response(1, "same"));

        // 100% dominance, but only 2 of the required 3 responses
        assert!(!policy.should_stop(&clusterer));
    }

    #[test]
    fn test_fires_at_floor_with_dominant_cluster() {
        let policy = EarlyStopPolicy::new(true, 0.9, 3);
        let mut clusterer = ResponseClusterer::new(0.85);
        for i in 0..3 {
            clusterer.insert(response(i, "same"));
        }

        assert!(policy.should_stop(&clusterer));
    }

    #[test]
    fn test_does_not_fire_without_dominance() {
        let policy = EarlyStopPolicy::new(true, 0.9, 3);
        let mut clusterer = ResponseClusterer::new(0.85);
        clusterer.insert(response(0, "alpha"));
        clusterer.insert(response(1, "beta something else"));
        clusterer.insert(response(2, "alpha"));

        // 2/3 < 0.9
        assert!(!policy.should_stop(&clusterer));
    }

    #[test]
    fn test_disabled_policy_never_fires() {
        let policy = EarlyStopPolicy::new(false, 0.5, 1);
        let mut clusterer = ResponseClusterer::new(0.85);
        for i in 0..10 {
            clusterer.insert(response(i, "same"));
        }

        assert!(!policy.should_stop(&clusterer));
        assert!(!EarlyStopPolicy::disabled().should_stop(&clusterer));
    }

    #[test]
    fn test_dominance_can_drop_back_under_threshold() {
        let policy = EarlyStopPolicy::new(true, 0.75, 4);
        let mut clusterer = ResponseClusterer::new(0.85);
        clusterer.insert(response(0, "alpha"));
        clusterer.insert(response(1, "alpha"));
        clusterer.insert(response(2, "alpha"));
        // 3/3 dominant but below floor; a minority arrival then dilutes it
        clusterer.insert(response(3, "unrelated answer text"));

        // 3/4 = 0.75 >= threshold: fires exactly at the boundary
        assert!(policy.should_stop(&clusterer));

        clusterer.insert(response(4, "another different reply"));
        // 3/5 = 0.6 < 0.75: no longer dominant
        assert!(!policy.should_stop(&clusterer));
    }
}
