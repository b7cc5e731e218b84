//! Incremental response clustering
//!
//! Responses are grouped one at a time as they arrive from the collector.
//! Each new response is compared against every existing cluster's
//! representative; the first cluster (in creation order) that clears the
//! similarity threshold takes it, otherwise the response seeds a new
//! cluster. Clusters are never merged, split, or revisited, so an
//! insertion costs O(existing cluster count) and the partition is
//! deterministic for a fixed arrival order.

use super::response::AgentResponse;
use super::similarity::lexical_similarity;
use serde::{Deserialize, Serialize};

/// A set of responses judged mutually similar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Content of the first response assigned to this cluster; used as the
    /// comparison anchor and as the candidate final answer
    pub representative: String,
    /// Member responses in arrival order
    pub members: Vec<AgentResponse>,
}

impl Cluster {
    fn seed(response: AgentResponse) -> Self {
        Self {
            representative: response.content.clone(),
            members: vec![response],
        }
    }

    /// Number of responses in this cluster
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Streaming clusterer over completed responses.
///
/// Owned by the single aggregation point that consumes completing tasks;
/// insertions are serialized there, so the partition needs no locking.
#[derive(Debug, Clone)]
pub struct ResponseClusterer {
    clusters: Vec<Cluster>,
    similarity_threshold: f64,
    total_responses: usize,
}

impl ResponseClusterer {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            clusters: Vec::new(),
            similarity_threshold,
            total_responses: 0,
        }
    }

    /// Insert one response, either appending it to the first sufficiently
    /// similar cluster (creation order) or seeding a new one.
    ///
    /// Returns the index of the cluster the response landed in.
    pub fn insert(&mut self, response: AgentResponse) -> usize {
        self.total_responses += 1;

        for (index, cluster) in self.clusters.iter_mut().enumerate() {
            let similarity = lexical_similarity(&response.content, &cluster.representative);
            if similarity >= self.similarity_threshold {
                cluster.members.push(response);
                return index;
            }
        }

        self.clusters.push(Cluster::seed(response));
        self.clusters.len() - 1
    }

    /// Number of responses inserted so far
    pub fn total_responses(&self) -> usize {
        self.total_responses
    }

    /// Size of the largest cluster (0 when empty)
    pub fn largest_cluster_size(&self) -> usize {
        self.clusters.iter().map(Cluster::len).max().unwrap_or(0)
    }

    /// Fraction of responses-so-far held by the largest cluster.
    ///
    /// Recomputed from scratch on the current partial partition; minority
    /// arrivals can shrink it between insertions.
    pub fn largest_cluster_fraction(&self) -> f64 {
        if self.total_responses == 0 {
            return 0.0;
        }
        self.largest_cluster_size() as f64 / self.total_responses as f64
    }

    /// The clusters in creation order
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Consume the clusterer and return the partition
    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }
}
