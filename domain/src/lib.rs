//! Domain layer for agent-ensemble
//!
//! This crate contains the core business logic for ensemble execution:
//! response clustering, majority voting, temperature diversification, and
//! the early-stop policy. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Ensemble run
//!
//! One question is fanned out to N independently parameterized agent
//! invocations. Completed answers are grouped into similarity clusters as
//! they arrive, and the largest cluster wins the vote.
//!
//! ## Early stopping
//!
//! Once a cluster dominates the responses collected so far, outstanding
//! invocations can be cancelled to save cost and latency.

pub mod core;
pub mod ensemble;

// Re-export commonly used types
pub use crate::core::question::Question;
pub use ensemble::{
    cluster::{Cluster, ResponseClusterer},
    consensus::{
        ClusterSummary, EnsembleMetadata, EnsembleOutcome, EnsembleResult, InsufficientResponses,
        current_timestamp, majority_vote,
    },
    early_stop::EarlyStopPolicy,
    response::AgentResponse,
    similarity::lexical_similarity,
    temperature::{TemperatureDistribution, TemperatureRange, TemperatureSchedule},
};
