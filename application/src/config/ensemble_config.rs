//! Resolved ensemble run configuration.
//!
//! Groups every knob the run-ensemble use case reads. Validation happens
//! once, before any invocation is dispatched; a validation failure is the
//! only fatal error the engine produces.

use ensemble_domain::{
    EarlyStopPolicy, TemperatureDistribution, TemperatureRange, TemperatureSchedule,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors. Fatal, raised before dispatch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("num_agents must be positive")]
    NoAgents,

    #[error("max_concurrent must be positive")]
    NoConcurrency,

    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("temperature_range [{0}, {1}] is not a valid range")]
    InvalidTemperatureRange(f64, f64),

    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("min_consensus must be within 0-100, got {0}")]
    InvalidMinConsensus(u8),
}

/// How successful responses are reduced to one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    /// Cluster by similarity, largest cluster wins
    #[default]
    MajorityVote,
}

impl AggregationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::MajorityVote => "majority_vote",
        }
    }
}

/// Fully-resolved configuration for one ensemble run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Number of agent invocations to fan out
    pub num_agents: usize,
    /// Model identifier passed to the gateway
    pub model: String,
    /// Ceiling on simultaneously in-flight invocations
    pub max_concurrent: usize,
    /// Fan out concurrently; `false` runs invocations one at a time
    pub parallel_execution: bool,
    /// Diversify sampling temperatures across invocations
    pub vary_temperature: bool,
    /// Temperature used for every invocation when diversification is off
    pub base_temperature: f64,
    /// Bound for diversified temperatures
    pub temperature_range: TemperatureRange,
    /// Distribution diversified temperatures are drawn from
    pub temperature_distribution: TemperatureDistribution,
    /// Aggregation strategy over successful responses
    pub aggregation_method: AggregationMethod,
    /// Minimum winning-cluster percentage (0-100) for a confident answer
    pub min_consensus: u8,
    /// Lexical similarity at which two answers share a cluster (0-1)
    pub similarity_threshold: f64,
    /// Per-invocation timeout in seconds
    pub timeout_seconds: u64,
    /// Quorum: successful responses required before aggregation
    pub min_successful_responses: usize,
    /// Cancel outstanding invocations once a cluster dominates
    pub early_stopping: bool,
    /// Largest-cluster fraction (0-1) at which to stop early
    pub early_stop_threshold: f64,
    /// Responses that must be collected before early stop is considered
    pub early_stop_min_responses: usize,
    /// Attach execution statistics to the result
    pub include_metadata: bool,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            num_agents: 10,
            model: "gpt-4o-mini".to_string(),
            max_concurrent: 5,
            parallel_execution: true,
            vary_temperature: true,
            base_temperature: 0.7,
            temperature_range: TemperatureRange::default(),
            temperature_distribution: TemperatureDistribution::default(),
            aggregation_method: AggregationMethod::default(),
            min_consensus: 50,
            similarity_threshold: 0.85,
            timeout_seconds: 60,
            min_successful_responses: 3,
            early_stopping: true,
            early_stop_threshold: 0.9,
            early_stop_min_responses: 5,
            include_metadata: true,
        }
    }
}

impl EnsembleConfig {
    /// Validate every field. Called by the use case before dispatch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_agents == 0 {
            return Err(ConfigError::NoAgents);
        }
        if self.max_concurrent == 0 {
            return Err(ConfigError::NoConcurrency);
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.vary_temperature && !self.temperature_range.is_valid() {
            return Err(ConfigError::InvalidTemperatureRange(
                self.temperature_range.min(),
                self.temperature_range.max(),
            ));
        }
        Self::check_threshold("similarity_threshold", self.similarity_threshold)?;
        Self::check_threshold("early_stop_threshold", self.early_stop_threshold)?;
        if self.min_consensus > 100 {
            return Err(ConfigError::InvalidMinConsensus(self.min_consensus));
        }
        Ok(())
    }

    fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&value) || value.is_nan() {
            return Err(ConfigError::ThresholdOutOfRange { name, value });
        }
        Ok(())
    }

    /// The temperature plan this config describes
    pub fn temperature_schedule(&self) -> TemperatureSchedule {
        if self.vary_temperature {
            TemperatureSchedule::Diversified {
                range: self.temperature_range,
                distribution: self.temperature_distribution,
            }
        } else {
            TemperatureSchedule::Fixed(self.base_temperature)
        }
    }

    /// The early-stop policy this config describes
    pub fn early_stop_policy(&self) -> EarlyStopPolicy {
        EarlyStopPolicy::new(
            self.early_stopping,
            self.early_stop_threshold,
            self.early_stop_min_responses,
        )
    }

    /// Per-invocation timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// `min_consensus` as a fraction in [0, 1]
    pub fn min_consensus_fraction(&self) -> f64 {
        f64::from(self.min_consensus) / 100.0
    }

    // ==================== Builder Methods ====================

    pub fn with_num_agents(mut self, num_agents: usize) -> Self {
        self.num_agents = num_agents;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_min_consensus(mut self, min_consensus: u8) -> Self {
        self.min_consensus = min_consensus;
        self
    }

    pub fn with_early_stopping(mut self, enabled: bool) -> Self {
        self.early_stopping = enabled;
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EnsembleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_agents_rejected() {
        let config = EnsembleConfig::default().with_num_agents(0);
        assert!(matches!(config.validate(), Err(ConfigError::NoAgents)));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = EnsembleConfig::default().with_max_concurrent(0);
        assert!(matches!(config.validate(), Err(ConfigError::NoConcurrency)));
    }

    #[test]
    fn test_inverted_temperature_range_rejected() {
        let mut config = EnsembleConfig::default();
        config.temperature_range = TemperatureRange(1.0, 0.2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTemperatureRange(_, _))
        ));
    }

    #[test]
    fn test_inverted_range_tolerated_when_diversification_off() {
        let mut config = EnsembleConfig::default();
        config.vary_temperature = false;
        config.temperature_range = TemperatureRange(1.0, 0.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let config = EnsembleConfig::default().with_similarity_threshold(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange { name: "similarity_threshold", .. })
        ));
    }

    #[test]
    fn test_min_consensus_over_100_rejected() {
        let config = EnsembleConfig::default().with_min_consensus(101);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMinConsensus(101))
        ));
    }

    #[test]
    fn test_min_consensus_fraction() {
        let config = EnsembleConfig::default().with_min_consensus(60);
        assert!((config.min_consensus_fraction() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_schedule_respects_vary_flag() {
        let mut config = EnsembleConfig::default();
        config.vary_temperature = false;
        config.base_temperature = 0.4;
        assert_eq!(config.temperature_schedule(), TemperatureSchedule::Fixed(0.4));

        config.vary_temperature = true;
        assert!(matches!(
            config.temperature_schedule(),
            TemperatureSchedule::Diversified { .. }
        ));
    }
}
