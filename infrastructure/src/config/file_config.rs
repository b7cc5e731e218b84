//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.
//! `FileConfig::resolve` flattens the sections (plus an optional named
//! profile) into the application-layer [`EnsembleConfig`].

use ensemble_application::{AggregationMethod, EnsembleConfig};
use ensemble_domain::{TemperatureDistribution, TemperatureRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Profile selection errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile '{name}' not found (available: {available})")]
    UnknownProfile { name: String, available: String },
}

/// Raw ensemble section from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEnsembleConfig {
    pub num_agents: usize,
    pub model: String,
    pub max_concurrent: usize,
    pub parallel_execution: bool,
    pub timeout_seconds: u64,
    pub min_successful_responses: usize,
    pub base_temperature: f64,
}

impl Default for FileEnsembleConfig {
    fn default() -> Self {
        let defaults = EnsembleConfig::default();
        Self {
            num_agents: defaults.num_agents,
            model: defaults.model,
            max_concurrent: defaults.max_concurrent,
            parallel_execution: defaults.parallel_execution,
            timeout_seconds: defaults.timeout_seconds,
            min_successful_responses: defaults.min_successful_responses,
            base_temperature: defaults.base_temperature,
        }
    }
}

/// Raw diversification section from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiversificationConfig {
    pub vary_temperature: bool,
    pub temperature_range: TemperatureRange,
    pub temperature_distribution: TemperatureDistribution,
}

impl Default for FileDiversificationConfig {
    fn default() -> Self {
        Self {
            vary_temperature: true,
            temperature_range: TemperatureRange::default(),
            temperature_distribution: TemperatureDistribution::default(),
        }
    }
}

/// Raw aggregation section from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAggregationConfig {
    pub method: AggregationMethod,
    /// Integer percentage, 0-100
    pub min_consensus: u8,
    pub similarity_threshold: f64,
}

impl Default for FileAggregationConfig {
    fn default() -> Self {
        let defaults = EnsembleConfig::default();
        Self {
            method: defaults.aggregation_method,
            min_consensus: defaults.min_consensus,
            similarity_threshold: defaults.similarity_threshold,
        }
    }
}

/// Raw performance section from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePerformanceConfig {
    pub early_stopping: bool,
    pub early_stop_threshold: f64,
    pub early_stop_min_responses: usize,
}

impl Default for FilePerformanceConfig {
    fn default() -> Self {
        let defaults = EnsembleConfig::default();
        Self {
            early_stopping: defaults.early_stopping,
            early_stop_threshold: defaults.early_stop_threshold,
            early_stop_min_responses: defaults.early_stop_min_responses,
        }
    }
}

/// Raw output section from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub include_metadata: bool,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            include_metadata: true,
            color: true,
        }
    }
}

/// A named profile: a flat table of overrides spanning the sections.
///
/// Every field is optional; only the keys a profile names are overridden
/// when it is selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub num_agents: Option<usize>,
    pub model: Option<String>,
    pub max_concurrent: Option<usize>,
    pub parallel_execution: Option<bool>,
    pub timeout_seconds: Option<u64>,
    pub min_successful_responses: Option<usize>,
    pub vary_temperature: Option<bool>,
    pub temperature_range: Option<TemperatureRange>,
    pub temperature_distribution: Option<TemperatureDistribution>,
    pub min_consensus: Option<u8>,
    pub similarity_threshold: Option<f64>,
    pub early_stopping: Option<bool>,
    pub early_stop_threshold: Option<f64>,
    pub early_stop_min_responses: Option<usize>,
}

/// Complete raw configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub ensemble: FileEnsembleConfig,
    pub diversification: FileDiversificationConfig,
    pub aggregation: FileAggregationConfig,
    pub performance: FilePerformanceConfig,
    pub output: FileOutputConfig,
    pub profiles: BTreeMap<String, Profile>,
}

impl FileConfig {
    /// Flatten the sections (plus an optional named profile) into the
    /// resolved run configuration. Validation happens later, in the
    /// application layer, right before dispatch.
    pub fn resolve(&self, profile: Option<&str>) -> Result<EnsembleConfig, ProfileError> {
        let mut config = EnsembleConfig {
            num_agents: self.ensemble.num_agents,
            model: self.ensemble.model.clone(),
            max_concurrent: self.ensemble.max_concurrent,
            parallel_execution: self.ensemble.parallel_execution,
            vary_temperature: self.diversification.vary_temperature,
            base_temperature: self.ensemble.base_temperature,
            temperature_range: self.diversification.temperature_range,
            temperature_distribution: self.diversification.temperature_distribution,
            aggregation_method: self.aggregation.method,
            min_consensus: self.aggregation.min_consensus,
            similarity_threshold: self.aggregation.similarity_threshold,
            timeout_seconds: self.ensemble.timeout_seconds,
            min_successful_responses: self.ensemble.min_successful_responses,
            early_stopping: self.performance.early_stopping,
            early_stop_threshold: self.performance.early_stop_threshold,
            early_stop_min_responses: self.performance.early_stop_min_responses,
            include_metadata: self.output.include_metadata,
        };

        if let Some(name) = profile {
            let profile = self.profiles.get(name).ok_or_else(|| {
                ProfileError::UnknownProfile {
                    name: name.to_string(),
                    available: self
                        .profiles
                        .keys()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", "),
                }
            })?;
            apply_profile(&mut config, profile);
        }

        Ok(config)
    }
}

fn apply_profile(config: &mut EnsembleConfig, profile: &Profile) {
    if let Some(value) = profile.num_agents {
        config.num_agents = value;
    }
    if let Some(value) = &profile.model {
        config.model = value.clone();
    }
    if let Some(value) = profile.max_concurrent {
        config.max_concurrent = value;
    }
    if let Some(value) = profile.parallel_execution {
        config.parallel_execution = value;
    }
    if let Some(value) = profile.timeout_seconds {
        config.timeout_seconds = value;
    }
    if let Some(value) = profile.min_successful_responses {
        config.min_successful_responses = value;
    }
    if let Some(value) = profile.vary_temperature {
        config.vary_temperature = value;
    }
    if let Some(value) = profile.temperature_range {
        config.temperature_range = value;
    }
    if let Some(value) = profile.temperature_distribution {
        config.temperature_distribution = value;
    }
    if let Some(value) = profile.min_consensus {
        config.min_consensus = value;
    }
    if let Some(value) = profile.similarity_threshold {
        config.similarity_threshold = value;
    }
    if let Some(value) = profile.early_stopping {
        config.early_stopping = value;
    }
    if let Some(value) = profile.early_stop_threshold {
        config.early_stop_threshold = value;
    }
    if let Some(value) = profile.early_stop_min_responses {
        config.early_stop_min_responses = value;
    }
}
