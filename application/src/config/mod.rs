//! Application-level configuration.
//!
//! [`EnsembleConfig`] is the fully-resolved, validated configuration a use
//! case runs with. File discovery, merging, and profile overrides are an
//! infrastructure concern; by the time a config reaches this layer every
//! value is concrete.

pub mod ensemble_config;

pub use ensemble_config::{AggregationMethod, ConfigError, EnsembleConfig};
