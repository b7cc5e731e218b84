//! Application layer for agent-ensemble
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AggregationMethod, ConfigError, EnsembleConfig};
pub use ports::{
    llm_gateway::{Completion, CompletionRequest, GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::run_ensemble::{RunEnsembleError, RunEnsembleInput, RunEnsembleUseCase};
