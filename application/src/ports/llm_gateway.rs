//! LLM Gateway port
//!
//! Defines the interface for performing one agent invocation against an
//! external text-generation provider.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during an invocation.
///
/// The engine treats every kind uniformly: the failed invocation is
/// logged, excluded from aggregation, and never aborts its siblings.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Timeout")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// One parameterized invocation request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The question to answer
    pub question: String,
    /// System prompt framing the agent's role
    pub system_prompt: String,
    /// Sampling temperature for this invocation
    pub temperature: f64,
    /// Per-invocation timeout, enforced by the adapter
    pub timeout: Duration,
}

/// Result of a successful invocation
#[derive(Debug, Clone)]
pub struct Completion {
    /// The generated answer text
    pub content: String,
    /// How long the provider took to answer
    pub elapsed: Duration,
}

/// Gateway for agent invocations
///
/// This port defines how the application layer reaches the external
/// text-generation service. Implementations (adapters) live in the
/// infrastructure layer. Each call is the single suspension point of the
/// task that issues it.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Perform one invocation and return the generated text with timing
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GatewayError>;
}
