//! Gateway adapters for external text-generation providers

mod openai;

pub use openai::{GatewaySetupError, OpenAiGateway};
