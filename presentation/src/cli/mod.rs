//! CLI surface

pub mod commands;

pub use commands::{Cli, OutputFormat};
