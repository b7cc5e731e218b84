//! Configuration file loading for agent-ensemble
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./ensemble.toml` or `./.ensemble.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/agent-ensemble/config.toml`
//! 4. Fallback: `~/.config/agent-ensemble/config.toml`
//! 5. Default values
//!
//! A loaded file may also carry named profiles (`[profiles.<name>]`) whose
//! keys override the matching base settings when the profile is selected.

mod file_config;
mod loader;

pub use file_config::{
    FileAggregationConfig, FileConfig, FileDiversificationConfig, FileEnsembleConfig,
    FileOutputConfig, FilePerformanceConfig, Profile, ProfileError,
};
pub use loader::ConfigLoader;
