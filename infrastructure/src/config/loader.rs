//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::PathBuf;

const PROJECT_FILES: [&str; 2] = ["ensemble.toml", ".ensemble.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration, merging every discovered source over the
    /// built-in defaults. Later sources win:
    ///
    /// defaults < global (XDG) < project file < explicit `--config` path
    pub fn load(explicit: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::from(Serialized::defaults(FileConfig::default()));
        for path in Self::sources(explicit) {
            figment = figment.merge(Toml::file(path));
        }
        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Existing config files to merge, lowest priority first
    fn sources(explicit: Option<&PathBuf>) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(global) = Self::global_config_path().filter(|p| p.exists()) {
            paths.push(global);
        }
        if let Some(project) = Self::project_config_path() {
            paths.push(project);
        }
        if let Some(path) = explicit {
            paths.push(path.clone());
        }
        paths
    }

    /// `$XDG_CONFIG_HOME/agent-ensemble/config.toml` (or the platform
    /// equivalent), whether or not the file exists yet
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("agent-ensemble").join("config.toml"))
    }

    /// The project-level config file, if one exists in the working directory
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (lowest priority first):");
        println!("  built-in defaults");

        match Self::global_config_path() {
            Some(path) if path.exists() => println!("  global:  {} (found)", path.display()),
            Some(path) => println!("  global:  {} (absent)", path.display()),
            None => {}
        }

        match Self::project_config_path() {
            Some(path) => println!("  project: {} (found)", path.display()),
            None => println!("  project: ./{} (absent)", PROJECT_FILES[0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.profiles.is_empty());
        assert!(config.output.include_metadata);
    }

    #[test]
    fn test_global_config_path_names_the_tool() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("agent-ensemble"));
    }

    #[test]
    fn test_explicit_path_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
            [ensemble]
            num_agents = 42

            [aggregation]
            min_consensus = 75
            "#
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = ConfigLoader::load(Some(&path)).unwrap();
        let resolved = config.resolve(None).unwrap();

        assert_eq!(resolved.num_agents, 42);
        assert_eq!(resolved.min_consensus, 75);
        // Untouched sections fall back to defaults
        assert!(resolved.early_stopping);
    }

    #[test]
    fn test_explicit_source_is_listed_last() {
        let explicit = PathBuf::from("/tmp/override.toml");
        let sources = ConfigLoader::sources(Some(&explicit));
        assert_eq!(sources.last(), Some(&explicit));
    }
}
