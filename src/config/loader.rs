//! Configuration Loading and Resolution
//!
//! Resolves the effective configuration from four layers, strongest first:
//! 1. Explicit CLI flags
//! 2. Preset selected on the command line
//! 3. Configuration file (explicit path, or discovered in the working
//!    directory)
//! 4. Built-in defaults
//!
//! Resolution always ends with `DocweaveConfig::validate`, so a bad merge
//! aborts before any file is touched.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::parser::{ConfigParser, TomlConfigParser, YamlConfigParser};
use super::presets::PresetRegistry;
use super::types::DocweaveConfig;
use crate::constants::config::DEFAULT_FILES;
use crate::types::{DocweaveError, Result};

// =============================================================================
// CLI Overrides
// =============================================================================

/// Values the command line may pin, each overriding every layer below it.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub preset: Option<String>,
    pub config_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_context: Option<usize>,
    /// Empty means "not provided"; non-empty replaces the constraint list.
    pub constraints: Vec<String>,
}

// =============================================================================
// Configuration Manager
// =============================================================================

/// Discovers, parses, and merges configuration sources.
pub struct ConfigurationManager {
    parsers: Vec<Box<dyn ConfigParser>>,
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(YamlConfigParser), Box::new(TomlConfigParser)],
        }
    }

    /// Register an additional parser. Parsers are tried in registration
    /// order, so built-in formats keep priority over later additions.
    pub fn register_parser(&mut self, parser: Box<dyn ConfigParser>) {
        self.parsers.push(parser);
    }

    /// Load a configuration file if one is present.
    ///
    /// An explicit path that does not exist is an error. With no explicit
    /// path, the default filenames are probed in order and a miss across
    /// all of them just means the file layer is skipped.
    pub fn load_config(&self, explicit: Option<&Path>) -> Result<Option<DocweaveConfig>> {
        let Some(path) = self.find_config_file(explicit)? else {
            debug!("No configuration file found, using defaults");
            return Ok(None);
        };

        debug!("Loading configuration from {}", path.display());
        for parser in &self.parsers {
            if parser.can_handle(&path) {
                return parser.parse(&path).map(Some);
            }
        }

        Err(DocweaveError::Config(format!(
            "No parser found for file: {}",
            path.display()
        )))
    }

    /// Produce the effective configuration for a run and validate it.
    pub fn resolve_config(
        &self,
        presets: &PresetRegistry,
        overrides: &ConfigOverrides,
    ) -> Result<DocweaveConfig> {
        let mut config = self
            .load_config(overrides.config_file.as_deref())?
            .unwrap_or_default();

        // A preset pins the endpoint and model layer but leaves file-level
        // generation tuning (constraints, ignore patterns) alone.
        if let Some(name) = &overrides.preset {
            let preset = presets.get(name)?;
            config.api.base_url = preset.api.base_url.clone();
            config.api.api_key = preset.api.api_key.clone();
            config.generation.model = preset.generation.model.clone();
            config.generation.max_context = preset.generation.max_context;
        }

        if let Some(base_url) = &overrides.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(api_key) = &overrides.api_key {
            config.api.api_key = Some(api_key.clone());
        }
        if let Some(model) = &overrides.model {
            config.generation.model = model.clone();
        }
        if let Some(max_context) = overrides.max_context {
            config.generation.max_context = max_context;
        }
        if !overrides.constraints.is_empty() {
            config.generation.constraints = overrides.constraints.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn find_config_file(&self, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(DocweaveError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        for name in DEFAULT_FILES {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn overrides_with_preset(name: &str) -> ConfigOverrides {
        ConfigOverrides {
            preset: Some(name.to_string()),
            ..ConfigOverrides::default()
        }
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let manager = ConfigurationManager::new();
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.yml");

        let err = manager.load_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let manager = ConfigurationManager::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "generation:\n  model: from-file\n").unwrap();

        let config = manager.load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.generation.model, "from-file");
    }

    #[test]
    fn test_unhandled_extension_is_an_error() {
        let manager = ConfigurationManager::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[api]\n").unwrap();

        let err = manager.load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("No parser found"));
    }

    #[test]
    fn test_resolve_preset_only() {
        let manager = ConfigurationManager::new();
        let presets = PresetRegistry::new();

        let config = manager
            .resolve_config(&presets, &overrides_with_preset("ollama"))
            .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:11434/v1");
        assert_eq!(config.generation.model, "phi4");
    }

    #[test]
    fn test_resolve_cli_overrides_preset() {
        let manager = ConfigurationManager::new();
        let presets = PresetRegistry::new();

        let overrides = ConfigOverrides {
            model: Some("phi4-mini".to_string()),
            max_context: Some(8192),
            ..overrides_with_preset("ollama")
        };

        let config = manager.resolve_config(&presets, &overrides).unwrap();
        assert_eq!(config.generation.model, "phi4-mini");
        assert_eq!(config.generation.max_context, 8192);
        // Preset still supplies what the CLI left blank
        assert_eq!(config.api.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_resolve_preset_overrides_file() {
        let manager = ConfigurationManager::new();
        let presets = PresetRegistry::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(
            &path,
            "api:\n  base_url: http://example.com/v1\n  api_key: file-key\ngeneration:\n  model: file-model\n  constraints:\n    - file constraint\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            config_file: Some(path),
            ..overrides_with_preset("ollama")
        };

        let config = manager.resolve_config(&presets, &overrides).unwrap();
        // Preset pins the endpoint layer
        assert_eq!(config.api.base_url, "http://localhost:11434/v1");
        assert_eq!(config.generation.model, "phi4");
        // File-level generation tuning survives
        assert_eq!(config.generation.constraints, vec!["file constraint"]);
    }

    #[test]
    fn test_resolve_constraints_replace_not_append() {
        let manager = ConfigurationManager::new();
        let presets = PresetRegistry::new();

        let overrides = ConfigOverrides {
            constraints: vec!["only this one".to_string()],
            ..overrides_with_preset("ollama")
        };

        let config = manager.resolve_config(&presets, &overrides).unwrap();
        assert_eq!(config.generation.constraints, vec!["only this one"]);
    }

    #[test]
    fn test_resolve_validates_result() {
        let manager = ConfigurationManager::new();
        let presets = PresetRegistry::new();

        // openai preset has no key baked in, so resolution must fail
        // without one from the CLI or a file.
        let err = manager
            .resolve_config(&presets, &overrides_with_preset("openai"))
            .unwrap_err();
        assert!(err.to_string().contains("API key"));

        let overrides = ConfigOverrides {
            api_key: Some("sk-test".to_string()),
            ..overrides_with_preset("openai")
        };
        assert!(manager.resolve_config(&presets, &overrides).is_ok());
    }

    #[test]
    fn test_resolve_unknown_preset() {
        let manager = ConfigurationManager::new();
        let presets = PresetRegistry::new();

        let err = manager
            .resolve_config(&presets, &overrides_with_preset("claude"))
            .unwrap_err();
        assert!(err.to_string().contains("Unknown preset"));
    }

    #[test]
    fn test_resolve_without_any_source_fails_validation() {
        let manager = ConfigurationManager::new();
        let presets = PresetRegistry::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.yml");
        fs::write(&path, "").unwrap();

        let overrides = ConfigOverrides {
            config_file: Some(path),
            ..ConfigOverrides::default()
        };

        let err = manager.resolve_config(&presets, &overrides).unwrap_err();
        assert!(err.to_string().contains("Base URL"));
    }
}
